use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

use lettre::address::AddressError;
use lettre::message::Mailbox;
use tracing::{error, info};

use crate::config::{parse_var, ConfigError};

const DEFAULT_FROM: &str = "noreply@domy-v-italii.com";
const DEFAULT_FROM_NAME: &str = "Domy v Itálii";

/// How the SMTP session is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpSecurity {
    /// Plain connection upgraded with STARTTLS (submission port 587).
    StartTls,
    /// TLS from the first byte (port 465).
    Tls,
    /// Local relays and test catchers only.
    None,
}

impl SmtpSecurity {
    fn for_port(port: u16) -> Self {
        if port == 465 {
            SmtpSecurity::Tls
        } else {
            SmtpSecurity::StartTls
        }
    }
}

impl FromStr for SmtpSecurity {
    type Err = ConfigError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "starttls" => Ok(SmtpSecurity::StartTls),
            "tls" | "ssl" => Ok(SmtpSecurity::Tls),
            "none" | "plain" => Ok(SmtpSecurity::None),
            other => Err(ConfigError::InvalidValue(format!(
                "SMTP_SECURITY must be starttls, tls or none, got {:?}",
                other
            ))),
        }
    }
}

/// Outgoing mail relay. Without `SMTP_HOST` the portal sends nothing and
/// logs each message instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub security: SmtpSecurity,
    /// Relay login; both parts or neither.
    pub username: Option<String>,
    pub password: Option<String>,
    pub from_address: String,
    pub from_name: String,
    pub timeout_secs: u64,
}

impl EmailConfig {
    /// `SMTP_HOST` decides whether mail is configured at all. `SMTP_PORT`
    /// defaults to 587 and `SMTP_SECURITY` to what the port implies.
    pub fn from_env() -> Result<Self, ConfigError> {
        let host = env::var("SMTP_HOST")
            .ok()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound("SMTP_HOST".to_string()))?;
        let port = parse_var("SMTP_PORT", 587u16)?;
        let security = match env::var("SMTP_SECURITY") {
            Ok(value) => value.parse()?,
            Err(_) => SmtpSecurity::for_port(port),
        };
        let non_empty = |name: &str| env::var(name).ok().filter(|v| !v.is_empty());

        let config = EmailConfig {
            host,
            port,
            security,
            username: non_empty("SMTP_USERNAME"),
            password: non_empty("SMTP_PASSWORD"),
            from_address: non_empty("SMTP_FROM").unwrap_or_else(|| DEFAULT_FROM.to_string()),
            from_name: non_empty("SMTP_FROM_NAME").unwrap_or_else(|| DEFAULT_FROM_NAME.to_string()),
            timeout_secs: parse_var("SMTP_TIMEOUT", 30)?,
        };
        config.validate()?;
        info!(
            host = %config.host,
            port = config.port,
            security = ?config.security,
            authenticated = config.credentials().is_some(),
            "SMTP configuration loaded"
        );
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.username.is_some() != self.password.is_some() {
            error!("Only one of SMTP_USERNAME and SMTP_PASSWORD is set");
            return Err(ConfigError::ValidationError(
                "SMTP_USERNAME and SMTP_PASSWORD must be set together".to_string(),
            ));
        }
        if self.sender().is_err() {
            error!("Unusable sender {:?}", self.from_mailbox());
            return Err(ConfigError::ValidationError(format!(
                "SMTP_FROM is not a valid address: {}",
                self.from_address
            )));
        }
        if self.port == 0 || self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "SMTP_PORT and SMTP_TIMEOUT must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn credentials(&self) -> Option<(&str, &str)> {
        Some((self.username.as_deref()?, self.password.as_deref()?))
    }

    pub fn sender(&self) -> Result<Mailbox, AddressError> {
        Ok(Mailbox::new(Some(self.from_name.clone()), self.from_address.parse()?))
    }

    /// Sender as shown to recipients, e.g. `Domy v Itálii <noreply@…>`.
    pub fn from_mailbox(&self) -> String {
        format!("{} <{}>", self.from_name, self.from_address)
    }
}

/// Sender identity for simulation mode, where no relay exists.
impl Default for EmailConfig {
    fn default() -> Self {
        EmailConfig {
            host: "localhost".to_string(),
            port: 1025,
            security: SmtpSecurity::None,
            username: None,
            password: None,
            from_address: DEFAULT_FROM.to_string(),
            from_name: DEFAULT_FROM_NAME.to_string(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_security_follows_port_unless_named() {
        assert_eq!(SmtpSecurity::for_port(465), SmtpSecurity::Tls);
        assert_eq!(SmtpSecurity::for_port(587), SmtpSecurity::StartTls);
        assert_eq!("SSL".parse::<SmtpSecurity>().unwrap(), SmtpSecurity::Tls);
        assert_eq!("none".parse::<SmtpSecurity>().unwrap(), SmtpSecurity::None);
        assert!("smtps-ish".parse::<SmtpSecurity>().is_err());
    }

    #[test]
    fn test_credentials_come_in_pairs() {
        let anonymous_relay = EmailConfig::default();
        assert!(anonymous_relay.validate().is_ok());
        assert_eq!(anonymous_relay.credentials(), None);

        let half = EmailConfig { username: Some("mailer".into()), ..Default::default() };
        assert!(half.validate().is_err());

        let full = EmailConfig { username: Some("mailer".into()), password: Some("pw".into()), ..Default::default() };
        assert_eq!(full.credentials(), Some(("mailer", "pw")));
    }

    #[test]
    fn test_sender_must_be_a_mailbox() {
        let config = EmailConfig::default();
        assert_eq!(config.from_mailbox(), "Domy v Itálii <noreply@domy-v-italii.com>");

        let broken = EmailConfig { from_address: "domy-v-italii.com".into(), ..Default::default() };
        assert!(broken.validate().is_err());
    }
}
