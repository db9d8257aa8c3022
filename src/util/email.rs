use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, MultiPart, SinglePart},
    transport::smtp::{
        authentication::Credentials,
        client::{Tls, TlsParameters},
    },
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::config::email_conf::SmtpSecurity;
use crate::config::{ConfigError, EmailConfig};

/// Email service errors
#[derive(Debug, thiserror::Error)]
pub enum EmailError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("SMTP error: {0}")]
    SmtpError(String),

    #[error("Message building error: {0}")]
    MessageError(String),

    #[error("Address error: {0}")]
    AddressError(String),
}

impl From<ConfigError> for EmailError {
    fn from(err: ConfigError) -> Self {
        EmailError::ConfigError(err.to_string())
    }
}

/// Outgoing message. At least one body must be set.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub text_body: Option<String>,
    pub html_body: Option<String>,
}

impl EmailMessage {
    pub fn new(to: impl Into<String>, subject: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            subject: subject.into(),
            text_body: None,
            html_body: None,
        }
    }

    pub fn with_text_body(mut self, body: String) -> Self {
        self.text_body = Some(body);
        self
    }

    pub fn with_html_body(mut self, body: String) -> Self {
        self.html_body = Some(body);
        self
    }
}

/// What the provider reported for a delivered (or simulated) message.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SendReceipt {
    pub success: bool,
    pub provider: String,
}

#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send_email(&self, message: EmailMessage) -> Result<SendReceipt, EmailError>;
    /// True when messages are logged instead of delivered.
    fn is_simulation(&self) -> bool;
}

/// SMTP mailer. Without a transport it runs in simulation mode.
pub struct SmtpEmailService {
    pub config: EmailConfig,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpEmailService {
    #[instrument(skip(config), fields(host = %config.host, port = config.port))]
    pub fn new(config: EmailConfig) -> Result<Self, EmailError> {
        config.validate()?;

        let mut transport_builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .timeout(Some(std::time::Duration::from_secs(config.timeout_secs)));

        let tls = match config.security {
            SmtpSecurity::None => Tls::None,
            security => {
                let parameters = TlsParameters::new(config.host.clone())
                    .map_err(|e| EmailError::ConfigError(format!("TLS configuration error: {}", e)))?;
                if security == SmtpSecurity::Tls {
                    Tls::Wrapper(parameters)
                } else {
                    Tls::Required(parameters)
                }
            }
        };
        transport_builder = transport_builder.tls(tls);

        if let Some((username, password)) = config.credentials() {
            transport_builder =
                transport_builder.credentials(Credentials::new(username.to_string(), password.to_string()));
        }

        info!("SMTP email service initialized");
        Ok(Self { config, transport: Some(transport_builder.build()) })
    }

    /// Mailer that only logs what it would send.
    pub fn simulation(config: EmailConfig) -> Self {
        info!("Email provider not configured, running in simulation mode");
        Self { config, transport: None }
    }

    fn build_message(&self, email_message: EmailMessage) -> Result<Message, EmailError> {
        let from_mailbox = self
            .config
            .sender()
            .map_err(|e| EmailError::AddressError(format!("Invalid from address: {}", e)))?;

        let to_mailbox: Mailbox = email_message
            .to
            .parse()
            .map_err(|e| EmailError::AddressError(format!("Invalid to address: {}", e)))?;

        let builder = Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(&email_message.subject);

        let built = match (email_message.text_body, email_message.html_body) {
            (Some(text), Some(html)) => builder.multipart(
                MultiPart::alternative()
                    .singlepart(SinglePart::builder().header(ContentType::TEXT_PLAIN).body(text))
                    .singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html)),
            ),
            (Some(text), None) => builder.body(text),
            (None, Some(html)) => {
                builder.singlepart(SinglePart::builder().header(ContentType::TEXT_HTML).body(html))
            }
            (None, None) => {
                return Err(EmailError::MessageError("No message body provided".to_string()));
            }
        };
        built.map_err(|e| EmailError::MessageError(format!("Failed to build message: {}", e)))
    }
}

pub fn validate_email_address(email: &str) -> Result<(), EmailError> {
    let mut parts = email.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(local), Some(domain), None) if !local.is_empty() && !domain.is_empty() => Ok(()),
        _ => Err(EmailError::AddressError(format!("Invalid email address: {}", email))),
    }
}

#[async_trait]
impl EmailSender for SmtpEmailService {
    #[instrument(skip(self, message), fields(to = %message.to, subject = %message.subject))]
    async fn send_email(&self, message: EmailMessage) -> Result<SendReceipt, EmailError> {
        validate_email_address(&message.to)?;

        let Some(transport) = &self.transport else {
            info!(
                to = %message.to,
                from = %self.config.from_mailbox(),
                subject = %message.subject,
                "Simulated email send"
            );
            return Ok(SendReceipt { success: true, provider: "simulation".to_string() });
        };

        let email = self.build_message(message)?;
        transport.send(email).await.map_err(|e| {
            error!("Failed to send email: {}", e);
            EmailError::SmtpError(format!("Failed to send email: {}", e))
        })?;

        info!("Email sent");
        Ok(SendReceipt { success: true, provider: "smtp".to_string() })
    }

    fn is_simulation(&self) -> bool {
        self.transport.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_simulation_mode_reports_success_without_network() {
        let mailer = SmtpEmailService::simulation(EmailConfig::default());
        assert!(mailer.is_simulation());
        let receipt = mailer
            .send_email(EmailMessage::new("buyer@example.com", "Hello").with_text_body("Hi".into()))
            .await
            .unwrap();
        assert_eq!(receipt, SendReceipt { success: true, provider: "simulation".to_string() });
    }

    #[tokio::test]
    async fn test_simulation_still_rejects_bad_address() {
        let mailer = SmtpEmailService::simulation(EmailConfig::default());
        let result = mailer.send_email(EmailMessage::new("nope", "Hello")).await;
        assert!(matches!(result, Err(EmailError::AddressError(_))));
    }

    #[test]
    fn test_half_configured_login_cannot_build_transport() {
        let config = EmailConfig { password: Some("pw".into()), ..Default::default() };
        assert!(SmtpEmailService::new(config).is_err());
    }

    #[test]
    fn test_build_message_requires_body() {
        let mailer = SmtpEmailService::simulation(EmailConfig::default());
        let result = mailer.build_message(EmailMessage::new("buyer@example.com", "Hello"));
        assert!(matches!(result, Err(EmailError::MessageError(_))));
    }
}
