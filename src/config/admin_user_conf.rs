use std::env;
use serde::{Serialize, Deserialize};
use tracing::debug;

use crate::config::ConfigError;

/// Credentials of the first administrator, seeded at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminUserConfig {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl AdminUserConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = AdminUserConfig {
            email: env::var("ADMIN_EMAIL").map_err(|_| ConfigError::EnvVarNotFound("ADMIN_EMAIL".to_string()))?,
            password: env::var("ADMIN_PASSWORD").map_err(|_| ConfigError::EnvVarNotFound("ADMIN_PASSWORD".to_string()))?,
            name: env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string()),
        };
        debug!("Admin seed account: {}", config.email);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.email.contains('@') {
            return Err(ConfigError::ValidationError("ADMIN_EMAIL is not an email address".to_string()));
        }
        if self.password.len() < 8 {
            return Err(ConfigError::ValidationError("ADMIN_PASSWORD must be at least 8 characters".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_short_password() {
        let config = AdminUserConfig {
            email: "admin@domy.example".to_string(),
            password: "short".to_string(),
            name: "Admin".to_string(),
        };
        assert!(config.validate().is_err());
    }
}
