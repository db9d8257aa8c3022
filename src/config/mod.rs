pub mod app_conf;
pub mod mongo_conf;
pub mod jwt_conf;
pub mod email_conf;
pub mod minio_conf;
pub mod cms_conf;
pub mod ai_conf;
pub mod admin_user_conf;

pub use app_conf::AppConfig;
pub use mongo_conf::MongoConfig;
pub use jwt_conf::JwtConfig;
pub use email_conf::EmailConfig;
pub use minio_conf::MinioConfig;
pub use cms_conf::CmsConfig;
pub use ai_conf::AiConfig;
pub use admin_user_conf::AdminUserConfig;

/// Common configuration error type
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Environment variable not found: {0}")]
    EnvVarNotFound(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Parse error: {0}")]
    ParseError(String),
}

impl ConfigError {
    /// True when the configuration is simply absent rather than wrong.
    pub fn is_missing(&self) -> bool {
        matches!(self, ConfigError::EnvVarNotFound(_))
    }
}

/// Parse `name` from the environment, falling back to `default` when unset.
/// A value that is set but does not parse is an error, never a silent default.
pub(crate) fn parse_var<T>(name: &str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr + std::fmt::Display,
{
    match std::env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map_err(|_| {
            tracing::error!("Invalid {} value: {}", name, raw);
            ConfigError::InvalidValue(format!("{} has an invalid value: {}", name, raw))
        }),
        Err(_) => {
            tracing::debug!("{} not set, using {}", name, default);
            Ok(default)
        }
    }
}
