use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, info, warn};

use crate::config::ConfigError;

/// Generative-text API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Load AI configuration from environment variables
    ///
    /// Expected environment variables:
    /// - OPENAI_API_KEY: API key (required)
    /// - OPENAI_MODEL: Chat model (defaults to "gpt-4o-mini")
    /// - OPENAI_BASE_URL: API base (defaults to "https://api.openai.com/v1")
    /// - OPENAI_TIMEOUT: Request timeout in seconds (defaults to 30)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading AI configuration from environment variables");

        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound("OPENAI_API_KEY".to_string()))?;
        debug!("OpenAI key loaded (length: {} chars)", api_key.len());

        let model = env::var("OPENAI_MODEL").unwrap_or_else(|_| {
            warn!("OPENAI_MODEL not set, using default: gpt-4o-mini");
            "gpt-4o-mini".to_string()
        });

        let base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

        let timeout_secs = env::var("OPENAI_TIMEOUT")
            .unwrap_or_else(|_| "30".to_string())
            .parse::<u64>()
            .map_err(|_| ConfigError::InvalidValue("Invalid OPENAI_TIMEOUT value".to_string()))?;

        let config = AiConfig { api_key, model, base_url, timeout_secs };
        config.validate()?;
        info!("AI configuration loaded successfully");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.is_empty() {
            return Err(ConfigError::ValidationError("OPENAI_MODEL cannot be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::ValidationError("OPENAI_TIMEOUT must be greater than 0".to_string()));
        }
        Ok(())
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        AiConfig {
            api_key: String::new(),
            model: "gpt-4o-mini".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completions_url() {
        let config = AiConfig { base_url: "https://api.openai.com/v1/".to_string(), ..AiConfig::default() };
        assert_eq!(config.completions_url(), "https://api.openai.com/v1/chat/completions");
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = AiConfig { timeout_secs: 0, ..AiConfig::default() };
        assert!(config.validate().is_err());
    }
}
