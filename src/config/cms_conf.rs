use serde::{Deserialize, Serialize};
use std::env;
use tracing::{debug, error, info, warn};

use crate::config::ConfigError;

/// Headless CMS (Sanity) configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CmsConfig {
    pub project_id: String,
    pub dataset: String,
    pub api_version: String,
    /// Write token. Reads work without it, mutations and uploads do not.
    pub api_token: Option<String>,
    pub use_cdn: bool,
}

impl CmsConfig {
    /// Load CMS configuration from environment variables
    ///
    /// Expected environment variables:
    /// - SANITY_PROJECT_ID: Project identifier (required)
    /// - SANITY_DATASET: Dataset name (defaults to "production")
    /// - SANITY_API_VERSION: API version date (defaults to "2023-05-03")
    /// - SANITY_API_TOKEN: Token for mutations and asset uploads (optional)
    /// - SANITY_USE_CDN: Read from the API CDN (defaults to false)
    pub fn from_env() -> Result<Self, ConfigError> {
        info!("Loading CMS configuration from environment variables");

        let project_id = env::var("SANITY_PROJECT_ID").map_err(|_| {
            debug!("SANITY_PROJECT_ID environment variable not found");
            ConfigError::EnvVarNotFound("SANITY_PROJECT_ID".to_string())
        })?;
        debug!("CMS project: {}", project_id);

        let dataset = env::var("SANITY_DATASET").unwrap_or_else(|_| {
            warn!("SANITY_DATASET not set, using default: production");
            "production".to_string()
        });

        let api_version = env::var("SANITY_API_VERSION").unwrap_or_else(|_| {
            warn!("SANITY_API_VERSION not set, using default: 2023-05-03");
            "2023-05-03".to_string()
        });

        let api_token = env::var("SANITY_API_TOKEN").ok().filter(|t| !t.is_empty());
        if api_token.is_none() {
            warn!("SANITY_API_TOKEN not set, CMS writes are disabled");
        }

        let use_cdn = env::var("SANITY_USE_CDN")
            .ok()
            .and_then(|v| v.parse::<bool>().ok())
            .unwrap_or(false);

        let config = CmsConfig { project_id, dataset, api_version, api_token, use_cdn };
        config.validate()?;
        info!("CMS configuration loaded successfully");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.is_empty() {
            error!("CMS project id is empty");
            return Err(ConfigError::ValidationError("SANITY_PROJECT_ID cannot be empty".to_string()));
        }
        if self.dataset.is_empty() {
            error!("CMS dataset is empty");
            return Err(ConfigError::ValidationError("SANITY_DATASET cannot be empty".to_string()));
        }
        Ok(())
    }

    /// Base URL of the HTTP API, CDN host for reads when enabled.
    pub fn api_base(&self, for_read: bool) -> String {
        let host = if for_read && self.use_cdn { "apicdn" } else { "api" };
        format!(
            "https://{}.{}.sanity.io/v{}",
            self.project_id, host, self.api_version
        )
    }

    pub fn can_write(&self) -> bool {
        self.api_token.is_some()
    }
}

impl Default for CmsConfig {
    fn default() -> Self {
        CmsConfig {
            project_id: "test-project".to_string(),
            dataset: "production".to_string(),
            api_version: "2023-05-03".to_string(),
            api_token: None,
            use_cdn: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_base() {
        let mut config = CmsConfig::default();
        assert_eq!(config.api_base(true), "https://test-project.api.sanity.io/v2023-05-03");
        config.use_cdn = true;
        assert_eq!(config.api_base(true), "https://test-project.apicdn.sanity.io/v2023-05-03");
        assert_eq!(config.api_base(false), "https://test-project.api.sanity.io/v2023-05-03");
    }

    #[test]
    fn test_writes_need_token() {
        let mut config = CmsConfig::default();
        assert!(!config.can_write());
        config.api_token = Some("sk-token".to_string());
        assert!(config.can_write());
    }

    #[test]
    fn test_validate_empty_project() {
        let config = CmsConfig { project_id: String::new(), ..CmsConfig::default() };
        assert!(config.validate().is_err());
    }
}
