use serde::{Deserialize, Serialize};
use std::env;
use tracing::{error, info};

use crate::config::{parse_var, ConfigError};

/// Object storage for club documents. `MINIO_ENDPOINT` switches it on; once
/// set, the keys are required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinioConfig {
    /// `host:port`, without scheme.
    pub endpoint: String,
    pub secure: bool,
    pub access_key: String,
    pub secret_key: String,
    pub bucket: String,
    /// Where members download objects from; the endpoint itself when unset.
    pub public_base_url: Option<String>,
}

impl MinioConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let endpoint = env::var("MINIO_ENDPOINT")
            .ok()
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| ConfigError::EnvVarNotFound("MINIO_ENDPOINT".to_string()))?;
        let key = |name: &str| env::var(name).unwrap_or_default();

        let config = MinioConfig {
            endpoint,
            secure: parse_var("MINIO_SECURE", false)?,
            access_key: key("MINIO_ACCESS_KEY"),
            secret_key: key("MINIO_SECRET_KEY"),
            bucket: env::var("MINIO_BUCKET").unwrap_or_else(|_| "club-documents".to_string()),
            public_base_url: env::var("MINIO_PUBLIC_URL").ok().filter(|u| !u.is_empty()),
        };
        config.validate()?;
        info!(endpoint = %config.endpoint_url(), bucket = %config.bucket, "Object storage configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.endpoint.contains("://") {
            return Err(ConfigError::ValidationError(
                "MINIO_ENDPOINT is host:port; use MINIO_SECURE for https".to_string(),
            ));
        }
        if self.access_key.is_empty() || self.secret_key.is_empty() {
            error!("Object storage endpoint set without keys");
            return Err(ConfigError::ValidationError(
                "MINIO_ACCESS_KEY and MINIO_SECRET_KEY are required with MINIO_ENDPOINT".to_string(),
            ));
        }
        if !is_valid_bucket(&self.bucket) {
            error!("Invalid bucket name {:?}", self.bucket);
            return Err(ConfigError::ValidationError(format!(
                "MINIO_BUCKET {:?} is not a valid S3 bucket name",
                self.bucket
            )));
        }
        Ok(())
    }

    pub fn endpoint_url(&self) -> String {
        let scheme = if self.secure { "https" } else { "http" };
        format!("{}://{}", scheme, self.endpoint)
    }

    /// Download link for a stored document.
    pub fn public_url(&self, object_key: &str) -> String {
        let base = self.public_base_url.clone().unwrap_or_else(|| self.endpoint_url());
        format!("{}/{}/{}", base.trim_end_matches('/'), self.bucket, object_key)
    }
}

/// S3 naming: 3 to 63 of lowercase letters, digits, dots and hyphens,
/// starting and ending with a letter or digit.
fn is_valid_bucket(name: &str) -> bool {
    let edge_ok = |c: Option<char>| c.is_some_and(|c| c.is_ascii_lowercase() || c.is_ascii_digit());
    (3..=63).contains(&name.len())
        && name.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || c == '.')
        && edge_ok(name.chars().next())
        && edge_ok(name.chars().last())
}

impl Default for MinioConfig {
    fn default() -> Self {
        MinioConfig {
            endpoint: "localhost:9000".to_string(),
            secure: false,
            access_key: "minioadmin".to_string(),
            secret_key: "minioadmin".to_string(),
            bucket: "club-documents".to_string(),
            public_base_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_names() {
        assert!(is_valid_bucket("club-documents"));
        assert!(is_valid_bucket("domy.docs2"));
        for bad in ["ab", "Club-Docs", "-docs", "docs-", "club_docs"] {
            assert!(!is_valid_bucket(bad), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_endpoint_without_keys_is_invalid() {
        let config = MinioConfig { secret_key: String::new(), ..Default::default() };
        assert!(config.validate().is_err());

        let with_scheme = MinioConfig { endpoint: "https://s3.example.net".into(), ..Default::default() };
        assert!(with_scheme.validate().is_err());
    }

    #[test]
    fn test_public_url_prefers_cdn_base() {
        let direct = MinioConfig { secure: true, ..Default::default() };
        assert_eq!(direct.public_url("guides/tax.pdf"), "https://localhost:9000/club-documents/guides/tax.pdf");

        let cdn = MinioConfig { public_base_url: Some("https://files.domy.example/".into()), ..Default::default() };
        assert_eq!(cdn.public_url("guides/tax.pdf"), "https://files.domy.example/club-documents/guides/tax.pdf");
    }
}
