use std::env;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Public site URL used to build links inside emails.
    pub public_base_url: String,
    /// Shared secret external schedulers present as a bearer token.
    pub cron_secret: Option<String>,
    pub allowed_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(8080);

        let public_base_url = env::var("PUBLIC_BASE_URL").unwrap_or_else(|_| {
            warn!("PUBLIC_BASE_URL not set, defaulting to http://localhost:3000");
            "http://localhost:3000".to_string()
        });

        let cron_secret = env::var("CRON_SECRET").ok().filter(|s| !s.trim().is_empty());
        if cron_secret.is_none() {
            warn!("CRON_SECRET not set, the cron endpoint is open");
        }

        let allowed_origins = env::var("ALLOWED_ORIGINS")
            .map(|s| {
                s.split(',')
                    .map(|o| o.trim().to_string())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|_| vec![public_base_url.clone()]);
        debug!("Allowed origins: {:?}", allowed_origins);

        AppConfig { host, port, public_base_url, cron_secret, allowed_origins }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "127.0.0.1".to_string(),
            port: 8080,
            public_base_url: "http://localhost:3000".to_string(),
            cron_secret: None,
            allowed_origins: vec!["http://localhost:3000".to_string()],
        }
    }
}
