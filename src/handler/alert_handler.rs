use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{header, HeaderMap},
    response::IntoResponse,
};
use tracing::{info, warn};

use crate::service::alert_service::{AlertService, AlertServiceImpl};
use crate::util::error::HandlerError;

pub struct AlertHandlerState {
    pub alerts: Arc<AlertServiceImpl>,
    /// Shared secret external schedulers must send as a bearer token.
    pub cron_secret: Option<String>,
}

fn cron_authorized(secret: Option<&str>, headers: &HeaderMap) -> bool {
    let Some(secret) = secret else {
        return true;
    };
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .is_some_and(|token| token.trim() == secret)
}

/// Scheduler entry point (GET or POST).
pub async fn cron_alerts_handler(
    State(state): State<Arc<AlertHandlerState>>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, HandlerError> {
    if !cron_authorized(state.cron_secret.as_deref(), &headers) {
        warn!("Cron trigger with missing or wrong secret");
        return Err(HandlerError::unauthorized());
    }
    info!("Property alert run triggered by scheduler");
    Ok(Json(state.alerts.run().await))
}

/// Manual run from the back office.
pub async fn run_alerts_handler(State(state): State<Arc<AlertHandlerState>>) -> impl IntoResponse {
    info!("Property alert run triggered by admin");
    Json(state.alerts.run().await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());
        headers
    }

    #[test]
    fn test_cron_secret_gate() {
        assert!(cron_authorized(None, &HeaderMap::new()));
        assert!(cron_authorized(Some("s3cret"), &bearer("s3cret")));
        assert!(!cron_authorized(Some("s3cret"), &bearer("guess")));
        assert!(!cron_authorized(Some("s3cret"), &HeaderMap::new()));
    }
}
