use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handler::alert_handler::{cron_alerts_handler, run_alerts_handler, AlertHandlerState};
use crate::middlewares::auth_middleware::{admin_auth, AuthState};

pub fn alert_router(state: Arc<AlertHandlerState>, auth_state: Arc<AuthState>) -> Router {
    // Gated by the cron secret inside the handler
    let cron = Router::new().route("/api/cron/alerts", get(cron_alerts_handler).post(cron_alerts_handler));

    let admin = Router::new()
        .route("/api/admin/alerts/run", post(run_alerts_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth));

    cron.merge(admin).with_state(state)
}
