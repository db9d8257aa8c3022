use std::sync::Arc;

use axum::{routing::{get, post}, Router};

use crate::handler::auth_handler::{login_handler, logout_handler, register_handler, session_handler, AuthHandlerState};

pub fn auth_router(state: Arc<AuthHandlerState>) -> Router {
    Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/auth/session", get(session_handler))
        .with_state(state)
}
