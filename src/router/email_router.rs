use std::sync::Arc;

use axum::{middleware, routing::post, Router};

use crate::handler::email_handler::{
    generate_email_content_handler, generate_property_description_handler, generate_subject_handler,
    send_email_handler, test_email_handler, translate_handler, EmailHandlerState,
};
use crate::middlewares::auth_middleware::{admin_auth, AuthState};

/// Outbound email and generated copy; admin only so neither is an open relay.
pub fn email_router(state: Arc<EmailHandlerState>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/send-email", post(send_email_handler))
        .route("/api/admin/email/test", post(test_email_handler))
        .route("/api/generate-subject", post(generate_subject_handler))
        .route("/api/generate-email-content", post(generate_email_content_handler))
        .route("/api/generate-property-description", post(generate_property_description_handler))
        .route("/api/translate", post(translate_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth))
        .with_state(state)
}
