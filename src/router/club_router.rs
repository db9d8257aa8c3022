use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::handler::club_handler::{
    access_document_handler, get_intake_form_handler, list_documents_handler, list_premium_content_handler,
    list_webinars_handler, register_webinar_handler, save_intake_form_handler, unregister_webinar_handler,
};
use crate::middlewares::auth_middleware::{require_user, AuthState};
use crate::service::club_service::ClubServiceImpl;

pub fn club_router(service: Arc<ClubServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/club/content", get(list_premium_content_handler))
        .route("/api/club/documents", get(list_documents_handler))
        .route("/api/club/documents/{id}/access", post(access_document_handler))
        .route("/api/club/webinars", get(list_webinars_handler))
        .route(
            "/api/club/webinars/{id}/register",
            post(register_webinar_handler).delete(unregister_webinar_handler),
        )
        .route(
            "/api/club/intake-form",
            get(get_intake_form_handler).put(save_intake_form_handler).post(save_intake_form_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_user))
        .with_state(service)
}
