use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, patch, put},
    Router,
};

use crate::handler::admin_handler::{
    create_club_content_handler, create_webinar_handler, delete_club_content_handler, delete_document_handler,
    delete_intake_form_handler, delete_webinar_handler, get_user_handler, list_club_content_handler,
    list_documents_handler, list_intake_forms_handler, list_users_handler, list_webinars_handler,
    update_club_content_handler, update_intake_status_handler, update_role_handler, update_webinar_handler,
    upload_document_handler, MAX_DOCUMENT_BYTES,
};
use crate::middlewares::auth_middleware::{admin_auth, AuthState};
use crate::service::admin_service::AdminServiceImpl;

pub fn admin_router(service: Arc<AdminServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/admin/users", get(list_users_handler))
        .route("/api/admin/users/{id}", get(get_user_handler))
        .route("/api/admin/users/{id}/role", put(update_role_handler).patch(update_role_handler))
        .route("/api/admin/intake-forms", get(list_intake_forms_handler))
        .route(
            "/api/admin/intake-forms/{id}",
            patch(update_intake_status_handler).delete(delete_intake_form_handler),
        )
        .route("/api/admin/club-content", get(list_club_content_handler).post(create_club_content_handler))
        .route(
            "/api/admin/club-content/{id}",
            put(update_club_content_handler).delete(delete_club_content_handler),
        )
        .route(
            "/api/admin/documents",
            get(list_documents_handler)
                .post(upload_document_handler)
                .layer(DefaultBodyLimit::max(MAX_DOCUMENT_BYTES)),
        )
        .route("/api/admin/documents/{id}", delete(delete_document_handler))
        .route("/api/admin/webinars", get(list_webinars_handler).post(create_webinar_handler))
        .route("/api/admin/webinars/{id}", put(update_webinar_handler).delete(delete_webinar_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth))
        .with_state(service)
}
