use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handler::inquiry_handler::{
    concierge_handler, create_inquiry_handler, delete_inquiry_handler, inquiry_count_handler, list_inquiries_handler,
    my_inquiries_handler, update_inquiry_handler,
};
use crate::middlewares::auth_middleware::{admin_auth, optional_user, require_user, AuthState};
use crate::service::inquiry_service::InquiryServiceImpl;

pub fn inquiry_router(service: Arc<InquiryServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    // Public contact form, session optional
    let public = Router::new()
        .route("/api/inquiries", post(create_inquiry_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), optional_user));

    let member = Router::new()
        .route("/api/inquiries/mine", get(my_inquiries_handler))
        .route("/api/concierge", post(concierge_handler))
        .route_layer(middleware::from_fn_with_state(auth_state.clone(), require_user));

    let admin = Router::new()
        .route("/api/admin/inquiries", get(list_inquiries_handler))
        .route("/api/admin/inquiries/count", get(inquiry_count_handler))
        .route("/api/admin/inquiries/{id}", patch(update_inquiry_handler).delete(delete_inquiry_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth));

    public.merge(member).merge(admin).with_state(service)
}
