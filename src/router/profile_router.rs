use std::sync::Arc;

use axum::{middleware, routing::get, Router};

use crate::handler::profile_handler::{create_profile_handler, get_profile_handler, update_profile_handler};
use crate::middlewares::auth_middleware::{require_user, AuthState};
use crate::service::profile_service::ProfileServiceImpl;

pub fn profile_router(service: Arc<ProfileServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route(
            "/api/profile",
            get(get_profile_handler).post(create_profile_handler).patch(update_profile_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_user))
        .with_state(service)
}
