use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use crate::handler::member_handler::{
    create_saved_search_handler, delete_saved_search_handler, get_preferences_handler, list_favorites_handler,
    list_saved_searches_handler, remove_favorite_handler, toggle_favorite_handler, update_preferences_handler,
    update_saved_search_handler,
};
use crate::middlewares::auth_middleware::{require_user, AuthState};
use crate::service::member_service::MemberServiceImpl;

pub fn member_router(service: Arc<MemberServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    Router::new()
        .route("/api/favorites", get(list_favorites_handler))
        .route("/api/favorites/toggle", post(toggle_favorite_handler))
        .route("/api/favorites/{id}", delete(remove_favorite_handler))
        .route("/api/saved-searches", get(list_saved_searches_handler).post(create_saved_search_handler))
        .route(
            "/api/saved-searches/{id}",
            put(update_saved_search_handler).patch(update_saved_search_handler).delete(delete_saved_search_handler),
        )
        .route(
            "/api/notification-preferences",
            get(get_preferences_handler).put(update_preferences_handler).post(update_preferences_handler),
        )
        .route_layer(middleware::from_fn_with_state(auth_state, require_user))
        .with_state(service)
}
