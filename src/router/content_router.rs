use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};

use crate::handler::content_handler::{
    create_content_handler, delete_content_handler, get_article_handler, get_listing_handler, get_region_handler,
    list_articles_handler, list_listings_handler, list_regions_handler, update_content_handler, upload_image_handler,
};
use crate::middlewares::auth_middleware::{admin_auth, AuthState};
use crate::service::content_service::ContentServiceImpl;

pub fn content_router(service: Arc<ContentServiceImpl>, auth_state: Arc<AuthState>) -> Router {
    let public = Router::new()
        .route("/api/listings", get(list_listings_handler))
        .route("/api/listings/{slug}", get(get_listing_handler))
        .route("/api/regions", get(list_regions_handler))
        .route("/api/regions/{slug}", get(get_region_handler))
        .route("/api/articles", get(list_articles_handler))
        .route("/api/articles/{slug}", get(get_article_handler));

    let admin = Router::new()
        .route("/api/content", post(create_content_handler))
        .route("/api/content/{id}", patch(update_content_handler).delete(delete_content_handler))
        .route("/api/upload-image", post(upload_image_handler))
        .route_layer(middleware::from_fn_with_state(auth_state, admin_auth));

    public.merge(admin).with_state(service)
}
