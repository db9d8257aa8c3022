use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::dto::member_dto::{
    CreateSavedSearchRequest, DeletedResponse, ToggleFavoriteRequest, UpdateNotificationPreferencesRequest,
    UpdateSavedSearchRequest,
};
use crate::handler::parse_id;
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::member_service::{MemberService, MemberServiceImpl};
use crate::util::error::HandlerError;

// Favorites

pub async fn list_favorites_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_favorites(&user.id).await?))
}

pub async fn toggle_favorite_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ToggleFavoriteRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let result = service.toggle_favorite(&user.id, payload.listing_id.trim()).await?;
    Ok(Json(result))
}

pub async fn remove_favorite_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.remove_favorite(&user.id, &id).await?;
    Ok(Json(DeletedResponse { success: true }))
}

// Saved searches

pub async fn list_saved_searches_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_saved_searches(&user.id).await?))
}

pub async fn create_saved_search_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<CreateSavedSearchRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let search = service.create_saved_search(&user.id, payload).await?;
    Ok((StatusCode::CREATED, Json(search)))
}

pub async fn update_saved_search_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateSavedSearchRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let id = parse_id(&id)?;
    Ok(Json(service.update_saved_search(&user.id, &id, payload).await?))
}

pub async fn delete_saved_search_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.delete_saved_search(&user.id, &id).await?;
    Ok(Json(DeletedResponse { success: true }))
}

// Notification preferences

pub async fn get_preferences_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.preferences(&user.id).await?))
}

pub async fn update_preferences_handler(
    State(service): State<Arc<MemberServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateNotificationPreferencesRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.update_preferences(&user.id, payload).await?))
}
