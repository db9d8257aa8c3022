use std::sync::Arc;

use axum::{
    extract::{Extension, Json, State},
    http::StatusCode,
    response::IntoResponse,
};
use validator::Validate;

use crate::dto::auth_dto::UpdateProfileRequest;
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::profile_service::{ProfileService, ProfileServiceImpl};
use crate::util::error::HandlerError;

pub async fn get_profile_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = service.get_or_create(&user.id).await?;
    Ok(Json(profile))
}

pub async fn create_profile_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    let profile = service.create(&user.id).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn update_profile_handler(
    State(service): State<Arc<ProfileServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let profile = service.update(&user.id, payload).await?;
    Ok(Json(profile))
}
