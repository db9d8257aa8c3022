use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, State},
    response::IntoResponse,
};
use chrono::Utc;
use validator::Validate;

use crate::dto::club_dto::{DocumentAccessRequest, IntakeFormRequest, RegistrationResponse};
use crate::handler::parse_id;
use crate::model::document::AccessAction;
use crate::middlewares::auth_middleware::CurrentUser;
use crate::service::club_service::{ClubService, ClubServiceImpl};
use crate::util::error::HandlerError;

pub async fn list_premium_content_handler(
    State(service): State<Arc<ClubServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.premium_content().await?))
}

pub async fn list_documents_handler(
    State(service): State<Arc<ClubServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.documents().await?))
}

pub async fn access_document_handler(
    State(service): State<Arc<ClubServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
    request: Option<Json<DocumentAccessRequest>>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    let action = request.map(|Json(r)| r.action).unwrap_or(AccessAction::Download);
    Ok(Json(service.access_document(&user.id, &id, action).await?))
}

pub async fn list_webinars_handler(
    State(service): State<Arc<ClubServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.webinars(&user.id, Utc::now()).await?))
}

pub async fn register_webinar_handler(
    State(service): State<Arc<ClubServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    let registered = service.register_webinar(&user.id, &id).await?;
    Ok(Json(RegistrationResponse { registered }))
}

pub async fn unregister_webinar_handler(
    State(service): State<Arc<ClubServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.unregister_webinar(&user.id, &id).await?;
    Ok(Json(RegistrationResponse { registered: false }))
}

/// The member's intake form, or `null` before the first save.
pub async fn get_intake_form_handler(
    State(service): State<Arc<ClubServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.intake_form(&user.id).await?))
}

pub async fn save_intake_form_handler(
    State(service): State<Arc<ClubServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<IntakeFormRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    Ok(Json(service.save_intake_form(&user.id, payload).await?))
}
