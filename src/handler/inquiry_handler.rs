use std::sync::Arc;

use axum::{
    extract::{Extension, Json, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;
use validator::Validate;

use crate::dto::inquiry_dto::{ConciergeRequest, CreateInquiryRequest, InquiryCount, UpdateInquiryRequest};
use crate::dto::member_dto::DeletedResponse;
use crate::handler::parse_id;
use crate::middlewares::auth_middleware::{CurrentUser, SessionUser};
use crate::service::inquiry_service::{InquiryService, InquiryServiceImpl};
use crate::util::error::HandlerError;

/// Public contact form; a signed-in sender gets the inquiry linked to their account.
pub async fn create_inquiry_handler(
    State(service): State<Arc<InquiryServiceImpl>>,
    Extension(SessionUser(user)): Extension<SessionUser>,
    Json(payload): Json<CreateInquiryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let requester = user.as_ref().map(CurrentUser::requester);
    let inquiry = service.submit(payload, requester).await?;
    info!("Inquiry submitted");
    Ok(Json(inquiry))
}

pub async fn my_inquiries_handler(
    State(service): State<Arc<InquiryServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_mine(&user.id).await?))
}

pub async fn concierge_handler(
    State(service): State<Arc<InquiryServiceImpl>>,
    Extension(user): Extension<CurrentUser>,
    Json(payload): Json<ConciergeRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let inquiry = service.concierge(user.requester(), payload).await?;
    Ok((StatusCode::CREATED, Json(inquiry)))
}

// Admin

pub async fn list_inquiries_handler(
    State(service): State<Arc<InquiryServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_all().await?))
}

pub async fn inquiry_count_handler(
    State(service): State<Arc<InquiryServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    let inquiries = service.list_all().await?;
    let pending = inquiries.iter().filter(|i| !i.responded).count();
    Ok(Json(InquiryCount { total: inquiries.len(), pending }))
}

pub async fn update_inquiry_handler(
    State(service): State<Arc<InquiryServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateInquiryRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    Ok(Json(service.set_responded(&id, payload.responded).await?))
}

pub async fn delete_inquiry_handler(
    State(service): State<Arc<InquiryServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.delete(&id).await?;
    Ok(Json(DeletedResponse { success: true }))
}
