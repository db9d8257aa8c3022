use std::sync::Arc;

use axum::{
    extract::{Json, Multipart, Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use bytes::BytesMut;
use tracing::{debug, error, info};
use validator::Validate;

use crate::dto::admin_dto::{
    DocumentUpload, PremiumContentRequest, UpdateIntakeStatusRequest, UpdateRoleRequest, WebinarRequest,
};
use crate::dto::member_dto::DeletedResponse;
use crate::handler::parse_id;
use crate::service::admin_service::{AdminService, AdminServiceImpl};
use crate::util::error::HandlerError;

/// Upload size accepted on the document route.
pub const MAX_DOCUMENT_BYTES: usize = 25 * 1024 * 1024;

// Users

pub async fn list_users_handler(State(service): State<Arc<AdminServiceImpl>>) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_users().await?))
}

pub async fn get_user_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    Ok(Json(service.get_user(&id).await?))
}

pub async fn update_role_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateRoleRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    let profile = service.set_role(&id, payload.role).await?;
    info!(user_id = %id, role = payload.role.as_str(), "Role changed");
    Ok(Json(profile))
}

// Intake forms

pub async fn list_intake_forms_handler(
    State(service): State<Arc<AdminServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_intake_forms().await?))
}

pub async fn update_intake_status_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateIntakeStatusRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    Ok(Json(service.set_intake_status(&id, payload.status).await?))
}

pub async fn delete_intake_form_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.delete_intake_form(&id).await?;
    Ok(Json(DeletedResponse { success: true }))
}

// Club content

pub async fn list_club_content_handler(
    State(service): State<Arc<AdminServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_content().await?))
}

pub async fn create_club_content_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Json(payload): Json<PremiumContentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    Ok((StatusCode::CREATED, Json(service.create_content(payload).await?)))
}

pub async fn update_club_content_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<PremiumContentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let id = parse_id(&id)?;
    Ok(Json(service.update_content(&id, payload).await?))
}

pub async fn delete_club_content_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.delete_content(&id).await?;
    Ok(Json(DeletedResponse { success: true }))
}

// Documents

fn text_field(data: &[u8]) -> Option<String> {
    Some(String::from_utf8_lossy(data).trim().to_string()).filter(|s| !s.is_empty())
}

pub async fn list_documents_handler(
    State(service): State<Arc<AdminServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_documents().await?))
}

/// Multipart form: `file` plus optional `name`, `description`, `category`
/// and `is_public` text fields.
pub async fn upload_document_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    let mut upload = DocumentUpload::default();
    let mut has_file = false;

    while let Some(mut field) = multipart.next_field().await.map_err(|e| {
        error!("Error getting next field: {}", e);
        HandlerError::bad_request(format!("Failed to read multipart body: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        debug!("Processing field: {}", name);
        if name == "file" {
            upload.file_name = field.file_name().unwrap_or("document").to_string();
            upload.content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
            let mut buf = BytesMut::new();
            while let Some(chunk) = field
                .chunk()
                .await
                .map_err(|e| HandlerError::bad_request(format!("Failed to read file chunk: {}", e)))?
            {
                buf.extend_from_slice(&chunk);
            }
            info!("Received document {} ({} bytes)", upload.file_name, buf.len());
            upload.content = buf.to_vec();
            has_file = true;
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| HandlerError::bad_request(format!("Failed to read field {}: {}", name, e)))?;
        match name.as_str() {
            "name" => upload.name = text_field(&data),
            "description" => upload.description = text_field(&data),
            "category" => upload.category = text_field(&data),
            "is_public" => upload.is_public = text_field(&data).is_some_and(|v| v == "true" || v == "1"),
            _ => debug!("Ignoring field {}", name),
        }
    }

    if !has_file {
        return Err(HandlerError::bad_request("No file provided"));
    }
    let document = service.upload_document(upload).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn delete_document_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.delete_document(&id).await?;
    Ok(Json(DeletedResponse { success: true }))
}

// Webinars

pub async fn list_webinars_handler(
    State(service): State<Arc<AdminServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.list_webinars().await?))
}

pub async fn create_webinar_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Json(payload): Json<WebinarRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    Ok((StatusCode::CREATED, Json(service.create_webinar(payload).await?)))
}

pub async fn update_webinar_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<WebinarRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let id = parse_id(&id)?;
    Ok(Json(service.update_webinar(&id, payload).await?))
}

pub async fn delete_webinar_handler(
    State(service): State<Arc<AdminServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    let id = parse_id(&id)?;
    service.delete_webinar(&id).await?;
    Ok(Json(DeletedResponse { success: true }))
}
