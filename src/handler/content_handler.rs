use std::sync::Arc;

use axum::{
    extract::{Json, Multipart, Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, error, info};

use crate::dto::content_dto::{ContentResponse, CreateContentRequest, UpdateContentRequest, UploadImageResponse};
use crate::dto::member_dto::DeletedResponse;
use crate::service::content_service::{ContentService, ContentServiceImpl};
use crate::util::cms::ListingQuery;
use crate::util::error::HandlerError;

pub async fn list_listings_handler(
    State(service): State<Arc<ContentServiceImpl>>,
    Query(query): Query<ListingQuery>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.listings(query).await?))
}

pub async fn get_listing_handler(
    State(service): State<Arc<ContentServiceImpl>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.listing(&slug).await?))
}

pub async fn list_regions_handler(
    State(service): State<Arc<ContentServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.regions().await?))
}

pub async fn get_region_handler(
    State(service): State<Arc<ContentServiceImpl>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.region(&slug).await?))
}

pub async fn list_articles_handler(
    State(service): State<Arc<ContentServiceImpl>>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.articles().await?))
}

pub async fn get_article_handler(
    State(service): State<Arc<ContentServiceImpl>>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    Ok(Json(service.article(&slug).await?))
}

// Admin writes

pub async fn create_content_handler(
    State(service): State<Arc<ContentServiceImpl>>,
    Json(payload): Json<CreateContentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let document = service.create(payload.content_type, payload.data).await?;
    Ok((StatusCode::CREATED, Json(ContentResponse { success: true, document })))
}

pub async fn update_content_handler(
    State(service): State<Arc<ContentServiceImpl>>,
    Path(id): Path<String>,
    Json(payload): Json<UpdateContentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let document = service.update(&id, payload.data).await?;
    Ok(Json(ContentResponse { success: true, document }))
}

pub async fn delete_content_handler(
    State(service): State<Arc<ContentServiceImpl>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, HandlerError> {
    service.delete(&id).await?;
    Ok(Json(DeletedResponse { success: true }))
}

/// Multipart upload; the image is the `file` field.
pub async fn upload_image_handler(
    State(service): State<Arc<ContentServiceImpl>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, HandlerError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Error getting next field: {}", e);
        HandlerError::bad_request(format!("Failed to read multipart body: {}", e))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        debug!("Processing field: {}", name);
        if name != "file" {
            continue;
        }
        let filename = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().unwrap_or("application/octet-stream").to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| HandlerError::bad_request(format!("Failed to read file: {}", e)))?;
        info!("Received image {} ({} bytes)", filename, data.len());
        let asset = service.upload_image(&filename, &content_type, data.to_vec()).await?;
        return Ok(Json(UploadImageResponse { success: true, asset }));
    }
    Err(HandlerError::bad_request("No file provided"))
}
