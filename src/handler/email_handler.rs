use std::sync::Arc;

use axum::{
    extract::{Json, State},
    response::IntoResponse,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::info;
use validator::Validate;

use crate::dto::email_dto::{
    EmailContentResponse, FollowUpData, GenerateEmailContentRequest, GeneratePropertyDescriptionRequest,
    GenerateSubjectRequest, InquiryConfirmationData, PropertyAlertData, PropertyDescriptionResponse, SendEmailRequest,
    SendEmailResponse, SubjectLineResponse, TestEmailRequest, TranslateRequest, WelcomeData,
};
use crate::service::copy_service::{CopyService, CopyServiceImpl};
use crate::service::notification_service::{
    InquiryConfirmation, NotificationService, NotificationServiceImpl, PropertyAlert,
};
use crate::util::email::SendReceipt;
use crate::util::error::HandlerError;

pub struct EmailHandlerState {
    pub notifications: Arc<NotificationServiceImpl>,
    pub copy: Arc<CopyServiceImpl>,
}

fn payload<T: DeserializeOwned + Validate>(data: Value) -> Result<T, HandlerError> {
    let parsed: T = serde_json::from_value(data)
        .map_err(|e| HandlerError::bad_request(format!("Invalid email data: {}", e)))?;
    parsed.validate().map_err(HandlerError::validation)?;
    Ok(parsed)
}

fn name_or_default(name: Option<String>) -> String {
    name.map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "there".to_string())
}

/// Templated send, dispatched on `email_type`.
pub async fn send_email_handler(
    State(state): State<Arc<EmailHandlerState>>,
    Json(request): Json<SendEmailRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    let notifications = &state.notifications;
    let receipt: SendReceipt = match request.email_type.replace('_', "-").as_str() {
        "property-alert" => {
            let data: PropertyAlertData = payload(request.data)?;
            let alert = PropertyAlert {
                to: data.user_email,
                user_name: name_or_default(data.user_name),
                search_name: data.search_name.unwrap_or_else(|| "Your saved search".to_string()),
                filters: data.search_criteria,
                items: data.properties,
            };
            notifications.send_property_alert(alert).await?
        }
        "inquiry-confirmation" => {
            let data: InquiryConfirmationData = payload(request.data)?;
            let confirmation = InquiryConfirmation {
                to: data.user_email,
                user_name: name_or_default(data.user_name),
                property_title: data.property_title,
                message: data.inquiry_message,
            };
            notifications.send_inquiry_confirmation(confirmation).await?
        }
        "welcome" => {
            let data: WelcomeData = payload(request.data)?;
            notifications.send_welcome(&data.user_email, &name_or_default(data.user_name)).await?
        }
        "follow-up" => {
            let data: FollowUpData = payload(request.data)?;
            notifications
                .send_follow_up(&data.user_email, &name_or_default(data.user_name), data.days_since_registration)
                .await?
        }
        _ => return Err(HandlerError::bad_request("Invalid email type")),
    };

    info!(email_type = %request.email_type, provider = %receipt.provider, "Email sent");
    Ok(Json(SendEmailResponse {
        success: receipt.success,
        message: "Email sent successfully".to_string(),
        ai_used: notifications.ai_enabled(),
        provider: receipt.provider,
    }))
}

pub async fn test_email_handler(
    State(state): State<Arc<EmailHandlerState>>,
    Json(request): Json<TestEmailRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    request.validate().map_err(HandlerError::validation)?;
    let receipt = state.notifications.send_test(&request.to).await?;
    Ok(Json(SendEmailResponse {
        success: receipt.success,
        message: "Test email sent".to_string(),
        ai_used: false,
        provider: receipt.provider,
    }))
}

pub async fn generate_subject_handler(
    State(state): State<Arc<EmailHandlerState>>,
    Json(request): Json<GenerateSubjectRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    request.validate().map_err(HandlerError::validation)?;
    let subject_line = state.copy.generate_subject(request).await?;
    Ok(Json(SubjectLineResponse { subject_line }))
}

pub async fn generate_email_content_handler(
    State(state): State<Arc<EmailHandlerState>>,
    Json(request): Json<GenerateEmailContentRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    request.validate().map_err(HandlerError::validation)?;
    let email_content = state.copy.generate_email_content(request).await?;
    Ok(Json(EmailContentResponse { email_content }))
}

pub async fn generate_property_description_handler(
    State(state): State<Arc<EmailHandlerState>>,
    Json(request): Json<GeneratePropertyDescriptionRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    request.validate().map_err(HandlerError::validation)?;
    let property_description = state.copy.generate_property_description(request).await?;
    Ok(Json(PropertyDescriptionResponse { property_description }))
}

pub async fn translate_handler(
    State(state): State<Arc<EmailHandlerState>>,
    Json(request): Json<TranslateRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    // Missing languages are reported by the service with a single message.
    Ok(Json(state.copy.translate(request).await?))
}
