use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use crate::model::saved_search::SearchFilters;
use crate::util::email_templates::AlertItem;

#[derive(Debug, Clone, Deserialize)]
pub struct SendEmailRequest {
    pub email_type: String,
    #[serde(default)]
    pub data: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct SendEmailResponse {
    pub success: bool,
    pub message: String,
    pub ai_used: bool,
    pub provider: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PropertyAlertData {
    #[validate(email)]
    pub user_email: String,
    pub user_name: Option<String>,
    pub search_name: Option<String>,
    #[serde(default)]
    pub properties: Vec<AlertItem>,
    #[serde(default)]
    pub search_criteria: SearchFilters,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct InquiryConfirmationData {
    #[validate(email)]
    pub user_email: String,
    pub user_name: Option<String>,
    #[validate(length(min = 1))]
    pub property_title: String,
    #[serde(default)]
    pub inquiry_message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WelcomeData {
    #[validate(email)]
    pub user_email: String,
    pub user_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct FollowUpData {
    #[validate(email)]
    pub user_email: String,
    pub user_name: Option<String>,
    #[serde(default)]
    pub days_since_registration: u32,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TestEmailRequest {
    #[validate(email)]
    pub to: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateSubjectRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub recipient_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub email_type: String,
    #[validate(length(max = 2000))]
    pub property_details: Option<String>,
    #[validate(length(max = 2000))]
    pub additional_context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubjectLineResponse {
    pub subject_line: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GenerateEmailContentRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub recipient_name: String,
    #[serde(default)]
    #[validate(length(min = 1, max = 50))]
    pub email_type: String,
    #[validate(length(max = 2000))]
    pub property_details: Option<String>,
    #[validate(length(max = 2000))]
    pub additional_context: Option<String>,
    #[serde(default = "default_tone")]
    #[validate(length(min = 1, max = 50))]
    pub tone: String,
}

fn default_tone() -> String {
    "professional".to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct EmailContentResponse {
    pub email_content: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct GeneratePropertyDescriptionRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub property_type: String,
    pub bedrooms: Option<u32>,
    pub bathrooms: Option<u32>,
    pub square_meters: Option<f64>,
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub location: String,
    #[serde(default)]
    pub features: Vec<String>,
    pub target_audience: Option<String>,
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyDescriptionResponse {
    pub property_description: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct TranslateRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 20000))]
    pub text: String,
    #[serde(default)]
    pub source_lang: String,
    #[serde(default)]
    pub target_lang: String,
    pub context: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TranslationResponse {
    pub translated_text: String,
    pub source_lang: String,
    pub target_lang: String,
}
