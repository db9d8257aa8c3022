use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::document::AccessAction;
use crate::model::webinar::Webinar;

#[derive(Debug, Clone, Deserialize)]
pub struct DocumentAccessRequest {
    #[serde(default = "default_action")]
    pub action: AccessAction,
}

fn default_action() -> AccessAction {
    AccessAction::Download
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentAccessResponse {
    pub file_url: String,
    pub action: AccessAction,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebinarView {
    #[serde(flatten)]
    pub webinar: Webinar,
    pub is_registered: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct WebinarOverview {
    pub upcoming: Vec<WebinarView>,
    pub past: Vec<WebinarView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationResponse {
    pub registered: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct IntakeFormRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200, message = "Full name is required"))]
    pub full_name: String,
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[validate(length(max = 100))]
    pub nationality: Option<String>,
    #[validate(length(max = 200))]
    pub current_location: Option<String>,
    #[serde(default)]
    pub property_types: Vec<String>,
    #[serde(default)]
    pub preferred_regions: Vec<String>,
    #[validate(length(max = 100))]
    pub budget_range: Option<String>,
    pub min_bedrooms: Option<u32>,
    pub min_bathrooms: Option<u32>,
    pub min_square_meters: Option<u32>,
    #[validate(length(max = 100))]
    pub timeline: Option<String>,
    #[validate(length(max = 1000))]
    pub purchase_reason: Option<String>,
    #[validate(length(max = 100))]
    pub financing_needed: Option<String>,
    #[validate(length(max = 5000))]
    pub additional_notes: Option<String>,
    pub extra_data: Option<serde_json::Value>,
}
