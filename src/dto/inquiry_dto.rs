use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::inquiry::InquiryKind;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateInquiryRequest {
    #[validate(length(max = 200))]
    pub listing_id: Option<String>,
    #[validate(length(max = 300))]
    pub listing_title: Option<String>,
    pub kind: Option<InquiryKind>,
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ConciergeRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
    #[validate(length(max = 40))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateInquiryRequest {
    pub responded: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct InquiryCount {
    pub total: usize,
    pub pending: usize,
}
