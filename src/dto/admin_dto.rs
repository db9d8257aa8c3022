use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::intake_form::IntakeStatus;
use crate::model::profile::{Profile, Role};

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateIntakeStatusRequest {
    pub status: IntakeStatus,
}

/// Per-member activity counters shown in the user list.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UserStats {
    pub favorites: u64,
    pub saved_searches: u64,
    pub inquiries: u64,
    pub intake_forms: u64,
    pub webinar_registrations: u64,
    pub document_accesses: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserWithStats {
    #[serde(flatten)]
    pub profile: Profile,
    pub stats: UserStats,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct PremiumContentRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[serde(default)]
    #[validate(length(min = 1, max = 50, message = "Content type is required"))]
    pub content_type: String,
    pub category: Option<String>,
    #[validate(url)]
    pub thumbnail_url: Option<String>,
    #[validate(url)]
    pub content_url: Option<String>,
    #[validate(url)]
    pub file_url: Option<String>,
    pub duration: Option<String>,
    pub pages: Option<u32>,
    pub read_time: Option<String>,
    pub author: Option<String>,
    #[serde(default)]
    pub is_featured: bool,
    pub published_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct WebinarRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 300, message = "Title is required"))]
    pub title: String,
    #[validate(length(max = 5000))]
    pub description: Option<String>,
    #[validate(length(max = 200))]
    pub presenter: Option<String>,
    pub date: DateTime<Utc>,
    #[validate(range(min = 1, max = 1440))]
    pub duration_minutes: Option<u32>,
    #[validate(url)]
    pub join_url: Option<String>,
    #[validate(url)]
    pub recording_url: Option<String>,
}

/// Metadata fields sent alongside the uploaded file.
#[derive(Debug, Clone, Default)]
pub struct DocumentUpload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub is_public: bool,
    pub file_name: String,
    pub content_type: String,
    pub content: Vec<u8>,
}
