use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntakeStatus {
    #[default]
    Submitted,
    Reviewed,
    Processed,
}

/// Club member's buying brief, one per user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntakeForm {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub nationality: Option<String>,
    #[serde(default)]
    pub current_location: Option<String>,
    #[serde(default)]
    pub property_types: Vec<String>,
    #[serde(default)]
    pub preferred_regions: Vec<String>,
    #[serde(default)]
    pub budget_range: Option<String>,
    #[serde(default)]
    pub min_bedrooms: u32,
    #[serde(default)]
    pub min_bathrooms: u32,
    #[serde(default)]
    pub min_square_meters: u32,
    #[serde(default)]
    pub timeline: Option<String>,
    #[serde(default)]
    pub purchase_reason: Option<String>,
    #[serde(default)]
    pub financing_needed: Option<String>,
    #[serde(default)]
    pub additional_notes: Option<String>,
    #[serde(default)]
    pub status: IntakeStatus,
    /// Free-form answers the form adds over time.
    #[serde(default)]
    pub extra_data: Option<serde_json::Value>,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub updated_at: Option<DateTime<Utc>>,
}
