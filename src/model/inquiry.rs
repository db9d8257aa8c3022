use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InquiryKind {
    Listing,
    Concierge,
    #[default]
    General,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    #[serde(default)]
    pub user_id: Option<ObjectId>,
    #[serde(default)]
    pub listing_id: Option<String>,
    #[serde(default)]
    pub listing_title: Option<String>,
    #[serde(default)]
    pub kind: InquiryKind,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub message: String,
    #[serde(default)]
    pub responded: bool,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub updated_at: Option<DateTime<Utc>>,
}
