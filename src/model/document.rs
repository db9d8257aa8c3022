use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PremiumDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    /// Key of the stored object in the documents bucket.
    pub object_key: String,
    pub file_url: String,
    pub file_size: u64,
    pub file_type: String,
    #[serde(default)]
    pub is_public: bool,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AccessAction {
    Download,
    Preview,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentAccessLog {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub document_id: ObjectId,
    pub user_id: ObjectId,
    pub action: AccessAction,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub created_at: Option<DateTime<Utc>>,
}
