use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Favorite {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    /// CMS listing id
    pub listing_id: String,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub created_at: Option<DateTime<Utc>>,
}
