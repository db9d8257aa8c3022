use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::model::favorite::Favorite;
use crate::model::saved_search::SearchFilters;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ToggleFavoriteRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 200))]
    pub listing_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ToggleFavoriteResponse {
    pub favorited: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite: Option<Favorite>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSavedSearchRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[serde(default)]
    pub filters: SearchFilters,
    pub alerts_enabled: Option<bool>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateSavedSearchRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub filters: Option<SearchFilters>,
    pub alerts_enabled: Option<bool>,
}

/// Partial update; absent fields keep their stored (or default) value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNotificationPreferencesRequest {
    pub property_alerts: Option<bool>,
    pub inquiry_responses: Option<bool>,
    pub onboarding_emails: Option<bool>,
    pub marketing_emails: Option<bool>,
    pub frequency: Option<String>,
    pub email_enabled: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeletedResponse {
    pub success: bool,
}
