use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::model::listing::ContentType;
use crate::util::cms::UploadedAsset;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateContentRequest {
    #[serde(rename = "type")]
    pub content_type: ContentType,
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateContentRequest {
    #[serde(default)]
    pub data: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ContentResponse {
    pub success: bool,
    pub document: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadImageResponse {
    pub success: bool,
    pub asset: UploadedAsset,
}
