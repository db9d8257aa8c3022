use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Map, Value};
use tracing::{error, info, instrument};

use crate::model::listing::{Article, ContentType, Listing, Region};
use crate::util::cms::{ContentClient, ListingQuery, UploadedAsset};
use crate::util::error::ServiceError;
use crate::util::slug::{slugify, unique_slug};

#[async_trait]
pub trait ContentService: Send + Sync {
    async fn listings(&self, query: ListingQuery) -> Result<Vec<Listing>, ServiceError>;
    async fn listing(&self, slug: &str) -> Result<Listing, ServiceError>;
    async fn regions(&self) -> Result<Vec<Region>, ServiceError>;
    async fn region(&self, slug: &str) -> Result<Region, ServiceError>;
    async fn articles(&self) -> Result<Vec<Article>, ServiceError>;
    async fn article(&self, slug: &str) -> Result<Article, ServiceError>;

    async fn create(&self, content_type: ContentType, data: Map<String, Value>) -> Result<Value, ServiceError>;
    async fn update(&self, id: &str, data: Map<String, Value>) -> Result<Value, ServiceError>;
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
    async fn upload_image(&self, filename: &str, content_type: &str, data: Vec<u8>) -> Result<UploadedAsset, ServiceError>;
}

pub struct ContentServiceImpl {
    pub cms: Option<Arc<dyn ContentClient>>,
}

/// English title of a CMS payload; accepts a plain string or `{en, it, cs}`.
fn title_of(data: &Map<String, Value>) -> Option<String> {
    let title = match data.get("title").or_else(|| data.get("name"))? {
        Value::String(s) => s.clone(),
        Value::Object(map) => ["en", "it", "cs"]
            .iter()
            .find_map(|lang| map.get(*lang).and_then(Value::as_str))?
            .to_string(),
        _ => return None,
    };
    Some(title).filter(|t| !t.trim().is_empty())
}

fn slug_value(current: String) -> Value {
    json!({ "_type": "slug", "current": current })
}

/// Fields for a new document: generated slug, and listings start out available.
pub fn prepare_create(content_type: ContentType, mut data: Map<String, Value>) -> Result<Map<String, Value>, ServiceError> {
    let title = title_of(&data).ok_or_else(|| ServiceError::InvalidInput("Title is required".to_string()))?;
    data.remove("_id");
    data.remove("_type");
    data.insert("slug".to_string(), slug_value(unique_slug(&title)));
    if content_type == ContentType::Listing && !data.contains_key("status") {
        data.insert("status".to_string(), json!("available"));
    }
    Ok(data)
}

/// Fields for a patch: system keys are dropped and a new title brings a new slug.
pub fn prepare_patch(mut data: Map<String, Value>) -> Result<Map<String, Value>, ServiceError> {
    data.remove("_id");
    data.remove("_type");
    if data.contains_key("title") {
        let title = title_of(&data).ok_or_else(|| ServiceError::InvalidInput("Title cannot be empty".to_string()))?;
        data.insert("slug".to_string(), slug_value(slugify(&title)));
    }
    if data.is_empty() {
        return Err(ServiceError::InvalidInput("Nothing to update".to_string()));
    }
    Ok(data)
}

impl ContentServiceImpl {
    pub fn new(cms: Option<Arc<dyn ContentClient>>) -> Self {
        Self { cms }
    }

    fn reader(&self) -> Result<&Arc<dyn ContentClient>, ServiceError> {
        self.cms
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("Content service not configured".to_string()))
    }

    fn writer(&self) -> Result<&Arc<dyn ContentClient>, ServiceError> {
        let cms = self.reader()?;
        if !cms.can_write() {
            return Err(ServiceError::NotConfigured("Content writes are not configured".to_string()));
        }
        Ok(cms)
    }
}

#[async_trait]
impl ContentService for ContentServiceImpl {
    #[instrument(skip(self))]
    async fn listings(&self, query: ListingQuery) -> Result<Vec<Listing>, ServiceError> {
        let listings = self.reader()?.listings(&query).await;
        match &listings {
            Ok(l) => info!("Fetched {} listings", l.len()),
            Err(e) => error!("Failed to fetch listings: {e}"),
        }
        Ok(listings?)
    }

    #[instrument(skip(self))]
    async fn listing(&self, slug: &str) -> Result<Listing, ServiceError> {
        self.reader()?
            .listing_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Property not found".to_string()))
    }

    #[instrument(skip(self))]
    async fn regions(&self) -> Result<Vec<Region>, ServiceError> {
        Ok(self.reader()?.regions().await?)
    }

    #[instrument(skip(self))]
    async fn region(&self, slug: &str) -> Result<Region, ServiceError> {
        self.reader()?
            .region_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Region not found".to_string()))
    }

    #[instrument(skip(self))]
    async fn articles(&self) -> Result<Vec<Article>, ServiceError> {
        Ok(self.reader()?.articles().await?)
    }

    #[instrument(skip(self))]
    async fn article(&self, slug: &str) -> Result<Article, ServiceError> {
        self.reader()?
            .article_by_slug(slug)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Article not found".to_string()))
    }

    #[instrument(skip(self, data), fields(content_type = content_type.as_str()))]
    async fn create(&self, content_type: ContentType, data: Map<String, Value>) -> Result<Value, ServiceError> {
        let cms = self.writer()?;
        let fields = prepare_create(content_type, data)?;
        let created = cms.create_document(content_type, fields).await;
        match &created {
            Ok(_) => info!("Content created"),
            Err(e) => error!("Failed to create content: {e}"),
        }
        Ok(created?)
    }

    #[instrument(skip(self, data))]
    async fn update(&self, id: &str, data: Map<String, Value>) -> Result<Value, ServiceError> {
        let cms = self.writer()?;
        let set = prepare_patch(data)?;
        let updated = cms.patch_document(id, set).await;
        match &updated {
            Ok(_) => info!("Content updated"),
            Err(e) => error!("Failed to update content: {e}"),
        }
        Ok(updated?)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        let cms = self.writer()?;
        cms.delete_document(id).await?;
        info!("Content deleted");
        Ok(())
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload_image(&self, filename: &str, content_type: &str, data: Vec<u8>) -> Result<UploadedAsset, ServiceError> {
        if !content_type.starts_with("image/") {
            return Err(ServiceError::InvalidInput("Only image uploads are accepted".to_string()));
        }
        if data.is_empty() {
            return Err(ServiceError::InvalidInput("No file provided".to_string()));
        }
        let cms = self.writer()?;
        let asset = cms.upload_image(filename, content_type, data).await?;
        info!("Image uploaded as {}", asset.id);
        Ok(asset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(v: Value) -> Map<String, Value> {
        v.as_object().cloned().unwrap()
    }

    #[test]
    fn test_create_generates_slug_and_status() {
        let fields = prepare_create(ContentType::Listing, map(json!({ "title": { "en": "Casa Blu" } }))).unwrap();
        let slug = fields["slug"]["current"].as_str().unwrap();
        assert!(slug.starts_with("casa-blu-"));
        assert_eq!(fields["status"], json!("available"));
    }

    #[test]
    fn test_create_requires_title() {
        let result = prepare_create(ContentType::Article, map(json!({ "body": "x" })));
        assert!(matches!(result, Err(ServiceError::InvalidInput(_))));
    }

    #[test]
    fn test_region_keeps_status_absent() {
        let fields = prepare_create(ContentType::Region, map(json!({ "name": "Tuscany" }))).unwrap();
        assert!(!fields.contains_key("status"));
        assert!(fields["slug"]["current"].as_str().unwrap().starts_with("tuscany-"));
    }

    #[test]
    fn test_patch_regenerates_slug_only_with_title() {
        let with_title = prepare_patch(map(json!({ "title": "Villa Nuova", "_id": "x" }))).unwrap();
        assert_eq!(with_title["slug"]["current"], json!("villa-nuova"));
        assert!(!with_title.contains_key("_id"));

        let price_only = prepare_patch(map(json!({ "price": { "amount": 1 } }))).unwrap();
        assert!(!price_only.contains_key("slug"));
    }

    #[tokio::test]
    async fn test_unconfigured_cms_is_unavailable() {
        let service = ContentServiceImpl::new(None);
        let result = service.regions().await;
        assert!(matches!(result, Err(ServiceError::NotConfigured(_))));
    }
}
