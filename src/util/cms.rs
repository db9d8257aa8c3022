//! Client for the headless CMS (Sanity HTTP API).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::{debug, error, info, instrument};

use crate::config::CmsConfig;
use crate::model::listing::{Article, ContentType, Listing, Region};

#[derive(Debug, thiserror::Error)]
pub enum CmsError {
    #[error("CMS write token not configured")]
    MissingToken,
    #[error("CMS request failed: {0}")]
    Http(String),
    #[error("CMS returned {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Unexpected CMS response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for CmsError {
    fn from(err: reqwest::Error) -> Self {
        CmsError::Http(err.to_string())
    }
}

/// Filters accepted by the public listings endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingQuery {
    #[serde(default)]
    pub featured: bool,
    #[serde(rename = "type", default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub min_price: Option<f64>,
    #[serde(default)]
    pub max_price: Option<f64>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UploadedAsset {
    #[serde(rename = "_id")]
    pub id: String,
    pub url: String,
}

#[async_trait]
pub trait ContentClient: Send + Sync {
    async fn listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, CmsError>;
    /// Snapshot of listings with status `available`, used by the alert job.
    async fn available_listings(&self) -> Result<Vec<Listing>, CmsError>;
    async fn listing_by_slug(&self, slug: &str) -> Result<Option<Listing>, CmsError>;
    async fn listing_by_id(&self, id: &str) -> Result<Option<Listing>, CmsError>;
    async fn regions(&self) -> Result<Vec<Region>, CmsError>;
    async fn region_by_slug(&self, slug: &str) -> Result<Option<Region>, CmsError>;
    async fn articles(&self) -> Result<Vec<Article>, CmsError>;
    async fn article_by_slug(&self, slug: &str) -> Result<Option<Article>, CmsError>;

    async fn create_document(&self, doc_type: ContentType, fields: Map<String, Value>) -> Result<Value, CmsError>;
    async fn patch_document(&self, id: &str, set: Map<String, Value>) -> Result<Value, CmsError>;
    async fn delete_document(&self, id: &str) -> Result<(), CmsError>;
    async fn upload_image(&self, filename: &str, content_type: &str, data: Vec<u8>) -> Result<UploadedAsset, CmsError>;

    fn can_write(&self) -> bool;
}

const LISTING_PROJECTION: &str =
    r#"{ ..., "location": location{ ..., "city": city->{ name, slug } } }"#;

#[derive(Deserialize)]
struct QueryResponse<T> {
    result: T,
}

#[derive(Deserialize)]
struct MutationResponse {
    #[serde(default)]
    results: Vec<MutationResult>,
}

#[derive(Deserialize)]
struct MutationResult {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    document: Option<Value>,
}

#[derive(Deserialize)]
struct AssetResponse {
    document: UploadedAsset,
}

pub struct SanityClient {
    config: CmsConfig,
    http: Client,
}

impl SanityClient {
    pub fn new(config: CmsConfig) -> Result<Self, CmsError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| CmsError::Http(format!("Failed to create HTTP client: {}", e)))?;
        info!(project = %config.project_id, dataset = %config.dataset, "CMS client ready");
        Ok(Self { config, http })
    }

    fn token(&self) -> Result<&str, CmsError> {
        self.config.api_token.as_deref().ok_or(CmsError::MissingToken)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, CmsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("CMS returned {}: {}", status, body);
        Err(CmsError::Api { status: status.as_u16(), body })
    }

    #[instrument(skip(self, params))]
    async fn fetch<T: DeserializeOwned>(&self, query: &str, params: &[(&str, Value)]) -> Result<T, CmsError> {
        let url = format!("{}/data/query/{}", self.config.api_base(true), self.config.dataset);
        let mut pairs: Vec<(String, String)> = vec![("query".to_string(), query.to_string())];
        for (name, value) in params {
            pairs.push((format!("${}", name), value.to_string()));
        }

        let mut request = self.http.get(url).query(&pairs);
        if let Some(token) = &self.config.api_token {
            request = request.bearer_auth(token);
        }
        let response = Self::check(request.send().await?).await?;
        let body: QueryResponse<T> = response
            .json()
            .await
            .map_err(|e| CmsError::Decode(e.to_string()))?;
        Ok(body.result)
    }

    async fn mutate(&self, mutation: Value) -> Result<MutationResponse, CmsError> {
        let token = self.token()?;
        let url = format!("{}/data/mutate/{}", self.config.api_base(false), self.config.dataset);
        let response = self
            .http
            .post(url)
            .query(&[("returnDocuments", "true")])
            .bearer_auth(token)
            .json(&json!({ "mutations": [mutation] }))
            .send()
            .await?;
        Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CmsError::Decode(e.to_string()))
    }

    fn first_document(response: MutationResponse) -> Result<Value, CmsError> {
        let result = response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| CmsError::Decode("mutation returned no results".to_string()))?;
        Ok(result
            .document
            .unwrap_or_else(|| json!({ "_id": result.id })))
    }
}

/// GROQ filter and parameters for a listing query.
pub fn listing_filter(query: &ListingQuery) -> (String, Vec<(&'static str, Value)>) {
    let mut clauses = vec![r#"_type == "listing""#.to_string()];
    let mut params = Vec::new();

    if query.featured {
        clauses.push("featured == true".to_string());
    }
    if let Some(t) = query.property_type.as_deref().filter(|t| !t.is_empty()) {
        clauses.push("propertyType == $type".to_string());
        params.push(("type", json!(t)));
    }
    if let Some(min) = query.min_price {
        clauses.push("price.amount >= $minPrice".to_string());
        params.push(("minPrice", json!(min)));
    }
    if let Some(max) = query.max_price {
        clauses.push("price.amount <= $maxPrice".to_string());
        params.push(("maxPrice", json!(max)));
    }
    if let Some(city) = query.city.as_deref().filter(|c| !c.is_empty()) {
        clauses.push(
            "(lower(location.city->slug.current) == lower($city) || lower(location.city->name.en) == lower($city))"
                .to_string(),
        );
        params.push(("city", json!(city)));
    }
    if let Some(search) = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        clauses.push("[title.en, title.it, title.cs, title] match $search".to_string());
        params.push(("search", json!(format!("*{}*", search))));
    }

    (format!("*[{}]", clauses.join(" && ")), params)
}

#[async_trait]
impl ContentClient for SanityClient {
    async fn listings(&self, query: &ListingQuery) -> Result<Vec<Listing>, CmsError> {
        let (filter, params) = listing_filter(query);
        let groq = format!("{} | order(_createdAt desc) {}", filter, LISTING_PROJECTION);
        self.fetch(&groq, &params).await
    }

    async fn available_listings(&self) -> Result<Vec<Listing>, CmsError> {
        let groq = format!(
            r#"*[_type == "listing" && status == "available"] {}"#,
            LISTING_PROJECTION
        );
        let listings: Vec<Listing> = self.fetch(&groq, &[]).await?;
        debug!("Fetched {} available listings", listings.len());
        Ok(listings)
    }

    async fn listing_by_slug(&self, slug: &str) -> Result<Option<Listing>, CmsError> {
        let groq = format!(
            r#"*[_type == "listing" && slug.current == $slug][0] {}"#,
            LISTING_PROJECTION
        );
        self.fetch(&groq, &[("slug", json!(slug))]).await
    }

    async fn listing_by_id(&self, id: &str) -> Result<Option<Listing>, CmsError> {
        let groq = format!(r#"*[_type == "listing" && _id == $id][0] {}"#, LISTING_PROJECTION);
        self.fetch(&groq, &[("id", json!(id))]).await
    }

    async fn regions(&self) -> Result<Vec<Region>, CmsError> {
        self.fetch(r#"*[_type == "region"] | order(name.en asc)"#, &[]).await
    }

    async fn region_by_slug(&self, slug: &str) -> Result<Option<Region>, CmsError> {
        self.fetch(r#"*[_type == "region" && slug.current == $slug][0]"#, &[("slug", json!(slug))])
            .await
    }

    async fn articles(&self) -> Result<Vec<Article>, CmsError> {
        self.fetch(r#"*[_type == "article"] | order(publishedAt desc)"#, &[]).await
    }

    async fn article_by_slug(&self, slug: &str) -> Result<Option<Article>, CmsError> {
        self.fetch(r#"*[_type == "article" && slug.current == $slug][0]"#, &[("slug", json!(slug))])
            .await
    }

    #[instrument(skip(self, fields))]
    async fn create_document(&self, doc_type: ContentType, mut fields: Map<String, Value>) -> Result<Value, CmsError> {
        fields.insert("_type".to_string(), json!(doc_type.as_str()));
        let response = self.mutate(json!({ "create": Value::Object(fields) })).await?;
        info!("Created {} document", doc_type.as_str());
        Self::first_document(response)
    }

    #[instrument(skip(self, set))]
    async fn patch_document(&self, id: &str, set: Map<String, Value>) -> Result<Value, CmsError> {
        let response = self
            .mutate(json!({ "patch": { "id": id, "set": Value::Object(set) } }))
            .await?;
        info!("Patched document {}", id);
        Self::first_document(response)
    }

    #[instrument(skip(self))]
    async fn delete_document(&self, id: &str) -> Result<(), CmsError> {
        self.mutate(json!({ "delete": { "id": id } })).await?;
        info!("Deleted document {}", id);
        Ok(())
    }

    #[instrument(skip(self, data), fields(size = data.len()))]
    async fn upload_image(&self, filename: &str, content_type: &str, data: Vec<u8>) -> Result<UploadedAsset, CmsError> {
        let token = self.token()?;
        let url = format!("{}/assets/images/{}", self.config.api_base(false), self.config.dataset);
        let response = self
            .http
            .post(url)
            .query(&[("filename", filename)])
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data)
            .send()
            .await?;
        let asset: AssetResponse = Self::check(response)
            .await?
            .json()
            .await
            .map_err(|e| CmsError::Decode(e.to_string()))?;
        info!("Uploaded image asset {}", asset.document.id);
        Ok(asset.document)
    }

    fn can_write(&self) -> bool {
        self.config.can_write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_listing_filter_only_includes_present_params() {
        let (filter, params) = listing_filter(&ListingQuery::default());
        assert_eq!(filter, r#"*[_type == "listing"]"#);
        assert!(params.is_empty());

        let (filter, params) = listing_filter(&ListingQuery {
            featured: true,
            property_type: Some("villa".into()),
            max_price: Some(500000.0),
            search: Some(" sea ".into()),
            ..Default::default()
        });
        assert!(filter.contains("featured == true"));
        assert!(filter.contains("propertyType == $type"));
        assert!(filter.contains("price.amount <= $maxPrice"));
        assert!(!filter.contains("$minPrice"));
        let names: Vec<_> = params.iter().map(|(n, _)| *n).collect();
        assert_eq!(names, vec!["type", "maxPrice", "search"]);
        assert_eq!(params[2].1, json!("*sea*"));
    }

    #[tokio::test]
    async fn test_writes_without_token_fail_fast() {
        let client = SanityClient::new(CmsConfig::default()).unwrap();
        assert!(!client.can_write());
        let result = client.delete_document("abc").await;
        assert!(matches!(result, Err(CmsError::MissingToken)));
    }
}
