use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{error, info};

use crate::model::premium_content::PremiumContent;
use crate::repository::mongo::{collect, return_updated, set_document, PREMIUM_CONTENT};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait PremiumContentRepository: Send + Sync {
    async fn list(&self) -> RepositoryResult<Vec<PremiumContent>>;
    async fn insert(&self, content: PremiumContent) -> RepositoryResult<PremiumContent>;
    async fn replace(&self, id: &ObjectId, content: PremiumContent) -> RepositoryResult<Option<PremiumContent>>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
}

pub struct MongoPremiumContentRepository {
    collection: Collection<PremiumContent>,
}

impl MongoPremiumContentRepository {
    pub fn new(db: &Database) -> Self {
        MongoPremiumContentRepository { collection: db.collection::<PremiumContent>(PREMIUM_CONTENT) }
    }
}

#[async_trait]
impl PremiumContentRepository for MongoPremiumContentRepository {
    async fn list(&self) -> RepositoryResult<Vec<PremiumContent>> {
        let options = FindOptions::builder()
            .sort(doc! { "is_featured": -1, "published_at": -1 })
            .build();
        let cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list club content: {}", e)))?;
        collect(cursor).await
    }

    async fn insert(&self, mut content: PremiumContent) -> RepositoryResult<PremiumContent> {
        content.id = Some(ObjectId::new());
        let now = Utc::now();
        content.created_at = Some(now);
        if content.published_at.is_none() {
            content.published_at = Some(now);
        }
        match self.collection.insert_one(content.clone(), None).await {
            Ok(_) => {
                info!("Club content '{}' created", content.title);
                Ok(content)
            }
            Err(e) => {
                error!("Failed to insert club content: {}", e);
                Err(RepositoryError::database(format!("Failed to insert club content: {}", e)))
            }
        }
    }

    async fn replace(&self, id: &ObjectId, mut content: PremiumContent) -> RepositoryResult<Option<PremiumContent>> {
        content.id = Some(*id);
        content.created_at = None;
        let mut update = set_document(&content)?;
        if let Ok(set) = update.get_document_mut("$set") {
            set.remove("created_at");
        }
        self.collection
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to update club content: {}", e)))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete club content: {}", e)))?;
        Ok(result.deleted_count > 0)
    }
}
