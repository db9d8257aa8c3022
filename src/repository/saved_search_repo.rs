use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::{DateTime, Utc};
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{debug, error, info, warn};

use crate::model::bson_date;
use crate::model::saved_search::{SavedSearch, SearchFilters};
use crate::repository::mongo::{collect, return_updated, SAVED_SEARCHES};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[derive(Debug, Clone, Default)]
pub struct SavedSearchChanges {
    pub name: Option<String>,
    pub filters: Option<SearchFilters>,
    pub alerts_enabled: Option<bool>,
}

#[async_trait]
pub trait SavedSearchRepository: Send + Sync {
    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<SavedSearch>>;
    async fn insert(&self, search: SavedSearch) -> RepositoryResult<SavedSearch>;
    async fn update(
        &self,
        user_id: &ObjectId,
        id: &ObjectId,
        changes: SavedSearchChanges,
    ) -> RepositoryResult<Option<SavedSearch>>;
    async fn delete(&self, user_id: &ObjectId, id: &ObjectId) -> RepositoryResult<bool>;
    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64>;

    /// Every search with alerts switched on, across all members.
    async fn list_alerting(&self) -> RepositoryResult<Vec<SavedSearch>>;
    /// Move `last_alert_sent` from `previous` to `now`. False when another run
    /// already moved it.
    async fn claim_alert(
        &self,
        id: &ObjectId,
        previous: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> RepositoryResult<bool>;
    /// Undo a claim after a failed send, if nobody advanced it since.
    async fn release_alert(
        &self,
        id: &ObjectId,
        claimed: DateTime<Utc>,
        previous: Option<DateTime<Utc>>,
    ) -> RepositoryResult<bool>;
    async fn record_match_count(&self, id: &ObjectId, count: u32) -> RepositoryResult<()>;
}

pub struct MongoSavedSearchRepository {
    collection: Collection<SavedSearch>,
}

impl MongoSavedSearchRepository {
    pub fn new(db: &Database) -> Self {
        MongoSavedSearchRepository { collection: db.collection::<SavedSearch>(SAVED_SEARCHES) }
    }
}

#[async_trait]
impl SavedSearchRepository for MongoSavedSearchRepository {
    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<SavedSearch>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id }, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list saved searches: {}", e)))?;
        collect(cursor).await
    }

    async fn insert(&self, mut search: SavedSearch) -> RepositoryResult<SavedSearch> {
        search.id = Some(ObjectId::new());
        let now = Utc::now();
        search.created_at = Some(now);
        search.updated_at = Some(now);
        match self.collection.insert_one(search.clone(), None).await {
            Ok(_) => {
                info!("Saved search '{}' created", search.name);
                Ok(search)
            }
            Err(e) => {
                error!("Failed to insert saved search: {}", e);
                Err(RepositoryError::database(format!("Failed to insert saved search: {}", e)))
            }
        }
    }

    async fn update(
        &self,
        user_id: &ObjectId,
        id: &ObjectId,
        changes: SavedSearchChanges,
    ) -> RepositoryResult<Option<SavedSearch>> {
        let mut set = doc! { "updated_at": bson::DateTime::now() };
        if let Some(name) = changes.name {
            set.insert("name", name);
        }
        if let Some(filters) = changes.filters {
            set.insert("filters", bson::to_bson(&filters)?);
        }
        if let Some(alerts_enabled) = changes.alerts_enabled {
            set.insert("alerts_enabled", alerts_enabled);
        }
        self.collection
            .find_one_and_update(doc! { "_id": id, "user_id": user_id }, doc! { "$set": set }, return_updated())
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to update saved search: {}", e)))
    }

    async fn delete(&self, user_id: &ObjectId, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete saved search: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        self.collection
            .count_documents(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count saved searches: {}", e)))
    }

    async fn list_alerting(&self) -> RepositoryResult<Vec<SavedSearch>> {
        let cursor = self
            .collection
            .find(doc! { "alerts_enabled": true }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to load alerting searches: {}", e)))?;
        collect(cursor).await
    }

    async fn claim_alert(
        &self,
        id: &ObjectId,
        previous: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let filter = doc! { "_id": id, "last_alert_sent": bson_date::to_bson(previous) };
        let update = doc! { "$set": { "last_alert_sent": bson_date::to_bson(Some(now)) } };
        let result = self
            .collection
            .update_one(filter, update, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to claim saved search: {}", e)))?;
        if result.modified_count == 0 {
            warn!("Saved search {} already claimed by another run", id);
            return Ok(false);
        }
        debug!("Saved search {} claimed", id);
        Ok(true)
    }

    async fn release_alert(
        &self,
        id: &ObjectId,
        claimed: DateTime<Utc>,
        previous: Option<DateTime<Utc>>,
    ) -> RepositoryResult<bool> {
        let filter = doc! { "_id": id, "last_alert_sent": bson_date::to_bson(Some(claimed)) };
        let update = doc! { "$set": { "last_alert_sent": bson_date::to_bson(previous) } };
        let result = self
            .collection
            .update_one(filter, update, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to release saved search: {}", e)))?;
        Ok(result.modified_count > 0)
    }

    async fn record_match_count(&self, id: &ObjectId, count: u32) -> RepositoryResult<()> {
        self.collection
            .update_one(doc! { "_id": id }, doc! { "$set": { "last_match_count": count } }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to record match count: {}", e)))?;
        Ok(())
    }
}
