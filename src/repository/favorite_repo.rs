use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{error, info};

use crate::model::favorite::Favorite;
use crate::repository::mongo::{collect, FAVORITES};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Favorite>>;
    async fn find(&self, user_id: &ObjectId, listing_id: &str) -> RepositoryResult<Option<Favorite>>;
    async fn insert(&self, favorite: Favorite) -> RepositoryResult<Favorite>;
    /// Owner-scoped delete; false when nothing matched.
    async fn delete(&self, user_id: &ObjectId, id: &ObjectId) -> RepositoryResult<bool>;
    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64>;
}

pub struct MongoFavoriteRepository {
    collection: Collection<Favorite>,
}

impl MongoFavoriteRepository {
    pub fn new(db: &Database) -> Self {
        MongoFavoriteRepository { collection: db.collection::<Favorite>(FAVORITES) }
    }
}

#[async_trait]
impl FavoriteRepository for MongoFavoriteRepository {
    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Favorite>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self
            .collection
            .find(doc! { "user_id": user_id }, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list favorites: {}", e)))?;
        collect(cursor).await
    }

    async fn find(&self, user_id: &ObjectId, listing_id: &str) -> RepositoryResult<Option<Favorite>> {
        self.collection
            .find_one(doc! { "user_id": user_id, "listing_id": listing_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find favorite: {}", e)))
    }

    async fn insert(&self, mut favorite: Favorite) -> RepositoryResult<Favorite> {
        favorite.id = Some(ObjectId::new());
        favorite.created_at = Some(Utc::now());
        match self.collection.insert_one(favorite.clone(), None).await {
            Ok(_) => {
                info!("Favorite {} added for {}", favorite.listing_id, favorite.user_id);
                Ok(favorite)
            }
            Err(e) => {
                error!("Failed to insert favorite: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn delete(&self, user_id: &ObjectId, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id, "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete favorite: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        self.collection
            .count_documents(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count favorites: {}", e)))
    }
}
