use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{error, info};

use crate::model::inquiry::Inquiry;
use crate::repository::mongo::{collect, return_updated, INQUIRIES};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait InquiryRepository: Send + Sync {
    async fn insert(&self, inquiry: Inquiry) -> RepositoryResult<Inquiry>;
    async fn list_all(&self) -> RepositoryResult<Vec<Inquiry>>;
    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Inquiry>>;
    async fn set_responded(&self, id: &ObjectId, responded: bool) -> RepositoryResult<Option<Inquiry>>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64>;
}

pub struct MongoInquiryRepository {
    collection: Collection<Inquiry>,
}

impl MongoInquiryRepository {
    pub fn new(db: &Database) -> Self {
        MongoInquiryRepository { collection: db.collection::<Inquiry>(INQUIRIES) }
    }

    async fn find_sorted(&self, filter: Option<Document>) -> RepositoryResult<Vec<Inquiry>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self
            .collection
            .find(filter, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list inquiries: {}", e)))?;
        collect(cursor).await
    }
}

#[async_trait]
impl InquiryRepository for MongoInquiryRepository {
    async fn insert(&self, mut inquiry: Inquiry) -> RepositoryResult<Inquiry> {
        inquiry.id = Some(ObjectId::new());
        let now = Utc::now();
        inquiry.created_at = Some(now);
        inquiry.updated_at = Some(now);
        match self.collection.insert_one(inquiry.clone(), None).await {
            Ok(_) => {
                info!("Inquiry stored from {}", inquiry.email);
                Ok(inquiry)
            }
            Err(e) => {
                error!("Failed to insert inquiry: {}", e);
                Err(RepositoryError::database(format!("Failed to insert inquiry: {}", e)))
            }
        }
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Inquiry>> {
        self.find_sorted(None).await
    }

    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Inquiry>> {
        self.find_sorted(Some(doc! { "user_id": user_id })).await
    }

    async fn set_responded(&self, id: &ObjectId, responded: bool) -> RepositoryResult<Option<Inquiry>> {
        let update = doc! { "$set": {
            "responded": responded,
            "updated_at": bson::DateTime::now(),
        }};
        self.collection
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to update inquiry: {}", e)))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete inquiry: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        self.collection
            .count_documents(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count inquiries: {}", e)))
    }
}
