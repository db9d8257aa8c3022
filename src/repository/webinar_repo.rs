use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{error, info};

use crate::model::webinar::{Webinar, WebinarRegistration};
use crate::repository::mongo::{collect, return_updated, set_document, WEBINARS, WEBINAR_REGISTRATIONS};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait WebinarRepository: Send + Sync {
    async fn list(&self) -> RepositoryResult<Vec<Webinar>>;
    async fn find(&self, id: &ObjectId) -> RepositoryResult<Option<Webinar>>;
    async fn insert(&self, webinar: Webinar) -> RepositoryResult<Webinar>;
    async fn replace(&self, id: &ObjectId, webinar: Webinar) -> RepositoryResult<Option<Webinar>>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;

    /// False when the member was already registered.
    async fn register(&self, webinar_id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<bool>;
    async fn unregister(&self, webinar_id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<bool>;
    async fn registered_webinar_ids(&self, user_id: &ObjectId) -> RepositoryResult<Vec<ObjectId>>;
    async fn count_registrations_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64>;
}

pub struct MongoWebinarRepository {
    webinars: Collection<Webinar>,
    registrations: Collection<WebinarRegistration>,
}

impl MongoWebinarRepository {
    pub fn new(db: &Database) -> Self {
        MongoWebinarRepository {
            webinars: db.collection::<Webinar>(WEBINARS),
            registrations: db.collection::<WebinarRegistration>(WEBINAR_REGISTRATIONS),
        }
    }
}

#[async_trait]
impl WebinarRepository for MongoWebinarRepository {
    async fn list(&self) -> RepositoryResult<Vec<Webinar>> {
        let options = FindOptions::builder().sort(doc! { "date": 1 }).build();
        let cursor = self
            .webinars
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list webinars: {}", e)))?;
        collect(cursor).await
    }

    async fn find(&self, id: &ObjectId) -> RepositoryResult<Option<Webinar>> {
        self.webinars
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find webinar: {}", e)))
    }

    async fn insert(&self, mut webinar: Webinar) -> RepositoryResult<Webinar> {
        webinar.id = Some(ObjectId::new());
        webinar.created_at = Some(Utc::now());
        match self.webinars.insert_one(webinar.clone(), None).await {
            Ok(_) => {
                info!("Webinar '{}' scheduled", webinar.title);
                Ok(webinar)
            }
            Err(e) => {
                error!("Failed to insert webinar: {}", e);
                Err(RepositoryError::database(format!("Failed to insert webinar: {}", e)))
            }
        }
    }

    async fn replace(&self, id: &ObjectId, mut webinar: Webinar) -> RepositoryResult<Option<Webinar>> {
        webinar.id = Some(*id);
        let mut update = set_document(&webinar)?;
        if let Ok(set) = update.get_document_mut("$set") {
            set.remove("created_at");
        }
        self.webinars
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to update webinar: {}", e)))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .webinars
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete webinar: {}", e)))?;
        if result.deleted_count > 0 {
            self.registrations
                .delete_many(doc! { "webinar_id": id }, None)
                .await
                .map_err(|e| RepositoryError::database(format!("Failed to drop registrations: {}", e)))?;
        }
        Ok(result.deleted_count > 0)
    }

    async fn register(&self, webinar_id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<bool> {
        let registration = WebinarRegistration {
            id: Some(ObjectId::new()),
            webinar_id: *webinar_id,
            user_id: *user_id,
            created_at: Some(Utc::now()),
        };
        match self.registrations.insert_one(registration, None).await {
            Ok(_) => Ok(true),
            Err(e) => match RepositoryError::from(e) {
                RepositoryError::AlreadyExists(_) => Ok(false),
                other => {
                    error!("Failed to register for webinar: {}", other);
                    Err(other)
                }
            },
        }
    }

    async fn unregister(&self, webinar_id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .registrations
            .delete_one(doc! { "webinar_id": webinar_id, "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to unregister: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn registered_webinar_ids(&self, user_id: &ObjectId) -> RepositoryResult<Vec<ObjectId>> {
        let cursor = self
            .registrations
            .find(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list registrations: {}", e)))?;
        Ok(collect(cursor).await?.into_iter().map(|r| r.webinar_id).collect())
    }

    async fn count_registrations_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        self.registrations
            .count_documents(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count registrations: {}", e)))
    }
}
