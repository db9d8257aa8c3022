use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{error, info};

use crate::model::intake_form::{IntakeForm, IntakeStatus};
use crate::repository::mongo::{collect, return_updated, INTAKE_FORMS};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait IntakeFormRepository: Send + Sync {
    async fn find_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Option<IntakeForm>>;
    /// Insert or replace the member's single form.
    async fn upsert(&self, form: IntakeForm) -> RepositoryResult<IntakeForm>;
    async fn list_all(&self) -> RepositoryResult<Vec<IntakeForm>>;
    async fn set_status(&self, id: &ObjectId, status: IntakeStatus) -> RepositoryResult<Option<IntakeForm>>;
    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool>;
    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64>;
}

pub struct MongoIntakeFormRepository {
    collection: Collection<IntakeForm>,
}

impl MongoIntakeFormRepository {
    pub fn new(db: &Database) -> Self {
        MongoIntakeFormRepository { collection: db.collection::<IntakeForm>(INTAKE_FORMS) }
    }
}

#[async_trait]
impl IntakeFormRepository for MongoIntakeFormRepository {
    async fn find_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Option<IntakeForm>> {
        self.collection
            .find_one(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to load intake form: {}", e)))
    }

    async fn upsert(&self, mut form: IntakeForm) -> RepositoryResult<IntakeForm> {
        let now = Utc::now();
        let existing = self.find_for_user(&form.user_id).await?;
        form.updated_at = Some(now);
        let result = match existing {
            Some(current) => {
                form.id = current.id;
                form.created_at = current.created_at;
                self.collection
                    .replace_one(doc! { "user_id": form.user_id }, form.clone(), None)
                    .await
                    .map(|_| ())
            }
            None => {
                form.id = Some(ObjectId::new());
                form.created_at = Some(now);
                self.collection.insert_one(form.clone(), None).await.map(|_| ())
            }
        };
        match result {
            Ok(()) => {
                info!("Intake form saved for {}", form.user_id);
                Ok(form)
            }
            Err(e) => {
                error!("Failed to save intake form: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn list_all(&self) -> RepositoryResult<Vec<IntakeForm>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list intake forms: {}", e)))?;
        collect(cursor).await
    }

    async fn set_status(&self, id: &ObjectId, status: IntakeStatus) -> RepositoryResult<Option<IntakeForm>> {
        let update = doc! { "$set": {
            "status": bson::to_bson(&status)?,
            "updated_at": bson::DateTime::now(),
        }};
        self.collection
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to update intake form status: {}", e)))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let result = self
            .collection
            .delete_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to delete intake form: {}", e)))?;
        Ok(result.deleted_count > 0)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        self.collection
            .count_documents(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to count intake forms: {}", e)))
    }
}
