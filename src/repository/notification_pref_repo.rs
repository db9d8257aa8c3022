use async_trait::async_trait;
use bson::{doc, oid::ObjectId};
use chrono::Utc;
use mongodb::{options::UpdateOptions, Collection, Database};
use tracing::{error, info};

use crate::model::notification_preferences::NotificationPreferences;
use crate::repository::mongo::{set_document, NOTIFICATION_PREFERENCES};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

#[async_trait]
pub trait NotificationPreferenceRepository: Send + Sync {
    async fn find(&self, user_id: &ObjectId) -> RepositoryResult<Option<NotificationPreferences>>;
    async fn upsert(&self, prefs: NotificationPreferences) -> RepositoryResult<NotificationPreferences>;
}

pub struct MongoNotificationPreferenceRepository {
    collection: Collection<NotificationPreferences>,
}

impl MongoNotificationPreferenceRepository {
    pub fn new(db: &Database) -> Self {
        MongoNotificationPreferenceRepository {
            collection: db.collection::<NotificationPreferences>(NOTIFICATION_PREFERENCES),
        }
    }
}

#[async_trait]
impl NotificationPreferenceRepository for MongoNotificationPreferenceRepository {
    async fn find(&self, user_id: &ObjectId) -> RepositoryResult<Option<NotificationPreferences>> {
        self.collection
            .find_one(doc! { "user_id": user_id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to load notification preferences: {}", e)))
    }

    async fn upsert(&self, mut prefs: NotificationPreferences) -> RepositoryResult<NotificationPreferences> {
        prefs.updated_at = Some(Utc::now());
        let options = UpdateOptions::builder().upsert(true).build();
        let result = self
            .collection
            .update_one(doc! { "user_id": prefs.user_id }, set_document(&prefs)?, options)
            .await;
        match result {
            Ok(_) => {
                info!("Notification preferences saved for {}", prefs.user_id);
                Ok(prefs)
            }
            Err(e) => {
                error!("Failed to save notification preferences: {}", e);
                Err(RepositoryError::database(format!("Failed to save notification preferences: {}", e)))
            }
        }
    }
}
