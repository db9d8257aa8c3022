use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Document};
use chrono::Utc;
use mongodb::{options::FindOptions, Collection, Database};
use tracing::{error, info};

use crate::model::profile::{Profile, Role};
use crate::repository::mongo::{collect, return_updated, PROFILES};
use crate::repository::repository_error::{RepositoryError, RepositoryResult};

/// Editable profile fields. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct ProfileChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub bio: Option<String>,
    pub preferences: Option<serde_json::Value>,
}

#[async_trait]
pub trait ProfileRepository: Send + Sync {
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Profile>>;
    async fn insert(&self, profile: Profile) -> RepositoryResult<Profile>;
    async fn update_details(&self, id: &ObjectId, changes: ProfileChanges) -> RepositoryResult<Option<Profile>>;
    async fn set_role(&self, id: &ObjectId, role: Role) -> RepositoryResult<Option<Profile>>;
    async fn list(&self) -> RepositoryResult<Vec<Profile>>;
}

pub struct MongoProfileRepository {
    collection: Collection<Profile>,
}

impl MongoProfileRepository {
    pub fn new(db: &Database) -> Self {
        MongoProfileRepository { collection: db.collection::<Profile>(PROFILES) }
    }
}

fn changes_document(changes: ProfileChanges) -> RepositoryResult<Document> {
    let mut set = doc! { "updated_at": bson::DateTime::now() };
    if let Some(name) = changes.name {
        set.insert("name", name);
    }
    if let Some(phone) = changes.phone {
        set.insert("phone", phone);
    }
    if let Some(location) = changes.location {
        set.insert("location", location);
    }
    if let Some(bio) = changes.bio {
        set.insert("bio", bio);
    }
    if let Some(preferences) = changes.preferences {
        set.insert("preferences", bson::to_bson(&preferences)?);
    }
    Ok(set)
}

#[async_trait]
impl ProfileRepository for MongoProfileRepository {
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Profile>> {
        self.collection
            .find_one(doc! { "_id": id }, None)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to find profile: {}", e)))
    }

    async fn insert(&self, mut profile: Profile) -> RepositoryResult<Profile> {
        let now = Utc::now();
        profile.created_at = Some(now);
        profile.updated_at = Some(now);
        match self.collection.insert_one(profile.clone(), None).await {
            Ok(_) => {
                info!("Profile created for {}", profile.id);
                Ok(profile)
            }
            Err(e) => {
                error!("Failed to insert profile: {}", e);
                Err(RepositoryError::from(e))
            }
        }
    }

    async fn update_details(&self, id: &ObjectId, changes: ProfileChanges) -> RepositoryResult<Option<Profile>> {
        let update = doc! { "$set": changes_document(changes)? };
        self.collection
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to update profile: {}", e)))
    }

    async fn set_role(&self, id: &ObjectId, role: Role) -> RepositoryResult<Option<Profile>> {
        let update = doc! { "$set": {
            "role": role.as_str(),
            "updated_at": bson::DateTime::now(),
        }};
        let result = self
            .collection
            .find_one_and_update(doc! { "_id": id }, update, return_updated())
            .await;
        match &result {
            Ok(Some(_)) => info!("Role of {} set to {}", id, role.as_str()),
            Ok(None) => error!("No profile {} to change role", id),
            Err(e) => error!("Failed to change role: {}", e),
        }
        result.map_err(|e| RepositoryError::database(format!("Failed to change role: {}", e)))
    }

    async fn list(&self) -> RepositoryResult<Vec<Profile>> {
        let options = FindOptions::builder().sort(doc! { "created_at": -1 }).build();
        let cursor = self
            .collection
            .find(None, options)
            .await
            .map_err(|e| RepositoryError::database(format!("Failed to list profiles: {}", e)))?;
        collect(cursor).await
    }
}
