use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument};

use crate::dto::auth_dto::UpdateProfileRequest;
use crate::model::profile::Profile;
use crate::repository::profile_repo::{ProfileChanges, ProfileRepository};
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait ProfileService: Send + Sync {
    /// The caller's profile, created on first fetch.
    async fn get_or_create(&self, user_id: &ObjectId) -> Result<Profile, ServiceError>;
    async fn create(&self, user_id: &ObjectId) -> Result<Profile, ServiceError>;
    async fn update(&self, user_id: &ObjectId, request: UpdateProfileRequest) -> Result<Profile, ServiceError>;
}

pub struct ProfileServiceImpl {
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub user_repo: Arc<dyn UserRepository>,
}

impl ProfileServiceImpl {
    pub fn new(profile_repo: Arc<dyn ProfileRepository>, user_repo: Arc<dyn UserRepository>) -> Self {
        Self { profile_repo, user_repo }
    }

    async fn bootstrap(&self, user_id: &ObjectId) -> Result<Profile, ServiceError> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Account not found".to_string()))?;
        let profile = Profile::new(*user_id, user.email.clone(), user.bootstrap_name());
        Ok(self.profile_repo.insert(profile).await?)
    }
}

#[async_trait]
impl ProfileService for ProfileServiceImpl {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn get_or_create(&self, user_id: &ObjectId) -> Result<Profile, ServiceError> {
        if let Some(profile) = self.profile_repo.find_by_id(user_id).await? {
            return Ok(profile);
        }
        info!("No profile yet, creating one");
        match self.bootstrap(user_id).await {
            Ok(profile) => Ok(profile),
            // A concurrent request created it first.
            Err(ServiceError::Conflict(_)) => self
                .profile_repo
                .find_by_id(user_id)
                .await?
                .ok_or_else(|| ServiceError::NotFound("Profile not found".to_string())),
            Err(e) => {
                error!("Failed to create profile: {e}");
                Err(e)
            }
        }
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn create(&self, user_id: &ObjectId) -> Result<Profile, ServiceError> {
        if self.profile_repo.find_by_id(user_id).await?.is_some() {
            return Err(ServiceError::Conflict("Profile already exists".to_string()));
        }
        match self.bootstrap(user_id).await {
            Err(ServiceError::Conflict(_)) => Err(ServiceError::Conflict("Profile already exists".to_string())),
            other => other,
        }
    }

    #[instrument(skip(self, request), fields(user_id = %user_id))]
    async fn update(&self, user_id: &ObjectId, request: UpdateProfileRequest) -> Result<Profile, ServiceError> {
        self.get_or_create(user_id).await?;
        let changes = ProfileChanges {
            name: request.name.map(|n| n.trim().to_string()),
            phone: request.phone,
            location: request.location,
            bio: request.bio,
            preferences: request.preferences,
        };
        let updated = self.profile_repo.update_details(user_id, changes).await;
        match &updated {
            Ok(Some(_)) => info!("Profile updated"),
            Ok(None) => error!("Profile vanished during update"),
            Err(e) => error!("Failed to update profile: {e}"),
        }
        updated?.ok_or_else(|| ServiceError::from(RepositoryError::not_found("Profile not found")))
    }
}
