use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::Utc;
use tracing::{error, info, instrument};

use crate::dto::member_dto::{
    CreateSavedSearchRequest, ToggleFavoriteResponse, UpdateNotificationPreferencesRequest, UpdateSavedSearchRequest,
};
use crate::model::favorite::Favorite;
use crate::model::notification_preferences::NotificationPreferences;
use crate::model::saved_search::{AlertFrequency, SavedSearch};
use crate::repository::favorite_repo::FavoriteRepository;
use crate::repository::notification_pref_repo::NotificationPreferenceRepository;
use crate::repository::repository_error::RepositoryError;
use crate::repository::saved_search_repo::{SavedSearchChanges, SavedSearchRepository};
use crate::util::error::ServiceError;

/// Member dashboard: favorites, saved searches and notification settings.
#[async_trait]
pub trait MemberService: Send + Sync {
    async fn list_favorites(&self, user_id: &ObjectId) -> Result<Vec<Favorite>, ServiceError>;
    /// Add the listing to favorites, or remove it when already there.
    async fn toggle_favorite(&self, user_id: &ObjectId, listing_id: &str) -> Result<ToggleFavoriteResponse, ServiceError>;
    async fn remove_favorite(&self, user_id: &ObjectId, id: &ObjectId) -> Result<(), ServiceError>;

    async fn list_saved_searches(&self, user_id: &ObjectId) -> Result<Vec<SavedSearch>, ServiceError>;
    async fn create_saved_search(
        &self,
        user_id: &ObjectId,
        request: CreateSavedSearchRequest,
    ) -> Result<SavedSearch, ServiceError>;
    async fn update_saved_search(
        &self,
        user_id: &ObjectId,
        id: &ObjectId,
        request: UpdateSavedSearchRequest,
    ) -> Result<SavedSearch, ServiceError>;
    async fn delete_saved_search(&self, user_id: &ObjectId, id: &ObjectId) -> Result<(), ServiceError>;

    async fn preferences(&self, user_id: &ObjectId) -> Result<NotificationPreferences, ServiceError>;
    async fn update_preferences(
        &self,
        user_id: &ObjectId,
        request: UpdateNotificationPreferencesRequest,
    ) -> Result<NotificationPreferences, ServiceError>;
}

pub struct MemberServiceImpl {
    pub favorite_repo: Arc<dyn FavoriteRepository>,
    pub saved_search_repo: Arc<dyn SavedSearchRepository>,
    pub preference_repo: Arc<dyn NotificationPreferenceRepository>,
}

impl MemberServiceImpl {
    pub fn new(
        favorite_repo: Arc<dyn FavoriteRepository>,
        saved_search_repo: Arc<dyn SavedSearchRepository>,
        preference_repo: Arc<dyn NotificationPreferenceRepository>,
    ) -> Self {
        Self { favorite_repo, saved_search_repo, preference_repo }
    }
}

#[async_trait]
impl MemberService for MemberServiceImpl {
    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_favorites(&self, user_id: &ObjectId) -> Result<Vec<Favorite>, ServiceError> {
        Ok(self.favorite_repo.list_for_user(user_id).await?)
    }

    #[instrument(skip(self), fields(user_id = %user_id, listing_id = %listing_id))]
    async fn toggle_favorite(&self, user_id: &ObjectId, listing_id: &str) -> Result<ToggleFavoriteResponse, ServiceError> {
        let listing_id = listing_id.trim();
        if listing_id.is_empty() {
            return Err(ServiceError::InvalidInput("listing_id is required".to_string()));
        }

        if let Some(existing) = self.favorite_repo.find(user_id, listing_id).await? {
            if let Some(id) = existing.id {
                self.favorite_repo.delete(user_id, &id).await?;
            }
            info!("Favorite removed");
            return Ok(ToggleFavoriteResponse { favorited: false, favorite: None });
        }

        let favorite = Favorite { id: None, user_id: *user_id, listing_id: listing_id.to_string(), created_at: None };
        match self.favorite_repo.insert(favorite).await {
            Ok(saved) => {
                info!("Favorite added");
                Ok(ToggleFavoriteResponse { favorited: true, favorite: Some(saved) })
            }
            // Double click raced us; the listing is favorited either way.
            Err(RepositoryError::AlreadyExists(_)) => {
                let current = self.favorite_repo.find(user_id, listing_id).await?;
                Ok(ToggleFavoriteResponse { favorited: true, favorite: current })
            }
            Err(e) => {
                error!("Failed to add favorite: {e}");
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self), fields(user_id = %user_id, id = %id))]
    async fn remove_favorite(&self, user_id: &ObjectId, id: &ObjectId) -> Result<(), ServiceError> {
        if !self.favorite_repo.delete(user_id, id).await? {
            return Err(ServiceError::NotFound("Favorite not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_saved_searches(&self, user_id: &ObjectId) -> Result<Vec<SavedSearch>, ServiceError> {
        Ok(self.saved_search_repo.list_for_user(user_id).await?)
    }

    #[instrument(skip(self, request), fields(user_id = %user_id))]
    async fn create_saved_search(
        &self,
        user_id: &ObjectId,
        request: CreateSavedSearchRequest,
    ) -> Result<SavedSearch, ServiceError> {
        let search = SavedSearch {
            id: None,
            user_id: *user_id,
            name: request.name.trim().to_string(),
            filters: request.filters,
            alerts_enabled: request.alerts_enabled.unwrap_or(true),
            last_alert_sent: None,
            last_match_count: None,
            created_at: None,
            updated_at: None,
        };
        let saved = self.saved_search_repo.insert(search).await?;
        info!("Saved search created");
        Ok(saved)
    }

    #[instrument(skip(self, request), fields(user_id = %user_id, id = %id))]
    async fn update_saved_search(
        &self,
        user_id: &ObjectId,
        id: &ObjectId,
        request: UpdateSavedSearchRequest,
    ) -> Result<SavedSearch, ServiceError> {
        let changes = SavedSearchChanges {
            name: request.name.map(|n| n.trim().to_string()),
            filters: request.filters,
            alerts_enabled: request.alerts_enabled,
        };
        self.saved_search_repo
            .update(user_id, id, changes)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Saved search not found".to_string()))
    }

    #[instrument(skip(self), fields(user_id = %user_id, id = %id))]
    async fn delete_saved_search(&self, user_id: &ObjectId, id: &ObjectId) -> Result<(), ServiceError> {
        if !self.saved_search_repo.delete(user_id, id).await? {
            return Err(ServiceError::NotFound("Saved search not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn preferences(&self, user_id: &ObjectId) -> Result<NotificationPreferences, ServiceError> {
        Ok(self
            .preference_repo
            .find(user_id)
            .await?
            .unwrap_or_else(|| NotificationPreferences::defaults_for(*user_id)))
    }

    #[instrument(skip(self, request), fields(user_id = %user_id))]
    async fn update_preferences(
        &self,
        user_id: &ObjectId,
        request: UpdateNotificationPreferencesRequest,
    ) -> Result<NotificationPreferences, ServiceError> {
        let mut prefs = self.preferences(user_id).await?;
        if let Some(v) = request.property_alerts {
            prefs.property_alerts = v;
        }
        if let Some(v) = request.inquiry_responses {
            prefs.inquiry_responses = v;
        }
        if let Some(v) = request.onboarding_emails {
            prefs.onboarding_emails = v;
        }
        if let Some(v) = request.marketing_emails {
            prefs.marketing_emails = v;
        }
        if let Some(v) = request.email_enabled {
            prefs.email_enabled = v;
        }
        if let Some(freq) = request.frequency.as_deref() {
            prefs.frequency = AlertFrequency::parse_or_default(freq);
        }
        prefs.updated_at = Some(Utc::now());

        let saved = self.preference_repo.upsert(prefs).await?;
        info!("Notification preferences saved");
        Ok(saved)
    }
}
