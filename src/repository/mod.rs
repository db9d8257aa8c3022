pub mod repository_error;
pub mod mongo;
pub mod user_repo;
pub mod profile_repo;
pub mod favorite_repo;
pub mod saved_search_repo;
pub mod notification_pref_repo;
pub mod inquiry_repo;
pub mod intake_form_repo;
pub mod premium_content_repo;
pub mod document_repo;
pub mod webinar_repo;

use std::sync::Arc;

use mongodb::Database;

use crate::repository::{
    document_repo::{DocumentRepository, MongoDocumentRepository},
    favorite_repo::{FavoriteRepository, MongoFavoriteRepository},
    inquiry_repo::{InquiryRepository, MongoInquiryRepository},
    intake_form_repo::{IntakeFormRepository, MongoIntakeFormRepository},
    notification_pref_repo::{MongoNotificationPreferenceRepository, NotificationPreferenceRepository},
    premium_content_repo::{MongoPremiumContentRepository, PremiumContentRepository},
    profile_repo::{MongoProfileRepository, ProfileRepository},
    saved_search_repo::{MongoSavedSearchRepository, SavedSearchRepository},
    user_repo::{MongoUserRepository, UserRepository},
    webinar_repo::{MongoWebinarRepository, WebinarRepository},
};

/// Every collection handle the services draw from.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub favorites: Arc<dyn FavoriteRepository>,
    pub saved_searches: Arc<dyn SavedSearchRepository>,
    pub notification_preferences: Arc<dyn NotificationPreferenceRepository>,
    pub inquiries: Arc<dyn InquiryRepository>,
    pub intake_forms: Arc<dyn IntakeFormRepository>,
    pub premium_content: Arc<dyn PremiumContentRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub webinars: Arc<dyn WebinarRepository>,
}

impl Repositories {
    pub fn mongo(db: &Database) -> Self {
        Repositories {
            users: Arc::new(MongoUserRepository::new(db)),
            profiles: Arc::new(MongoProfileRepository::new(db)),
            favorites: Arc::new(MongoFavoriteRepository::new(db)),
            saved_searches: Arc::new(MongoSavedSearchRepository::new(db)),
            notification_preferences: Arc::new(MongoNotificationPreferenceRepository::new(db)),
            inquiries: Arc::new(MongoInquiryRepository::new(db)),
            intake_forms: Arc::new(MongoIntakeFormRepository::new(db)),
            premium_content: Arc::new(MongoPremiumContentRepository::new(db)),
            documents: Arc::new(MongoDocumentRepository::new(db)),
            webinars: Arc::new(MongoWebinarRepository::new(db)),
        }
    }
}
