use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{debug, error, info, instrument, warn};

use crate::dto::inquiry_dto::{ConciergeRequest, CreateInquiryRequest};
use crate::model::inquiry::{Inquiry, InquiryKind};
use crate::model::notification_preferences::NotificationPreferences;
use crate::repository::inquiry_repo::InquiryRepository;
use crate::repository::notification_pref_repo::NotificationPreferenceRepository;
use crate::repository::profile_repo::ProfileRepository;
use crate::service::notification_service::{InquiryConfirmation, NotificationService};
use crate::util::cms::ContentClient;
use crate::util::error::ServiceError;

/// Trimmed value of a required text field; blank is rejected.
fn required(value: &str, message: &str) -> Result<String, ServiceError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ServiceError::InvalidInput(message.to_string()));
    }
    Ok(value.to_string())
}

/// What the confirmation calls the inquiry: its listing title, else the listing id.
fn inquiry_subject(inquiry: &Inquiry) -> String {
    match (&inquiry.listing_title, &inquiry.listing_id) {
        (Some(title), _) => title.clone(),
        (None, Some(id)) => format!("Property {}", id),
        (None, None) => "your inquiry".to_string(),
    }
}

/// Who is behind a request, when a session is present.
#[derive(Debug, Clone)]
pub struct Requester {
    pub id: ObjectId,
    pub email: String,
}

#[async_trait]
pub trait InquiryService: Send + Sync {
    async fn submit(&self, request: CreateInquiryRequest, requester: Option<Requester>) -> Result<Inquiry, ServiceError>;
    async fn concierge(&self, requester: Requester, request: ConciergeRequest) -> Result<Inquiry, ServiceError>;
    async fn list_mine(&self, user_id: &ObjectId) -> Result<Vec<Inquiry>, ServiceError>;

    async fn list_all(&self) -> Result<Vec<Inquiry>, ServiceError>;
    async fn set_responded(&self, id: &ObjectId, responded: bool) -> Result<Inquiry, ServiceError>;
    async fn delete(&self, id: &ObjectId) -> Result<(), ServiceError>;
}

pub struct InquiryServiceImpl {
    pub inquiry_repo: Arc<dyn InquiryRepository>,
    pub preference_repo: Arc<dyn NotificationPreferenceRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub cms: Option<Arc<dyn ContentClient>>,
    pub notifications: Arc<dyn NotificationService>,
}

impl InquiryServiceImpl {
    pub fn new(
        inquiry_repo: Arc<dyn InquiryRepository>,
        preference_repo: Arc<dyn NotificationPreferenceRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        cms: Option<Arc<dyn ContentClient>>,
        notifications: Arc<dyn NotificationService>,
    ) -> Self {
        Self { inquiry_repo, preference_repo, profile_repo, cms, notifications }
    }

    async fn listing_title(&self, listing_id: &str) -> Option<String> {
        let cms = self.cms.as_ref()?;
        match cms.listing_by_id(listing_id).await {
            Ok(listing) => listing.map(|l| l.display_title()),
            Err(e) => {
                warn!("Could not resolve listing title: {e}");
                None
            }
        }
    }

    /// Confirmation to the member, when their settings allow it. Never fails
    /// the submission.
    async fn confirm(&self, inquiry: &Inquiry, user_id: &ObjectId) {
        let prefs = match self.preference_repo.find(user_id).await {
            Ok(prefs) => prefs.unwrap_or_else(|| NotificationPreferences::defaults_for(*user_id)),
            Err(e) => {
                warn!("Skipping inquiry confirmation, preferences unavailable: {e}");
                return;
            }
        };
        if !prefs.wants_inquiry_emails() {
            debug!("Member opted out of inquiry emails");
            return;
        }

        let confirmation = InquiryConfirmation {
            to: inquiry.email.clone(),
            user_name: inquiry.name.clone(),
            property_title: inquiry_subject(inquiry),
            message: inquiry.message.clone(),
        };
        match self.notifications.send_inquiry_confirmation(confirmation).await {
            Ok(receipt) => info!(provider = %receipt.provider, "Inquiry confirmation sent"),
            Err(e) => warn!("Inquiry stored but confirmation failed: {e}"),
        }
    }
}

#[async_trait]
impl InquiryService for InquiryServiceImpl {
    #[instrument(skip(self, request, requester), fields(email = %request.email))]
    async fn submit(&self, request: CreateInquiryRequest, requester: Option<Requester>) -> Result<Inquiry, ServiceError> {
        info!("New inquiry");
        let name = required(&request.name, "Name is required")?;
        let message = required(&request.message, "Message is required")?;
        let listing_id = request.listing_id.map(|id| id.trim().to_string()).filter(|id| !id.is_empty());
        let mut listing_title = request.listing_title.filter(|t| !t.trim().is_empty());
        if listing_title.is_none() {
            if let Some(id) = &listing_id {
                listing_title = self.listing_title(id).await;
            }
        }
        let kind = request.kind.unwrap_or(if listing_id.is_some() {
            InquiryKind::Listing
        } else {
            InquiryKind::General
        });

        let inquiry = Inquiry {
            id: None,
            user_id: requester.as_ref().map(|r| r.id),
            listing_id,
            listing_title,
            kind,
            name,
            email: request.email.trim().to_string(),
            phone: request.phone.filter(|p| !p.trim().is_empty()),
            message,
            responded: false,
            created_at: None,
            updated_at: None,
        };
        let saved = self.inquiry_repo.insert(inquiry).await;
        match &saved {
            Ok(_) => info!("Inquiry stored"),
            Err(e) => error!("Failed to store inquiry: {e}"),
        }
        let saved = saved?;

        if let Some(requester) = &requester {
            self.confirm(&saved, &requester.id).await;
        }
        Ok(saved)
    }

    #[instrument(skip(self, requester, request), fields(user_id = %requester.id))]
    async fn concierge(&self, requester: Requester, request: ConciergeRequest) -> Result<Inquiry, ServiceError> {
        let message = required(&request.message, "Message is required")?;
        let profile = self.profile_repo.find_by_id(&requester.id).await?;
        let name = profile
            .as_ref()
            .map(|p| p.name.clone())
            .unwrap_or_else(|| requester.email.split('@').next().unwrap_or("Member").to_string());
        let phone = request.phone.or_else(|| profile.as_ref().and_then(|p| p.phone.clone()));

        let inquiry = Inquiry {
            id: None,
            user_id: Some(requester.id),
            listing_id: None,
            listing_title: None,
            kind: InquiryKind::Concierge,
            name,
            email: requester.email.clone(),
            phone,
            message,
            responded: false,
            created_at: None,
            updated_at: None,
        };
        let saved = self.inquiry_repo.insert(inquiry).await?;
        info!("Concierge request stored");
        Ok(saved)
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn list_mine(&self, user_id: &ObjectId) -> Result<Vec<Inquiry>, ServiceError> {
        Ok(self.inquiry_repo.list_for_user(user_id).await?)
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Inquiry>, ServiceError> {
        let inquiries = self.inquiry_repo.list_all().await?;
        info!("Fetched {} inquiries", inquiries.len());
        Ok(inquiries)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn set_responded(&self, id: &ObjectId, responded: bool) -> Result<Inquiry, ServiceError> {
        self.inquiry_repo
            .set_responded(id, responded)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Inquiry not found".to_string()))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: &ObjectId) -> Result<(), ServiceError> {
        if !self.inquiry_repo.delete(id).await? {
            return Err(ServiceError::NotFound("Inquiry not found".to_string()));
        }
        info!("Inquiry deleted");
        Ok(())
    }
}
