use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use tracing::{error, info, instrument, warn};

use crate::dto::club_dto::{DocumentAccessResponse, IntakeFormRequest, WebinarOverview, WebinarView};
use crate::model::document::{AccessAction, DocumentAccessLog, PremiumDocument};
use crate::model::intake_form::{IntakeForm, IntakeStatus};
use crate::model::premium_content::PremiumContent;
use crate::model::webinar::Webinar;
use crate::repository::document_repo::DocumentRepository;
use crate::repository::intake_form_repo::IntakeFormRepository;
use crate::repository::premium_content_repo::PremiumContentRepository;
use crate::repository::webinar_repo::WebinarRepository;
use crate::util::error::ServiceError;

#[async_trait]
pub trait ClubService: Send + Sync {
    async fn premium_content(&self) -> Result<Vec<PremiumContent>, ServiceError>;
    async fn documents(&self) -> Result<Vec<PremiumDocument>, ServiceError>;
    async fn access_document(
        &self,
        user_id: &ObjectId,
        document_id: &ObjectId,
        action: AccessAction,
    ) -> Result<DocumentAccessResponse, ServiceError>;

    async fn webinars(&self, user_id: &ObjectId, now: DateTime<Utc>) -> Result<WebinarOverview, ServiceError>;
    async fn register_webinar(&self, user_id: &ObjectId, webinar_id: &ObjectId) -> Result<bool, ServiceError>;
    async fn unregister_webinar(&self, user_id: &ObjectId, webinar_id: &ObjectId) -> Result<(), ServiceError>;

    async fn intake_form(&self, user_id: &ObjectId) -> Result<Option<IntakeForm>, ServiceError>;
    async fn save_intake_form(&self, user_id: &ObjectId, request: IntakeFormRequest) -> Result<IntakeForm, ServiceError>;
}

pub struct ClubServiceImpl {
    pub content_repo: Arc<dyn PremiumContentRepository>,
    pub document_repo: Arc<dyn DocumentRepository>,
    pub webinar_repo: Arc<dyn WebinarRepository>,
    pub intake_form_repo: Arc<dyn IntakeFormRepository>,
}

impl ClubServiceImpl {
    pub fn new(
        content_repo: Arc<dyn PremiumContentRepository>,
        document_repo: Arc<dyn DocumentRepository>,
        webinar_repo: Arc<dyn WebinarRepository>,
        intake_form_repo: Arc<dyn IntakeFormRepository>,
    ) -> Self {
        Self { content_repo, document_repo, webinar_repo, intake_form_repo }
    }
}

/// Upcoming webinars soonest first, past ones most recent first.
pub fn split_webinars(webinars: Vec<Webinar>, registered: &HashSet<ObjectId>, now: DateTime<Utc>) -> WebinarOverview {
    let (mut upcoming, mut past): (Vec<WebinarView>, Vec<WebinarView>) = webinars
        .into_iter()
        .map(|webinar| {
            let is_registered = webinar.id.is_some_and(|id| registered.contains(&id));
            WebinarView { webinar, is_registered }
        })
        .partition(|view| view.webinar.is_upcoming(now));
    upcoming.sort_by_key(|v| v.webinar.date);
    past.sort_by(|a, b| b.webinar.date.cmp(&a.webinar.date));
    WebinarOverview { upcoming, past }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

#[async_trait]
impl ClubService for ClubServiceImpl {
    #[instrument(skip(self))]
    async fn premium_content(&self) -> Result<Vec<PremiumContent>, ServiceError> {
        Ok(self.content_repo.list().await?)
    }

    #[instrument(skip(self))]
    async fn documents(&self) -> Result<Vec<PremiumDocument>, ServiceError> {
        Ok(self.document_repo.list().await?)
    }

    #[instrument(skip(self), fields(user_id = %user_id, document_id = %document_id))]
    async fn access_document(
        &self,
        user_id: &ObjectId,
        document_id: &ObjectId,
        action: AccessAction,
    ) -> Result<DocumentAccessResponse, ServiceError> {
        let document = self
            .document_repo
            .find(document_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Document not found".to_string()))?;

        let log = DocumentAccessLog {
            id: None,
            document_id: *document_id,
            user_id: *user_id,
            action,
            created_at: None,
        };
        if let Err(e) = self.document_repo.log_access(log).await {
            warn!("Document access not logged: {e}");
        }
        info!("Document accessed");
        Ok(DocumentAccessResponse { file_url: document.file_url, action })
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn webinars(&self, user_id: &ObjectId, now: DateTime<Utc>) -> Result<WebinarOverview, ServiceError> {
        let webinars = self.webinar_repo.list().await?;
        let registered: HashSet<ObjectId> = self.webinar_repo.registered_webinar_ids(user_id).await?.into_iter().collect();
        Ok(split_webinars(webinars, &registered, now))
    }

    #[instrument(skip(self), fields(user_id = %user_id, webinar_id = %webinar_id))]
    async fn register_webinar(&self, user_id: &ObjectId, webinar_id: &ObjectId) -> Result<bool, ServiceError> {
        if self.webinar_repo.find(webinar_id).await?.is_none() {
            return Err(ServiceError::NotFound("Webinar not found".to_string()));
        }
        let newly = self.webinar_repo.register(webinar_id, user_id).await?;
        if newly {
            info!("Registered for webinar");
        }
        Ok(true)
    }

    #[instrument(skip(self), fields(user_id = %user_id, webinar_id = %webinar_id))]
    async fn unregister_webinar(&self, user_id: &ObjectId, webinar_id: &ObjectId) -> Result<(), ServiceError> {
        if !self.webinar_repo.unregister(webinar_id, user_id).await? {
            return Err(ServiceError::NotFound("Registration not found".to_string()));
        }
        info!("Webinar registration removed");
        Ok(())
    }

    #[instrument(skip(self), fields(user_id = %user_id))]
    async fn intake_form(&self, user_id: &ObjectId) -> Result<Option<IntakeForm>, ServiceError> {
        Ok(self.intake_form_repo.find_for_user(user_id).await?)
    }

    #[instrument(skip(self, request), fields(user_id = %user_id))]
    async fn save_intake_form(&self, user_id: &ObjectId, request: IntakeFormRequest) -> Result<IntakeForm, ServiceError> {
        let form = IntakeForm {
            id: None,
            user_id: *user_id,
            full_name: request.full_name.trim().to_string(),
            email: request.email.trim().to_string(),
            phone: non_blank(request.phone),
            nationality: non_blank(request.nationality),
            current_location: non_blank(request.current_location),
            property_types: request.property_types,
            preferred_regions: request.preferred_regions,
            budget_range: non_blank(request.budget_range),
            min_bedrooms: request.min_bedrooms.unwrap_or(0),
            min_bathrooms: request.min_bathrooms.unwrap_or(0),
            min_square_meters: request.min_square_meters.unwrap_or(0),
            timeline: non_blank(request.timeline),
            purchase_reason: non_blank(request.purchase_reason),
            financing_needed: non_blank(request.financing_needed),
            additional_notes: non_blank(request.additional_notes),
            // A resubmitted brief goes back into the review queue.
            status: IntakeStatus::Submitted,
            extra_data: request.extra_data,
            created_at: None,
            updated_at: None,
        };
        let saved = self.intake_form_repo.upsert(form).await;
        if let Err(e) = &saved {
            error!("Failed to save intake form: {e}");
        }
        Ok(saved?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn webinar(title: &str, date: DateTime<Utc>) -> Webinar {
        Webinar {
            id: Some(ObjectId::new()),
            title: title.to_string(),
            description: None,
            presenter: None,
            date,
            duration_minutes: Some(60),
            join_url: None,
            recording_url: None,
            created_at: None,
        }
    }

    #[test]
    fn test_split_webinars_orders_and_flags() {
        let now = Utc::now();
        let soon = webinar("soon", now + Duration::days(1));
        let later = webinar("later", now + Duration::days(7));
        let old = webinar("old", now - Duration::days(30));
        let recent = webinar("recent", now - Duration::days(2));
        let registered: HashSet<ObjectId> = [soon.id.unwrap()].into_iter().collect();

        let overview = split_webinars(vec![later, old, soon, recent], &registered, now);

        let upcoming: Vec<_> = overview.upcoming.iter().map(|v| v.webinar.title.as_str()).collect();
        let past: Vec<_> = overview.past.iter().map(|v| v.webinar.title.as_str()).collect();
        assert_eq!(upcoming, ["soon", "later"]);
        assert_eq!(past, ["recent", "old"]);
        assert!(overview.upcoming[0].is_registered);
        assert!(!overview.upcoming[1].is_registered);
    }
}
