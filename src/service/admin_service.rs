use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{error, info, instrument, warn};

use crate::dto::admin_dto::{DocumentUpload, PremiumContentRequest, UserStats, UserWithStats, WebinarRequest};
use crate::model::document::PremiumDocument;
use crate::model::intake_form::{IntakeForm, IntakeStatus};
use crate::model::premium_content::PremiumContent;
use crate::model::profile::{Profile, Role};
use crate::model::webinar::Webinar;
use crate::repository::Repositories;
use crate::util::error::ServiceError;
use crate::util::minio::{document_object_key, ObjectStorage};

#[async_trait]
pub trait AdminService: Send + Sync {
    async fn list_users(&self) -> Result<Vec<UserWithStats>, ServiceError>;
    async fn get_user(&self, id: &ObjectId) -> Result<UserWithStats, ServiceError>;
    async fn set_role(&self, id: &ObjectId, role: Role) -> Result<Profile, ServiceError>;

    async fn list_intake_forms(&self) -> Result<Vec<IntakeForm>, ServiceError>;
    async fn set_intake_status(&self, id: &ObjectId, status: IntakeStatus) -> Result<IntakeForm, ServiceError>;
    async fn delete_intake_form(&self, id: &ObjectId) -> Result<(), ServiceError>;

    async fn list_content(&self) -> Result<Vec<PremiumContent>, ServiceError>;
    async fn create_content(&self, request: PremiumContentRequest) -> Result<PremiumContent, ServiceError>;
    async fn update_content(&self, id: &ObjectId, request: PremiumContentRequest) -> Result<PremiumContent, ServiceError>;
    async fn delete_content(&self, id: &ObjectId) -> Result<(), ServiceError>;

    async fn list_documents(&self) -> Result<Vec<PremiumDocument>, ServiceError>;
    async fn upload_document(&self, upload: DocumentUpload) -> Result<PremiumDocument, ServiceError>;
    async fn delete_document(&self, id: &ObjectId) -> Result<(), ServiceError>;

    async fn list_webinars(&self) -> Result<Vec<Webinar>, ServiceError>;
    async fn create_webinar(&self, request: WebinarRequest) -> Result<Webinar, ServiceError>;
    async fn update_webinar(&self, id: &ObjectId, request: WebinarRequest) -> Result<Webinar, ServiceError>;
    async fn delete_webinar(&self, id: &ObjectId) -> Result<(), ServiceError>;
}

pub struct AdminServiceImpl {
    pub repos: Repositories,
    pub storage: Option<Arc<dyn ObjectStorage>>,
}

impl AdminServiceImpl {
    pub fn new(repos: Repositories, storage: Option<Arc<dyn ObjectStorage>>) -> Self {
        Self { repos, storage }
    }

    async fn stats_for(&self, user_id: &ObjectId) -> Result<UserStats, ServiceError> {
        let (favorites, saved_searches, inquiries, intake_forms, webinar_registrations, document_accesses) = tokio::try_join!(
            self.repos.favorites.count_for_user(user_id),
            self.repos.saved_searches.count_for_user(user_id),
            self.repos.inquiries.count_for_user(user_id),
            self.repos.intake_forms.count_for_user(user_id),
            self.repos.webinars.count_registrations_for_user(user_id),
            self.repos.documents.count_access_for_user(user_id),
        )?;
        Ok(UserStats { favorites, saved_searches, inquiries, intake_forms, webinar_registrations, document_accesses })
    }
}

fn premium_content_from(request: PremiumContentRequest) -> PremiumContent {
    PremiumContent {
        id: None,
        title: request.title.trim().to_string(),
        description: request.description,
        content_type: request.content_type.trim().to_string(),
        category: request.category,
        thumbnail_url: request.thumbnail_url,
        content_url: request.content_url,
        file_url: request.file_url,
        duration: request.duration,
        pages: request.pages,
        read_time: request.read_time,
        author: request.author,
        is_featured: request.is_featured,
        published_at: request.published_at,
        created_at: None,
    }
}

fn webinar_from(request: WebinarRequest) -> Webinar {
    Webinar {
        id: None,
        title: request.title.trim().to_string(),
        description: request.description,
        presenter: request.presenter,
        date: request.date,
        duration_minutes: request.duration_minutes,
        join_url: request.join_url,
        recording_url: request.recording_url,
        created_at: None,
    }
}

#[async_trait]
impl AdminService for AdminServiceImpl {
    #[instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<UserWithStats>, ServiceError> {
        let profiles = self.repos.profiles.list().await?;
        let mut users = Vec::with_capacity(profiles.len());
        for profile in profiles {
            let stats = self.stats_for(&profile.id).await?;
            users.push(UserWithStats { profile, stats });
        }
        info!("Listed {} users", users.len());
        Ok(users)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn get_user(&self, id: &ObjectId) -> Result<UserWithStats, ServiceError> {
        let profile = self
            .repos
            .profiles
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        let stats = self.stats_for(id).await?;
        Ok(UserWithStats { profile, stats })
    }

    #[instrument(skip(self), fields(id = %id, role = role.as_str()))]
    async fn set_role(&self, id: &ObjectId, role: Role) -> Result<Profile, ServiceError> {
        let updated = self
            .repos
            .profiles
            .set_role(id, role)
            .await?
            .ok_or_else(|| ServiceError::NotFound("User not found".to_string()))?;
        info!("Role updated");
        Ok(updated)
    }

    #[instrument(skip(self))]
    async fn list_intake_forms(&self) -> Result<Vec<IntakeForm>, ServiceError> {
        Ok(self.repos.intake_forms.list_all().await?)
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn set_intake_status(&self, id: &ObjectId, status: IntakeStatus) -> Result<IntakeForm, ServiceError> {
        self.repos
            .intake_forms
            .set_status(id, status)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Intake form not found".to_string()))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_intake_form(&self, id: &ObjectId) -> Result<(), ServiceError> {
        if !self.repos.intake_forms.delete(id).await? {
            return Err(ServiceError::NotFound("Intake form not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_content(&self) -> Result<Vec<PremiumContent>, ServiceError> {
        Ok(self.repos.premium_content.list().await?)
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_content(&self, request: PremiumContentRequest) -> Result<PremiumContent, ServiceError> {
        let created = self.repos.premium_content.insert(premium_content_from(request)).await?;
        info!("Club content created");
        Ok(created)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_content(&self, id: &ObjectId, request: PremiumContentRequest) -> Result<PremiumContent, ServiceError> {
        self.repos
            .premium_content
            .replace(id, premium_content_from(request))
            .await?
            .ok_or_else(|| ServiceError::NotFound("Content not found".to_string()))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_content(&self, id: &ObjectId) -> Result<(), ServiceError> {
        if !self.repos.premium_content.delete(id).await? {
            return Err(ServiceError::NotFound("Content not found".to_string()));
        }
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_documents(&self) -> Result<Vec<PremiumDocument>, ServiceError> {
        Ok(self.repos.documents.list().await?)
    }

    #[instrument(skip(self, upload), fields(file = %upload.file_name, size = upload.content.len()))]
    async fn upload_document(&self, upload: DocumentUpload) -> Result<PremiumDocument, ServiceError> {
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("Document storage not configured".to_string()))?;
        if upload.content.is_empty() {
            return Err(ServiceError::InvalidInput("No file provided".to_string()));
        }

        let object_key = document_object_key(&upload.file_name);
        let file_size = upload.content.len() as u64;
        let file_url = match storage.put_object(&object_key, upload.content, &upload.content_type).await {
            Ok(url) => url,
            Err(e) => {
                error!("Document upload failed: {e}");
                return Err(e.into());
            }
        };

        let document = PremiumDocument {
            id: None,
            name: upload
                .name
                .map(|n| n.trim().to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| upload.file_name.clone()),
            description: upload.description.filter(|d| !d.trim().is_empty()),
            category: upload
                .category
                .filter(|c| !c.trim().is_empty())
                .unwrap_or_else(|| "general".to_string()),
            object_key: object_key.clone(),
            file_url,
            file_size,
            file_type: upload.content_type,
            is_public: upload.is_public,
            uploaded_at: None,
        };
        match self.repos.documents.insert(document).await {
            Ok(saved) => {
                info!("Document stored as {}", object_key);
                Ok(saved)
            }
            Err(e) => {
                error!("Document metadata insert failed, removing object: {e}");
                if let Err(cleanup) = storage.remove_object(&object_key).await {
                    warn!("Orphaned object {} left in storage: {cleanup}", object_key);
                }
                Err(e.into())
            }
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_document(&self, id: &ObjectId) -> Result<(), ServiceError> {
        let document = self
            .repos
            .documents
            .find(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("Document not found".to_string()))?;
        let storage = self
            .storage
            .as_ref()
            .ok_or_else(|| ServiceError::NotConfigured("Document storage not configured".to_string()))?;

        storage.remove_object(&document.object_key).await?;
        self.repos.documents.delete(id).await?;
        info!("Document deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    async fn list_webinars(&self) -> Result<Vec<Webinar>, ServiceError> {
        Ok(self.repos.webinars.list().await?)
    }

    #[instrument(skip(self, request), fields(title = %request.title))]
    async fn create_webinar(&self, request: WebinarRequest) -> Result<Webinar, ServiceError> {
        Ok(self.repos.webinars.insert(webinar_from(request)).await?)
    }

    #[instrument(skip(self, request), fields(id = %id))]
    async fn update_webinar(&self, id: &ObjectId, request: WebinarRequest) -> Result<Webinar, ServiceError> {
        self.repos
            .webinars
            .replace(id, webinar_from(request))
            .await?
            .ok_or_else(|| ServiceError::NotFound("Webinar not found".to_string()))
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete_webinar(&self, id: &ObjectId) -> Result<(), ServiceError> {
        if !self.repos.webinars.delete(id).await? {
            return Err(ServiceError::NotFound("Webinar not found".to_string()));
        }
        Ok(())
    }
}
