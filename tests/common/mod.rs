//! In-memory doubles for the repositories and external clients, plus a
//! router wired the same way the server wires it.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use domy_backend::app::app::{Clients, Services};
use domy_backend::config::{AppConfig, JwtConfig};
use domy_backend::model::document::{DocumentAccessLog, PremiumDocument};
use domy_backend::model::favorite::Favorite;
use domy_backend::model::inquiry::Inquiry;
use domy_backend::model::intake_form::{IntakeForm, IntakeStatus};
use domy_backend::model::listing::{Article, ContentType, Listing, Region};
use domy_backend::model::notification_preferences::NotificationPreferences;
use domy_backend::model::premium_content::PremiumContent;
use domy_backend::model::profile::{Profile, Role};
use domy_backend::model::saved_search::SavedSearch;
use domy_backend::model::user::User;
use domy_backend::model::webinar::Webinar;
use domy_backend::repository::document_repo::DocumentRepository;
use domy_backend::repository::favorite_repo::FavoriteRepository;
use domy_backend::repository::inquiry_repo::InquiryRepository;
use domy_backend::repository::intake_form_repo::IntakeFormRepository;
use domy_backend::repository::notification_pref_repo::NotificationPreferenceRepository;
use domy_backend::repository::premium_content_repo::PremiumContentRepository;
use domy_backend::repository::profile_repo::{ProfileChanges, ProfileRepository};
use domy_backend::repository::repository_error::{RepositoryError, RepositoryResult};
use domy_backend::repository::saved_search_repo::{SavedSearchChanges, SavedSearchRepository};
use domy_backend::repository::user_repo::UserRepository;
use domy_backend::repository::webinar_repo::WebinarRepository;
use domy_backend::repository::Repositories;
use domy_backend::util::cms::{CmsError, ContentClient, ListingQuery, UploadedAsset};
use domy_backend::util::email::{EmailError, EmailMessage, EmailSender, SendReceipt};
use domy_backend::util::jwt::{JwtTokenUtils, JwtTokenUtilsImpl};

// Repositories

#[derive(Default)]
pub struct MemUsers(Mutex<Vec<User>>);

#[async_trait]
impl UserRepository for MemUsers {
    async fn insert(&self, mut user: User) -> RepositoryResult<User> {
        let mut users = self.0.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(RepositoryError::AlreadyExists("email".into()));
        }
        user.id.get_or_insert_with(ObjectId::new);
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>> {
        Ok(self.0.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<User>> {
        Ok(self.0.lock().unwrap().iter().find(|u| u.id.as_ref() == Some(id)).cloned())
    }
}

#[derive(Default)]
pub struct MemProfiles(Mutex<Vec<Profile>>);

#[async_trait]
impl ProfileRepository for MemProfiles {
    async fn find_by_id(&self, id: &ObjectId) -> RepositoryResult<Option<Profile>> {
        Ok(self.0.lock().unwrap().iter().find(|p| &p.id == id).cloned())
    }

    async fn insert(&self, profile: Profile) -> RepositoryResult<Profile> {
        let mut profiles = self.0.lock().unwrap();
        if profiles.iter().any(|p| p.id == profile.id) {
            return Err(RepositoryError::AlreadyExists("profile".into()));
        }
        profiles.push(profile.clone());
        Ok(profile)
    }

    async fn update_details(&self, id: &ObjectId, changes: ProfileChanges) -> RepositoryResult<Option<Profile>> {
        let mut profiles = self.0.lock().unwrap();
        let Some(p) = profiles.iter_mut().find(|p| &p.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            p.name = name;
        }
        if changes.phone.is_some() {
            p.phone = changes.phone;
        }
        if changes.location.is_some() {
            p.location = changes.location;
        }
        if changes.bio.is_some() {
            p.bio = changes.bio;
        }
        if changes.preferences.is_some() {
            p.preferences = changes.preferences;
        }
        Ok(Some(p.clone()))
    }

    async fn set_role(&self, id: &ObjectId, role: Role) -> RepositoryResult<Option<Profile>> {
        let mut profiles = self.0.lock().unwrap();
        Ok(profiles.iter_mut().find(|p| &p.id == id).map(|p| {
            p.role = role;
            p.clone()
        }))
    }

    async fn list(&self) -> RepositoryResult<Vec<Profile>> {
        Ok(self.0.lock().unwrap().clone())
    }
}

#[derive(Default)]
pub struct MemFavorites(Mutex<Vec<Favorite>>);

#[async_trait]
impl FavoriteRepository for MemFavorites {
    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Favorite>> {
        Ok(self.0.lock().unwrap().iter().filter(|f| &f.user_id == user_id).cloned().collect())
    }

    async fn find(&self, user_id: &ObjectId, listing_id: &str) -> RepositoryResult<Option<Favorite>> {
        Ok(self
            .0
            .lock()
            .unwrap()
            .iter()
            .find(|f| &f.user_id == user_id && f.listing_id == listing_id)
            .cloned())
    }

    async fn insert(&self, mut favorite: Favorite) -> RepositoryResult<Favorite> {
        let mut favorites = self.0.lock().unwrap();
        if favorites.iter().any(|f| f.user_id == favorite.user_id && f.listing_id == favorite.listing_id) {
            return Err(RepositoryError::AlreadyExists("favorite".into()));
        }
        favorite.id = Some(ObjectId::new());
        favorite.created_at = Some(Utc::now());
        favorites.push(favorite.clone());
        Ok(favorite)
    }

    async fn delete(&self, user_id: &ObjectId, id: &ObjectId) -> RepositoryResult<bool> {
        let mut favorites = self.0.lock().unwrap();
        let before = favorites.len();
        favorites.retain(|f| !(&f.user_id == user_id && f.id.as_ref() == Some(id)));
        Ok(favorites.len() < before)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.0.lock().unwrap().iter().filter(|f| &f.user_id == user_id).count() as u64)
    }
}

#[derive(Default)]
pub struct MemSavedSearches(pub Mutex<Vec<SavedSearch>>);

impl MemSavedSearches {
    pub fn get(&self, id: &ObjectId) -> Option<SavedSearch> {
        self.0.lock().unwrap().iter().find(|s| s.id.as_ref() == Some(id)).cloned()
    }
}

#[async_trait]
impl SavedSearchRepository for MemSavedSearches {
    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<SavedSearch>> {
        Ok(self.0.lock().unwrap().iter().filter(|s| &s.user_id == user_id).cloned().collect())
    }

    async fn insert(&self, mut search: SavedSearch) -> RepositoryResult<SavedSearch> {
        search.id = Some(ObjectId::new());
        self.0.lock().unwrap().push(search.clone());
        Ok(search)
    }

    async fn update(
        &self,
        user_id: &ObjectId,
        id: &ObjectId,
        changes: SavedSearchChanges,
    ) -> RepositoryResult<Option<SavedSearch>> {
        let mut searches = self.0.lock().unwrap();
        let Some(s) = searches.iter_mut().find(|s| &s.user_id == user_id && s.id.as_ref() == Some(id)) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            s.name = name;
        }
        if let Some(filters) = changes.filters {
            s.filters = filters;
        }
        if let Some(alerts_enabled) = changes.alerts_enabled {
            s.alerts_enabled = alerts_enabled;
        }
        Ok(Some(s.clone()))
    }

    async fn delete(&self, user_id: &ObjectId, id: &ObjectId) -> RepositoryResult<bool> {
        let mut searches = self.0.lock().unwrap();
        let before = searches.len();
        searches.retain(|s| !(&s.user_id == user_id && s.id.as_ref() == Some(id)));
        Ok(searches.len() < before)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.0.lock().unwrap().iter().filter(|s| &s.user_id == user_id).count() as u64)
    }

    async fn list_alerting(&self) -> RepositoryResult<Vec<SavedSearch>> {
        Ok(self.0.lock().unwrap().iter().filter(|s| s.alerts_enabled).cloned().collect())
    }

    async fn claim_alert(
        &self,
        id: &ObjectId,
        previous: Option<DateTime<Utc>>,
        now: DateTime<Utc>,
    ) -> RepositoryResult<bool> {
        let mut searches = self.0.lock().unwrap();
        match searches.iter_mut().find(|s| s.id.as_ref() == Some(id)) {
            Some(s) if s.last_alert_sent == previous => {
                s.last_alert_sent = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn release_alert(
        &self,
        id: &ObjectId,
        claimed: DateTime<Utc>,
        previous: Option<DateTime<Utc>>,
    ) -> RepositoryResult<bool> {
        let mut searches = self.0.lock().unwrap();
        match searches.iter_mut().find(|s| s.id.as_ref() == Some(id)) {
            Some(s) if s.last_alert_sent == Some(claimed) => {
                s.last_alert_sent = previous;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn record_match_count(&self, id: &ObjectId, count: u32) -> RepositoryResult<()> {
        if let Some(s) = self.0.lock().unwrap().iter_mut().find(|s| s.id.as_ref() == Some(id)) {
            s.last_match_count = Some(count);
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemPreferences(pub Mutex<HashMap<ObjectId, NotificationPreferences>>);

#[async_trait]
impl NotificationPreferenceRepository for MemPreferences {
    async fn find(&self, user_id: &ObjectId) -> RepositoryResult<Option<NotificationPreferences>> {
        Ok(self.0.lock().unwrap().get(user_id).cloned())
    }

    async fn upsert(&self, prefs: NotificationPreferences) -> RepositoryResult<NotificationPreferences> {
        self.0.lock().unwrap().insert(prefs.user_id, prefs.clone());
        Ok(prefs)
    }
}

#[derive(Default)]
pub struct MemInquiries(pub Mutex<Vec<Inquiry>>);

#[async_trait]
impl InquiryRepository for MemInquiries {
    async fn insert(&self, mut inquiry: Inquiry) -> RepositoryResult<Inquiry> {
        inquiry.id = Some(ObjectId::new());
        inquiry.created_at = Some(Utc::now());
        self.0.lock().unwrap().push(inquiry.clone());
        Ok(inquiry)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<Inquiry>> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn list_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Vec<Inquiry>> {
        Ok(self.0.lock().unwrap().iter().filter(|i| i.user_id.as_ref() == Some(user_id)).cloned().collect())
    }

    async fn set_responded(&self, id: &ObjectId, responded: bool) -> RepositoryResult<Option<Inquiry>> {
        let mut inquiries = self.0.lock().unwrap();
        Ok(inquiries.iter_mut().find(|i| i.id.as_ref() == Some(id)).map(|i| {
            i.responded = responded;
            i.clone()
        }))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let mut inquiries = self.0.lock().unwrap();
        let before = inquiries.len();
        inquiries.retain(|i| i.id.as_ref() != Some(id));
        Ok(inquiries.len() < before)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.0.lock().unwrap().iter().filter(|i| i.user_id.as_ref() == Some(user_id)).count() as u64)
    }
}

#[derive(Default)]
pub struct MemIntakeForms(Mutex<Vec<IntakeForm>>);

#[async_trait]
impl IntakeFormRepository for MemIntakeForms {
    async fn find_for_user(&self, user_id: &ObjectId) -> RepositoryResult<Option<IntakeForm>> {
        Ok(self.0.lock().unwrap().iter().find(|f| &f.user_id == user_id).cloned())
    }

    async fn upsert(&self, mut form: IntakeForm) -> RepositoryResult<IntakeForm> {
        let mut forms = self.0.lock().unwrap();
        match forms.iter_mut().find(|f| f.user_id == form.user_id) {
            Some(current) => {
                form.id = current.id;
                *current = form.clone();
            }
            None => {
                form.id = Some(ObjectId::new());
                forms.push(form.clone());
            }
        }
        Ok(form)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<IntakeForm>> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn set_status(&self, id: &ObjectId, status: IntakeStatus) -> RepositoryResult<Option<IntakeForm>> {
        let mut forms = self.0.lock().unwrap();
        Ok(forms.iter_mut().find(|f| f.id.as_ref() == Some(id)).map(|f| {
            f.status = status;
            f.clone()
        }))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let mut forms = self.0.lock().unwrap();
        let before = forms.len();
        forms.retain(|f| f.id.as_ref() != Some(id));
        Ok(forms.len() < before)
    }

    async fn count_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.0.lock().unwrap().iter().filter(|f| &f.user_id == user_id).count() as u64)
    }
}

#[derive(Default)]
pub struct MemPremiumContent(Mutex<Vec<PremiumContent>>);

#[async_trait]
impl PremiumContentRepository for MemPremiumContent {
    async fn list(&self) -> RepositoryResult<Vec<PremiumContent>> {
        Ok(self.0.lock().unwrap().clone())
    }

    async fn insert(&self, mut content: PremiumContent) -> RepositoryResult<PremiumContent> {
        content.id = Some(ObjectId::new());
        self.0.lock().unwrap().push(content.clone());
        Ok(content)
    }

    async fn replace(&self, id: &ObjectId, mut content: PremiumContent) -> RepositoryResult<Option<PremiumContent>> {
        let mut items = self.0.lock().unwrap();
        Ok(items.iter_mut().find(|c| c.id.as_ref() == Some(id)).map(|c| {
            content.id = Some(*id);
            *c = content.clone();
            content
        }))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let mut items = self.0.lock().unwrap();
        let before = items.len();
        items.retain(|c| c.id.as_ref() != Some(id));
        Ok(items.len() < before)
    }
}

#[derive(Default)]
pub struct MemDocuments {
    documents: Mutex<Vec<PremiumDocument>>,
    access: Mutex<Vec<DocumentAccessLog>>,
}

#[async_trait]
impl DocumentRepository for MemDocuments {
    async fn list(&self) -> RepositoryResult<Vec<PremiumDocument>> {
        Ok(self.documents.lock().unwrap().clone())
    }

    async fn find(&self, id: &ObjectId) -> RepositoryResult<Option<PremiumDocument>> {
        Ok(self.documents.lock().unwrap().iter().find(|d| d.id.as_ref() == Some(id)).cloned())
    }

    async fn insert(&self, mut document: PremiumDocument) -> RepositoryResult<PremiumDocument> {
        document.id = Some(ObjectId::new());
        self.documents.lock().unwrap().push(document.clone());
        Ok(document)
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let mut documents = self.documents.lock().unwrap();
        let before = documents.len();
        documents.retain(|d| d.id.as_ref() != Some(id));
        Ok(documents.len() < before)
    }

    async fn log_access(&self, mut log: DocumentAccessLog) -> RepositoryResult<DocumentAccessLog> {
        log.id = Some(ObjectId::new());
        self.access.lock().unwrap().push(log.clone());
        Ok(log)
    }

    async fn count_access_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.access.lock().unwrap().iter().filter(|l| &l.user_id == user_id).count() as u64)
    }
}

#[derive(Default)]
pub struct MemWebinars {
    webinars: Mutex<Vec<Webinar>>,
    registrations: Mutex<Vec<(ObjectId, ObjectId)>>,
}

#[async_trait]
impl WebinarRepository for MemWebinars {
    async fn list(&self) -> RepositoryResult<Vec<Webinar>> {
        Ok(self.webinars.lock().unwrap().clone())
    }

    async fn find(&self, id: &ObjectId) -> RepositoryResult<Option<Webinar>> {
        Ok(self.webinars.lock().unwrap().iter().find(|w| w.id.as_ref() == Some(id)).cloned())
    }

    async fn insert(&self, mut webinar: Webinar) -> RepositoryResult<Webinar> {
        webinar.id = Some(ObjectId::new());
        self.webinars.lock().unwrap().push(webinar.clone());
        Ok(webinar)
    }

    async fn replace(&self, id: &ObjectId, mut webinar: Webinar) -> RepositoryResult<Option<Webinar>> {
        let mut webinars = self.webinars.lock().unwrap();
        Ok(webinars.iter_mut().find(|w| w.id.as_ref() == Some(id)).map(|w| {
            webinar.id = Some(*id);
            *w = webinar.clone();
            webinar
        }))
    }

    async fn delete(&self, id: &ObjectId) -> RepositoryResult<bool> {
        let mut webinars = self.webinars.lock().unwrap();
        let before = webinars.len();
        webinars.retain(|w| w.id.as_ref() != Some(id));
        self.registrations.lock().unwrap().retain(|(w, _)| w != id);
        Ok(webinars.len() < before)
    }

    async fn register(&self, webinar_id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<bool> {
        let mut registrations = self.registrations.lock().unwrap();
        if registrations.contains(&(*webinar_id, *user_id)) {
            return Ok(false);
        }
        registrations.push((*webinar_id, *user_id));
        Ok(true)
    }

    async fn unregister(&self, webinar_id: &ObjectId, user_id: &ObjectId) -> RepositoryResult<bool> {
        let mut registrations = self.registrations.lock().unwrap();
        let before = registrations.len();
        registrations.retain(|r| r != &(*webinar_id, *user_id));
        Ok(registrations.len() < before)
    }

    async fn registered_webinar_ids(&self, user_id: &ObjectId) -> RepositoryResult<Vec<ObjectId>> {
        Ok(self.registrations.lock().unwrap().iter().filter(|(_, u)| u == user_id).map(|(w, _)| *w).collect())
    }

    async fn count_registrations_for_user(&self, user_id: &ObjectId) -> RepositoryResult<u64> {
        Ok(self.registrations.lock().unwrap().iter().filter(|(_, u)| u == user_id).count() as u64)
    }
}

/// Concrete handles kept next to the trait-object bundle so tests can seed
/// and inspect state.
#[derive(Default)]
pub struct Store {
    pub users: Arc<MemUsers>,
    pub profiles: Arc<MemProfiles>,
    pub favorites: Arc<MemFavorites>,
    pub saved_searches: Arc<MemSavedSearches>,
    pub preferences: Arc<MemPreferences>,
    pub inquiries: Arc<MemInquiries>,
    pub intake_forms: Arc<MemIntakeForms>,
    pub premium_content: Arc<MemPremiumContent>,
    pub documents: Arc<MemDocuments>,
    pub webinars: Arc<MemWebinars>,
}

impl Store {
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: self.users.clone(),
            profiles: self.profiles.clone(),
            favorites: self.favorites.clone(),
            saved_searches: self.saved_searches.clone(),
            notification_preferences: self.preferences.clone(),
            inquiries: self.inquiries.clone(),
            intake_forms: self.intake_forms.clone(),
            premium_content: self.premium_content.clone(),
            documents: self.documents.clone(),
            webinars: self.webinars.clone(),
        }
    }

    /// Account plus profile with the given role.
    pub async fn member(&self, email: &str, role: Role) -> ObjectId {
        let id = ObjectId::new();
        let user = User {
            id: Some(id),
            email: email.to_string(),
            password_hash: String::new(),
            name: None,
            created_at: None,
            updated_at: None,
        };
        self.users.insert(user).await.unwrap();
        let mut profile = Profile::new(id, email.to_string(), email.split('@').next().unwrap().to_string());
        profile.role = role;
        self.profiles.insert(profile).await.unwrap();
        id
    }
}

// External clients

/// CMS double serving a fixed listing set; writes are rejected.
#[derive(Default)]
pub struct FakeCms {
    pub listings: Vec<Listing>,
}

#[async_trait]
impl ContentClient for FakeCms {
    async fn listings(&self, _query: &ListingQuery) -> Result<Vec<Listing>, CmsError> {
        Ok(self.listings.clone())
    }

    async fn available_listings(&self) -> Result<Vec<Listing>, CmsError> {
        Ok(self.listings.iter().filter(|l| l.is_available()).cloned().collect())
    }

    async fn listing_by_slug(&self, slug: &str) -> Result<Option<Listing>, CmsError> {
        Ok(self.listings.iter().find(|l| l.slug_str() == Some(slug)).cloned())
    }

    async fn listing_by_id(&self, id: &str) -> Result<Option<Listing>, CmsError> {
        Ok(self.listings.iter().find(|l| l.id == id).cloned())
    }

    async fn regions(&self) -> Result<Vec<Region>, CmsError> {
        Ok(Vec::new())
    }

    async fn region_by_slug(&self, _slug: &str) -> Result<Option<Region>, CmsError> {
        Ok(None)
    }

    async fn articles(&self) -> Result<Vec<Article>, CmsError> {
        Ok(Vec::new())
    }

    async fn article_by_slug(&self, _slug: &str) -> Result<Option<Article>, CmsError> {
        Ok(None)
    }

    async fn create_document(&self, _doc_type: ContentType, _fields: Map<String, Value>) -> Result<Value, CmsError> {
        Err(CmsError::MissingToken)
    }

    async fn patch_document(&self, _id: &str, _set: Map<String, Value>) -> Result<Value, CmsError> {
        Err(CmsError::MissingToken)
    }

    async fn delete_document(&self, _id: &str) -> Result<(), CmsError> {
        Err(CmsError::MissingToken)
    }

    async fn upload_image(&self, _filename: &str, _content_type: &str, _data: Vec<u8>) -> Result<UploadedAsset, CmsError> {
        Err(CmsError::MissingToken)
    }

    fn can_write(&self) -> bool {
        false
    }
}

/// Mailer that records every message; with `fail` set every send errors.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<EmailMessage>>,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        RecordingMailer { sent: Mutex::new(Vec::new()), fail: true }
    }

    pub fn count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }
}

#[async_trait]
impl EmailSender for RecordingMailer {
    async fn send_email(&self, message: EmailMessage) -> Result<SendReceipt, EmailError> {
        if self.fail {
            return Err(EmailError::SmtpError("connection refused".into()));
        }
        self.sent.lock().unwrap().push(message);
        Ok(SendReceipt { success: true, provider: "test".to_string() })
    }

    fn is_simulation(&self) -> bool {
        false
    }
}

// Wiring

pub fn jwt_utils() -> Arc<JwtTokenUtilsImpl> {
    Arc::new(JwtTokenUtilsImpl::new(JwtConfig::default()))
}

pub fn bearer(jwt: &JwtTokenUtilsImpl, id: &ObjectId, email: &str) -> String {
    let token = jwt.generate_access_token(&id.to_hex(), email, "user").unwrap();
    format!("Bearer {}", token)
}

pub struct TestApp {
    pub store: Store,
    pub mailer: Arc<RecordingMailer>,
    pub jwt: Arc<JwtTokenUtilsImpl>,
    pub services: Services,
    pub router: Router,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_clients(Arc::new(FakeCms::default()), Arc::new(RecordingMailer::default()))
    }

    pub fn with_clients(cms: Arc<FakeCms>, mailer: Arc<RecordingMailer>) -> Self {
        let store = Store::default();
        let jwt = jwt_utils();
        let config = AppConfig::default();
        let clients = Clients { cms: Some(cms), ai: None, mailer: mailer.clone(), storage: None };
        let services = Services::new(store.repositories(), clients, jwt.clone(), &config);
        let router = services.router(&config);
        TestApp { store, mailer, jwt, services, router }
    }

    pub fn auth(&self, id: &ObjectId, email: &str) -> String {
        bearer(&self.jwt, id, email)
    }
}

pub fn json_request(method: &str, uri: &str, auth: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri).header("content-type", "application/json");
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: &str, uri: &str, auth: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        builder = builder.header("authorization", auth);
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}
