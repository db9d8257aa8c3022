use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info, warn};

use crate::config::{AdminUserConfig, AiConfig, AppConfig, CmsConfig, ConfigError, EmailConfig, JwtConfig, MinioConfig, MongoConfig};
use crate::handler::alert_handler::AlertHandlerState;
use crate::handler::auth_handler::AuthHandlerState;
use crate::handler::email_handler::EmailHandlerState;
use crate::middlewares::auth_middleware::AuthState;
use crate::repository::{mongo, Repositories};
use crate::router::{
    admin_router::admin_router, alert_router::alert_router, auth_router::auth_router, club_router::club_router,
    content_router::content_router, email_router::email_router, inquiry_router::inquiry_router,
    member_router::member_router, profile_router::profile_router,
};
use crate::service::admin_service::AdminServiceImpl;
use crate::service::alert_service::AlertServiceImpl;
use crate::service::auth_service::{AuthService, AuthServiceImpl};
use crate::service::club_service::ClubServiceImpl;
use crate::service::content_service::ContentServiceImpl;
use crate::service::copy_service::CopyServiceImpl;
use crate::service::inquiry_service::InquiryServiceImpl;
use crate::service::member_service::MemberServiceImpl;
use crate::service::notification_service::NotificationServiceImpl;
use crate::service::profile_service::ProfileServiceImpl;
use crate::util::ai::{OpenAiClient, TextGenerator};
use crate::util::cms::{ContentClient, SanityClient};
use crate::util::email::{EmailSender, SmtpEmailService};
use crate::util::jwt::JwtTokenUtilsImpl;
use crate::util::minio::{MinioService, ObjectStorage};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// External clients; `None` means the concern is not configured.
#[derive(Clone)]
pub struct Clients {
    pub cms: Option<Arc<dyn ContentClient>>,
    pub ai: Option<Arc<dyn TextGenerator>>,
    pub mailer: Arc<dyn EmailSender>,
    pub storage: Option<Arc<dyn ObjectStorage>>,
}

/// Every service, built once and shared by the routers.
pub struct Services {
    pub auth: Arc<AuthServiceImpl>,
    pub profile: Arc<ProfileServiceImpl>,
    pub member: Arc<MemberServiceImpl>,
    pub inquiry: Arc<InquiryServiceImpl>,
    pub content: Arc<ContentServiceImpl>,
    pub notifications: Arc<NotificationServiceImpl>,
    pub copy: Arc<CopyServiceImpl>,
    pub alerts: Arc<AlertServiceImpl>,
    pub club: Arc<ClubServiceImpl>,
    pub admin: Arc<AdminServiceImpl>,
    pub auth_state: Arc<AuthState>,
}

impl Services {
    pub fn new(repos: Repositories, clients: Clients, jwt_utils: Arc<JwtTokenUtilsImpl>, config: &AppConfig) -> Self {
        let notifications = Arc::new(NotificationServiceImpl::new(
            clients.mailer.clone(),
            clients.ai.clone(),
            config.public_base_url.clone(),
        ));

        let auth = Arc::new(AuthServiceImpl::new(repos.users.clone(), repos.profiles.clone(), jwt_utils.clone()));
        let profile = Arc::new(ProfileServiceImpl::new(repos.profiles.clone(), repos.users.clone()));
        let member = Arc::new(MemberServiceImpl::new(
            repos.favorites.clone(),
            repos.saved_searches.clone(),
            repos.notification_preferences.clone(),
        ));
        let inquiry = Arc::new(InquiryServiceImpl::new(
            repos.inquiries.clone(),
            repos.notification_preferences.clone(),
            repos.profiles.clone(),
            clients.cms.clone(),
            notifications.clone(),
        ));
        let content = Arc::new(ContentServiceImpl::new(clients.cms.clone()));
        let copy = Arc::new(CopyServiceImpl::new(clients.ai.clone()));
        let alerts = Arc::new(AlertServiceImpl {
            saved_search_repo: repos.saved_searches.clone(),
            preference_repo: repos.notification_preferences.clone(),
            user_repo: repos.users.clone(),
            cms: clients.cms.clone(),
            notifications: notifications.clone(),
            base_url: config.public_base_url.trim_end_matches('/').to_string(),
        });
        let club = Arc::new(ClubServiceImpl::new(
            repos.premium_content.clone(),
            repos.documents.clone(),
            repos.webinars.clone(),
            repos.intake_forms.clone(),
        ));
        let auth_state = Arc::new(AuthState { jwt_utils, profile_repo: repos.profiles.clone() });
        let admin = Arc::new(AdminServiceImpl::new(repos, clients.storage));

        Services { auth, profile, member, inquiry, content, notifications, copy, alerts, club, admin, auth_state }
    }

    pub fn router(&self, config: &AppConfig) -> Router {
        let auth_state = self.auth_state.clone();
        let auth_handler_state = Arc::new(AuthHandlerState {
            service: self.auth.clone(),
            secure_cookies: config.public_base_url.starts_with("https://"),
        });
        let alert_state = Arc::new(AlertHandlerState { alerts: self.alerts.clone(), cron_secret: config.cron_secret.clone() });
        let email_state = Arc::new(EmailHandlerState { notifications: self.notifications.clone(), copy: self.copy.clone() });

        Router::new()
            .merge(auth_router(auth_handler_state))
            .merge(profile_router(self.profile.clone(), auth_state.clone()))
            .merge(member_router(self.member.clone(), auth_state.clone()))
            .merge(inquiry_router(self.inquiry.clone(), auth_state.clone()))
            .merge(content_router(self.content.clone(), auth_state.clone()))
            .merge(alert_router(alert_state, auth_state.clone()))
            .merge(email_router(email_state, auth_state.clone()))
            .merge(club_router(self.club.clone(), auth_state.clone()))
            .merge(admin_router(self.admin.clone(), auth_state))
            .route("/health", get(|| async { "OK" }))
    }
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!("Ignoring invalid CORS origin {}", o);
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::PATCH, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}

/// Optional concern: a missing variable disables it, any other error is fatal.
fn optional<T>(name: &str, loaded: Result<T, ConfigError>) -> Result<Option<T>, ConfigError> {
    match loaded {
        Ok(config) => Ok(Some(config)),
        Err(e) if e.is_missing() => {
            warn!("{} not configured: {}", name, e);
            Ok(None)
        }
        Err(e) => {
            error!("{} configuration invalid: {}", name, e);
            Err(e)
        }
    }
}

async fn build_clients() -> Result<Clients, BoxError> {
    let cms: Option<Arc<dyn ContentClient>> = match optional("CMS", CmsConfig::from_env())? {
        Some(config) => Some(Arc::new(SanityClient::new(config)?)),
        None => None,
    };
    let ai: Option<Arc<dyn TextGenerator>> = match optional("AI", AiConfig::from_env())? {
        Some(config) => Some(Arc::new(OpenAiClient::new(config)?)),
        None => None,
    };
    let mailer: Arc<dyn EmailSender> = match optional("SMTP", EmailConfig::from_env())? {
        Some(config) => Arc::new(SmtpEmailService::new(config)?),
        None => Arc::new(SmtpEmailService::simulation(EmailConfig::default())),
    };
    let storage: Option<Arc<dyn ObjectStorage>> = match optional("Object storage", MinioConfig::from_env())? {
        Some(config) => Some(Arc::new(MinioService::new(config).await?)),
        None => None,
    };
    Ok(Clients { cms, ai, mailer, storage })
}

pub struct App {
    config: AppConfig,
    router: Router,
}

impl App {
    pub async fn new() -> Result<Self, BoxError> {
        let config = AppConfig::from_env();
        let mongo_config = MongoConfig::from_env()?;
        let jwt_config = JwtConfig::from_env()?;

        let db = mongo::connect(&mongo_config).await?;
        mongo::ensure_indexes(&db).await?;
        let repos = Repositories::mongo(&db);

        let clients = build_clients().await?;
        let jwt_utils = Arc::new(JwtTokenUtilsImpl::new(jwt_config));
        let services = Services::new(repos, clients, jwt_utils, &config);

        Self::seed_admin(&services.auth).await;

        let router = services
            .router(&config)
            .layer(cors_layer(&config.allowed_origins))
            .layer(TraceLayer::new_for_http());
        Ok(App { config, router })
    }

    async fn seed_admin(auth: &AuthServiceImpl) {
        let admin_conf = match AdminUserConfig::from_env() {
            Ok(c) => c,
            Err(e) => {
                warn!("Admin user config not loaded: {e}");
                return;
            }
        };
        match auth.seed_admin(&admin_conf).await {
            Ok(true) => info!("First admin user created"),
            Ok(false) => info!("Admin user already exists, role ensured"),
            Err(e) => error!("Failed to create admin user: {e}"),
        }
    }

    pub async fn start(self) -> Result<(), BoxError> {
        let addr = SocketAddr::new(self.config.host.parse()?, self.config.port);
        info!("Server running at http://{}", addr);
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, self.router).await?;
        Ok(())
    }
}
