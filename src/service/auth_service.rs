use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use tracing::{debug, error, info, instrument, warn};

use crate::config::AdminUserConfig;
use crate::model::profile::{Profile, Role};
use crate::model::user::{User, UserSummary};
use crate::repository::profile_repo::ProfileRepository;
use crate::repository::repository_error::RepositoryError;
use crate::repository::user_repo::UserRepository;
use crate::util::error::ServiceError;
use crate::util::jwt::{Claims, JwtError, JwtTokenUtils, JwtTokenUtilsImpl, TokenPair};
use crate::util::password::{PasswordUtils, PasswordUtilsImpl};

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub user: UserSummary,
    pub tokens: TokenPair,
}

/// Result of resolving the caller's cookies.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<UserSummary>,
    /// Set when the access token had to be renewed from the refresh token.
    pub refreshed: Option<TokenPair>,
}

#[async_trait]
pub trait AuthService: Send + Sync {
    async fn register(&self, email: String, password: String, name: Option<String>) -> Result<AuthSession, ServiceError>;
    async fn login(&self, email: String, password: String) -> Result<AuthSession, ServiceError>;
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, ServiceError>;
    async fn session(&self, access_token: Option<&str>, refresh_token: Option<&str>) -> SessionState;
    /// Create the first admin account. Returns false when it already existed.
    async fn seed_admin(&self, config: &AdminUserConfig) -> Result<bool, ServiceError>;
}

pub struct AuthServiceImpl {
    pub user_repo: Arc<dyn UserRepository>,
    pub profile_repo: Arc<dyn ProfileRepository>,
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
}

impl AuthServiceImpl {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        jwt_utils: Arc<JwtTokenUtilsImpl>,
    ) -> Self {
        Self { user_repo, profile_repo, jwt_utils }
    }

    async fn role_of(&self, user_id: &ObjectId) -> Role {
        match self.profile_repo.find_by_id(user_id).await {
            Ok(Some(profile)) => profile.role,
            Ok(None) => Role::User,
            Err(e) => {
                warn!("Could not load profile for role lookup: {e}");
                Role::User
            }
        }
    }

    async fn issue(&self, user: &User) -> Result<AuthSession, ServiceError> {
        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("Account has no id".to_string()))?;
        let role = self.role_of(&id).await;
        let tokens = self
            .jwt_utils
            .generate_token_pair(&id.to_hex(), &user.email, role.as_str())
            .map_err(|e| ServiceError::InternalError(format!("JWT error: {}", e)))?;
        Ok(AuthSession { user: UserSummary { id: id.to_hex(), email: user.email.clone() }, tokens })
    }

    async fn create_account(&self, email: &str, password: &str, name: Option<String>) -> Result<User, ServiceError> {
        PasswordUtilsImpl::validate_password_strength(password)
            .map_err(|errors| ServiceError::InvalidInput(errors.join("; ")))?;
        let password_hash = PasswordUtilsImpl::hash_password(password)
            .map_err(|e| ServiceError::InternalError(format!("Password hash error: {}", e)))?;

        let user = User {
            id: None,
            email: email.trim().to_string(),
            password_hash,
            name: name.map(|n| n.trim().to_string()).filter(|n| !n.is_empty()),
            created_at: None,
            updated_at: None,
        };
        let inserted = match self.user_repo.insert(user).await {
            Ok(user) => user,
            Err(RepositoryError::AlreadyExists(_)) => {
                warn!("Registration attempted for an existing email");
                return Err(ServiceError::Conflict("Email already registered".to_string()));
            }
            Err(e) => {
                error!("Failed to insert user: {e}");
                return Err(e.into());
            }
        };

        let id = inserted
            .id
            .ok_or_else(|| ServiceError::InternalError("Inserted account has no id".to_string()))?;
        let profile = Profile::new(id, inserted.email.clone(), inserted.bootstrap_name());
        match self.profile_repo.insert(profile).await {
            Ok(_) | Err(RepositoryError::AlreadyExists(_)) => {}
            Err(e) => error!("Account created but profile insert failed: {e}"),
        }
        Ok(inserted)
    }

    fn user_from_claims(claims: &Claims) -> UserSummary {
        UserSummary { id: claims.sub.clone(), email: claims.email.clone() }
    }
}

#[async_trait]
impl AuthService for AuthServiceImpl {
    #[instrument(skip(self, password, name), fields(email = %email))]
    async fn register(&self, email: String, password: String, name: Option<String>) -> Result<AuthSession, ServiceError> {
        info!("Registering new account");
        let user = self.create_account(&email, &password, name).await?;
        let session = self.issue(&user).await?;
        info!("Account registered");
        Ok(session)
    }

    #[instrument(skip(self, password), fields(email = %email))]
    async fn login(&self, email: String, password: String) -> Result<AuthSession, ServiceError> {
        info!("Login attempt");
        let user = match self.user_repo.find_by_email(&email).await {
            Ok(Some(user)) => user,
            Ok(None) => {
                warn!("Login for unknown email");
                return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
            }
            Err(e) => {
                error!("Failed to fetch account for login: {e}");
                return Err(e.into());
            }
        };

        let valid = PasswordUtilsImpl::verify_password(&password, &user.password_hash)
            .map_err(|e| ServiceError::InternalError(format!("Password verify error: {}", e)))?;
        if !valid {
            warn!("Invalid password");
            return Err(ServiceError::Unauthorized("Invalid credentials".to_string()));
        }

        let session = self.issue(&user).await?;
        info!("Logged in");
        Ok(session)
    }

    #[instrument(skip(self, refresh_token))]
    async fn refresh(&self, refresh_token: &str) -> Result<AuthSession, ServiceError> {
        let claims = self
            .jwt_utils
            .validate_refresh_token(refresh_token)
            .map_err(|e| ServiceError::Unauthorized(format!("Invalid refresh token: {}", e)))?;
        let id = ObjectId::parse_str(&claims.sub)
            .map_err(|_| ServiceError::Unauthorized("Invalid refresh token subject".to_string()))?;
        let user = self
            .user_repo
            .find_by_id(&id)
            .await?
            .ok_or_else(|| ServiceError::Unauthorized("Account no longer exists".to_string()))?;
        let session = self.issue(&user).await?;
        info!("Session refreshed");
        Ok(session)
    }

    #[instrument(skip_all)]
    async fn session(&self, access_token: Option<&str>, refresh_token: Option<&str>) -> SessionState {
        if let Some(token) = access_token {
            match self.jwt_utils.validate_access_token(token) {
                Ok(claims) => {
                    return SessionState { user: Some(Self::user_from_claims(&claims)), refreshed: None };
                }
                Err(JwtError::TokenExpired) => debug!("Access token expired, trying refresh token"),
                Err(e) => debug!("Access token rejected: {e}"),
            }
        }

        let Some(refresh_token) = refresh_token else {
            return SessionState::default();
        };
        match self.refresh(refresh_token).await {
            Ok(session) => SessionState { user: Some(session.user), refreshed: Some(session.tokens) },
            Err(e) => {
                debug!("Refresh failed: {e}");
                SessionState::default()
            }
        }
    }

    #[instrument(skip(self, config), fields(email = %config.email))]
    async fn seed_admin(&self, config: &AdminUserConfig) -> Result<bool, ServiceError> {
        let existing = self.user_repo.find_by_email(&config.email).await?;
        let (user, created) = match existing {
            Some(user) => {
                info!("Admin account already exists");
                (user, false)
            }
            None => (self.create_account(&config.email, &config.password, Some(config.name.clone())).await?, true),
        };

        let id = user
            .id
            .ok_or_else(|| ServiceError::InternalError("Admin account has no id".to_string()))?;
        if self.profile_repo.find_by_id(&id).await?.is_none() {
            let profile = Profile::new(id, user.email.clone(), user.bootstrap_name());
            self.profile_repo.insert(profile).await?;
        }
        self.profile_repo.set_role(&id, Role::Admin).await?;
        if created {
            info!("First admin account created");
        }
        Ok(created)
    }
}
