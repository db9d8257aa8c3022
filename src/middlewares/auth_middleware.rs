use std::sync::Arc;

use axum::{body::Body, extract::State, http::Request, middleware::Next, response::Response};
use bson::oid::ObjectId;
use tracing::{debug, error, warn};

use crate::repository::profile_repo::ProfileRepository;
use crate::service::inquiry_service::Requester;
use crate::util::error::HandlerError;
use crate::util::jwt::{Claims, JwtTokenUtils, JwtTokenUtilsImpl};
use crate::util::session;

pub struct AuthState {
    pub jwt_utils: Arc<JwtTokenUtilsImpl>,
    pub profile_repo: Arc<dyn ProfileRepository>,
}

/// Signed-in account, attached to request extensions by the auth layers.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: ObjectId,
    pub email: String,
    pub claims: Claims,
}

impl CurrentUser {
    pub fn requester(&self) -> Requester {
        Requester { id: self.id, email: self.email.clone() }
    }
}

/// Set by `optional_user` on public routes that behave differently with a session.
#[derive(Debug, Clone)]
pub struct SessionUser(pub Option<CurrentUser>);

fn current_user(state: &AuthState, req: &Request<Body>) -> Option<CurrentUser> {
    let token = session::access_token(req.headers())?;
    let claims = match state.jwt_utils.validate_access_token(&token) {
        Ok(claims) => claims,
        Err(e) => {
            debug!("Rejected access token: {e}");
            return None;
        }
    };
    let id = ObjectId::parse_str(&claims.sub).ok()?;
    Some(CurrentUser { id, email: claims.email.clone(), claims })
}

pub async fn require_user(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let user = current_user(&state, &req).ok_or_else(HandlerError::unauthorized)?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

pub async fn optional_user(State(state): State<Arc<AuthState>>, mut req: Request<Body>, next: Next) -> Response {
    let user = current_user(&state, &req);
    req.extensions_mut().insert(SessionUser(user));
    next.run(req).await
}

/// Admin gate. The role comes from the stored profile, so a demotion takes
/// effect on the next request even while the token is still valid.
pub async fn admin_auth(
    State(state): State<Arc<AuthState>>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, HandlerError> {
    let user = current_user(&state, &req).ok_or_else(HandlerError::unauthorized)?;

    let profile = match state.profile_repo.find_by_id(&user.id).await {
        Ok(profile) => profile,
        Err(e) => {
            error!("Failed to load profile for admin check: {e}");
            return Err(HandlerError::from(crate::util::error::ServiceError::from(e)));
        }
    };
    if !profile.is_some_and(|p| p.is_admin()) {
        warn!(user_id = %user.id, "Admin route refused");
        return Err(HandlerError::forbidden());
    }

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}
