use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};
use tracing::info;
use validator::Validate;

use crate::dto::auth_dto::{AuthResponse, LoginRequest, LogoutResponse, RegisterRequest, SessionResponse};
use crate::service::auth_service::{AuthService, AuthServiceImpl};
use crate::util::error::HandlerError;
use crate::util::jwt::TokenPair;
use crate::util::session::{self, ACCESS_COOKIE, REFRESH_COOKIE};

pub struct AuthHandlerState {
    pub service: Arc<AuthServiceImpl>,
    /// Adds `Secure` to session cookies; off for plain-http development.
    pub secure_cookies: bool,
}

impl AuthHandlerState {
    fn session_cookies(&self, tokens: &TokenPair) -> HeaderMap {
        let jwt = &self.service.jwt_utils;
        let mut headers = HeaderMap::new();
        session::append_set_cookie(
            &mut headers,
            &session::session_cookie(ACCESS_COOKIE, &tokens.access_token, jwt.access_ttl_secs(), self.secure_cookies),
        );
        session::append_set_cookie(
            &mut headers,
            &session::session_cookie(REFRESH_COOKIE, &tokens.refresh_token, jwt.refresh_ttl_secs(), self.secure_cookies),
        );
        headers
    }
}

pub async fn register_handler(
    State(state): State<Arc<AuthHandlerState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let session = state.service.register(payload.email, payload.password, payload.name).await?;
    info!(user_id = %session.user.id, "Account registered");
    let headers = state.session_cookies(&session.tokens);
    Ok((StatusCode::CREATED, headers, Json(AuthResponse { success: true, user: session.user })))
}

pub async fn login_handler(
    State(state): State<Arc<AuthHandlerState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, HandlerError> {
    payload.validate().map_err(HandlerError::validation)?;
    let session = state.service.login(payload.email, payload.password).await?;
    let headers = state.session_cookies(&session.tokens);
    Ok((headers, Json(AuthResponse { success: true, user: session.user })))
}

pub async fn logout_handler() -> impl IntoResponse {
    let mut headers = HeaderMap::new();
    session::append_set_cookie(&mut headers, &session::expired_cookie(ACCESS_COOKIE));
    session::append_set_cookie(&mut headers, &session::expired_cookie(REFRESH_COOKIE));
    (headers, Json(LogoutResponse { success: true }))
}

pub async fn session_handler(State(state): State<Arc<AuthHandlerState>>, request_headers: HeaderMap) -> impl IntoResponse {
    let access = session::access_token(&request_headers);
    let refresh = session::read_cookie(&request_headers, REFRESH_COOKIE);
    let resolved = state.service.session(access.as_deref(), refresh.as_deref()).await;

    let headers = match &resolved.refreshed {
        Some(tokens) => state.session_cookies(tokens),
        None => HeaderMap::new(),
    };
    (headers, Json(SessionResponse { authenticated: resolved.user.is_some(), user: resolved.user }))
}
