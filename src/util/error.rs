use axum::{http::StatusCode, response::{IntoResponse, Response}};
use serde::Serialize;

use crate::repository::repository_error::RepositoryError;
use crate::util::ai::AiError;
use crate::util::cms::CmsError;
use crate::util::email::EmailError;
use crate::util::minio::StorageError;

#[derive(Debug, Serialize)]
pub enum HandlerErrorKind {
    NotFound,
    Validation,
    Internal,
    Unauthorized,
    Forbidden,
    Conflict,
    BadRequest,
    ServiceUnavailable,
}

impl std::fmt::Display for HandlerErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            HandlerErrorKind::NotFound => "NotFound",
            HandlerErrorKind::Validation => "Validation",
            HandlerErrorKind::Internal => "Internal",
            HandlerErrorKind::Unauthorized => "Unauthorized",
            HandlerErrorKind::Forbidden => "Forbidden",
            HandlerErrorKind::Conflict => "Conflict",
            HandlerErrorKind::BadRequest => "BadRequest",
            HandlerErrorKind::ServiceUnavailable => "ServiceUnavailable",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Serialize)]
pub struct HandlerError {
    pub error: HandlerErrorKind,
    pub message: String,
    pub details: Option<String>,
}

impl HandlerError {
    pub fn new(error: HandlerErrorKind, message: impl Into<String>) -> Self {
        HandlerError { error, message: message.into(), details: None }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(HandlerErrorKind::BadRequest, message)
    }

    pub fn unauthorized() -> Self {
        Self::new(HandlerErrorKind::Unauthorized, "Authentication required")
    }

    pub fn forbidden() -> Self {
        Self::new(HandlerErrorKind::Forbidden, "Admin access required")
    }

    /// Wrap a `validator` failure as a 400.
    pub fn validation(errors: validator::ValidationErrors) -> Self {
        HandlerError {
            error: HandlerErrorKind::Validation,
            message: "Validation error".to_string(),
            details: Some(errors.to_string()),
        }
    }
}

impl std::fmt::Display for HandlerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error, self.message)
    }
}

impl std::error::Error for HandlerError {}

impl IntoResponse for HandlerError {
    fn into_response(self) -> Response {
        let status = match self.error {
            HandlerErrorKind::NotFound => StatusCode::NOT_FOUND,
            HandlerErrorKind::Validation | HandlerErrorKind::BadRequest => StatusCode::BAD_REQUEST,
            HandlerErrorKind::Unauthorized => StatusCode::UNAUTHORIZED,
            HandlerErrorKind::Forbidden => StatusCode::FORBIDDEN,
            HandlerErrorKind::Conflict => StatusCode::CONFLICT,
            HandlerErrorKind::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            HandlerErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum ServiceError {
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Invalid Input: {0}")]
    InvalidInput(String),
    #[error("Internal Error: {0}")]
    InternalError(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    /// An optional collaborator (CMS, AI, storage) has no configuration.
    #[error("Not configured: {0}")]
    NotConfigured(String),
    /// A configured collaborator failed.
    #[error("Upstream error: {0}")]
    Upstream(String),
}

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound(msg) => ServiceError::NotFound(msg),
            RepositoryError::ValidationError(msg) => ServiceError::InvalidInput(msg),
            RepositoryError::AlreadyExists(msg) => ServiceError::Conflict(msg),
            RepositoryError::DatabaseError(msg)
            | RepositoryError::ConnectionError(msg)
            | RepositoryError::SerializationError(msg) => ServiceError::InternalError(msg),
        }
    }
}

impl From<CmsError> for ServiceError {
    fn from(err: CmsError) -> Self {
        match err {
            CmsError::MissingToken => ServiceError::NotConfigured("Content writes are not configured".to_string()),
            CmsError::Api { status: 404, body } => ServiceError::NotFound(body),
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

impl From<AiError> for ServiceError {
    fn from(err: AiError) -> Self {
        ServiceError::Upstream(err.to_string())
    }
}

impl From<EmailError> for ServiceError {
    fn from(err: EmailError) -> Self {
        match err {
            EmailError::AddressError(msg) => ServiceError::InvalidInput(msg),
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::InvalidArguments(msg) => ServiceError::InvalidInput(msg),
            other => ServiceError::Upstream(other.to_string()),
        }
    }
}

impl From<ServiceError> for HandlerError {
    fn from(err: ServiceError) -> Self {
        let kind = match &err {
            ServiceError::NotFound(_) => HandlerErrorKind::NotFound,
            ServiceError::InvalidInput(_) => HandlerErrorKind::BadRequest,
            ServiceError::Conflict(_) => HandlerErrorKind::Conflict,
            ServiceError::Unauthorized(_) => HandlerErrorKind::Unauthorized,
            ServiceError::Forbidden(_) => HandlerErrorKind::Forbidden,
            ServiceError::NotConfigured(_) => HandlerErrorKind::ServiceUnavailable,
            ServiceError::InternalError(_) | ServiceError::Upstream(_) => HandlerErrorKind::Internal,
        };
        let message = match &err {
            ServiceError::NotFound(m)
            | ServiceError::InvalidInput(m)
            | ServiceError::Conflict(m)
            | ServiceError::Unauthorized(m)
            | ServiceError::Forbidden(m)
            | ServiceError::NotConfigured(m) => m.clone(),
            ServiceError::InternalError(_) | ServiceError::Upstream(_) => "Internal server error".to_string(),
        };
        let details = match &err {
            ServiceError::InternalError(m) | ServiceError::Upstream(m) => Some(m.clone()),
            _ => None,
        };
        HandlerError { error: kind, message, details }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_configured_maps_to_503() {
        let response = HandlerError::from(ServiceError::NotConfigured("CMS".into())).into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err = ServiceError::from(RepositoryError::AlreadyExists("dup".into()));
        assert_eq!(HandlerError::from(err).into_response().status(), StatusCode::CONFLICT);
    }

    #[test]
    fn test_missing_cms_token_is_unavailable() {
        let err = ServiceError::from(CmsError::MissingToken);
        assert!(matches!(err, ServiceError::NotConfigured(_)));
    }

    #[test]
    fn test_bad_recipient_is_bad_request() {
        let err = ServiceError::from(EmailError::AddressError("nope".into()));
        assert_eq!(HandlerError::from(err).into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_internal_message_is_generic() {
        let handler = HandlerError::from(ServiceError::InternalError("socket closed".into()));
        assert_eq!(handler.message, "Internal server error");
        assert_eq!(handler.details.as_deref(), Some("socket closed"));
    }
}
