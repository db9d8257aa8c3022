pub mod admin_handler;
pub mod alert_handler;
pub mod auth_handler;
pub mod club_handler;
pub mod content_handler;
pub mod email_handler;
pub mod inquiry_handler;
pub mod member_handler;
pub mod profile_handler;

use bson::oid::ObjectId;

use crate::util::error::HandlerError;

/// Path segment as an ObjectId, 400 otherwise.
pub fn parse_id(id: &str) -> Result<ObjectId, HandlerError> {
    ObjectId::parse_str(id).map_err(|_| HandlerError::bad_request(format!("Invalid id: {}", id)))
}
