pub mod admin_router;
pub mod alert_router;
pub mod auth_router;
pub mod club_router;
pub mod content_router;
pub mod email_router;
pub mod inquiry_router;
pub mod member_router;
pub mod profile_router;
