pub mod admin_service;
pub mod alert_service;
pub mod auth_service;
pub mod club_service;
pub mod content_service;
pub mod copy_service;
pub mod inquiry_service;
pub mod member_service;
pub mod notification_service;
pub mod profile_service;
