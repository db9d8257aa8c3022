pub mod admin_dto;
pub mod auth_dto;
pub mod club_dto;
pub mod content_dto;
pub mod email_dto;
pub mod inquiry_dto;
pub mod member_dto;
