pub mod ai;
pub mod cms;
pub mod email;
pub mod email_templates;
pub mod error;
pub mod jwt;
pub mod logger;
pub mod minio;
pub mod password;
pub mod session;
pub mod slug;
