pub mod bson_date;
pub mod user;
pub mod profile;
pub mod listing;
pub mod saved_search;
pub mod favorite;
pub mod notification_preferences;
pub mod inquiry;
pub mod intake_form;
pub mod premium_content;
pub mod document;
pub mod webinar;
