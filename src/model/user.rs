use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sign-in account. The member-facing record is the `Profile` sharing its id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub email: String,
    pub password_hash: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Account as returned to clients.
#[derive(Debug, Clone, Serialize)]
pub struct UserSummary {
    pub id: String,
    pub email: String,
}

impl User {
    /// Name used on first profile creation: account name, else the email
    /// local part, else "User".
    pub fn bootstrap_name(&self) -> String {
        if let Some(name) = self.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        self.email
            .split('@')
            .next()
            .filter(|local| !local.is_empty())
            .unwrap_or("User")
            .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: &str, name: Option<&str>) -> User {
        User {
            id: None,
            email: email.to_string(),
            password_hash: String::new(),
            name: name.map(str::to_string),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_bootstrap_name() {
        assert_eq!(user("jana@x.cz", Some("Jana Nováková")).bootstrap_name(), "Jana Nováková");
        assert_eq!(user("jana@x.cz", Some("  ")).bootstrap_name(), "jana");
        assert_eq!(user("@x.cz", None).bootstrap_name(), "User");
    }
}
