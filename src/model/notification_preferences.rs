use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::saved_search::AlertFrequency;

/// Per-member email settings, one document per user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NotificationPreferences {
    pub user_id: ObjectId,
    pub property_alerts: bool,
    pub inquiry_responses: bool,
    pub onboarding_emails: bool,
    pub marketing_emails: bool,
    #[serde(default)]
    pub frequency: AlertFrequency,
    pub email_enabled: bool,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl NotificationPreferences {
    /// Settings a member has before saving any.
    pub fn defaults_for(user_id: ObjectId) -> Self {
        NotificationPreferences {
            user_id,
            property_alerts: true,
            inquiry_responses: true,
            onboarding_emails: true,
            marketing_emails: false,
            frequency: AlertFrequency::Daily,
            email_enabled: true,
            updated_at: None,
        }
    }

    pub fn wants_property_alerts(&self) -> bool {
        self.email_enabled && self.property_alerts
    }

    pub fn wants_inquiry_emails(&self) -> bool {
        self.email_enabled && self.inquiry_responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let prefs = NotificationPreferences::defaults_for(ObjectId::new());
        assert!(prefs.wants_property_alerts());
        assert!(prefs.wants_inquiry_emails());
        assert!(prefs.onboarding_emails);
        assert!(!prefs.marketing_emails);
        assert_eq!(prefs.frequency, AlertFrequency::Daily);
    }

    #[test]
    fn test_email_switch_overrides_alerts() {
        let prefs = NotificationPreferences {
            email_enabled: false,
            ..NotificationPreferences::defaults_for(ObjectId::new())
        };
        assert!(!prefs.wants_property_alerts());
    }
}
