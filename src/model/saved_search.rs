use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::model::listing::Listing;

/// Criteria a member saved. Every present field must hold for a listing to match.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SearchFilters {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bedrooms: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bathrooms: Option<u32>,
}

impl SearchFilters {
    /// A listing lacking the attribute a present filter tests does not match.
    pub fn matches(&self, listing: &Listing) -> bool {
        if let Some(wanted) = &self.property_type {
            if listing.property_type.as_deref() != Some(wanted.as_str()) {
                return false;
            }
        }

        if let Some(city) = &self.city {
            let by_slug = listing
                .city_slug()
                .is_some_and(|s| s.eq_ignore_ascii_case(city));
            let by_name = listing
                .city_name()
                .is_some_and(|n| n.eq_ignore_ascii_case(city));
            if !by_slug && !by_name {
                return false;
            }
        }

        if self.price_min.is_some() || self.price_max.is_some() {
            let Some(amount) = listing.amount() else {
                return false;
            };
            if self.price_min.is_some_and(|min| amount < min) {
                return false;
            }
            if self.price_max.is_some_and(|max| amount > max) {
                return false;
            }
        }

        if let Some(min) = self.bedrooms {
            if !listing.bedrooms().is_some_and(|b| b >= min) {
                return false;
            }
        }

        if let Some(min) = self.bathrooms {
            if !listing.bathrooms().is_some_and(|b| b >= min) {
                return false;
            }
        }

        true
    }

    pub fn is_empty(&self) -> bool {
        *self == SearchFilters::default()
    }
}

/// How often a member wants property alerts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum AlertFrequency {
    Instant,
    #[default]
    Daily,
    Weekly,
}

impl AlertFrequency {
    pub fn min_interval(&self) -> Duration {
        match self {
            AlertFrequency::Instant => Duration::hours(1),
            AlertFrequency::Daily => Duration::hours(24),
            AlertFrequency::Weekly => Duration::hours(168),
        }
    }

    /// A search that never alerted is always due.
    pub fn is_due(&self, last_alert_sent: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
        match last_alert_sent {
            None => true,
            Some(last) => now - last >= self.min_interval(),
        }
    }

    /// Lenient parse; anything unrecognised is treated as daily.
    pub fn parse_or_default(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "instant" => AlertFrequency::Instant,
            "weekly" => AlertFrequency::Weekly,
            _ => AlertFrequency::Daily,
        }
    }
}

impl From<String> for AlertFrequency {
    fn from(value: String) -> Self {
        AlertFrequency::parse_or_default(&value)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedSearch {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub user_id: ObjectId,
    pub name: String,
    #[serde(default)]
    pub filters: SearchFilters,
    #[serde(default = "default_true")]
    pub alerts_enabled: bool,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub last_alert_sent: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_match_count: Option<u32>,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, with = "crate::model::bson_date::optional")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}
