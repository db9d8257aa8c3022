use std::sync::Arc;

use async_trait::async_trait;
use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tracing::{debug, error, info, instrument, warn};

use crate::model::listing::Listing;
use crate::model::notification_preferences::NotificationPreferences;
use crate::model::saved_search::SavedSearch;
use crate::repository::notification_pref_repo::NotificationPreferenceRepository;
use crate::repository::saved_search_repo::SavedSearchRepository;
use crate::repository::user_repo::UserRepository;
use crate::service::notification_service::{NotificationService, PropertyAlert};
use crate::util::cms::ContentClient;
use crate::util::email_templates::AlertItem;

/// Window used for searches that never alerted.
const FIRST_RUN_LOOKBACK_HOURS: i64 = 24;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AlertRunError {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub error: String,
}

impl AlertRunError {
    fn run_level(error: impl Into<String>) -> Self {
        AlertRunError { search_id: None, email: None, error: error.into() }
    }

    fn for_search(id: &ObjectId, error: impl Into<String>) -> Self {
        AlertRunError { search_id: Some(id.to_hex()), email: None, error: error.into() }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AlertRunReport {
    pub success: bool,
    pub emails_sent: u32,
    pub searches_processed: u32,
    pub total_searches: u32,
    pub errors: Vec<AlertRunError>,
    pub timestamp: DateTime<Utc>,
}

impl AlertRunReport {
    fn new(timestamp: DateTime<Utc>) -> Self {
        AlertRunReport {
            success: true,
            emails_sent: 0,
            searches_processed: 0,
            total_searches: 0,
            errors: Vec::new(),
            timestamp,
        }
    }
}

enum Outcome {
    Sent,
    Skipped,
}

#[async_trait]
pub trait AlertService: Send + Sync {
    async fn run(&self) -> AlertRunReport;
    /// One pass with an explicit clock.
    async fn run_at(&self, now: DateTime<Utc>) -> AlertRunReport;
}

pub struct AlertServiceImpl {
    pub saved_search_repo: Arc<dyn SavedSearchRepository>,
    pub preference_repo: Arc<dyn NotificationPreferenceRepository>,
    pub user_repo: Arc<dyn UserRepository>,
    pub cms: Option<Arc<dyn ContentClient>>,
    pub notifications: Arc<dyn NotificationService>,
    pub base_url: String,
}

/// Listings changed after `cutoff` that satisfy the search's filters.
pub fn new_matches<'a>(search: &SavedSearch, listings: &'a [Listing], cutoff: DateTime<Utc>) -> Vec<&'a Listing> {
    listings
        .iter()
        .filter(|l| l.is_available())
        .filter(|l| l.last_changed().is_some_and(|changed| changed > cutoff))
        .filter(|l| search.filters.matches(l))
        .collect()
}

pub fn alert_item(base_url: &str, listing: &Listing) -> AlertItem {
    AlertItem {
        title: listing.display_title(),
        url: listing
            .slug_str()
            .map(|slug| format!("{}/properties/{}", base_url.trim_end_matches('/'), slug)),
        price: listing.amount(),
        city: listing.city_name().map(str::to_string),
    }
}

impl AlertServiceImpl {
    async fn process(
        &self,
        search: &SavedSearch,
        listings: &[Listing],
        now: DateTime<Utc>,
    ) -> Result<Outcome, AlertRunError> {
        let Some(id) = search.id else {
            return Ok(Outcome::Skipped);
        };

        let prefs = self
            .preference_repo
            .find(&search.user_id)
            .await
            .map_err(|e| AlertRunError::for_search(&id, format!("Failed to load preferences: {}", e)))?
            .unwrap_or_else(|| NotificationPreferences::defaults_for(search.user_id));
        if !prefs.wants_property_alerts() {
            debug!(search_id = %id, "Owner opted out of property alerts");
            return Ok(Outcome::Skipped);
        }
        if !prefs.frequency.is_due(search.last_alert_sent, now) {
            debug!(search_id = %id, "Not due yet");
            return Ok(Outcome::Skipped);
        }

        let cutoff = search
            .last_alert_sent
            .unwrap_or(now - Duration::hours(FIRST_RUN_LOOKBACK_HOURS));
        let matches = new_matches(search, listings, cutoff);
        if matches.is_empty() {
            debug!(search_id = %id, "No new matches");
            return Ok(Outcome::Skipped);
        }

        let user = self
            .user_repo
            .find_by_id(&search.user_id)
            .await
            .map_err(|e| AlertRunError::for_search(&id, format!("Failed to load user: {}", e)))?
            .ok_or_else(|| AlertRunError::for_search(&id, "User not found"))?;

        let claimed = self
            .saved_search_repo
            .claim_alert(&id, search.last_alert_sent, now)
            .await
            .map_err(|e| AlertRunError::for_search(&id, format!("Failed to claim search: {}", e)))?;
        if !claimed {
            info!(search_id = %id, "Search claimed by a concurrent run, skipping");
            return Ok(Outcome::Skipped);
        }

        let alert = PropertyAlert {
            to: user.email.clone(),
            user_name: user.bootstrap_name(),
            search_name: search.name.clone(),
            filters: search.filters.clone(),
            items: matches.iter().map(|l| alert_item(&self.base_url, l)).collect(),
        };
        match self.notifications.send_property_alert(alert).await {
            Ok(_) => {
                if let Err(e) = self.saved_search_repo.record_match_count(&id, matches.len() as u32).await {
                    warn!(search_id = %id, "Alert sent but match count not recorded: {e}");
                }
                Ok(Outcome::Sent)
            }
            Err(e) => {
                if let Err(release_err) = self
                    .saved_search_repo
                    .release_alert(&id, now, search.last_alert_sent)
                    .await
                {
                    error!(search_id = %id, "Failed to release claim: {release_err}");
                }
                Err(AlertRunError { search_id: Some(id.to_hex()), email: Some(user.email), error: e.to_string() })
            }
        }
    }
}

#[async_trait]
impl AlertService for AlertServiceImpl {
    async fn run(&self) -> AlertRunReport {
        self.run_at(Utc::now()).await
    }

    #[instrument(skip(self))]
    async fn run_at(&self, now: DateTime<Utc>) -> AlertRunReport {
        info!("Starting property alert run");
        let mut report = AlertRunReport::new(now);

        let searches = match self.saved_search_repo.list_alerting().await {
            Ok(searches) => searches,
            Err(e) => {
                error!("Failed to load saved searches: {e}");
                report.errors.push(AlertRunError::run_level(format!("Failed to load saved searches: {}", e)));
                return report;
            }
        };
        report.total_searches = searches.len() as u32;
        if searches.is_empty() {
            info!("No saved searches with alerts enabled");
            return report;
        }

        let Some(cms) = &self.cms else {
            warn!("Content service not configured, cannot load listings");
            report.errors.push(AlertRunError::run_level("Content service not configured"));
            return report;
        };
        let listings = match cms.available_listings().await {
            Ok(listings) => listings,
            Err(e) => {
                error!("Failed to load listings: {e}");
                report.errors.push(AlertRunError::run_level(format!("Failed to load listings: {}", e)));
                return report;
            }
        };
        info!("Checking {} searches against {} available listings", searches.len(), listings.len());

        for search in &searches {
            report.searches_processed += 1;
            match self.process(search, &listings, now).await {
                Ok(Outcome::Sent) => report.emails_sent += 1,
                Ok(Outcome::Skipped) => {}
                Err(e) => {
                    warn!("Alert for search failed: {}", e.error);
                    report.errors.push(e);
                }
            }
        }

        info!(
            "Alert run finished: {} emails sent, {} searches processed, {} errors",
            report.emails_sent,
            report.searches_processed,
            report.errors.len()
        );
        report
    }
}
