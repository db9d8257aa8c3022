mod common;

use std::sync::Arc;

use bson::oid::ObjectId;
use chrono::{DateTime, Duration, Utc};
use serde_json::json;

use common::{FakeCms, RecordingMailer, Store};
use domy_backend::model::listing::Listing;
use domy_backend::model::notification_preferences::NotificationPreferences;
use domy_backend::model::profile::Role;
use domy_backend::model::saved_search::{AlertFrequency, SavedSearch, SearchFilters};
use domy_backend::repository::notification_pref_repo::NotificationPreferenceRepository;
use domy_backend::repository::saved_search_repo::SavedSearchRepository;
use domy_backend::service::alert_service::{AlertService, AlertServiceImpl};
use domy_backend::service::notification_service::NotificationServiceImpl;

fn listing(id: &str, city: &str, bedrooms: u32, updated: DateTime<Utc>) -> Listing {
    serde_json::from_value(json!({
        "_id": id,
        "title": { "en": format!("Casa {}", id) },
        "slug": { "current": format!("casa-{}", id) },
        "propertyType": "house",
        "status": "available",
        "price": { "amount": 180000.0, "currency": "EUR" },
        "specifications": { "bedrooms": bedrooms, "bathrooms": 1 },
        "location": { "city": { "name": { "en": city }, "slug": { "current": city.to_lowercase() } } },
        "_updatedAt": updated.to_rfc3339(),
    }))
    .unwrap()
}

struct Harness {
    store: Store,
    mailer: Arc<RecordingMailer>,
    alerts: AlertServiceImpl,
}

fn harness(listings: Vec<Listing>, mailer: RecordingMailer) -> Harness {
    let store = Store::default();
    let mailer = Arc::new(mailer);
    let notifications = Arc::new(NotificationServiceImpl::new(
        mailer.clone(),
        None,
        "https://domy.example".to_string(),
    ));
    let alerts = AlertServiceImpl {
        saved_search_repo: store.saved_searches.clone(),
        preference_repo: store.preferences.clone(),
        user_repo: store.users.clone(),
        cms: Some(Arc::new(FakeCms { listings })),
        notifications,
        base_url: "https://domy.example".to_string(),
    };
    Harness { store, mailer, alerts }
}

async fn saved_search(store: &Store, user_id: ObjectId, last_alert_sent: Option<DateTime<Utc>>) -> ObjectId {
    let search = SavedSearch {
        id: None,
        user_id,
        name: "Lucca houses".to_string(),
        filters: SearchFilters { city: Some("lucca".to_string()), bedrooms: Some(2), ..Default::default() },
        alerts_enabled: true,
        last_alert_sent,
        last_match_count: None,
        created_at: None,
        updated_at: None,
    };
    store.saved_searches.insert(search).await.unwrap().id.unwrap()
}

#[tokio::test]
async fn test_daily_search_alerted_23_hours_ago_is_skipped() {
    let now = Utc::now();
    let h = harness(vec![listing("a", "Lucca", 3, now - Duration::hours(1))], RecordingMailer::default());
    let user = h.store.member("jana@example.cz", Role::User).await;
    let last = now - Duration::hours(23);
    let id = saved_search(&h.store, user, Some(last)).await;

    let report = h.alerts.run_at(now).await;

    assert!(report.success);
    assert_eq!(report.emails_sent, 0);
    assert_eq!(report.total_searches, 1);
    assert_eq!(report.searches_processed, 1);
    assert_eq!(h.mailer.count(), 0);
    assert_eq!(h.store.saved_searches.get(&id).unwrap().last_alert_sent, Some(last));
}

#[tokio::test]
async fn test_daily_search_alerted_25_hours_ago_is_sent() {
    let now = Utc::now();
    let h = harness(
        vec![
            listing("new", "Lucca", 3, now - Duration::hours(2)),
            listing("stale", "Lucca", 3, now - Duration::hours(40)),
            listing("elsewhere", "Pisa", 3, now - Duration::hours(2)),
        ],
        RecordingMailer::default(),
    );
    let user = h.store.member("jana@example.cz", Role::User).await;
    let id = saved_search(&h.store, user, Some(now - Duration::hours(25))).await;

    let report = h.alerts.run_at(now).await;

    assert_eq!(report.emails_sent, 1);
    assert!(report.errors.is_empty());
    let sent = h.mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jana@example.cz");

    let stored = h.store.saved_searches.get(&id).unwrap();
    assert_eq!(stored.last_alert_sent, Some(now));
    assert_eq!(stored.last_match_count, Some(1));
}

#[tokio::test]
async fn test_opted_out_member_gets_nothing() {
    let now = Utc::now();
    let h = harness(vec![listing("a", "Lucca", 3, now - Duration::hours(1))], RecordingMailer::default());
    let user = h.store.member("jana@example.cz", Role::User).await;
    saved_search(&h.store, user, None).await;
    let prefs = NotificationPreferences { property_alerts: false, ..NotificationPreferences::defaults_for(user) };
    h.store.preferences.upsert(prefs).await.unwrap();

    let report = h.alerts.run_at(now).await;

    assert_eq!(report.emails_sent, 0);
    assert_eq!(h.mailer.count(), 0);
}

#[tokio::test]
async fn test_weekly_frequency_holds_back_daily_window() {
    let now = Utc::now();
    let h = harness(vec![listing("a", "Lucca", 3, now - Duration::hours(1))], RecordingMailer::default());
    let user = h.store.member("jana@example.cz", Role::User).await;
    saved_search(&h.store, user, Some(now - Duration::hours(48))).await;
    let prefs = NotificationPreferences { frequency: AlertFrequency::Weekly, ..NotificationPreferences::defaults_for(user) };
    h.store.preferences.upsert(prefs).await.unwrap();

    assert_eq!(h.alerts.run_at(now).await.emails_sent, 0);
}

#[tokio::test]
async fn test_failed_send_is_reported_and_claim_released() {
    let now = Utc::now();
    let h = harness(vec![listing("a", "Lucca", 3, now - Duration::hours(1))], RecordingMailer::failing());
    let user = h.store.member("jana@example.cz", Role::User).await;
    let last = now - Duration::hours(30);
    let id = saved_search(&h.store, user, Some(last)).await;

    let report = h.alerts.run_at(now).await;

    assert!(report.success);
    assert_eq!(report.emails_sent, 0);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].email.as_deref(), Some("jana@example.cz"));
    assert_eq!(report.errors[0].search_id, Some(id.to_hex()));
    // Next run retries the same window.
    assert_eq!(h.store.saved_searches.get(&id).unwrap().last_alert_sent, Some(last));
}

#[tokio::test]
async fn test_overlapping_runs_send_one_email() {
    let now = Utc::now();
    let h = harness(vec![listing("a", "Lucca", 3, now - Duration::hours(1))], RecordingMailer::default());
    let user = h.store.member("jana@example.cz", Role::User).await;
    saved_search(&h.store, user, None).await;

    let (first, second) = tokio::join!(h.alerts.run_at(now), h.alerts.run_at(now));

    assert_eq!(first.emails_sent + second.emails_sent, 1);
    assert_eq!(h.mailer.count(), 1);
}

#[tokio::test]
async fn test_missing_cms_is_a_run_level_error() {
    let mut h = harness(Vec::new(), RecordingMailer::default());
    h.alerts.cms = None;
    let user = h.store.member("jana@example.cz", Role::User).await;
    saved_search(&h.store, user, None).await;

    let report = h.alerts.run().await;

    assert!(report.success);
    assert_eq!(report.searches_processed, 0);
    assert_eq!(report.errors.len(), 1);
    assert!(report.errors[0].search_id.is_none());
}
