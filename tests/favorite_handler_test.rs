mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, empty_request, json_request, TestApp};
use domy_backend::model::profile::Role;

#[tokio::test]
async fn test_toggle_twice_adds_then_removes() {
    let app = TestApp::new();
    let user = app.store.member("jana@example.cz", Role::User).await;
    let auth = app.auth(&user, "jana@example.cz");
    let body = json!({ "listing_id": "villa-lucca" });

    let first = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/favorites/toggle", Some(&auth), body.clone()))
        .await
        .unwrap();
    assert_eq!(first.status(), StatusCode::OK);
    let first = body_json(first).await;
    assert_eq!(first["favorited"], json!(true));
    assert_eq!(first["favorite"]["listing_id"], json!("villa-lucca"));

    let list = app.router.clone().oneshot(empty_request("GET", "/api/favorites", Some(&auth))).await.unwrap();
    assert_eq!(body_json(list).await.as_array().map(Vec::len), Some(1));

    let second = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/favorites/toggle", Some(&auth), body))
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    let second = body_json(second).await;
    assert_eq!(second["favorited"], json!(false));
    assert!(second.get("favorite").is_none());

    let list = app.router.clone().oneshot(empty_request("GET", "/api/favorites", Some(&auth))).await.unwrap();
    assert_eq!(body_json(list).await, json!([]));
}

#[tokio::test]
async fn test_favorites_require_session() {
    let app = TestApp::new();

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/favorites/toggle", None, json!({ "listing_id": "x" })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_removing_someone_elses_favorite_is_not_found() {
    let app = TestApp::new();
    let owner = app.store.member("owner@example.cz", Role::User).await;
    let other = app.store.member("other@example.cz", Role::User).await;
    let owner_auth = app.auth(&owner, "owner@example.cz");
    let other_auth = app.auth(&other, "other@example.cz");

    let created = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/favorites/toggle", Some(&owner_auth), json!({ "listing_id": "l1" })))
        .await
        .unwrap();
    let id = body_json(created).await["favorite"]["_id"]["$oid"].as_str().unwrap().to_string();

    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/favorites/{}", id), Some(&other_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .router
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/favorites/{}", id), Some(&owner_auth)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_saved_search_lifecycle() {
    let app = TestApp::new();
    let user = app.store.member("jana@example.cz", Role::User).await;
    let auth = app.auth(&user, "jana@example.cz");

    let created = app
        .router
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/saved-searches",
            Some(&auth),
            json!({ "name": "Tuscany villas", "filters": { "type": "villa", "city": "lucca", "price_max": 400000 } }),
        ))
        .await
        .unwrap();
    assert_eq!(created.status(), StatusCode::CREATED);
    let created = body_json(created).await;
    assert_eq!(created["alerts_enabled"], json!(true));
    assert_eq!(created["filters"]["type"], json!("villa"));

    let prefs = app
        .router
        .clone()
        .oneshot(empty_request("GET", "/api/notification-preferences", Some(&auth)))
        .await
        .unwrap();
    let prefs = body_json(prefs).await;
    assert_eq!(prefs["property_alerts"], json!(true));
    assert_eq!(prefs["frequency"], json!("daily"));
}
