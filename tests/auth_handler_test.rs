mod common;

use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, json_request, TestApp};
use domy_backend::model::profile::Role;
use domy_backend::repository::profile_repo::ProfileRepository;

fn set_cookies(response: &axum::http::Response<axum::body::Body>) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .map(str::to_string)
        .collect()
}

fn cookie_value(cookies: &[String], name: &str) -> Option<String> {
    cookies
        .iter()
        .filter_map(|c| c.split(';').next())
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
}

#[tokio::test]
async fn test_register_creates_account_profile_and_cookies() {
    let app = TestApp::new();
    let body = json!({ "email": "jana@example.cz", "password": "toskana2024", "name": "Jana" });

    let response = app.router.clone().oneshot(json_request("POST", "/api/auth/register", None, body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let cookies = set_cookies(&response);
    assert!(cookie_value(&cookies, "session").is_some());
    assert!(cookie_value(&cookies, "refresh_token").is_some());
    assert!(cookies.iter().all(|c| c.contains("HttpOnly")));

    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    let id = bson::oid::ObjectId::parse_str(body["user"]["id"].as_str().unwrap()).unwrap();
    let profile = app.store.profiles.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(profile.name, "Jana");
    assert_eq!(profile.role, Role::User);
}

#[tokio::test]
async fn test_duplicate_email_conflicts() {
    let app = TestApp::new();
    let body = json!({ "email": "jana@example.cz", "password": "toskana2024" });

    let first = app.router.clone().oneshot(json_request("POST", "/api/auth/register", None, body.clone())).await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    let second = app.router.clone().oneshot(json_request("POST", "/api/auth/register", None, body)).await.unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_weak_password_rejected() {
    let app = TestApp::new();
    let body = json!({ "email": "jana@example.cz", "password": "onlyletters" });

    let response = app.router.clone().oneshot(json_request("POST", "/api/auth/register", None, body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_and_session() {
    let app = TestApp::new();
    let credentials = json!({ "email": "jana@example.cz", "password": "toskana2024" });
    app.router
        .clone()
        .oneshot(json_request("POST", "/api/auth/register", None, credentials.clone()))
        .await
        .unwrap();

    let wrong = json!({ "email": "jana@example.cz", "password": "toskana2025" });
    let response = app.router.clone().oneshot(json_request("POST", "/api/auth/login", None, wrong)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.router.clone().oneshot(json_request("POST", "/api/auth/login", None, credentials)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let session = cookie_value(&set_cookies(&response), "session").unwrap();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/auth/session")
        .header(header::COOKIE, format!("session={}", session))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    let body = body_json(response).await;
    assert_eq!(body["authenticated"], json!(true));
    assert_eq!(body["user"]["email"], json!("jana@example.cz"));
}

#[tokio::test]
async fn test_session_refreshes_from_refresh_cookie() {
    let app = TestApp::new();
    let body = json!({ "email": "jana@example.cz", "password": "toskana2024" });
    let response = app.router.clone().oneshot(json_request("POST", "/api/auth/register", None, body)).await.unwrap();
    let refresh = cookie_value(&set_cookies(&response), "refresh_token").unwrap();

    let request = axum::http::Request::builder()
        .method("GET")
        .uri("/api/auth/session")
        .header(header::COOKIE, format!("session=expired.or.garbage; refresh_token={}", refresh))
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();

    let cookies = set_cookies(&response);
    assert!(cookie_value(&cookies, "session").is_some());
    assert_eq!(body_json(response).await["authenticated"], json!(true));
}

#[tokio::test]
async fn test_anonymous_session_and_logout() {
    let app = TestApp::new();

    let request = axum::http::Request::builder()
        .uri("/api/auth/session")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(body_json(response).await, json!({ "authenticated": false, "user": null }));

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/auth/logout", None, json!({})))
        .await
        .unwrap();
    let cookies = set_cookies(&response);
    assert_eq!(cookies.len(), 2);
    assert!(cookies.iter().all(|c| c.contains("Max-Age=0")));
}
