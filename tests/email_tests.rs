mod common;

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, json_request, TestApp};
use domy_backend::config::EmailConfig;
use domy_backend::model::profile::Role;
use domy_backend::util::email::{EmailError, EmailMessage, EmailSender, SmtpEmailService};

/// Initialize tracing for tests
fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_env_filter("debug").try_init();
}

#[tokio::test]
async fn test_simulation_mode_without_smtp_settings() {
    init_tracing();
    let mailer = SmtpEmailService::simulation(EmailConfig::default());

    let receipt = mailer
        .send_email(
            EmailMessage::new("buyer@example.com", "Nové nemovitosti")
                .with_text_body("Text body".to_string())
                .with_html_body("<p>HTML body</p>".to_string()),
        )
        .await
        .unwrap();

    assert!(mailer.is_simulation());
    assert!(receipt.success);
    assert_eq!(receipt.provider, "simulation");
}

#[tokio::test]
async fn test_invalid_recipient_rejected_before_sending() {
    let mailer = SmtpEmailService::simulation(EmailConfig::default());

    let result = mailer.send_email(EmailMessage::new("buyer.example.com", "Hi")).await;

    assert!(matches!(result, Err(EmailError::AddressError(_))));
}

async fn admin_app() -> (TestApp, String) {
    let app = TestApp::new();
    let admin = app.store.member("admin@example.cz", Role::Admin).await;
    let auth = app.auth(&admin, "admin@example.cz");
    (app, auth)
}

#[tokio::test]
async fn test_send_welcome_email() {
    let (app, auth) = admin_app().await;
    let body = json!({ "email_type": "welcome", "data": { "user_email": "jana@example.cz", "user_name": "Jana" } });

    let response = app.router.clone().oneshot(json_request("POST", "/api/send-email", Some(&auth), body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["ai_used"], json!(false));
    assert_eq!(body["provider"], json!("test"));
    let sent = app.mailer.sent.lock().unwrap().clone();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "jana@example.cz");
    assert!(sent[0].html_body.as_deref().unwrap_or_default().contains("Jana"));
}

#[tokio::test]
async fn test_underscore_email_type_is_accepted() {
    let (app, auth) = admin_app().await;
    let body = json!({
        "email_type": "inquiry_confirmation",
        "data": { "user_email": "jana@example.cz", "property_title": "Villa Chianti", "inquiry_message": "Hello" }
    });

    let response = app.router.clone().oneshot(json_request("POST", "/api/send-email", Some(&auth), body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(app.mailer.count(), 1);
}

#[tokio::test]
async fn test_unknown_email_type_is_bad_request() {
    let (app, auth) = admin_app().await;
    let body = json!({ "email_type": "newsletter", "data": {} });

    let response = app.router.clone().oneshot(json_request("POST", "/api/send-email", Some(&auth), body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], json!("Invalid email type"));
    assert_eq!(app.mailer.count(), 0);
}

#[tokio::test]
async fn test_generated_copy_unavailable_without_ai() {
    let (app, auth) = admin_app().await;
    let body = json!({ "recipient_name": "Jana", "email_type": "welcome" });

    let response = app
        .router
        .clone()
        .oneshot(json_request("POST", "/api/generate-subject", Some(&auth), body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_send_email_requires_admin() {
    let app = TestApp::new();
    let member = app.store.member("jana@example.cz", Role::User).await;
    let auth = app.auth(&member, "jana@example.cz");
    let body = json!({ "email_type": "welcome", "data": { "user_email": "jana@example.cz" } });

    let response = app.router.clone().oneshot(json_request("POST", "/api/send-email", Some(&auth), body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
