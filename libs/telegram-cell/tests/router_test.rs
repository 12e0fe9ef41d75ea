// libs/telegram-cell/tests/router_test.rs

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;

use appointment_cell::DialogueController;
use directory_cell::StaticDirectory;
use shared_utils::test_utils::TestConfig;
use telegram_cell::*;
use telegram_cell::handlers::SECRET_TOKEN_HEADER;

fn create_test_dispatcher() -> Arc<BotDispatcher> {
    let config = TestConfig::default().to_app_config();
    let controller = DialogueController::new(Arc::new(StaticDirectory::default()), config.webapp_url.clone());
    Arc::new(BotDispatcher::new(controller, Arc::new(TelegramClient::new(&config))))
}

fn update_request(secret: Option<&str>, body: String) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/webhook")
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(SECRET_TOKEN_HEADER, secret);
    }
    builder.body(Body::from(body)).unwrap()
}

fn ignored_update() -> String {
    // Plain text is not a command, so nothing is sent back.
    json!({
        "update_id": 1,
        "message": {
            "message_id": 1,
            "chat": { "id": 42, "type": "private" },
            "date": 1700000000,
            "text": "hello"
        }
    })
    .to_string()
}

#[tokio::test]
async fn test_webhook_rejects_wrong_secret() {
    let app = webhook_routes(create_test_dispatcher(), Some("s3cret".to_string()));

    let response = app.oneshot(update_request(Some("wrong"), ignored_update())).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_accepts_update_with_secret() {
    let app = webhook_routes(create_test_dispatcher(), Some("s3cret".to_string()));

    let response = app.oneshot(update_request(Some("s3cret"), ignored_update())).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_webhook_rejects_malformed_body() {
    let app = webhook_routes(create_test_dispatcher(), None);

    let response = app.oneshot(update_request(None, "not json".to_string())).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_conversations() {
    let app = webhook_routes(create_test_dispatcher(), None);

    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["status"], "ok");
    assert_eq!(json["conversations"], 0);
}
