// libs/telegram-cell/tests/client_test.rs

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::{MockServer, Mock, ResponseTemplate};
use wiremock::matchers::{method, path, body_partial_json};

use appointment_cell::{Action, Button, Menu};
use shared_utils::test_utils::TestConfig;
use telegram_cell::*;
use telegram_cell::services::render::keyboard;

fn bot_path(method_name: &str) -> String {
    format!("/bot{}/{}", TestConfig::default().bot_token, method_name)
}

fn message_json(chat_id: i64, message_id: i64, text: &str) -> serde_json::Value {
    json!({
        "message_id": message_id,
        "chat": { "id": chat_id, "type": "private" },
        "date": 1700000000,
        "text": text,
    })
}

async fn client_for(mock_server: &MockServer) -> TelegramClient {
    TelegramClient::new(&TestConfig::with_mock_server(&mock_server.uri()).to_app_config())
}

#[tokio::test]
async fn test_send_message_with_keyboard() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(bot_path("sendMessage")))
        .and(body_partial_json(json!({
            "chat_id": 42,
            "text": "How would you like to book?",
            "reply_markup": {
                "inline_keyboard": [[{ "text": "Choose a doctor", "callback_data": "choose_doctor" }]]
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": message_json(42, 10, "How would you like to book?"),
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let menu = Menu::new(
        "How would you like to book?",
        vec![vec![Button::callback("Choose a doctor", Action::ChooseDoctor)]],
    );

    let message = client
        .send_message(42, &menu.text, keyboard(&menu).as_ref())
        .await
        .expect("sendMessage should succeed");
    assert_eq!(message.message_id, 10);
}

#[tokio::test]
async fn test_edit_not_modified_is_success() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(bot_path("editMessageText")))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "ok": false,
            "error_code": 400,
            "description": "Bad Request: message is not modified: specified new message content and reply markup are exactly the same",
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    assert!(client.edit_message_text(42, 10, "Same", None).await.is_ok());
}

#[tokio::test]
async fn test_api_error_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(bot_path("sendMessage")))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user",
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let result = client.send_message(42, "Hello", None).await;

    assert_matches!(
        result,
        Err(TelegramError::Api { method, description }) if method == "sendMessage" && description.contains("blocked")
    );
}

#[tokio::test]
async fn test_alert_answers_callback_query() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(bot_path("answerCallbackQuery")))
        .and(body_partial_json(json!({
            "callback_query_id": "cb-1",
            "text": "Unknown specialization",
            "show_alert": true,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true, "result": true })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = std::sync::Arc::new(client_for(&mock_server).await);
    let target = ChatTarget::for_callback(client, 42, 10, "cb-1");

    target.alert("Unknown specialization").await.unwrap();
}

#[tokio::test]
async fn test_get_updates_decodes_commands_and_callbacks() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(bot_path("getUpdates")))
        .and(body_partial_json(json!({ "offset": 100, "timeout": 30 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                {
                    "update_id": 100,
                    "message": {
                        "message_id": 1,
                        "chat": { "id": 42, "type": "private" },
                        "from": { "id": 7001, "is_bot": false, "first_name": "Olga" },
                        "date": 1700000000,
                        "text": "/start"
                    }
                },
                {
                    "update_id": 101,
                    "callback_query": {
                        "id": "cb-9",
                        "from": { "id": 7001, "is_bot": false, "first_name": "Olga" },
                        "chat_instance": "abc",
                        "message": message_json(42, 2, "Choose a specialist"),
                        "data": "spec_therapist"
                    }
                }
            ]
        })))
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server).await;
    let updates = client.get_updates(Some(100), 30).await.unwrap();
    assert_eq!(updates.len(), 2);

    let command = Inbound::from_update(&updates[0]).unwrap();
    assert_eq!(command.conversation_id, 42);
    assert_eq!(command.user_id, 7001);
    assert_eq!(command.event, InboundEvent::Command(appointment_cell::Command::Start));

    let callback = Inbound::from_update(&updates[1]).unwrap();
    assert_eq!(
        callback.event,
        InboundEvent::Callback {
            query_id: "cb-9".to_string(),
            message_id: 2,
            data: "spec_therapist".to_string(),
        }
    );
}
