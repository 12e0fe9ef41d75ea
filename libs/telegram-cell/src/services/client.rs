use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::error::TelegramError;
use crate::models::{ApiResponse, BotCommand, InlineKeyboardMarkup, Message, Update};

/// Minimal Bot API client. Every method is a JSON POST to `<api>/bot<token>/<method>`.
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

impl TelegramClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: format!(
                "{}/bot{}",
                config.telegram_api_url.trim_end_matches('/'),
                config.bot_token
            ),
        }
    }

    async fn call<T>(&self, method: &str, body: Value) -> Result<T, TelegramError>
    where T: DeserializeOwned {
        let url = format!("{}/{}", self.base_url, method);
        debug!("Calling Bot API method {}", method);

        // Failed calls still carry a JSON envelope with `ok: false`.
        let response: ApiResponse<T> = self.client
            .post(&url)
            .json(&body)
            .send()
            .await?
            .json()
            .await?;

        if !response.ok {
            let description = response.description.unwrap_or_else(|| "unknown error".to_string());
            error!("Bot API error in {}: {}", method, description);
            return Err(TelegramError::Api {
                method: method.to_string(),
                description,
            });
        }

        response.result.ok_or_else(|| TelegramError::MissingResult(method.to_string()))
    }

    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>, TelegramError> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        self.call("getUpdates", body).await
    }

    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<Message, TelegramError> {
        let mut body = json!({
            "chat_id": chat_id,
            "text": text,
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = json!(markup);
        }

        self.call("sendMessage", body).await
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        text: &str,
        reply_markup: Option<&InlineKeyboardMarkup>,
    ) -> Result<(), TelegramError> {
        let mut body = json!({
            "chat_id": chat_id,
            "message_id": message_id,
            "text": text,
        });
        if let Some(markup) = reply_markup {
            body["reply_markup"] = json!(markup);
        }

        // Result is the edited message, or `true` for inline messages.
        match self.call::<Value>("editMessageText", body).await {
            Err(e) if e.is_not_modified() => {
                debug!("Message {} already shows this menu", message_id);
                Ok(())
            }
            other => other.map(|_| ()),
        }
    }

    pub async fn answer_callback_query(
        &self,
        callback_query_id: &str,
        text: Option<&str>,
        show_alert: bool,
    ) -> Result<(), TelegramError> {
        let mut body = json!({
            "callback_query_id": callback_query_id,
            "show_alert": show_alert,
        });
        if let Some(text) = text {
            body["text"] = json!(text);
        }

        self.call::<bool>("answerCallbackQuery", body).await.map(|_| ())
    }

    pub async fn set_my_commands(&self, commands: &[BotCommand]) -> Result<(), TelegramError> {
        self.call::<bool>("setMyCommands", json!({ "commands": commands }))
            .await
            .map(|_| ())
    }

    pub async fn set_webhook(&self, url: &str, secret_token: Option<&str>) -> Result<(), TelegramError> {
        let mut body = json!({
            "url": url,
            "allowed_updates": ["message", "callback_query"],
        });
        if let Some(secret) = secret_token {
            body["secret_token"] = json!(secret);
        }

        self.call::<bool>("setWebhook", body).await.map(|_| ())
    }

    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        self.call::<bool>("deleteWebhook", json!({})).await.map(|_| ())
    }
}
