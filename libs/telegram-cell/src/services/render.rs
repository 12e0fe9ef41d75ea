use std::sync::Arc;

use async_trait::async_trait;

use appointment_cell::{ButtonTarget, Menu};

use crate::error::TelegramError;
use crate::models::{InlineKeyboardButton, InlineKeyboardMarkup, WebAppInfo};
use crate::services::client::TelegramClient;

/// Where a menu ends up. The caller picks `send` or `edit`; the target never
/// inspects what kind of update it came from.
#[async_trait]
pub trait RenderTarget: Send + Sync {
    /// Post the menu as a new message.
    async fn send(&self, menu: &Menu) -> Result<(), TelegramError>;

    /// Replace the message that carried the pressed button.
    async fn edit(&self, menu: &Menu) -> Result<(), TelegramError>;

    /// Popup alert for a button press.
    async fn alert(&self, text: &str) -> Result<(), TelegramError>;

    /// Stop the client's loading indicator for a button press.
    async fn acknowledge(&self) -> Result<(), TelegramError>;
}

pub fn keyboard(menu: &Menu) -> Option<InlineKeyboardMarkup> {
    if menu.rows.is_empty() {
        return None;
    }

    let inline_keyboard = menu
        .rows
        .iter()
        .map(|row| {
            row.iter()
                .map(|button| match &button.target {
                    ButtonTarget::Callback(action) => InlineKeyboardButton {
                        text: button.label.clone(),
                        callback_data: Some(action.to_string()),
                        web_app: None,
                    },
                    ButtonTarget::WebApp(url) => InlineKeyboardButton {
                        text: button.label.clone(),
                        callback_data: None,
                        web_app: Some(WebAppInfo { url: url.clone() }),
                    },
                })
                .collect()
        })
        .collect();

    Some(InlineKeyboardMarkup { inline_keyboard })
}

/// A chat, optionally with the message and callback query an action came from.
pub struct ChatTarget {
    client: Arc<TelegramClient>,
    chat_id: i64,
    message_id: Option<i64>,
    callback_query_id: Option<String>,
}

impl ChatTarget {
    pub fn new(client: Arc<TelegramClient>, chat_id: i64) -> Self {
        Self {
            client,
            chat_id,
            message_id: None,
            callback_query_id: None,
        }
    }

    pub fn for_callback(
        client: Arc<TelegramClient>,
        chat_id: i64,
        message_id: i64,
        callback_query_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            chat_id,
            message_id: Some(message_id),
            callback_query_id: Some(callback_query_id.into()),
        }
    }
}

#[async_trait]
impl RenderTarget for ChatTarget {
    async fn send(&self, menu: &Menu) -> Result<(), TelegramError> {
        self.client
            .send_message(self.chat_id, &menu.text, keyboard(menu).as_ref())
            .await
            .map(|_| ())
    }

    async fn edit(&self, menu: &Menu) -> Result<(), TelegramError> {
        match self.message_id {
            Some(message_id) => {
                self.client
                    .edit_message_text(self.chat_id, message_id, &menu.text, keyboard(menu).as_ref())
                    .await
            }
            None => self.send(menu).await,
        }
    }

    async fn alert(&self, text: &str) -> Result<(), TelegramError> {
        match &self.callback_query_id {
            Some(id) => self.client.answer_callback_query(id, Some(text), true).await,
            None => self.client.send_message(self.chat_id, text, None).await.map(|_| ()),
        }
    }

    async fn acknowledge(&self) -> Result<(), TelegramError> {
        match &self.callback_query_id {
            Some(id) => self.client.answer_callback_query(id, None, false).await,
            None => Ok(()),
        }
    }
}
