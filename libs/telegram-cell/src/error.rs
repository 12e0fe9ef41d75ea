use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Bot API call {method} failed: {description}")]
    Api { method: String, description: String },

    #[error("Bot API call {0} returned no result")]
    MissingResult(String),
}

impl TelegramError {
    /// Telegram refuses edits that would not change the message; that is not a failure for us.
    pub fn is_not_modified(&self) -> bool {
        matches!(self, TelegramError::Api { description, .. } if description.contains("message is not modified"))
    }
}
