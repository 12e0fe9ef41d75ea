use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use serde_json::{json, Value};
use tracing::debug;

use shared_models::error::AppError;

use crate::models::Update;
use crate::services::dispatcher::BotDispatcher;

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

#[derive(Clone)]
pub struct WebhookState {
    pub dispatcher: Arc<BotDispatcher>,
    pub secret: Option<String>,
}

pub async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, AppError> {
    if let Some(expected) = &state.secret {
        let provided = headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|value| value.to_str().ok());
        if provided != Some(expected.as_str()) {
            return Err(AppError::Auth("Invalid webhook secret".to_string()));
        }
    }

    let update: Update = serde_json::from_slice(&body)
        .map_err(|e| AppError::BadRequest(format!("Invalid update: {}", e)))?;
    debug!("Webhook delivered update {}", update.update_id);

    // Telegram only needs the acknowledgement; handling continues in the background.
    let dispatcher = state.dispatcher.clone();
    tokio::spawn(async move {
        dispatcher.handle_update(update).await;
    });

    Ok(StatusCode::OK)
}

pub async fn health(State(state): State<WebhookState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "conversations": state.dispatcher.store().len().await,
    }))
}
