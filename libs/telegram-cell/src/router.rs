use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use crate::handlers::{self, WebhookState};
use crate::services::dispatcher::BotDispatcher;

pub fn webhook_routes(dispatcher: Arc<BotDispatcher>, secret: Option<String>) -> Router {
    let state = WebhookState { dispatcher, secret };

    Router::new()
        .route("/", get(|| async { "MedClinic bot is running!" }))
        .route("/health", get(handlers::health))
        .route("/webhook", post(handlers::receive_update))
        .with_state(state)
}
