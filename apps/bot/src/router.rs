use std::sync::Arc;

use axum::Router;
use tower_http::trace::{self, TraceLayer};
use tracing::Level;

use shared_config::AppConfig;
use telegram_cell::{webhook_routes, BotDispatcher};

pub fn create_router(config: &AppConfig, dispatcher: Arc<BotDispatcher>) -> Router {
    webhook_routes(dispatcher, config.webhook_secret.clone())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new()
                    .level(Level::INFO))
                .on_response(trace::DefaultOnResponse::new()
                    .level(Level::INFO)),
        )
}
