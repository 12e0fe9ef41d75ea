use std::sync::Arc;

use anyhow::{bail, Context, Result};
use dotenv::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod router;

use appointment_cell::DialogueController;
use directory_cell::SupabaseDirectory;
use shared_config::AppConfig;
use telegram_cell::{BotDispatcher, TelegramClient};

#[tokio::main]
async fn main() -> Result<()> {
    // Loading Env Vars
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting MedClinic appointment bot");

    // Load configuration
    let config = AppConfig::from_env();
    if config.bot_token.is_empty() {
        bail!("BOT_TOKEN must be set");
    }

    let directory = Arc::new(SupabaseDirectory::new(&config));
    let controller = DialogueController::new(directory, config.webapp_url.clone());
    let client = Arc::new(TelegramClient::new(&config));
    let dispatcher = Arc::new(BotDispatcher::new(controller, client.clone()));

    if let Err(e) = dispatcher.register_commands().await {
        warn!("Failed to register bot commands: {}", e);
    }

    if config.is_webhook_mode() {
        let webhook_url = config.webhook_url.as_deref().unwrap_or_default();
        client
            .set_webhook(webhook_url, config.webhook_secret.as_deref())
            .await
            .context("setWebhook failed")?;

        let app = router::create_router(&config, dispatcher);
        let addr = config.listen_socket_addr();
        info!("Receiving updates via webhook on {}", addr);

        let listener = TcpListener::bind(addr).await?;
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
    } else {
        // getUpdates is refused while a webhook is registered.
        client.delete_webhook().await.context("deleteWebhook failed")?;

        tokio::select! {
            _ = dispatcher.run_polling() => {}
            _ = shutdown_signal() => {}
        }
    }

    info!("Bot stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
