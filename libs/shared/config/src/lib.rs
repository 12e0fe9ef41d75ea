use std::env;
use std::net::SocketAddr;
use tracing::warn;

const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";
const DEFAULT_WEBAPP_URL: &str = "https://example.com/";
const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bot_token: String,
    pub telegram_api_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub webapp_url: String,
    pub webhook_url: Option<String>,
    pub webhook_secret: Option<String>,
    pub listen_addr: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let config = Self {
            bot_token: env::var("BOT_TOKEN")
                .unwrap_or_else(|_| {
                    warn!("BOT_TOKEN not set, using empty value");
                    String::new()
                }),
            telegram_api_url: env::var("TELEGRAM_API_URL")
                .unwrap_or_else(|_| DEFAULT_TELEGRAM_API_URL.to_string()),
            supabase_url: env::var("SUPABASE_URL")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_URL not set, using empty value");
                    String::new()
                }),
            supabase_anon_key: env::var("SUPABASE_ANON_PUBLIC_KEY")
                .unwrap_or_else(|_| {
                    warn!("SUPABASE_ANON_PUBLIC_KEY not set, using empty value");
                    String::new()
                }),
            webapp_url: env::var("WEBAPP_URL")
                .unwrap_or_else(|_| {
                    warn!("WEBAPP_URL not set, using default");
                    DEFAULT_WEBAPP_URL.to_string()
                }),
            webhook_url: env::var("BOT_WEBHOOK_URL").ok().filter(|v| !v.is_empty()),
            webhook_secret: env::var("BOT_WEBHOOK_SECRET").ok().filter(|v| !v.is_empty()),
            listen_addr: env::var("BOT_LISTEN_ADDR")
                .unwrap_or_else(|_| DEFAULT_LISTEN_ADDR.to_string()),
        };

        if !config.is_configured() {
            warn!("Application not fully configured - missing environment variables");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.bot_token.is_empty()
            && !self.supabase_url.is_empty()
            && !self.supabase_anon_key.is_empty()
    }

    pub fn is_webhook_mode(&self) -> bool {
        self.webhook_url.is_some()
    }

    /// Socket address for the webhook listener, falling back to the default on a bad value.
    pub fn listen_socket_addr(&self) -> SocketAddr {
        self.listen_addr.parse().unwrap_or_else(|_| {
            warn!("BOT_LISTEN_ADDR '{}' is not a socket address, using default", self.listen_addr);
            SocketAddr::from(([0, 0, 0, 0], 3000))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> AppConfig {
        AppConfig {
            bot_token: "123:abc".to_string(),
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "anon".to_string(),
            webapp_url: DEFAULT_WEBAPP_URL.to_string(),
            webhook_url: None,
            webhook_secret: None,
            listen_addr: "127.0.0.1:8080".to_string(),
        }
    }

    #[test]
    fn test_is_configured_requires_token_and_supabase() {
        let mut cfg = config();
        assert!(cfg.is_configured());

        cfg.bot_token.clear();
        assert!(!cfg.is_configured());
    }

    #[test]
    fn test_webhook_mode_and_listen_addr() {
        let mut cfg = config();
        assert!(!cfg.is_webhook_mode());
        assert_eq!(cfg.listen_socket_addr(), SocketAddr::from(([127, 0, 0, 1], 8080)));

        cfg.webhook_url = Some("https://bot.example.com/webhook".to_string());
        cfg.listen_addr = "not-an-address".to_string();
        assert!(cfg.is_webhook_mode());
        assert_eq!(cfg.listen_socket_addr().port(), 3000);
    }
}
