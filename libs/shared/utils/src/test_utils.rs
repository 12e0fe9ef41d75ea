use serde_json::{json, Value};

use shared_config::AppConfig;

pub struct TestConfig {
    pub bot_token: String,
    pub telegram_api_url: String,
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub webapp_url: String,
    pub webhook_secret: Option<String>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            bot_token: "123456:test-bot-token".to_string(),
            telegram_api_url: "http://localhost:8081".to_string(),
            supabase_url: "http://localhost:54321".to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            webapp_url: "https://schedule.example.com/".to_string(),
            webhook_secret: None,
        }
    }
}

impl TestConfig {
    /// Point both the directory and the Bot API at the same mock server.
    pub fn with_mock_server(uri: &str) -> Self {
        Self {
            telegram_api_url: uri.to_string(),
            supabase_url: uri.to_string(),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            bot_token: self.bot_token.clone(),
            telegram_api_url: self.telegram_api_url.clone(),
            supabase_url: self.supabase_url.clone(),
            supabase_anon_key: self.supabase_anon_key.clone(),
            webapp_url: self.webapp_url.clone(),
            webhook_url: None,
            webhook_secret: self.webhook_secret.clone(),
            listen_addr: "127.0.0.1:0".to_string(),
        }
    }
}

/// PostgREST row for `clinics` with the embedded doctor ids the inner join returns.
pub fn clinic_row(id: i64, address: Option<&str>, doctor_ids: &[i64]) -> Value {
    json!({
        "id": id,
        "address": address,
        "doctors": doctor_ids.iter().map(|d| json!({ "id": d })).collect::<Vec<_>>(),
    })
}

/// PostgREST row for `doctors`.
pub fn doctor_row(id: i64, full_name: &str, specialization: &str, clinic_id: i64) -> Value {
    json!({
        "id": id,
        "full_name": full_name,
        "specialization": specialization,
        "is_active": true,
        "clinic_id": clinic_id,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_server_config_routes_both_backends() {
        let config = TestConfig::with_mock_server("http://127.0.0.1:9999").to_app_config();
        assert_eq!(config.supabase_url, "http://127.0.0.1:9999");
        assert_eq!(config.telegram_api_url, "http://127.0.0.1:9999");
        assert!(config.is_configured());
    }

    #[test]
    fn test_clinic_row_embeds_doctors() {
        let row = clinic_row(3, None, &[7, 8]);
        assert_eq!(row["doctors"][1]["id"], 8);
        assert!(row["address"].is_null());
    }
}
