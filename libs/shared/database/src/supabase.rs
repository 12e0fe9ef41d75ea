use anyhow::{Result, anyhow};
use reqwest::{
    Client,
    header::{HeaderMap, HeaderValue, CONTENT_TYPE, AUTHORIZATION},
    Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use shared_config::AppConfig;

/// Thin PostgREST client. All directory reads go through `select`.
#[derive(Clone)]
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl SupabaseClient {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert("apikey", HeaderValue::from_str(&self.anon_key)?);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        // PostgREST falls back to the anon role when no user token is given.
        let bearer = auth_token.unwrap_or(&self.anon_key);
        if !bearer.is_empty() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", bearer))?,
            );
        }

        Ok(headers)
    }

    pub async fn request<T>(&self, method: Method, path: &str,
                            auth_token: Option<&str>, body: Option<Value>)
                            -> Result<T>
    where T: DeserializeOwned {
        let url = format!("{}{}", self.base_url, path);
        debug!("Making request to {}", url);

        let headers = self.get_headers(auth_token)?;

        let mut req = self.client.request(method, &url)
            .headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await?;
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => anyhow!("Authentication error: {}", error_text),
                404 => anyhow!("Resource not found: {}", error_text),
                _ => anyhow!("API error ({}): {}", status, error_text),
            });
        }

        let data = response.json::<T>().await?;
        Ok(data)
    }

    /// Read rows from `table`. Query values are percent-encoded, keys are sent verbatim.
    pub async fn select<T>(&self, table: &str, query: &[(&str, String)]) -> Result<Vec<T>>
    where T: DeserializeOwned {
        let path = Self::table_path(table, query);
        self.request::<Vec<T>>(Method::GET, &path, None, None).await
    }

    pub fn table_path(table: &str, query: &[(&str, String)]) -> String {
        let params = query
            .iter()
            .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
            .collect::<Vec<_>>()
            .join("&");

        if params.is_empty() {
            format!("/rest/v1/{}", table)
        } else {
            format!("/rest/v1/{}?{}", table, params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{MockServer, Mock, ResponseTemplate};
    use wiremock::matchers::{method, path, query_param, header};

    fn config_for(url: &str) -> AppConfig {
        AppConfig {
            bot_token: "token".to_string(),
            telegram_api_url: "http://localhost".to_string(),
            supabase_url: url.to_string(),
            supabase_anon_key: "test-anon-key".to_string(),
            webapp_url: "https://example.com/".to_string(),
            webhook_url: None,
            webhook_secret: None,
            listen_addr: "0.0.0.0:3000".to_string(),
        }
    }

    #[test]
    fn test_table_path_encodes_values() {
        let path = SupabaseClient::table_path(
            "doctors",
            &[("specialization", "eq.General Surgeon".to_string()), ("order", "id.asc".to_string())],
        );
        assert_eq!(path, "/rest/v1/doctors?specialization=eq.General%20Surgeon&order=id.asc");
        assert_eq!(SupabaseClient::table_path("clinics", &[]), "/rest/v1/clinics");
    }

    #[tokio::test]
    async fn test_select_sends_api_key_and_decodes_rows() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/clinics"))
            .and(query_param("id", "eq.3"))
            .and(header("apikey", "test-anon-key"))
            .and(header("authorization", "Bearer test-anon-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": 3}])))
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config_for(&mock_server.uri()));
        let rows: Vec<Value> = client.select("clinics", &[("id", "eq.3".to_string())]).await.unwrap();

        assert_eq!(rows, vec![json!({"id": 3})]);
    }

    #[tokio::test]
    async fn test_select_maps_error_status() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/rest/v1/doctors"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&mock_server)
            .await;

        let client = SupabaseClient::new(&config_for(&mock_server.uri()));
        let err = client.select::<Value>("doctors", &[]).await.unwrap_err();

        assert!(err.to_string().contains("Authentication error"));
    }
}
