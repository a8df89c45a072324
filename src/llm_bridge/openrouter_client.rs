use crate::core::catalog::select_top_by_provider;
use crate::domain::model::Model;
use crate::domain::ports::{ConfigProvider, ModelCatalog};
use crate::utils::error::{PlaygroundError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<Model>,
}

/// OpenRouter API 用戶端
#[derive(Debug, Clone)]
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    site_url: Option<String>,
    site_name: Option<String>,
    base_url: String,
}

impl OpenRouterClient {
    /// `site_url` 與 `site_name` 只用於 OpenRouter 排行榜的歸屬標頭
    pub fn new(api_key: String, site_url: Option<String>, site_name: Option<String>) -> Result<Self> {
        Self::with_timeout(api_key, site_url, site_name, DEFAULT_TIMEOUT_SECS)
    }

    pub fn with_timeout(
        api_key: String,
        site_url: Option<String>,
        site_name: Option<String>,
        timeout_seconds: u64,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_seconds))
            .build()?;

        Ok(Self {
            client,
            api_key,
            site_url,
            site_name,
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Result<Self> {
        let client = Self::with_timeout(
            config.api_key().to_string(),
            config.site_url().map(str::to_string),
            config.site_name().map(str::to_string),
            config.timeout_seconds(),
        )?;
        Ok(client.with_base_url(config.base_url()))
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 取得所有模型，順序即 OpenRouter 的熱門度排序
    pub async fn fetch_models(&self) -> Result<Vec<Model>> {
        let url = format!("{}/models", self.base_url);
        tracing::debug!("Fetching models from: {}", url);

        let mut request = self.client.get(&url).bearer_auth(&self.api_key);
        for (name, value) in self.extra_headers() {
            request = request.header(name, value);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("OpenRouter response status: {}", status);

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PlaygroundError::ApiStatusError {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ModelsResponse = response.json().await?;
        tracing::info!("Fetched {} models from OpenRouter", payload.data.len());
        Ok(payload.data)
    }

    /// 某供應商最熱門的前 `limit` 個模型
    pub async fn fetch_top_models_by_provider(
        &self,
        provider: &str,
        limit: usize,
    ) -> Result<Vec<Model>> {
        let models = self.fetch_models().await?;
        Ok(select_top_by_provider(models, provider, limit))
    }

    pub fn extra_headers(&self) -> HashMap<String, String> {
        let mut headers = HashMap::new();
        if let Some(site_url) = &self.site_url {
            headers.insert("HTTP-Referer".to_string(), site_url.clone());
        }
        if let Some(site_name) = &self.site_name {
            headers.insert("X-Title".to_string(), site_name.clone());
        }
        headers
    }
}

#[async_trait]
impl ModelCatalog for OpenRouterClient {
    async fn fetch_models(&self) -> Result<Vec<Model>> {
        OpenRouterClient::fetch_models(self).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn models_body() -> serde_json::Value {
        serde_json::json!({
            "data": [
                {"id": "openai/gpt-4o", "name": "OpenAI: GPT-4o"},
                {"id": "anthropic/claude-3.5-sonnet", "name": "Anthropic: Claude 3.5 Sonnet"},
                {"id": "openai/gpt-4o-mini", "name": "OpenAI: GPT-4o-mini"},
                {"id": "openai/o1", "name": "OpenAI: o1"}
            ]
        })
    }

    #[test]
    fn test_extra_headers_only_include_configured_values() {
        let client = OpenRouterClient::new("key".to_string(), None, None).unwrap();
        assert!(client.extra_headers().is_empty());

        let client = OpenRouterClient::new(
            "key".to_string(),
            Some("https://playground.local".to_string()),
            Some("MCP Playground".to_string()),
        )
        .unwrap();
        let headers = client.extra_headers();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["HTTP-Referer"], "https://playground.local");
        assert_eq!(headers["X-Title"], "MCP Playground");
    }

    #[test]
    fn test_base_url_defaults_and_trims() {
        let client = OpenRouterClient::new("key".to_string(), None, None).unwrap();
        assert_eq!(client.base_url(), DEFAULT_BASE_URL);

        let client = client.with_base_url("http://localhost:9000/api/v1/");
        assert_eq!(client.base_url(), "http://localhost:9000/api/v1");
    }

    #[tokio::test]
    async fn test_fetch_models_sends_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/v1/models")
                    .header("Authorization", "Bearer sk-or-test");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(models_body());
            })
            .await;

        let client = OpenRouterClient::new("sk-or-test".to_string(), None, None)
            .unwrap()
            .with_base_url(&server.url("/api/v1"));

        let models = client.fetch_models().await.unwrap();
        mock.assert_async().await;
        assert_eq!(models.len(), 4);
        assert_eq!(models[1].id, "anthropic/claude-3.5-sonnet");
    }

    #[tokio::test]
    async fn test_fetch_top_models_by_provider_keeps_api_order() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/models");
                then.status(200).json_body(models_body());
            })
            .await;

        let client = OpenRouterClient::new("key".to_string(), None, None)
            .unwrap()
            .with_base_url(&server.base_url());

        let top = client.fetch_top_models_by_provider("openai", 2).await.unwrap();
        let ids: Vec<&str> = top.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["openai/gpt-4o", "openai/gpt-4o-mini"]);
    }

    #[tokio::test]
    async fn test_missing_data_field_is_empty() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/models");
                then.status(200).json_body(serde_json::json!({}));
            })
            .await;

        let client = OpenRouterClient::new("key".to_string(), None, None)
            .unwrap()
            .with_base_url(&server.base_url());

        assert!(client.fetch_models().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unauthorized_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/models");
                then.status(401).body("{\"error\":\"No auth credentials found\"}");
            })
            .await;

        let client = OpenRouterClient::new("bad".to_string(), None, None)
            .unwrap()
            .with_base_url(&server.base_url());

        match client.fetch_models().await {
            Err(PlaygroundError::ApiStatusError { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("No auth credentials"));
            }
            other => panic!("expected ApiStatusError, got {:?}", other.map(|m| m.len())),
        }
    }
}
