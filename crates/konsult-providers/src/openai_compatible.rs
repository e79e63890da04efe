//! Unified OpenAI-compatible client.
//!
//! One struct that handles both `/embeddings` and `/chat/completions` for
//! any OpenAI-compatible API. The same instance builds the index and embeds
//! queries, which keeps the embedding space consistent by construction.

use async_trait::async_trait;
use konsult_core::config::LlmConfig;
use konsult_core::error::{KonsultError, Result};
use konsult_core::traits::{CompletionProvider, EmbeddingProvider};
use konsult_core::types::PromptPayload;
use serde::Deserialize;
use serde_json::{Value, json};
use std::time::Duration;

/// Client for OpenAI-compatible embedding and chat completion endpoints.
pub struct OpenAiCompatibleClient {
    api_key: String,
    base_url: String,
    chat_model: String,
    embedding_model: String,
    temperature: f32,
    max_tokens: u32,
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    /// Build from the `[llm]` config section. The request timeout is set on
    /// the HTTP client so a hung provider call surfaces as an `Http` error
    /// instead of stalling the message task forever.
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| KonsultError::Http(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            api_key: config.api_key.clone(),
            base_url: config.endpoint.trim_end_matches('/').to_string(),
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            client,
        })
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("Authorization", format!("Bearer {}", self.api_key))
    }

    fn check_key(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(KonsultError::Provider(
                "API key is empty — startup validation should have rejected this".into(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingRow>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingRow {
    embedding: Vec<f32>,
    index: usize,
}

#[async_trait]
impl EmbeddingProvider for OpenAiCompatibleClient {
    async fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        self.check_key()?;

        tracing::debug!("Embedding batch of {} texts", texts.len());
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "model": self.embedding_model,
            "input": texts,
        });

        let req = self.apply_auth(self.client.post(&url).json(&body));
        let resp = req
            .send()
            .await
            .map_err(|e| KonsultError::Http(format!("embeddings request failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(KonsultError::Provider(format!(
                "embeddings API error {status}: {text}"
            )));
        }

        let mut parsed: EmbeddingResponse = resp
            .json()
            .await
            .map_err(|e| KonsultError::Http(format!("invalid embeddings response: {e}")))?;

        // The API is allowed to reorder rows; restore input order.
        parsed.data.sort_by_key(|row| row.index);

        if parsed.data.len() != texts.len() {
            return Err(KonsultError::Provider(format!(
                "provider returned {} embeddings for {} inputs",
                parsed.data.len(),
                texts.len()
            )));
        }

        let dimension = parsed.data[0].embedding.len();
        if parsed.data.iter().any(|row| row.embedding.len() != dimension) {
            return Err(KonsultError::Provider(
                "provider returned embeddings of mixed dimensionality".into(),
            ));
        }

        Ok(parsed.data.into_iter().map(|row| row.embedding).collect())
    }
}

#[async_trait]
impl CompletionProvider for OpenAiCompatibleClient {
    async fn complete(&self, payload: &PromptPayload) -> Result<String> {
        self.check_key()?;

        tracing::debug!("Completion call, model {}", self.chat_model);
        let url = format!("{}/chat/completions", self.base_url);
        let body = json!({
            "model": self.chat_model,
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
            "messages": payload.to_messages(),
        });

        let req = self.apply_auth(self.client.post(&url).json(&body));
        let resp = req
            .send()
            .await
            .map_err(|e| KonsultError::Http(format!("completion request failed ({url}): {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(KonsultError::Provider(format!(
                "completion API error {status}: {text}"
            )));
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| KonsultError::Http(format!("invalid completion response: {e}")))?;

        json["choices"]
            .get(0)
            .and_then(|choice| choice["message"]["content"].as_str())
            .map(|content| content.trim().to_string())
            .ok_or_else(|| KonsultError::Provider("no choices in completion response".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> LlmConfig {
        LlmConfig {
            api_key: "sk-test".into(),
            endpoint: "https://api.openai.com/v1/".into(),
            ..LlmConfig::default()
        }
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let client = OpenAiCompatibleClient::new(&test_config()).unwrap();
        assert_eq!(client.base_url, "https://api.openai.com/v1");
    }

    #[tokio::test]
    async fn test_empty_batch_skips_network() {
        // No key, no endpoint reachable — must still succeed for empty input.
        let config = LlmConfig {
            api_key: String::new(),
            endpoint: "http://127.0.0.1:1".into(),
            ..LlmConfig::default()
        };
        let client = OpenAiCompatibleClient::new(&config).unwrap();
        let vectors = client.embed(&[]).await.unwrap();
        assert!(vectors.is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_is_provider_error() {
        let config = LlmConfig {
            api_key: String::new(),
            ..LlmConfig::default()
        };
        let client = OpenAiCompatibleClient::new(&config).unwrap();
        let err = client.embed(&["hello".to_string()]).await.unwrap_err();
        assert!(matches!(err, KonsultError::Provider(_)));
    }

    #[test]
    fn test_embedding_response_parse() {
        let raw = r#"{"data":[{"embedding":[0.5,-0.25],"index":1},{"embedding":[1.0,2.0],"index":0}]}"#;
        let mut parsed: EmbeddingResponse = serde_json::from_str(raw).unwrap();
        parsed.data.sort_by_key(|row| row.index);
        assert_eq!(parsed.data[0].embedding, vec![1.0, 2.0]);
        assert_eq!(parsed.data[1].embedding, vec![0.5, -0.25]);
    }
}
