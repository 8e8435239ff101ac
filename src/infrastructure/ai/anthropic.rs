//! Anthropic Messages API backend.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::{AiBackend, AiError, AiPrompt};

const MAX_TOKENS: u32 = 1000;
const TEMPERATURE: f64 = 0.8;

/// Claude client for slug suggestions.
///
/// Makes a single attempt per call: the caller's deadline is a few seconds
/// and a failed call falls back to heuristics, so retrying here would only
/// delay that.
pub struct AnthropicBackend {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
}

impl AnthropicBackend {
    /// # Errors
    ///
    /// Returns [`AiError::Network`] if the HTTP client cannot be built.
    pub fn new(api_key: String, model: String, base_url: String) -> Result<Self, AiError> {
        let http = Client::builder().build()?;

        Ok(Self {
            model,
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    fn build_request_body(&self, prompt: &AiPrompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": MAX_TOKENS,
            "temperature": TEMPERATURE,
            "system": prompt.system,
            "messages": [
                { "role": "user", "content": prompt.user }
            ],
        })
    }
}

#[async_trait]
impl AiBackend for AnthropicBackend {
    async fn complete(&self, prompt: &AiPrompt, timeout: Duration) -> Result<String, AiError> {
        let url = format!("{}/v1/messages", self.base_url);
        debug!(model = %self.model, "Requesting slug suggestions");

        let response = self
            .http
            .post(url)
            .timeout(timeout)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&self.build_request_body(prompt))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AiError::Timeout(timeout)
                } else {
                    AiError::Network(e)
                }
            })?;

        let status = response.status().as_u16();

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);

            return Err(AiError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(AiError::ApiError { status, message });
        }

        let body: MessagesResponse = response.json().await?;

        body.content
            .into_iter()
            .find_map(|block| match block {
                ContentBlock::Text { text } => Some(text),
                ContentBlock::Other => None,
            })
            .ok_or_else(|| AiError::InvalidResponse("Response has no text content".to_string()))
    }

    fn model(&self) -> String {
        self.model.clone()
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}
