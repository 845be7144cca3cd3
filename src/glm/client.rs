use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use super::error::GlmError;
use super::types::{ChatMessage, ChatRequest, ChatResponse};
use super::GenerationCapability;

const API_URL: &str = "https://open.bigmodel.cn/api/paas/v4/chat/completions";

pub struct GlmClient {
    api_key: String,
    model: String,
    client: Client,
    base_url: String,
}

impl GlmClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(api_key, model, API_URL.to_string())
    }

    /// Create a client pointing at a custom base URL (useful for testing).
    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .timeout(Duration::from_secs(300))
            .build()
            .expect("failed to build HTTP client");
        Self {
            api_key,
            model,
            client,
            base_url,
        }
    }

    pub async fn send_chat(&self, req: &ChatRequest) -> Result<ChatResponse, GlmError> {
        let response = self
            .client
            .post(&self.base_url)
            .header("authorization", format!("Bearer {}", self.api_key))
            .header("content-type", "application/json")
            .json(req)
            .send()
            .await?;

        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(1000);
            return Err(GlmError::RateLimited {
                retry_after_ms: retry_after,
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(GlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.json::<ChatResponse>().await?;
        Ok(body)
    }
}

#[async_trait]
impl GenerationCapability for GlmClient {
    /// Send a single-turn user prompt and return the assistant text.
    ///
    /// A well-formed response that carries no textual content yields an empty
    /// string; the caller decides how to classify that.
    async fn generate(&self, prompt: &str) -> Result<String, GlmError> {
        let req = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".into(),
                content: prompt.to_string(),
            }],
        };
        let resp = self.send_chat(&req).await?;
        Ok(resp.first_text().unwrap_or_default().to_string())
    }
}
