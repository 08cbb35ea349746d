//! HTTP client for OpenAI-compatible chat completion APIs.

use std::time::{Duration, Instant};

use reqwest::{Client, header};
use tracing::{debug, warn};

use super::types::{ChatRequest, ChatResponseRaw, Message};
use super::{CompletionBackend, Result};
use crate::error::LlmError;
use crate::models::config::LlmConfig;

/// Chat completion client.
#[derive(Clone)]
pub struct ChatClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
    temperature: Option<f32>,
}

impl ChatClient {
    /// Create a client from the API key and LLM settings.
    pub fn new(api_key: impl Into<String>, config: &LlmConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder
            .build()
            .map_err(|e| LlmError::Network(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            temperature: config.temperature,
        })
    }

    /// Set a custom base URL (proxies, self-hosted gateways, tests).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Send a single user-role prompt and return the completion text.
    pub async fn chat(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();
        let request = ChatRequest::new(&self.model)
            .message(Message::user(prompt))
            .temperature(self.temperature);

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header(header::AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Completion request failed");
                LlmError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %body, "Completion API error");
            return Err(LlmError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;

        if let Some(usage) = &raw.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                "Token usage"
            );
        }

        let content = raw
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(LlmError::EmptyResponse)?;

        debug!(
            model = %self.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "Chat completion"
        );

        Ok(content)
    }
}

impl CompletionBackend for ChatClient {
    async fn complete(&self, prompt: &str) -> Result<String> {
        self.chat(prompt).await
    }
}
