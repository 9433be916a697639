//! OpenAI-compatible chat-completion client

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::models::{ChatCompletionRequest, ChatCompletionResponse, LLMError};
use crate::config::LlmConfig;

/// Seam between handlers and the remote chat-completion provider
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LLMError>;
}

pub struct LLMClient {
    http_client: Client,
    base_url: String,
    api_key: String,
}

impl LLMClient {
    pub fn new(config: &LlmConfig) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_default();

        Self {
            http_client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        }
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatCompletion for LLMClient {
    async fn complete(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<ChatCompletionResponse, LLMError> {
        let url = self.completions_url();
        tracing::debug!(
            "Calling chat completion: model={}, messages={}",
            request.model,
            request.messages.len()
        );

        let mut builder = self.http_client.post(&url).json(request);
        if !self.api_key.is_empty() {
            builder = builder.bearer_auth(&self.api_key);
        }

        let response = builder.send().await.map_err(|e| {
            tracing::error!("Chat completion request failed: {}", e);
            LLMError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Chat completion failed with status {}: {}", status, body);
            return Err(match status {
                StatusCode::TOO_MANY_REQUESTS => LLMError::RateLimited(body),
                StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
                    LLMError::Timeout(format!("HTTP {}", status))
                },
                _ => LLMError::ApiError(format!("HTTP {}: {}", status, body)),
            });
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LLMError::ParseError(e.to_string()))?;

        if let Some(usage) = &completion.usage {
            tracing::debug!(
                "Chat completion done: prompt_tokens={}, completion_tokens={}",
                usage.prompt_tokens,
                usage.completion_tokens
            );
        }

        Ok(completion)
    }
}
