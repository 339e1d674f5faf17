// HTTP client for the Mistral chat completions API

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use super::types::{
    ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
};
use super::LlmClient;
use crate::errors::ChatError;

const MISTRAL_API_BASE: &str = "https://api.mistral.ai";
const REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_MODEL: &str = "mistral-large-latest";
const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Mistral API client.
///
/// One instance serves one model; the chat path and the risk classifier use
/// separate instances configured with different models.
#[derive(Clone)]
pub struct MistralClient {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl MistralClient {
    pub fn new(api_key: String) -> Result<Self, ChatError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| ChatError::Configuration(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            base_url: MISTRAL_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Override the model used by this client.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API base URL (used by tests against a mock server).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_completion(
        &self,
        request: &ChatCompletionRequest,
    ) -> Result<String, ChatError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        tracing::debug!(model = %request.model, "Sending request to Mistral API");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::Transport("request to Mistral API timed out".to_string())
                } else {
                    ChatError::Transport(format!("failed to reach Mistral API: {e}"))
                }
            })?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ChatError::RateLimit);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Transport(format!(
                "Mistral API request failed with status {status}: {body}"
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::MalformedResponse(e.to_string()))?;

        completion
            .text()
            .map(|t| t.to_string())
            .ok_or_else(|| ChatError::MalformedResponse("response contained no choices".to_string()))
    }
}

#[async_trait]
impl LlmClient for MistralClient {
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        format: ResponseFormat,
    ) -> Result<String, ChatError> {
        let mut all_messages = Vec::with_capacity(messages.len() + 1);
        all_messages.push(ChatMessage::system(system_prompt));
        all_messages.extend_from_slice(messages);

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: all_messages,
            temperature: Some(DEFAULT_TEMPERATURE),
            response_format: format.into(),
        };

        self.send_completion(&request).await
    }

    fn name(&self) -> &str {
        "mistral"
    }
}
