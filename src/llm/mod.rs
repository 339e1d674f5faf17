// LLM client abstraction
//
// The pipeline talks to hosted models through the LlmClient trait so the
// orchestrator and risk analyzer can be tested with substitutable fakes.

use async_trait::async_trait;

use crate::errors::ChatError;

mod mistral;
pub mod types;

pub use mistral::MistralClient;
pub use types::{ChatMessage, ResponseFormat, Role};

/// Contract the core expects from a hosted LLM provider.
///
/// Every failure surfaces as a `ChatError` the caller treats uniformly as
/// "LLM unavailable" (see `ChatError::is_llm_unavailable`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Send a system prompt plus ordered conversation messages and return
    /// the assistant's text.
    async fn complete(
        &self,
        system_prompt: &str,
        messages: &[ChatMessage],
        format: ResponseFormat,
    ) -> Result<String, ChatError>;

    /// Provider name for logging (e.g. "mistral").
    fn name(&self) -> &str;
}
