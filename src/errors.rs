// Error taxonomy for the chat pipeline
//
// One recovery policy per error kind:
// - Configuration: fatal at startup, never recovered per request
// - Transport / RateLimit / MalformedResponse: recovered locally with
//   fixed fallback text or a default risk assessment
// - Validation: surfaced to the caller as a rejected request

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChatError {
    /// Missing or unusable credentials or settings.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The LLM endpoint was unreachable, returned a server error, or the
    /// request timed out.
    #[error("LLM transport failure: {0}")]
    Transport(String),

    /// The LLM provider rejected the request with a rate limit.
    #[error("LLM rate limited")]
    RateLimit,

    /// The LLM returned a body we could not parse.
    #[error("malformed LLM response: {0}")]
    MalformedResponse(String),

    /// Empty or malformed inbound request.
    #[error("invalid request: {0}")]
    Validation(String),
}

impl ChatError {
    /// The core treats every LLM failure kind identically as "LLM unavailable".
    pub fn is_llm_unavailable(&self) -> bool {
        matches!(
            self,
            ChatError::Transport(_) | ChatError::RateLimit | ChatError::MalformedResponse(_)
        )
    }
}
