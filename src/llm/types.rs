// Wire types for the Mistral chat completions API

use serde::{Deserialize, Serialize};

/// Message author role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// A single conversation message as sent to the provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Requested response shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    /// Free-form text reply.
    Text,
    /// Structured JSON object (used by the risk classifier).
    JsonObject,
}

/// Request body for POST /v1/chat/completions.
#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormatSpec>,
}

/// The API expects {"type": "json_object"} to force structured output.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormatSpec {
    #[serde(rename = "type")]
    pub format_type: String,
}

impl From<ResponseFormat> for Option<ResponseFormatSpec> {
    fn from(format: ResponseFormat) -> Self {
        match format {
            ResponseFormat::Text => None,
            ResponseFormat::JsonObject => Some(ResponseFormatSpec {
                format_type: "json_object".to_string(),
            }),
        }
    }
}

/// Response body for POST /v1/chat/completions. Only the fields we consume
/// are modeled; serde skips the rest of the payload.
#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionResponse {
    pub choices: Vec<Choice>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Choice {
    pub message: ChoiceMessage,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChoiceMessage {
    #[serde(default)]
    pub role: String,
    pub content: String,
}

impl ChatCompletionResponse {
    /// Text of the first choice, if any.
    pub fn text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::user("hello");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(json["content"], "hello");
    }

    #[test]
    fn test_json_format_spec() {
        let spec: Option<ResponseFormatSpec> = ResponseFormat::JsonObject.into();
        assert_eq!(spec.unwrap().format_type, "json_object");

        let spec: Option<ResponseFormatSpec> = ResponseFormat::Text.into();
        assert!(spec.is_none());
    }

    #[test]
    fn test_response_text_extraction() {
        let body = r#"{
            "id": "cmpl-1",
            "model": "mistral-large-latest",
            "choices": [{"message": {"role": "assistant", "content": "hi there"}}]
        }"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), Some("hi there"));
    }

    #[test]
    fn test_empty_choices() {
        let body = r#"{"choices": []}"#;
        let response: ChatCompletionResponse = serde_json::from_str(body).unwrap();
        assert_eq!(response.text(), None);
    }
}
