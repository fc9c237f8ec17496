//! Chat-completion model access
//!
//! Request/response types for an OpenAI-compatible `chat/completions`
//! endpoint and the [`ModelClient`] seam the food advisor talks through.

mod openai;

pub use openai::{HttpModelClient, ModelEndpoint};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Model call errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    #[error("Model request failed: {0}")]
    Transport(String),

    #[error("Model endpoint returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Unexpected model response: {0}")]
    MalformedResponse(String),
}

/// One typed part of a multi-part message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageUrl {
    pub url: String,
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        ContentPart::Text { text: text.into() }
    }

    pub fn image_url(url: impl Into<String>) -> Self {
        ContentPart::ImageUrl {
            image_url: ImageUrl { url: url.into() },
        }
    }
}

/// Message content: plain text or a list of parts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: "user".to_string(),
            content: MessageContent::Parts(parts),
        }
    }
}

/// Body of a `chat/completions` POST
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
}

impl ChatCompletionRequest {
    /// Single-turn request with one user message
    pub fn single_turn(model: impl Into<String>, message: ChatMessage, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: vec![message],
            max_tokens,
        }
    }
}

/// Only `choices[0].message.content` is read; everything else is ignored
#[derive(Debug, Deserialize)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletionResponse {
    /// Text of the first choice
    pub fn into_content(self) -> Result<String, ModelError> {
        self.choices
            .into_iter()
            .next()
            .ok_or_else(|| ModelError::MalformedResponse("response has no choices".to_string()))?
            .message
            .content
            .ok_or_else(|| ModelError::MalformedResponse("first choice has no content".to_string()))
    }
}

/// Something that can answer a chat-completion request
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send the request and return the reply text of the first choice
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_multipart_request_wire_format() {
        let request = ChatCompletionRequest::single_turn(
            "gpt-4o",
            ChatMessage::user_parts(vec![
                ContentPart::text("What is this?"),
                ContentPart::image_url("data:image/jpeg;base64,AAAA"),
            ]),
            300,
        );
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "What is this?"},
                        {"type": "image_url", "image_url": {"url": "data:image/jpeg;base64,AAAA"}}
                    ]
                }],
                "max_tokens": 300
            })
        );
    }

    #[test]
    fn test_text_request_wire_format() {
        let request = ChatCompletionRequest::single_turn("gpt-4o", ChatMessage::user("hi"), 1000);
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "hi"}],
                "max_tokens": 1000
            })
        );
    }

    #[test]
    fn test_response_first_choice_content() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "Toast, Jam"}},
                {"index": 1, "message": {"role": "assistant", "content": "ignored"}}
            ],
            "usage": {"total_tokens": 12}
        }))
        .unwrap();
        assert_eq!(response.into_content().unwrap(), "Toast, Jam");
    }

    #[test]
    fn test_response_without_choices_is_malformed() {
        let response: ChatCompletionResponse = serde_json::from_value(json!({})).unwrap();
        assert!(matches!(response.into_content(), Err(ModelError::MalformedResponse(_))));

        let response: ChatCompletionResponse =
            serde_json::from_value(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert!(matches!(response.into_content(), Err(ModelError::MalformedResponse(_))));
    }
}
