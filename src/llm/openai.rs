//! `reqwest` client for OpenAI-compatible endpoints

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, error};

use super::{ChatCompletionRequest, ChatCompletionResponse, ModelClient, ModelError};

/// Where and how to reach the model
#[derive(Debug, Clone)]
pub struct ModelEndpoint {
    /// Base URL up to and including the version segment, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    pub api_key: String,
    pub timeout: Duration,
}

/// Bearer-authenticated chat-completions client
#[derive(Debug, Clone)]
pub struct HttpModelClient {
    client: Client,
    endpoint: ModelEndpoint,
}

impl HttpModelClient {
    pub fn new(endpoint: ModelEndpoint) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(endpoint.timeout)
            .build()
            .map_err(|e| ModelError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &ModelEndpoint {
        &self.endpoint
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ModelClient for HttpModelClient {
    async fn complete(&self, request: &ChatCompletionRequest) -> Result<String, ModelError> {
        let url = self.completions_url();
        debug!(%url, model = %request.model, max_tokens = request.max_tokens, "sending chat completion");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.endpoint.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", url, e);
                if e.is_timeout() {
                    ModelError::Transport(format!("Request to {} timed out", url))
                } else if e.is_connect() {
                    ModelError::Transport(format!("Cannot connect to {}", self.endpoint.base_url))
                } else {
                    ModelError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ModelError::Transport(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            error!(status = status.as_u16(), "model endpoint returned an error");
            return Err(ModelError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: ChatCompletionResponse = serde_json::from_str(&body)
            .map_err(|e| ModelError::MalformedResponse(format!("Failed to parse response: {}", e)))?;

        parsed.into_content()
    }
}
