use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use dealflow_core::config::LlmConfig;
use dealflow_core::PipelineError;

const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
const API_VERSION: &str = "2023-06-01";

/// Single-turn completion against a language-model backend.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String, PipelineError>;
}

/// Anthropic messages-API implementation.
///
/// One system instruction, one user message, one reply - no streaming,
/// no tools, no conversation state. Transport failures and non-success
/// statuses surface as `BackendUnavailable`; the caller decides whether
/// the reply text parses.
pub struct AnthropicClient {
    client: reqwest::Client,
    base_url: String,
    api_key: secrecy::SecretString,
    model: String,
    max_tokens: u32,
}

impl AnthropicClient {
    pub fn new(config: &LlmConfig) -> Result<Self, PipelineError> {
        let api_key = config
            .api_key
            .clone()
            .ok_or_else(|| PipelineError::backend("llm.api_key is not configured"))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|error| PipelineError::backend(format!("http client init: {error}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            api_key,
            model: config.model.clone(),
            max_tokens: config.max_tokens,
        })
    }
}

#[derive(Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    system: &'a str,
    messages: [RequestMessage<'a>; 1],
}

#[derive(Serialize)]
struct RequestMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: String,
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, system: &str, user: &str) -> Result<String, PipelineError> {
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            system,
            messages: [RequestMessage { role: "user", content: user }],
        };

        let response = self
            .client
            .post(format!("{}/v1/messages", self.base_url))
            .header("x-api-key", self.api_key.expose_secret())
            .header("anthropic-version", API_VERSION)
            .json(&request)
            .send()
            .await
            .map_err(|error| {
                PipelineError::backend(format!("model backend unreachable: {error}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::backend(format!("model backend returned {status}")));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|error| PipelineError::backend(format!("model response body: {error}")))?;

        let text = body
            .content
            .iter()
            .find(|block| block.kind == "text")
            .map(|block| block.text.clone())
            .ok_or_else(|| {
                PipelineError::backend("model reply carried no text content".to_string())
            })?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use dealflow_core::config::LlmConfig;

    use super::{AnthropicClient, MessagesResponse};

    #[test]
    fn request_serializes_to_the_messages_shape() {
        let request = super::MessagesRequest {
            model: "claude-opus-5",
            max_tokens: 1024,
            system: "You are a sales pipeline assistant.",
            messages: [super::RequestMessage { role: "user", content: "Show all deals" }],
        };

        let value = serde_json::to_value(&request).expect("serialize");
        assert_eq!(value["model"], "claude-opus-5");
        assert_eq!(value["max_tokens"], 1024);
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["messages"][0]["content"], "Show all deals");
    }

    #[test]
    fn response_text_block_deserializes() {
        let body: MessagesResponse = serde_json::from_str(
            "{\"content\": [{\"type\": \"text\", \"text\": \"{\\\"action\\\": \\\"list\\\"}\"}]}",
        )
        .expect("deserialize");

        assert_eq!(body.content.len(), 1);
        assert_eq!(body.content[0].kind, "text");
        assert_eq!(body.content[0].text, "{\"action\": \"list\"}");
    }

    #[test]
    fn client_requires_an_api_key() {
        let config = LlmConfig {
            api_key: None,
            base_url: None,
            model: "claude-opus-5".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
        };

        assert!(AnthropicClient::new(&config).is_err());
    }
}
