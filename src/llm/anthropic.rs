//! Anthropic Claude API client implementation
//!
//! Implements the LlmClient trait for Anthropic's Messages API. Sends
//! exactly one request per `complete` call; retry and backoff policy is the
//! caller's concern.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use super::{CompletionRequest, CompletionResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// Anthropic Claude API client
pub struct AnthropicClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
}

impl AnthropicClient {
    /// Create a new client from configuration
    ///
    /// Reads the API key from the environment variable named in the config.
    /// Fails with a configuration error before any network activity when the
    /// credential is absent.
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        let api_key = config.get_api_key()?;

        let timeout = Duration::from_millis(config.timeout_ms);

        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.clone(),
            http,
            max_tokens: config.max_tokens,
            timeout,
        })
    }

    /// Build the request body for the Anthropic API
    fn build_request_body(&self, request: &CompletionRequest) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "system": request.system_prompt,
            "messages": request
                .messages
                .iter()
                .map(|msg| serde_json::json!({
                    "role": msg.role,
                    "content": msg.content,
                }))
                .collect::<Vec<_>>(),
        })
    }

    /// Parse the Anthropic API response
    ///
    /// Only the first text block is consumed; a reply whose first block is
    /// not text (or that has no blocks at all) has no usable content.
    fn parse_response(&self, api_response: AnthropicResponse) -> Result<CompletionResponse, LlmError> {
        let content = match api_response.content.first() {
            Some(AnthropicContentBlock::Text { text }) => text.clone(),
            _ => return Err(LlmError::EmptyResponse),
        };

        Ok(CompletionResponse {
            content: Some(content),
            stop_reason: StopReason::from_anthropic(&api_response.stop_reason),
            usage: TokenUsage {
                input_tokens: api_response.usage.input_tokens,
                output_tokens: api_response.usage.output_tokens,
            },
        })
    }
}

#[async_trait]
impl LlmClient for AnthropicClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        debug!(%self.model, %request.max_tokens, "complete: called");
        let url = format!("{}/v1/messages", self.base_url);
        let body = self.build_request_body(&request);

        let response = self
            .http
            .post(url)
            .header("x-api-key", self.api_key.clone())
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    LlmError::Timeout(self.timeout)
                } else {
                    LlmError::Network(e)
                }
            })?;

        let status = response.status().as_u16();

        if status == 401 || status == 403 {
            let message = response.text().await.unwrap_or_default();
            debug!(status, "complete: authentication rejected");
            return Err(LlmError::Auth { status, message });
        }

        if status == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(60);
            debug!(retry_after, "complete: rate limited (429)");

            return Err(LlmError::RateLimited {
                retry_after: Duration::from_secs(retry_after),
            });
        }

        if !response.status().is_success() {
            let message = response.text().await.unwrap_or_default();
            debug!(status, "complete: API error");
            return Err(LlmError::Api { status, message });
        }

        let api_response: AnthropicResponse = response.json().await?;
        debug!(
            input_tokens = api_response.usage.input_tokens,
            output_tokens = api_response.usage.output_tokens,
            "complete: success"
        );
        self.parse_response(api_response)
    }
}

// Anthropic API response types

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<AnthropicContentBlock>,
    stop_reason: String,
    usage: AnthropicUsage,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum AnthropicContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct AnthropicUsage {
    input_tokens: u64,
    output_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::Message;

    fn test_client() -> AnthropicClient {
        AnthropicClient {
            model: "claude-3-5-sonnet-20241022".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.anthropic.com".to_string(),
            http: Client::new(),
            max_tokens: 4096,
            timeout: Duration::from_secs(300),
        }
    }

    #[test]
    fn test_from_config_missing_credential() {
        let config = LlmConfig {
            api_key_env: "ROADMAPPER_TEST_KEY_THAT_DOES_NOT_EXIST".to_string(),
            ..LlmConfig::default()
        };

        let result = AnthropicClient::from_config(&config);
        assert!(matches!(result, Err(LlmError::Config(_))));
    }

    #[test]
    fn test_build_request_body_basic() {
        let client = test_client();

        let request = CompletionRequest {
            system_prompt: "You are helpful".to_string(),
            messages: vec![Message::user("Hello")],
            max_tokens: 1000,
        };

        let body = client.build_request_body(&request);

        assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["system"], "You are helpful");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
    }

    #[test]
    fn test_max_tokens_capped() {
        let client = test_client();

        let request = CompletionRequest {
            system_prompt: "Test".to_string(),
            messages: vec![],
            max_tokens: 50_000,
        };

        let body = client.build_request_body(&request);

        // Capped to the client's configured max
        assert_eq!(body["max_tokens"], 4096);
    }

    #[test]
    fn test_parse_response_first_text_block() {
        let client = test_client();
        let api_response = AnthropicResponse {
            content: vec![AnthropicContentBlock::Text {
                text: "{\"courseName\":\"CS101\"}".to_string(),
            }],
            stop_reason: "end_turn".to_string(),
            usage: AnthropicUsage {
                input_tokens: 10,
                output_tokens: 5,
            },
        };

        let response = client.parse_response(api_response).unwrap();
        assert_eq!(response.content.as_deref(), Some("{\"courseName\":\"CS101\"}"));
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 10);
    }

    #[test]
    fn test_parse_response_no_text_block() {
        let client = test_client();

        let empty = AnthropicResponse {
            content: vec![],
            stop_reason: "end_turn".to_string(),
            usage: AnthropicUsage {
                input_tokens: 1,
                output_tokens: 0,
            },
        };
        assert!(matches!(client.parse_response(empty), Err(LlmError::EmptyResponse)));

        let non_text = AnthropicResponse {
            content: vec![AnthropicContentBlock::Other],
            stop_reason: "end_turn".to_string(),
            usage: AnthropicUsage {
                input_tokens: 1,
                output_tokens: 0,
            },
        };
        assert!(matches!(client.parse_response(non_text), Err(LlmError::EmptyResponse)));
    }
}
