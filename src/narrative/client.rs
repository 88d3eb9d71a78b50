//! OpenAI-compatible narrative client
//!
//! HTTP client for any server implementing the `/v1/chat/completions` API.

use super::{NarrativeError, NarrativeRequest, NarrativeService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// OpenAI-compatible chat-completions client
pub struct OpenAiClient {
    client: Client,
    config: NarrativeConfig,
}

/// Configuration for the narrative client
#[derive(Debug, Clone)]
pub struct NarrativeConfig {
    /// Base URL of the provider (e.g., "https://api.openai.com")
    pub base_url: String,
    /// Bearer token sent with every request
    pub api_key: String,
    /// Chat model name
    pub model: String,
    /// Upper bound on generated tokens
    pub max_tokens: u32,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com".to_string(),
            api_key: String::new(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 150,
            request_timeout_ms: 10_000,
        }
    }
}

impl OpenAiClient {
    /// Create a new client with the given configuration
    pub fn new(config: NarrativeConfig) -> Result<Self, NarrativeError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    fn completions_url(&self) -> String {
        format!(
            "{}/v1/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }

    fn build_request(&self, request: &NarrativeRequest) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system_instruction.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.user_prompt.clone(),
                },
            ],
            max_tokens: self.config.max_tokens,
        }
    }
}

#[async_trait]
impl NarrativeService for OpenAiClient {
    async fn summarize(&self, request: &NarrativeRequest) -> Result<String, NarrativeError> {
        let body = self.build_request(request);

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(classify_transport_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(NarrativeError::ApiError {
                status: status.as_u16(),
                message: text,
            });
        }

        let text = response.text().await.map_err(classify_transport_error)?;
        let parsed: ChatCompletionResponse =
            serde_json::from_str(&text).map_err(|e| NarrativeError::Malformed(e.to_string()))?;

        extract_content(parsed)
    }
}

fn classify_transport_error(e: reqwest::Error) -> NarrativeError {
    if e.is_timeout() {
        NarrativeError::Timeout
    } else if e.is_connect() {
        NarrativeError::Unavailable
    } else {
        NarrativeError::Request(e)
    }
}

/// First choice's message content, trimmed; empty content is an error
fn extract_content(response: ChatCompletionResponse) -> Result<String, NarrativeError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .map(|content| content.trim().to_string())
        .filter(|content| !content.is_empty())
        .ok_or(NarrativeError::EmptyResponse)
}

// ============================================
// Request/Response DTOs
// ============================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> NarrativeRequest {
        NarrativeRequest {
            system_instruction: "You are a meteorologist.".to_string(),
            user_prompt: "Summarize: {}".to_string(),
        }
    }

    #[test]
    fn test_default_config() {
        let config = NarrativeConfig::default();
        assert_eq!(config.base_url, "https://api.openai.com");
        assert_eq!(config.model, "gpt-3.5-turbo");
        assert_eq!(config.max_tokens, 150);
    }

    #[test]
    fn test_request_body() {
        let client = OpenAiClient::new(NarrativeConfig {
            base_url: "http://localhost:12434/".to_string(),
            ..Default::default()
        })
        .unwrap();

        assert_eq!(
            client.completions_url(),
            "http://localhost:12434/v1/chat/completions"
        );

        let body = serde_json::to_value(client.build_request(&request())).unwrap();
        assert_eq!(body["model"], "gpt-3.5-turbo");
        assert_eq!(body["max_tokens"], 150);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Summarize: {}");
    }

    #[test]
    fn test_extract_content() {
        let response: ChatCompletionResponse = serde_json::from_str(
            r#"{"id": "x", "choices": [{"index": 0, "message": {"role": "assistant", "content": "  Mild week ahead.\n"}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_content(response).unwrap(), "Mild week ahead.");
    }

    #[test]
    fn test_missing_content_is_an_error() {
        let empty: ChatCompletionResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(matches!(extract_content(empty), Err(NarrativeError::EmptyResponse)));

        let null: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": null}}]}"#).unwrap();
        assert!(matches!(extract_content(null), Err(NarrativeError::EmptyResponse)));

        let blank: ChatCompletionResponse =
            serde_json::from_str(r#"{"choices": [{"message": {"content": "   "}}]}"#).unwrap();
        assert!(matches!(extract_content(blank), Err(NarrativeError::EmptyResponse)));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_an_error() {
        let client = OpenAiClient::new(NarrativeConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            request_timeout_ms: 500,
            ..Default::default()
        })
        .unwrap();

        assert!(client.summarize(&request()).await.is_err());
    }
}
