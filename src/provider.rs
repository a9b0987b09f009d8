//! Translation providers: the contract the orchestrator calls, and an
//! OpenAI-compatible chat-completions implementation over HTTP.

use crate::config::Config;
use crate::error::ProviderError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Endpoint used for the `openai` platform.
pub const OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

/// Endpoint used for the `deepseek` platform.
pub const DEEPSEEK_API_URL: &str = "https://api.deepseek.com/chat/completions";

/// An external capability that turns prompts into a completion.
///
/// Implementations may be slow and may fail; the orchestrator isolates each
/// call so one failure never affects sibling calls.
#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Send one completion request and return the raw response object.
    async fn call(
        &self,
        platform: &str,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Value, ProviderError>;

    /// Pull the completion text out of a response object.
    ///
    /// `None` means the response carried no text; callers treat that as an
    /// empty translation rather than a failure.
    fn extract_text(&self, response: &Value) -> Option<String> {
        extract_completion_content(response)
    }
}

/// Read `choices[0].message.content` from a chat-completions response.
pub fn extract_completion_content(response: &Value) -> Option<String> {
    response
        .get("choices")?
        .get(0)?
        .get("message")?
        .get("content")?
        .as_str()
        .map(str::to_string)
}

/// Chat Completion request body
#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

/// Provider for any platform speaking the OpenAI chat-completions protocol.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProvider {
    client: reqwest::Client,
    api_key: String,
    api_url: Option<String>,
}

impl OpenAiCompatibleProvider {
    /// Create a provider. `api_url`, when set, overrides the per-platform endpoint.
    pub fn new(client: reqwest::Client, api_key: impl Into<String>, api_url: Option<String>) -> Self {
        Self {
            client,
            api_key: api_key.into(),
            api_url,
        }
    }

    pub fn from_config(client: reqwest::Client, config: &Config) -> Self {
        Self::new(client, config.api_key.clone(), config.api_url.clone())
    }

    /// Resolve the endpoint for a platform key.
    pub fn endpoint_for(&self, platform: &str) -> Result<String, ProviderError> {
        if let Some(url) = &self.api_url {
            return Ok(url.clone());
        }

        match platform.trim().to_lowercase().as_str() {
            "openai" => Ok(OPENAI_API_URL.to_string()),
            "deepseek" => Ok(DEEPSEEK_API_URL.to_string()),
            other => Err(ProviderError::UnsupportedPlatform(other.to_string())),
        }
    }
}

#[async_trait]
impl TranslationProvider for OpenAiCompatibleProvider {
    async fn call(
        &self,
        platform: &str,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<Value, ProviderError> {
        let endpoint = self.endpoint_for(platform)?;

        let request = ChatRequest {
            model,
            messages: vec![
                Message {
                    role: "system",
                    content: system_prompt,
                },
                Message {
                    role: "user",
                    content: user_prompt,
                },
            ],
            temperature: 0.3,
        };

        debug!("Sending completion request to {} ({})", platform, model);

        let response = self
            .client
            .post(&endpoint)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|source| ProviderError::Transport {
                platform: platform.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|e| format!("<failed to read body: {}>", e));
            return Err(ProviderError::Status {
                platform: platform.to_string(),
                status,
                body,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|source| ProviderError::Decode {
                platform: platform.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::{
        matchers::{body_partial_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    // ==================== Helper Functions ====================

    fn create_openai_response(content: &str) -> Value {
        serde_json::json!({
            "id": "chatcmpl-123",
            "object": "chat.completion",
            "choices": [
                {
                    "index": 0,
                    "message": {
                        "role": "assistant",
                        "content": content
                    },
                    "finish_reason": "stop"
                }
            ]
        })
    }

    fn provider_for(server: &MockServer) -> OpenAiCompatibleProvider {
        OpenAiCompatibleProvider::new(
            reqwest::Client::new(),
            "test-key",
            Some(format!("{}/v1/chat/completions", server.uri())),
        )
    }

    // ==================== Extraction Tests ====================

    #[test]
    fn test_extract_completion_content() {
        let response = create_openai_response("Hola");
        assert_eq!(extract_completion_content(&response), Some("Hola".to_string()));
    }

    #[test]
    fn test_extract_completion_content_empty_choices() {
        let response = serde_json::json!({ "choices": [] });
        assert_eq!(extract_completion_content(&response), None);
    }

    #[test]
    fn test_extract_completion_content_null_content() {
        let response = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        });
        assert_eq!(extract_completion_content(&response), None);
    }

    #[test]
    fn test_extract_completion_content_unrelated_shape() {
        let response = serde_json::json!({ "error": { "message": "nope" } });
        assert_eq!(extract_completion_content(&response), None);
    }

    // ==================== Endpoint Tests ====================

    #[test]
    fn test_endpoint_for_known_platforms() {
        let provider = OpenAiCompatibleProvider::new(reqwest::Client::new(), "k", None);
        assert_eq!(provider.endpoint_for("openai").unwrap(), OPENAI_API_URL);
        assert_eq!(provider.endpoint_for("DeepSeek").unwrap(), DEEPSEEK_API_URL);
    }

    #[test]
    fn test_endpoint_for_unknown_platform() {
        let provider = OpenAiCompatibleProvider::new(reqwest::Client::new(), "k", None);
        let err = provider.endpoint_for("customurl").unwrap_err();
        assert!(matches!(err, ProviderError::UnsupportedPlatform(p) if p == "customurl"));
    }

    #[test]
    fn test_endpoint_override_wins() {
        let provider = OpenAiCompatibleProvider::new(
            reqwest::Client::new(),
            "k",
            Some("http://localhost:1234/chat".to_string()),
        );
        assert_eq!(
            provider.endpoint_for("anything").unwrap(),
            "http://localhost:1234/chat"
        );
    }

    // ==================== Request Structure Tests ====================

    #[test]
    fn test_chat_request_serialization() {
        let request = ChatRequest {
            model: "deepseek-chat",
            messages: vec![
                Message {
                    role: "system",
                    content: "You translate.",
                },
                Message {
                    role: "user",
                    content: "Target language code: es\nText:\nhello",
                },
            ],
            temperature: 0.3,
        };

        let json = serde_json::to_string(&request).expect("Should serialize");
        assert!(json.contains("deepseek-chat"));
        assert!(json.contains("system"));
        assert!(json.contains("user"));
        assert!(json.contains("0.3"));
    }

    // ==================== HTTP Tests ====================

    #[tokio::test]
    async fn test_call_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("Authorization", "Bearer test-key"))
            .and(body_partial_json(serde_json::json!({ "model": "deepseek-chat" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(create_openai_response("Hola")))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let response = provider
            .call("deepseek", "deepseek-chat", "You translate.", "hello")
            .await
            .expect("Should succeed");

        assert_eq!(provider.extract_text(&response), Some("Hola".to_string()));
    }

    #[tokio::test]
    async fn test_call_api_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let err = provider
            .call("openai", "gpt-4o-mini", "sys", "user")
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Status { .. }));
        assert!(err.to_string().contains("500"));
        assert!(err.to_string().contains("Internal Server Error"));
    }

    #[tokio::test]
    async fn test_call_malformed_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let provider = provider_for(&mock_server);
        let err = provider
            .call("openai", "gpt-4o-mini", "sys", "user")
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::Decode { .. }));
    }

    #[tokio::test]
    async fn test_call_unknown_platform_makes_no_request() {
        let provider = OpenAiCompatibleProvider::new(reqwest::Client::new(), "k", None);
        let err = provider
            .call("customurl", "model", "sys", "user")
            .await
            .unwrap_err();

        assert!(matches!(err, ProviderError::UnsupportedPlatform(_)));
    }
}
