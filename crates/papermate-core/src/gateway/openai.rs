//! OpenAI-compatible chat-completion gateway.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{GatewayError, ModelGateway};
use crate::chat::ChatMessage;

/// Default API endpoint, overridable for any OpenAI-compatible provider.
pub const DEFAULT_BASE_URL: &str = "https://api.deepseek.com/v1";

/// Provider error text that signals a context-window overflow. This is the
/// single, swappable constant bridging the provider's untyped error string
/// to [`GatewayError::ContextTooLarge`]; nothing else in the crate inspects
/// provider error text.
const CONTEXT_LENGTH_MARKER: &str = "maximum context length";

/// Classify a provider error body into a [`GatewayError`].
fn classify_api_error(message: String) -> GatewayError {
    if message.contains(CONTEXT_LENGTH_MARKER) {
        GatewayError::ContextTooLarge
    } else {
        GatewayError::Api(message)
    }
}

pub struct OpenAiGateway {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiGateway {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self::with_base_url(api_key, model, DEFAULT_BASE_URL)
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        model: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(300))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

impl ModelGateway for OpenAiGateway {
    fn call<'a>(
        &'a self,
        system_prompt: &'a str,
        messages: &'a [ChatMessage],
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>> {
        Box::pin(async move {
            let mut wire = Vec::with_capacity(messages.len() + 1);
            wire.push(WireMessage {
                role: "system",
                content: system_prompt,
            });
            wire.extend(messages.iter().map(|m| WireMessage {
                role: m.role.as_str(),
                content: &m.content,
            }));

            let request = ChatRequest {
                model: &self.model,
                messages: wire,
                temperature: 0.1,
                stream: false,
            };

            tracing::debug!(model = %self.model, messages = messages.len() + 1, "calling model");

            let url = format!("{}/chat/completions", self.base_url);
            let resp = self
                .client
                .post(&url)
                .bearer_auth(&self.api_key)
                .json(&request)
                .send()
                .await?;

            let status = resp.status();
            if !status.is_success() {
                let body = resp.text().await.unwrap_or_default();
                return Err(classify_api_error(format!("HTTP {}: {}", status, body)));
            }

            let data: ChatResponse = resp.json().await?;
            let content = data
                .choices
                .into_iter()
                .next()
                .map(|c| c.message.content)
                .ok_or_else(|| GatewayError::Api("response contained no choices".into()))?;

            Ok(content.trim().to_string())
        })
    }
}

// ── Wire types ──

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    temperature: f64,
    stream: bool,
}

#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_context_overflow() {
        let err = classify_api_error(
            "HTTP 400: This model's maximum context length is 65536 tokens".into(),
        );
        assert!(matches!(err, GatewayError::ContextTooLarge));
    }

    #[test]
    fn test_classify_other_error() {
        let err = classify_api_error("HTTP 401: invalid api key".into());
        match err {
            GatewayError::Api(msg) => assert!(msg.contains("invalid api key")),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: "deepseek-chat",
            messages: vec![
                WireMessage {
                    role: "system",
                    content: "Be rigorous",
                },
                WireMessage {
                    role: "user",
                    content: "What is the abstract?",
                },
            ],
            temperature: 0.1,
            stream: false,
        };
        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("deepseek-chat"));
        assert!(json.contains(r#""stream":false"#));
        assert!(json.contains(r#""temperature":0.1"#));
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let gateway = OpenAiGateway::with_base_url("k", "m", "https://example.com/v1/");
        assert_eq!(gateway.base_url, "https://example.com/v1");
    }
}
