//! Model gateway trait and implementations for chat-completion providers.

pub mod mock;
pub mod openai;

use std::future::Future;
use std::pin::Pin;

use thiserror::Error;

use crate::chat::ChatMessage;

pub use openai::OpenAiGateway;

#[derive(Error, Debug)]
pub enum GatewayError {
    /// The provider rejected the input as exceeding its context window.
    /// Callers map this to a user-actionable "try a shorter document"
    /// message, so it must stay distinguishable from [`GatewayError::Api`].
    #[error("the input exceeded the model's context window")]
    ContextTooLarge,
    /// Any other provider-reported failure, with the provider's message.
    #[error("model API error: {0}")]
    Api(String),
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),
}

/// A chat-completion backend: takes a system instruction plus an ordered
/// message sequence, returns the generated text.
///
/// No retry policy lives behind this trait: every call either succeeds or
/// surfaces its error to the caller immediately.
pub trait ModelGateway: Send + Sync {
    fn call<'a>(
        &'a self,
        system_prompt: &'a str,
        messages: &'a [ChatMessage],
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>>;
}
