//! Mock model gateway for testing.

use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{GatewayError, ModelGateway};
use crate::chat::ChatMessage;

/// A configurable mock reply for [`MockGateway`].
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Simulate a successful completion.
    Answer(String),
    /// Simulate the provider rejecting the input as too large.
    ContextTooLarge,
    /// Simulate a generic provider error.
    Error(String),
}

/// One recorded [`ModelGateway::call`] invocation.
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub system_prompt: String,
    pub messages: Vec<ChatMessage>,
}

/// A hand-rolled mock implementing [`ModelGateway`] for tests.
///
/// Supports:
/// - A fixed reply (used for every call), **or**
/// - A sequence of replies (one per call, repeating the last if exhausted).
/// - Full call recording via [`calls()`](MockGateway::calls).
/// - Call counting via [`call_count()`](MockGateway::call_count).
pub struct MockGateway {
    /// If non-empty, each call pops the next reply (last is repeated when
    /// exhausted).
    replies: Mutex<Vec<MockReply>>,
    /// Fallback when the sequence is empty (or single-reply mode).
    fallback: MockReply,
    call_count: AtomicUsize,
    calls: Mutex<Vec<RecordedCall>>,
}

impl MockGateway {
    /// Create a mock that always returns `reply`.
    pub fn new(reply: MockReply) -> Self {
        Self {
            replies: Mutex::new(Vec::new()),
            fallback: reply,
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Create a mock that returns replies in order, repeating the last one.
    pub fn with_sequence(mut replies: Vec<MockReply>) -> Self {
        assert!(!replies.is_empty(), "sequence must have at least one reply");
        // Reverse so we can pop() from the front cheaply.
        replies.reverse();
        let fallback = replies.first().cloned().unwrap();
        Self {
            replies: Mutex::new(replies),
            fallback,
            call_count: AtomicUsize::new(0),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// How many times `call()` has been invoked.
    pub fn call_count(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Every invocation so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn next_reply(&self) -> MockReply {
        let mut seq = self.replies.lock().unwrap();
        if let Some(reply) = seq.pop() {
            reply
        } else {
            self.fallback.clone()
        }
    }
}

impl ModelGateway for MockGateway {
    fn call<'a>(
        &'a self,
        system_prompt: &'a str,
        messages: &'a [ChatMessage],
    ) -> Pin<Box<dyn Future<Output = Result<String, GatewayError>> + Send + 'a>> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(RecordedCall {
            system_prompt: system_prompt.to_string(),
            messages: messages.to_vec(),
        });
        let reply = self.next_reply();

        Box::pin(async move {
            match reply {
                MockReply::Answer(text) => Ok(text),
                MockReply::ContextTooLarge => Err(GatewayError::ContextTooLarge),
                MockReply::Error(msg) => Err(GatewayError::Api(msg)),
            }
        })
    }
}
