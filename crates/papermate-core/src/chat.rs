//! Chat message data model shared by the gateway and the conversation engine.

use serde::Serialize;

/// The speaker of a [`ChatMessage`]. Serialized lowercase on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
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

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One role-tagged message. Ordering within a history is significant:
/// messages are replayed to the model in sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
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

/// Ordered conversation history, owned by exactly one session.
pub type ChatHistory = Vec<ChatMessage>;

/// Serialize a history as line-per-message `role: content` text, the input
/// format of the compression prompt.
pub fn render_transcript(history: &[ChatMessage]) -> String {
    history
        .iter()
        .map(|m| format!("{}: {}", m.role, m.content))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serializes_lowercase() {
        let msg = ChatMessage::assistant("hi");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains(r#""role":"assistant""#));
    }

    #[test]
    fn test_render_transcript_order_and_format() {
        let history = vec![
            ChatMessage::user("What is the paper about?"),
            ChatMessage::assistant("Sparse attention."),
        ];
        assert_eq!(
            render_transcript(&history),
            "user: What is the paper about?\nassistant: Sparse attention."
        );
    }

    #[test]
    fn test_render_transcript_empty() {
        assert_eq!(render_transcript(&[]), "");
    }
}
