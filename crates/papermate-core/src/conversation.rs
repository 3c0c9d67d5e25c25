//! Multi-turn question answering with automatic history compression.
//!
//! Histories grow by exactly two messages (user question, assistant answer)
//! per successful turn. Once a history exceeds the compression threshold,
//! the next turn first summarizes it through the model and replaces it
//! with a single system message carrying that summary. The replace is
//! all-or-nothing: if the compression call fails, the caller's history of
//! record stays untouched and the error propagates.

use std::path::PathBuf;

use crate::chat::{ChatHistory, ChatMessage, render_transcript};
use crate::gateway::ModelGateway;
use crate::{CoreError, prompt, store};

/// Tunables for the conversation engine.
#[derive(Debug, Clone)]
pub struct ConversationConfig {
    /// Message-count boundary above which history is summarized before the
    /// next question. 6 messages, i.e. three question/answer pairs.
    pub compression_threshold: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            compression_threshold: 6,
        }
    }
}

/// What happened to the incoming history while building the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryTransition {
    /// The history was below the threshold and used verbatim.
    Kept,
    /// The history was summarized and replaced by a single system message.
    Compressed,
}

/// A successful turn: the answer text, the new history of record, and the
/// transition that produced it. The caller commits `history` wholesale,
/// replacing the pre-call history, never merging.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    pub history: ChatHistory,
    pub transition: HistoryTransition,
}

/// Owns the per-turn prompt construction and the compression policy.
#[derive(Debug, Clone, Default)]
pub struct ConversationManager {
    config: ConversationConfig,
}

impl ConversationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ConversationConfig) -> Self {
        Self { config }
    }

    /// Answer `question` against the session's sections and history.
    ///
    /// The incoming `history` is never mutated; on success the returned
    /// [`Answer::history`] is the new history of record. On any gateway
    /// error (compression sub-call included) the error propagates unchanged
    /// and the caller must not commit anything.
    ///
    /// Fails with [`CoreError::SessionNotReady`] before any model call when
    /// no sections are loaded.
    pub async fn answer(
        &self,
        history: &[ChatMessage],
        question: &str,
        section_paths: &[PathBuf],
        gateway: &dyn ModelGateway,
    ) -> Result<Answer, CoreError> {
        if section_paths.is_empty() {
            return Err(CoreError::SessionNotReady);
        }

        let (mut working, transition) = if history.len() > self.config.compression_threshold {
            tracing::info!(
                history_len = history.len(),
                threshold = self.config.compression_threshold,
                "compressing conversation history"
            );
            let summary = self.compress(history, gateway).await?;
            let replacement = vec![ChatMessage::system(format!(
                "{}{}",
                prompt::SUMMARY_OF_PRIOR_PREFIX,
                summary
            ))];
            (replacement, HistoryTransition::Compressed)
        } else {
            (history.to_vec(), HistoryTransition::Kept)
        };

        // First question (or fresh upload): send the full paper context
        // alongside the question. Afterwards the history or its summary is
        // assumed to carry the relevant context, so only the bare question
        // is sent.
        let text = if working.is_empty() {
            let context = store::read_combined(section_paths)?;
            let first_turn = format!(
                "{}:\n{}\n\n---\n{}:\n{}",
                prompt::CONTEXT_LABEL,
                context,
                prompt::QUESTION_LABEL,
                question
            );
            let messages = vec![ChatMessage::user(first_turn)];
            gateway.call(prompt::QA_SYSTEM, &messages).await?
        } else {
            let mut messages = working.clone();
            messages.push(ChatMessage::user(question));
            gateway.call(prompt::QA_SYSTEM, &messages).await?
        };

        working.push(ChatMessage::user(question));
        working.push(ChatMessage::assistant(text.clone()));

        Ok(Answer {
            text,
            history: working,
            transition,
        })
    }

    /// Summarize an entire history into one string via the model.
    ///
    /// All-or-nothing: a gateway error propagates unchanged and no partial
    /// summary is ever produced. The model output is returned verbatim,
    /// with no parsing and no local length cap.
    pub async fn compress(
        &self,
        history: &[ChatMessage],
        gateway: &dyn ModelGateway,
    ) -> Result<String, CoreError> {
        let transcript = render_transcript(history);
        let request = format!("{}\n\n---\n{}\n---", prompt::COMPRESS_REQUEST, transcript);
        let messages = vec![ChatMessage::user(request)];
        let summary = gateway.call(prompt::COMPRESS_SYSTEM, &messages).await?;
        tracing::debug!(summary_len = summary.len(), "history compressed");
        Ok(summary)
    }
}
