use thiserror::Error;

pub mod chat;
pub mod config_file;
pub mod conversation;
pub mod gateway;
pub mod prompt;
pub mod session;
pub mod store;
pub mod summary;

// Re-export for convenience
pub use chat::{ChatHistory, ChatMessage, Role};
pub use conversation::{Answer, ConversationConfig, ConversationManager, HistoryTransition};
pub use gateway::{GatewayError, ModelGateway};
pub use session::{Session, SessionSlot};
pub use store::{CollisionPolicy, SectionStore};
pub use summary::summarize;

#[derive(Error, Debug)]
pub enum CoreError {
    /// No text was recoverable from the uploaded document.
    #[error("could not process the document: {0}")]
    ExtractionFailed(String),
    /// Segmentation produced zero sections. Treated by callers exactly
    /// like [`CoreError::ExtractionFailed`].
    #[error("no sections could be extracted from the document")]
    NoSections,
    /// A question arrived before any paper was uploaded.
    #[error("no paper has been uploaded for this session yet")]
    SessionNotReady,
    #[error("model gateway error: {0}")]
    Gateway(#[from] GatewayError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
