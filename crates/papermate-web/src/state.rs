use std::path::PathBuf;

use papermate_core::{ConversationManager, SectionStore, SessionSlot};
use papermate_pdf::SegmenterConfig;

/// Shared application state accessible from all handlers.
pub struct AppState {
    /// The single current session: uploaded paper's sections + history.
    pub session: SessionSlot,
    pub manager: ConversationManager,
    pub store: SectionStore,
    pub segmenter: SegmenterConfig,
    /// Directory holding the current session's section files.
    pub sections_root: PathBuf,
    /// Base URL of the OpenAI-compatible API (key and model arrive
    /// per-request via headers).
    pub base_url: String,
}
