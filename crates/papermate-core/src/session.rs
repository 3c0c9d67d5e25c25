//! The single current session and its store abstraction.

use std::path::PathBuf;
use std::sync::Mutex;

use uuid::Uuid;

use crate::chat::ChatHistory;

/// The record of the currently uploaded paper: its section files and the
/// accumulated conversation state.
#[derive(Debug, Clone)]
pub struct Session {
    pub id: Uuid,
    pub section_paths: Vec<PathBuf>,
    pub history: ChatHistory,
}

impl Session {
    /// A fresh session over newly written section files, with no history.
    pub fn new(section_paths: Vec<PathBuf>) -> Self {
        Self {
            id: Uuid::new_v4(),
            section_paths,
            history: ChatHistory::new(),
        }
    }
}

/// Holds the one current [`Session`].
///
/// This design supports exactly one paper at a time: a new upload replaces
/// the previous session's id, section references and history together, in
/// one store mutation, so a partial replace (new sections with stale
/// history) cannot be observed. The slot is explicit state passed through
/// the call chain, which lets tests construct isolated slots.
#[derive(Debug, Default)]
pub struct SessionSlot {
    inner: Mutex<Option<Session>>,
}

impl SessionSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically install `session` as the current one, discarding any
    /// previous session entirely. Returns the new session id.
    pub fn replace(&self, session: Session) -> Uuid {
        let id = session.id;
        *self.inner.lock().unwrap() = Some(session);
        id
    }

    /// Clone of the current session, if any.
    pub fn snapshot(&self) -> Option<Session> {
        self.inner.lock().unwrap().clone()
    }

    /// Commit a new history of record for session `id`, replacing (not
    /// merging with) the stored one. Returns `false` without committing
    /// when the current session is a different one, i.e. the snapshot the
    /// history was computed from has been superseded by a newer upload.
    pub fn commit_history(&self, id: Uuid, history: ChatHistory) -> bool {
        let mut guard = self.inner.lock().unwrap();
        match guard.as_mut() {
            Some(session) if session.id == id => {
                session.history = history;
                true
            }
            _ => false,
        }
    }
}
