//! Last retrieved context, per session.
//!
//! Backs the "give me more detail" request: after a query is answered the
//! full section it came from is stored here under the caller's session id.
//! Sessions never see each other's context. Clients that do not identify
//! themselves all share [`DEFAULT_SESSION`], so concurrent anonymous clients
//! overwrite each other (last writer wins).

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

/// Session used when the caller supplies none.
pub const DEFAULT_SESSION: &str = "default";
/// Returned for sessions that have not asked anything yet.
pub const NO_CONTEXT: &str = "No context available.";

#[derive(Debug, Default)]
pub struct ConversationStore {
    contexts: Mutex<HashMap<String, String>>,
}

impl ConversationStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite the session's context.
    pub fn set(&self, session: &str, context: impl Into<String>) {
        self.contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(session.to_string(), context.into());
    }

    /// The session's last context, or [`NO_CONTEXT`].
    #[must_use]
    pub fn get(&self, session: &str) -> String {
        self.contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(session)
            .cloned()
            .unwrap_or_else(|| NO_CONTEXT.to_string())
    }

    /// Number of sessions with a stored context.
    #[must_use]
    pub fn len(&self) -> usize {
        self.contexts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
