//! Session domain model.
//!
//! A session is one logical conversation identified by an opaque token.
//! Sessions are replaced wholesale on reset; the identity of an existing
//! session is never partially mutated.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque token identifying one logical conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConversationId(Uuid);

impl ConversationId {
    /// Issues a fresh random conversation token.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConversationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ConversationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// One logical conversation session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The conversation this session is bound to.
    pub conversation_id: ConversationId,
    /// When the session was created.
    pub started_at: DateTime<Utc>,
}

impl Session {
    /// Creates a session with a freshly issued conversation token.
    pub fn new() -> Self {
        Self {
            conversation_id: ConversationId::new(),
            started_at: Utc::now(),
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sessions_get_distinct_tokens() {
        assert_ne!(Session::new().conversation_id, Session::new().conversation_id);
    }
}
