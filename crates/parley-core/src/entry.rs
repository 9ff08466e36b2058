//! Conversation entry types.
//!
//! This module contains types for representing one unit of conversation
//! content: who sent it, when, and what kind of payload it carries.
//! Entries are immutable once created; identity is the [`EntryId`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a conversation entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Uuid);

impl EntryId {
    /// Generates a fresh random identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Represents the role of the participant that produced an entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SenderRole {
    /// Entry authored by the end user.
    User,
    /// Entry authored by a human agent.
    Agent,
    /// Entry authored by an automated chatbot.
    Chatbot,
    /// System-generated entry (notices, receipts).
    System,
}

/// The content carried by a conversation entry.
///
/// Only text is rendered by the projection layer; the remaining kinds are
/// preserved so the transcript stays complete and orderable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EntryPayload {
    /// Plain text message.
    Text { body: String },
    /// Image attachment, referenced by file name.
    Image { file_name: String },
    /// PDF attachment, referenced by file name.
    Pdf { file_name: String },
    /// A selected choice reply.
    Choice { label: String },
    /// Payload kind not understood by this client version.
    Unknown,
}

/// A single immutable entry in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationEntry {
    /// Unique entry identifier; the transcript deduplicates on this.
    pub id: EntryId,
    /// Who produced the entry.
    pub sender: SenderRole,
    /// When the entry was created.
    pub timestamp: DateTime<Utc>,
    /// The entry content.
    pub payload: EntryPayload,
}

impl ConversationEntry {
    /// Creates an entry with an explicit identifier and timestamp.
    pub fn new(
        id: EntryId,
        sender: SenderRole,
        timestamp: DateTime<Utc>,
        payload: EntryPayload,
    ) -> Self {
        Self {
            id,
            sender,
            timestamp,
            payload,
        }
    }

    /// Creates a text entry timestamped now with a fresh identifier.
    pub fn text(sender: SenderRole, body: impl Into<String>) -> Self {
        Self {
            id: EntryId::new(),
            sender,
            timestamp: Utc::now(),
            payload: EntryPayload::Text { body: body.into() },
        }
    }

    /// Returns the text body if this is a text entry.
    pub fn text_body(&self) -> Option<&str> {
        match &self.payload {
            EntryPayload::Text { body } => Some(body.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_ids_are_unique() {
        let a = ConversationEntry::text(SenderRole::User, "hi");
        let b = ConversationEntry::text(SenderRole::User, "hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_payload_serialization_is_tagged() {
        let entry = ConversationEntry::text(SenderRole::Agent, "hello");
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["payload"]["kind"], "text");
        assert_eq!(json["payload"]["body"], "hello");
        assert_eq!(json["sender"], "agent");
    }

    #[test]
    fn test_text_body_accessor() {
        let entry = ConversationEntry::text(SenderRole::User, "hi");
        assert_eq!(entry.text_body(), Some("hi"));

        let entry = ConversationEntry::new(
            EntryId::new(),
            SenderRole::Agent,
            Utc::now(),
            EntryPayload::Unknown,
        );
        assert_eq!(entry.text_body(), None);
    }
}
