//! Asynchronous events emitted by the messaging client.
//!
//! The vendor SDK exposes these as many separate delegate hooks; here they
//! are a single closed set of tagged variants consumed from one channel by
//! the [`ChatController`].
//!
//! [`ChatController`]: crate::controller::ChatController

use serde::{Deserialize, Serialize};

use parley_core::entry::{ConversationEntry, EntryId};
use parley_core::session::ConversationId;

/// Network connectivity as reported by the client. Observability only; it
/// never mutates transcript or state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum NetworkState {
    Connected,
    Degraded,
    Offline,
}

/// High-level events the messaging client can emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// New conversation entries arrived.
    EntriesReceived {
        conversation_id: ConversationId,
        entries: Vec<ConversationEntry>,
        #[serde(default)]
        paged: bool,
    },
    /// Status of existing entries changed (delivery receipts etc.).
    EntriesUpdated {
        conversation_id: ConversationId,
        entries: Vec<ConversationEntry>,
    },
    /// An outbound message was accepted by the service.
    MessageSent {
        conversation_id: ConversationId,
        entry: ConversationEntry,
    },
    /// An outbound message could not be delivered.
    SendFailed {
        conversation_id: ConversationId,
        entry_id: EntryId,
        message: String,
    },
    /// The remote participant started typing.
    TypingStarted { conversation_id: ConversationId },
    /// The remote participant stopped typing.
    TypingStopped { conversation_id: ConversationId },
    /// Network connectivity changed.
    NetworkChanged { state: NetworkState },
    /// The client reported an SDK-level error.
    ClientError { message: String },
}

impl ClientEvent {
    /// The conversation this event is scoped to, if any.
    pub fn conversation_id(&self) -> Option<ConversationId> {
        match self {
            Self::EntriesReceived {
                conversation_id, ..
            }
            | Self::EntriesUpdated {
                conversation_id, ..
            }
            | Self::MessageSent {
                conversation_id, ..
            }
            | Self::SendFailed {
                conversation_id, ..
            }
            | Self::TypingStarted { conversation_id }
            | Self::TypingStopped { conversation_id } => Some(*conversation_id),
            Self::NetworkChanged { .. } | Self::ClientError { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parley_core::entry::SenderRole;

    #[test]
    fn test_events_are_tagged_snake_case() {
        let event = ClientEvent::TypingStarted {
            conversation_id: ConversationId::new(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "typing_started");

        let event = ClientEvent::EntriesReceived {
            conversation_id: ConversationId::new(),
            entries: vec![ConversationEntry::text(SenderRole::Agent, "hi")],
            paged: false,
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "entries_received");
    }

    #[test]
    fn test_conversation_scope() {
        let id = ConversationId::new();
        let scoped = ClientEvent::TypingStopped {
            conversation_id: id,
        };
        assert_eq!(scoped.conversation_id(), Some(id));

        let unscoped = ClientEvent::NetworkChanged {
            state: NetworkState::Offline,
        };
        assert_eq!(unscoped.conversation_id(), None);
    }
}
