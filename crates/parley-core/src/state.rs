//! Conversation state machine.
//!
//! A small explicit machine tracking what the conversation is currently
//! doing from the UI's point of view. Transitions are last-write-wins: the
//! messaging client provides no sequencing tokens, so a later event always
//! overrides an in-flight state regardless of wall-clock causality.

use serde::{Deserialize, Serialize};

/// The single active state of a conversation.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ConversationState {
    /// Nothing in flight.
    #[default]
    Idle,
    /// An outbound send or a transcript resync is in flight.
    Loading,
    /// The remote participant is typing.
    Typing,
}

/// Closed input alphabet of the state machine.
///
/// Only the event mediator feeds these; the UI never drives transitions
/// directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StateEvent {
    /// A batch of entries arrived (or a resync finished).
    EntriesReceived,
    /// A status-only update to existing entries arrived.
    EntriesUpdated,
    /// The remote participant started typing.
    TypingStarted,
    /// The remote participant stopped typing.
    TypingStopped,
    /// An outbound send was issued (or a post-send resync started).
    SendIssued,
    /// An outbound send was acknowledged without a pending resync.
    SendDelivered,
    /// An outbound send failed.
    SendFailed,
    /// The messaging client reported an error.
    ClientError,
    /// A new session replaced the current one.
    SessionReset,
}

/// Tracks the current [`ConversationState`] for the lifetime of a session.
///
/// There is no terminal state; the machine is reset to `Idle` when a new
/// session is created.
#[derive(Debug, Default)]
pub struct StateMachine {
    current: ConversationState,
}

impl StateMachine {
    /// Creates a machine in the initial `Idle` state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    pub fn current(&self) -> ConversationState {
        self.current
    }

    /// Applies one event and returns the new state (last write wins).
    pub fn apply(&mut self, event: StateEvent) -> ConversationState {
        let next = match event {
            StateEvent::TypingStarted => ConversationState::Typing,
            StateEvent::SendIssued => ConversationState::Loading,
            StateEvent::EntriesReceived
            | StateEvent::EntriesUpdated
            | StateEvent::TypingStopped
            | StateEvent::SendDelivered
            | StateEvent::SendFailed
            | StateEvent::ClientError
            | StateEvent::SessionReset => ConversationState::Idle,
        };
        self.current = next;
        next
    }
}
