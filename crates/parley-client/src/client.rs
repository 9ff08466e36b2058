//! Abstract messaging client capability set.
//!
//! The vendor messaging SDK (transport, retries, offline caching) sits behind
//! this trait. Parley only calls into it and consumes its event stream; it
//! never reimplements delivery semantics.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use parley_core::entry::ConversationEntry;
use parley_core::error::Result;
use parley_core::session::ConversationId;

/// Order in which `fetch_entries` returns the transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOrder {
    /// Oldest entries first.
    Ascending,
    /// Most recent entries first (the vendor default).
    Descending,
}

/// Kind of binary attachment being sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttachmentKind {
    Image,
    Pdf,
}

/// Business-hours lookup result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusinessHours {
    /// Whether the current time falls within configured business hours.
    pub within_hours: bool,
}

/// One pre-chat field from the remote configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreChatField {
    pub name: String,
    pub required: bool,
    #[serde(default)]
    pub value: Option<String>,
}

/// Remote configuration retrieved from the messaging service.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default)]
    pub pre_chat_fields: Vec<PreChatField>,
}

impl RemoteConfig {
    /// Fills every required field that has no value yet.
    ///
    /// A real UI would collect these from the user; callers without one
    /// submit a default so conversation creation is not blocked.
    pub fn fill_required(&mut self, value: &str) {
        for field in &mut self.pre_chat_fields {
            if field.required && field.value.is_none() {
                field.value = Some(value.to_string());
            }
        }
    }
}

/// The external messaging client the conversation core consumes.
///
/// All calls are asynchronous; asynchronous events (message received, send
/// failed, typing, errors) arrive separately through a [`ClientEvent`]
/// channel handed to the controller.
///
/// [`ClientEvent`]: crate::event::ClientEvent
#[async_trait]
pub trait MessagingClient: Send + Sync {
    /// Binds the client to a conversation and starts listening for events.
    async fn start_session(&self, conversation_id: ConversationId) -> Result<()>;

    /// Sends a text message to the conversation.
    async fn send_text(&self, text: &str) -> Result<()>;

    /// Sends a binary attachment to the conversation.
    async fn send_attachment(&self, bytes: Vec<u8>, kind: AttachmentKind) -> Result<()>;

    /// Fetches conversation entries. `limit` of 0 means no limit; a cursor
    /// timestamp restricts the result to entries older than it (paging).
    async fn fetch_entries(
        &self,
        limit: usize,
        cursor: Option<DateTime<Utc>>,
        order: FetchOrder,
    ) -> Result<Vec<ConversationEntry>>;

    /// Looks up the configured business hours.
    async fn fetch_business_hours(&self) -> Result<BusinessHours>;

    /// Retrieves the remote configuration (pre-chat fields).
    async fn fetch_remote_config(&self) -> Result<RemoteConfig>;

    /// Submits filled pre-chat fields, creating the conversation on submit.
    async fn submit_remote_config(&self, config: RemoteConfig) -> Result<()>;

    /// Ends the current session.
    async fn end_session(&self) -> Result<()>;
}
