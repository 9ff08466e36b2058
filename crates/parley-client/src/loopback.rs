//! In-process messaging backend.
//!
//! `LoopbackClient` implements [`MessagingClient`] against an in-memory
//! entry log and echoes every text message back as an agent reply, emitting
//! the same event sequence a real vendor client would (message sent, typing
//! started, entries received, typing stopped). It backs the CLI demo and the
//! integration tests; scripted failure hooks make the error paths testable.

use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::mpsc;

use parley_core::entry::{ConversationEntry, EntryId, EntryPayload, SenderRole};
use parley_core::error::{ParleyError, Result};
use parley_core::session::ConversationId;

use crate::client::{
    AttachmentKind, BusinessHours, FetchOrder, MessagingClient, PreChatField, RemoteConfig,
};
use crate::event::ClientEvent;

const EVENT_CHANNEL_CAPACITY: usize = 64;

#[derive(Default)]
struct Inner {
    conversation_id: Option<ConversationId>,
    /// Entry log, oldest first.
    log: Vec<ConversationEntry>,
    fail_next_send: bool,
    fail_next_fetch: bool,
    within_hours: bool,
}

/// In-memory [`MessagingClient`] with an echoing agent.
pub struct LoopbackClient {
    inner: Mutex<Inner>,
    events: mpsc::Sender<ClientEvent>,
}

impl LoopbackClient {
    /// Creates a client and the event stream it emits into.
    pub fn new() -> (std::sync::Arc<Self>, mpsc::Receiver<ClientEvent>) {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let client = std::sync::Arc::new(Self {
            inner: Mutex::new(Inner {
                within_hours: true,
                ..Inner::default()
            }),
            events: event_tx,
        });
        (client, event_rx)
    }

    /// Makes the next `send_text` fail (direct result and event).
    pub fn fail_next_send(&self) {
        self.inner.lock().unwrap().fail_next_send = true;
    }

    /// Makes the next `fetch_entries` fail with a transport error.
    pub fn fail_next_fetch(&self) {
        self.inner.lock().unwrap().fail_next_fetch = true;
    }

    /// Controls the answer of `fetch_business_hours`.
    pub fn set_within_hours(&self, within: bool) {
        self.inner.lock().unwrap().within_hours = within;
    }

    /// Pushes an arbitrary event into the stream (test hook).
    pub async fn inject(&self, event: ClientEvent) {
        let _ = self.events.send(event).await;
    }

    async fn emit(&self, event: ClientEvent) {
        let _ = self.events.send(event).await;
    }

    fn current_conversation(&self) -> Result<ConversationId> {
        self.inner
            .lock()
            .unwrap()
            .conversation_id
            .ok_or(ParleyError::SessionClosed)
    }
}

#[async_trait]
impl MessagingClient for LoopbackClient {
    async fn start_session(&self, conversation_id: ConversationId) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.conversation_id = Some(conversation_id);
        inner.log.clear();
        Ok(())
    }

    async fn send_text(&self, text: &str) -> Result<()> {
        let conversation_id = self.current_conversation()?;

        let failed = std::mem::take(&mut self.inner.lock().unwrap().fail_next_send);
        if failed {
            self.emit(ClientEvent::SendFailed {
                conversation_id,
                entry_id: EntryId::new(),
                message: "loopback send failure".to_string(),
            })
            .await;
            return Err(ParleyError::send_failed("loopback send failure"));
        }

        let user_entry = ConversationEntry::text(SenderRole::User, text);
        let agent_entry =
            ConversationEntry::text(SenderRole::Agent, format!("You said: \"{text}\""));
        {
            let mut inner = self.inner.lock().unwrap();
            inner.log.push(user_entry.clone());
            inner.log.push(agent_entry.clone());
        }

        self.emit(ClientEvent::MessageSent {
            conversation_id,
            entry: user_entry,
        })
        .await;
        self.emit(ClientEvent::TypingStarted { conversation_id }).await;
        self.emit(ClientEvent::EntriesReceived {
            conversation_id,
            entries: vec![agent_entry],
            paged: false,
        })
        .await;
        self.emit(ClientEvent::TypingStopped { conversation_id }).await;

        Ok(())
    }

    async fn send_attachment(&self, _bytes: Vec<u8>, kind: AttachmentKind) -> Result<()> {
        let conversation_id = self.current_conversation()?;

        let payload = match kind {
            AttachmentKind::Image => EntryPayload::Image {
                file_name: "attachment.png".to_string(),
            },
            AttachmentKind::Pdf => EntryPayload::Pdf {
                file_name: "attachment.pdf".to_string(),
            },
        };
        let entry = ConversationEntry::new(
            EntryId::new(),
            SenderRole::User,
            chrono::Utc::now(),
            payload,
        );
        self.inner.lock().unwrap().log.push(entry.clone());

        self.emit(ClientEvent::MessageSent {
            conversation_id,
            entry,
        })
        .await;
        Ok(())
    }

    async fn fetch_entries(
        &self,
        limit: usize,
        cursor: Option<chrono::DateTime<chrono::Utc>>,
        order: FetchOrder,
    ) -> Result<Vec<ConversationEntry>> {
        let mut inner = self.inner.lock().unwrap();
        if std::mem::take(&mut inner.fail_next_fetch) {
            return Err(ParleyError::transport("loopback fetch failure"));
        }

        let mut entries: Vec<ConversationEntry> = inner
            .log
            .iter()
            .filter(|entry| cursor.map_or(true, |ts| entry.timestamp < ts))
            .cloned()
            .collect();
        if matches!(order, FetchOrder::Descending) {
            entries.reverse();
        }
        if limit > 0 {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    async fn fetch_business_hours(&self) -> Result<BusinessHours> {
        Ok(BusinessHours {
            within_hours: self.inner.lock().unwrap().within_hours,
        })
    }

    async fn fetch_remote_config(&self) -> Result<RemoteConfig> {
        Ok(RemoteConfig {
            pre_chat_fields: vec![PreChatField {
                name: "origin".to_string(),
                required: true,
                value: None,
            }],
        })
    }

    async fn submit_remote_config(&self, config: RemoteConfig) -> Result<()> {
        for field in &config.pre_chat_fields {
            if field.required && field.value.is_none() {
                return Err(ParleyError::config(format!(
                    "required pre-chat field '{}' has no value",
                    field.name
                )));
            }
        }
        Ok(())
    }

    async fn end_session(&self) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.conversation_id = None;
        inner.log.clear();
        Ok(())
    }
}
