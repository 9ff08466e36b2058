//! Single-writer mediation between the messaging client and the UI.
//!
//! `ChatController` owns the transcript and the state machine inside one
//! actor task. Client events, UI commands, and the outcomes of spawned
//! client calls all fan into that task over channels, so every mutation is
//! serialized onto one logical execution context. The UI holds only a
//! [`ChatHandle`] with a reactive read-only snapshot subscription.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};

use parley_core::entry::ConversationEntry;
use parley_core::error::{ParleyError, Result};
use parley_core::projection::{self, TranscriptRow};
use parley_core::session::{ConversationId, Session};
use parley_core::state::{ConversationState, StateEvent, StateMachine};
use parley_core::transcript::TranscriptStore;

use crate::client::{AttachmentKind, FetchOrder, MessagingClient};
use crate::event::ClientEvent;

/// Placeholder submitted for required pre-chat fields when no UI collected
/// a value; conversation creation must not block on them.
const DEFAULT_PRE_CHAT_VALUE: &str = "value";

const COMMAND_CHANNEL_CAPACITY: usize = 32;
const OUTCOME_CHANNEL_CAPACITY: usize = 32;

/// Point-in-time view of the conversation published to subscribers.
#[derive(Debug, Clone)]
pub struct ChatSnapshot {
    /// The conversation this snapshot belongs to.
    pub conversation_id: ConversationId,
    /// Transcript entries, oldest first.
    pub entries: Arc<[ConversationEntry]>,
    /// Current conversation state.
    pub state: ConversationState,
}

impl ChatSnapshot {
    /// Projects this snapshot into renderable rows.
    pub fn rows(&self) -> impl Iterator<Item = TranscriptRow> + '_ {
        projection::project(&self.entries, self.state)
    }
}

/// Commands issued by the UI layer.
enum Command {
    SendText {
        text: String,
        ack: oneshot::Sender<Result<()>>,
    },
    SendAttachment {
        bytes: Vec<u8>,
        kind: AttachmentKind,
    },
    Reset {
        ack: oneshot::Sender<ConversationId>,
    },
    End {
        ack: oneshot::Sender<Result<()>>,
    },
}

/// Results of client calls spawned off the actor loop.
enum Outcome {
    SendResolved {
        error: Option<ParleyError>,
    },
    AttachmentResolved {
        error: Option<ParleyError>,
    },
    RefetchResolved {
        conversation_id: ConversationId,
        result: Result<Vec<ConversationEntry>>,
    },
}

/// The event-mediating actor.
///
/// Sole writer of [`TranscriptStore`] and [`StateMachine`]; both are owned
/// here and exposed read-only through the snapshot channel.
pub struct ChatController {
    client: Arc<dyn MessagingClient>,
    session: Session,
    transcript: TranscriptStore,
    machine: StateMachine,
    snapshot_tx: watch::Sender<ChatSnapshot>,
    outcome_tx: mpsc::Sender<Outcome>,
}

impl ChatController {
    /// Spawns the controller actor and returns a handle for the UI layer.
    ///
    /// `events` is the tagged event stream of the messaging client. The
    /// controller starts a fresh session, submits pre-chat configuration,
    /// and performs an initial transcript sync.
    pub fn spawn(
        client: Arc<dyn MessagingClient>,
        events: mpsc::Receiver<ClientEvent>,
    ) -> ChatHandle {
        let session = Session::new();
        let (command_tx, command_rx) = mpsc::channel(COMMAND_CHANNEL_CAPACITY);
        let (outcome_tx, outcome_rx) = mpsc::channel(OUTCOME_CHANNEL_CAPACITY);

        let initial = ChatSnapshot {
            conversation_id: session.conversation_id,
            entries: TranscriptStore::new().snapshot(),
            state: ConversationState::Idle,
        };
        let (snapshot_tx, snapshot_rx) = watch::channel(initial);

        let controller = Self {
            client: Arc::clone(&client),
            session,
            transcript: TranscriptStore::new(),
            machine: StateMachine::new(),
            snapshot_tx,
            outcome_tx,
        };
        tokio::spawn(controller.run(command_rx, events, outcome_rx));

        ChatHandle {
            commands: command_tx,
            snapshot_rx,
            client,
        }
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        mut events: mpsc::Receiver<ClientEvent>,
        mut outcomes: mpsc::Receiver<Outcome>,
    ) {
        self.bootstrap_session().await;
        self.spawn_refetch();

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(command) => self.handle_command(command).await,
                    // All handles dropped; stop mediating.
                    None => break,
                },
                Some(event) = events.recv() => self.handle_event(event),
                Some(outcome) = outcomes.recv() => self.handle_outcome(outcome),
            }
        }
        debug!("chat controller stopped");
    }

    /// Starts the client session and submits pre-chat configuration.
    ///
    /// Failures here are logged and non-fatal: the chat stays usable and
    /// simply misses whatever the failed step would have provided.
    async fn bootstrap_session(&mut self) {
        let conversation_id = self.session.conversation_id;
        if let Err(e) = self.client.start_session(conversation_id).await {
            warn!(%conversation_id, error = %e, "failed to start messaging session");
        }

        match self.client.fetch_remote_config().await {
            Ok(mut config) => {
                config.fill_required(DEFAULT_PRE_CHAT_VALUE);
                if let Err(e) = self.client.submit_remote_config(config).await {
                    warn!(error = %e, "failed to submit pre-chat configuration");
                }
            }
            Err(e) => debug!(error = %e, "remote configuration unavailable"),
        }
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::SendText { text, ack } => {
                self.apply(StateEvent::SendIssued);
                let client = Arc::clone(&self.client);
                let outcome_tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let result = client.send_text(&text).await;
                    let error = result.as_ref().err().cloned();
                    let _ = ack.send(result);
                    let _ = outcome_tx.send(Outcome::SendResolved { error }).await;
                });
            }
            Command::SendAttachment { bytes, kind } => {
                self.apply(StateEvent::SendIssued);
                let client = Arc::clone(&self.client);
                let outcome_tx = self.outcome_tx.clone();
                tokio::spawn(async move {
                    let error = client.send_attachment(bytes, kind).await.err();
                    let _ = outcome_tx.send(Outcome::AttachmentResolved { error }).await;
                });
            }
            Command::Reset { ack } => {
                let conversation_id = self.reset_session().await;
                let _ = ack.send(conversation_id);
            }
            Command::End { ack } => {
                let result = self.client.end_session().await;
                if let Err(e) = &result {
                    warn!(error = %e, "failed to end messaging session");
                }
                self.reset_session().await;
                let _ = ack.send(result);
            }
        }
    }

    /// Destroys the current session and starts a fresh one.
    ///
    /// The transcript is emptied, the state machine returns to idle, and a
    /// new conversation token is issued; the old session is never partially
    /// reused.
    async fn reset_session(&mut self) -> ConversationId {
        self.transcript.clear();
        self.machine.apply(StateEvent::SessionReset);
        self.session = Session::new();
        let conversation_id = self.session.conversation_id;
        info!(%conversation_id, "session reset");
        self.publish();
        self.bootstrap_session().await;
        conversation_id
    }

    fn handle_event(&mut self, event: ClientEvent) {
        // Events for a stale conversation are dropped, not escalated.
        if let Some(scope) = event.conversation_id() {
            if scope != self.session.conversation_id {
                debug!(
                    %scope,
                    current = %self.session.conversation_id,
                    "dropping event for stale conversation"
                );
                return;
            }
        }

        match event {
            ClientEvent::EntriesReceived { entries, paged, .. } => {
                let mut inserted = 0;
                for entry in entries {
                    if self.transcript.append(entry) {
                        inserted += 1;
                    }
                }
                debug!(inserted, paged, "entries received");
                self.apply(StateEvent::EntriesReceived);
            }
            ClientEvent::EntriesUpdated { entries, .. } => {
                // Status-only by policy: delivery receipts never mutate the
                // transcript. Content always re-arrives via EntriesReceived
                // or the post-send resync.
                debug!(count = entries.len(), "entry status update");
                self.apply(StateEvent::EntriesUpdated);
            }
            ClientEvent::MessageSent { entry, .. } => {
                // Self-healing resync: the client's local cache may diverge
                // from server state after a successful send, so refetch the
                // whole transcript instead of trusting an incremental append.
                debug!(entry_id = %entry.id, "message sent, resyncing transcript");
                self.apply(StateEvent::SendIssued);
                self.spawn_refetch();
            }
            ClientEvent::SendFailed {
                entry_id, message, ..
            } => {
                warn!(%entry_id, %message, "message failed to send");
                self.apply(StateEvent::SendFailed);
            }
            ClientEvent::TypingStarted { .. } => {
                self.apply(StateEvent::TypingStarted);
            }
            ClientEvent::TypingStopped { .. } => {
                self.apply(StateEvent::TypingStopped);
            }
            ClientEvent::NetworkChanged { state } => {
                // Observability only; no transcript or state mutation.
                info!(%state, "network state changed");
                return;
            }
            ClientEvent::ClientError { message } => {
                warn!(%message, "messaging client error");
                self.apply(StateEvent::ClientError);
            }
        }
        self.publish();
    }

    fn handle_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::SendResolved { error } => {
                if let Some(e) = error {
                    warn!(error = %e, "send rejected by client");
                    self.apply(StateEvent::SendFailed);
                    self.publish();
                }
                // On success the client's MessageSent event drives the
                // resync back to idle.
            }
            Outcome::AttachmentResolved { error } => {
                match error {
                    Some(e) => {
                        warn!(error = %e, "attachment rejected by client");
                        self.apply(StateEvent::SendFailed);
                    }
                    None => {
                        self.apply(StateEvent::SendDelivered);
                    }
                }
                self.publish();
            }
            Outcome::RefetchResolved {
                conversation_id,
                result,
            } => {
                if conversation_id != self.session.conversation_id {
                    debug!(%conversation_id, "dropping resync result for stale conversation");
                    return;
                }
                match result {
                    Ok(entries) => {
                        self.transcript.replace_all(entries);
                        self.apply(StateEvent::EntriesReceived);
                    }
                    Err(e) => {
                        // Transcript stays untouched; best-effort chat.
                        warn!(error = %e, "transcript resync failed");
                        self.apply(StateEvent::ClientError);
                    }
                }
                self.publish();
            }
        }
    }

    /// Spawns a full transcript fetch; the result re-enters the actor loop
    /// as an outcome so mutations stay single-writer.
    fn spawn_refetch(&self) {
        let client = Arc::clone(&self.client);
        let outcome_tx = self.outcome_tx.clone();
        let conversation_id = self.session.conversation_id;
        tokio::spawn(async move {
            let result = client.fetch_entries(0, None, FetchOrder::Descending).await;
            let _ = outcome_tx
                .send(Outcome::RefetchResolved {
                    conversation_id,
                    result,
                })
                .await;
        });
    }

    fn apply(&mut self, event: StateEvent) {
        self.machine.apply(event);
    }

    fn publish(&self) {
        let _ = self.snapshot_tx.send(ChatSnapshot {
            conversation_id: self.session.conversation_id,
            entries: self.transcript.snapshot(),
            state: self.machine.current(),
        });
    }
}

/// Cloneable handle exposed to the UI layer.
///
/// Commands go through the controller actor; reads come from the snapshot
/// subscription.
#[derive(Clone)]
pub struct ChatHandle {
    commands: mpsc::Sender<Command>,
    snapshot_rx: watch::Receiver<ChatSnapshot>,
    client: Arc<dyn MessagingClient>,
}

impl ChatHandle {
    /// Sends a text message.
    ///
    /// Resolves once the client accepted (or rejected) the send; delivery
    /// confirmation then arrives asynchronously and triggers a transcript
    /// resync.
    ///
    /// # Errors
    ///
    /// Returns the client's rejection, or [`ParleyError::SessionClosed`] if
    /// the controller has stopped.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(Command::SendText {
                text: text.into(),
                ack: ack_tx,
            })
            .await
            .map_err(|_| ParleyError::SessionClosed)?;
        ack_rx.await.map_err(|_| ParleyError::SessionClosed)?
    }

    /// Sends a binary attachment, fire-and-forget. Failures are logged by
    /// the controller.
    pub async fn send_attachment(&self, bytes: Vec<u8>, kind: AttachmentKind) -> Result<()> {
        self.commands
            .send(Command::SendAttachment { bytes, kind })
            .await
            .map_err(|_| ParleyError::SessionClosed)
    }

    /// Destroys the current session and starts a fresh one.
    ///
    /// Returns the newly issued conversation token.
    pub async fn reset_session(&self) -> Result<ConversationId> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(Command::Reset { ack: ack_tx })
            .await
            .map_err(|_| ParleyError::SessionClosed)?;
        ack_rx.await.map_err(|_| ParleyError::SessionClosed)
    }

    /// Ends the conversation on the client, then resets to a fresh session.
    pub async fn end_session(&self) -> Result<()> {
        let (ack_tx, ack_rx) = oneshot::channel();
        self.commands
            .send(Command::End { ack: ack_tx })
            .await
            .map_err(|_| ParleyError::SessionClosed)?;
        ack_rx.await.map_err(|_| ParleyError::SessionClosed)?
    }

    /// Checks whether the current time is within configured business hours.
    ///
    /// Pure client lookup; no transcript or state mutation.
    pub async fn check_business_hours(&self) -> Result<bool> {
        let hours = self.client.fetch_business_hours().await?;
        Ok(hours.within_hours)
    }

    /// Returns the latest published snapshot.
    pub fn snapshot(&self) -> ChatSnapshot {
        self.snapshot_rx.borrow().clone()
    }

    /// Subscribes to snapshot updates.
    pub fn subscribe(&self) -> watch::Receiver<ChatSnapshot> {
        self.snapshot_rx.clone()
    }
}
