//! Parley core domain types.
//!
//! This crate holds the pure conversation-synchronization domain: the
//! transcript store, the conversation state machine, the session model, and
//! the read-only view projection. It knows nothing about any concrete
//! messaging transport; the `parley-client` crate mediates between an
//! external messaging client and these types.

pub mod config;
pub mod entry;
pub mod error;
pub mod projection;
pub mod session;
pub mod state;
pub mod transcript;

// Re-export common types
pub use config::DeploymentConfig;
pub use entry::{ConversationEntry, EntryId, EntryPayload, SenderRole};
pub use error::{ParleyError, Result};
pub use projection::{project, project_at, RowKey, RowKind, TranscriptRow};
pub use session::{ConversationId, Session};
pub use state::{ConversationState, StateEvent, StateMachine};
pub use transcript::TranscriptStore;
