//! Mediation layer between an external messaging client and the Parley core.
//!
//! The vendor messaging SDK is consumed through the [`MessagingClient`]
//! capability trait plus a single tagged [`ClientEvent`] stream. The
//! [`ChatController`] actor translates that stream into transcript and
//! state-machine mutations and publishes reactive snapshots for the UI.
//!
//! # Module Structure
//!
//! - `client`: the abstract messaging client capability set
//! - `event`: the closed set of client events
//! - `controller`: the single-writer mediation actor and its UI handle
//! - `loopback`: an in-process echo backend for demos and tests

pub mod client;
pub mod controller;
pub mod event;
pub mod loopback;

// Re-export public API
pub use client::{
    AttachmentKind, BusinessHours, FetchOrder, MessagingClient, PreChatField, RemoteConfig,
};
pub use controller::{ChatController, ChatHandle, ChatSnapshot};
pub use event::{ClientEvent, NetworkState};
pub use loopback::LoopbackClient;
