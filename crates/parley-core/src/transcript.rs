//! Ordered, deduplicated transcript storage.

use std::collections::HashSet;
use std::sync::Arc;

use crate::entry::{ConversationEntry, EntryId};

/// Ordered collection of conversation entries.
///
/// The store keeps entries oldest-first for rendering and guarantees that no
/// two entries share an identifier. It has exactly one writer (the event
/// mediator); readers receive point-in-time snapshots via [`snapshot`].
///
/// [`snapshot`]: TranscriptStore::snapshot
#[derive(Debug, Default)]
pub struct TranscriptStore {
    entries: Vec<ConversationEntry>,
    seen: HashSet<EntryId>,
}

impl TranscriptStore {
    /// Creates an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole transcript with a freshly fetched batch.
    ///
    /// The messaging client delivers entries most-recent-first; they are
    /// reversed here so the stored order is chronological ascending.
    /// Duplicate identifiers within the batch keep their first (oldest)
    /// occurrence. Idempotent for identical input.
    pub fn replace_all<I>(&mut self, entries: I)
    where
        I: IntoIterator<Item = ConversationEntry>,
        I::IntoIter: DoubleEndedIterator,
    {
        self.entries.clear();
        self.seen.clear();
        for entry in entries.into_iter().rev() {
            self.append(entry);
        }
    }

    /// Appends one entry at the end, unless its identifier is already present.
    ///
    /// Returns `true` if an insertion occurred. Duplicate appends are no-ops.
    pub fn append(&mut self, entry: ConversationEntry) -> bool {
        if !self.seen.insert(entry.id) {
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Empties the transcript (used on session reset).
    pub fn clear(&mut self) {
        self.entries.clear();
        self.seen.clear();
    }

    /// Returns the stored entries, oldest first.
    pub fn entries(&self) -> &[ConversationEntry] {
        &self.entries
    }

    /// Returns whether an entry with this identifier is stored.
    pub fn contains(&self, id: EntryId) -> bool {
        self.seen.contains(&id)
    }

    /// Number of stored entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if the transcript holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns a consistent point-in-time copy of the transcript.
    ///
    /// Later mutations of the store are never visible through a snapshot.
    pub fn snapshot(&self) -> Arc<[ConversationEntry]> {
        self.entries.as_slice().into()
    }
}
