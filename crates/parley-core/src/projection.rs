//! Read-only projection of transcript + state into renderable rows.
//!
//! [`project`] is a pure function: no side effects, no external calls. It
//! yields a lazy, restartable sequence of row view-models keyed by entry
//! identifier, suitable for incremental diffing by a UI layer.

use chrono::{DateTime, Datelike, Utc};

use crate::entry::{ConversationEntry, EntryId, EntryPayload, SenderRole};
use crate::state::ConversationState;

/// Diffing key for one renderable row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// Row backed by a transcript entry.
    Entry(EntryId),
    /// The trailing typing-indicator row.
    TypingIndicator,
}

/// The visual content of one row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    /// A rendered text bubble.
    Bubble {
        body: String,
        sender: SenderRole,
        timestamp_label: String,
    },
    /// Entry kinds this client does not render (image, pdf, choice, unknown).
    Placeholder,
    /// Remote participant is typing.
    TypingIndicator,
}

/// One renderable row of the chat feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptRow {
    pub key: RowKey,
    pub kind: RowKind,
}

/// Projects transcript entries and the current state into renderable rows.
///
/// Text entries become bubbles; every other payload kind maps to an empty
/// placeholder row so the feed keeps one row per entry. When the remote
/// participant is typing, a trailing indicator row is appended.
pub fn project(
    entries: &[ConversationEntry],
    state: ConversationState,
) -> impl Iterator<Item = TranscriptRow> + '_ {
    project_at(entries, state, Utc::now())
}

/// Same as [`project`] with an explicit "now" used for timestamp labels.
pub fn project_at(
    entries: &[ConversationEntry],
    state: ConversationState,
    now: DateTime<Utc>,
) -> impl Iterator<Item = TranscriptRow> + '_ {
    let typing = matches!(state, ConversationState::Typing).then_some(TranscriptRow {
        key: RowKey::TypingIndicator,
        kind: RowKind::TypingIndicator,
    });

    entries
        .iter()
        .map(move |entry| entry_row(entry, now))
        .chain(typing)
}

fn entry_row(entry: &ConversationEntry, now: DateTime<Utc>) -> TranscriptRow {
    let kind = match &entry.payload {
        EntryPayload::Text { body } => RowKind::Bubble {
            body: body.clone(),
            sender: entry.sender,
            timestamp_label: timestamp_label(entry.timestamp, now),
        },
        _ => RowKind::Placeholder,
    };
    TranscriptRow {
        key: RowKey::Entry(entry.id),
        kind,
    }
}

/// Formats an entry timestamp for display.
///
/// Same-day entries show only the clock time ("3:07 PM"); older entries are
/// prefixed with the date ("Aug 3, 3:07 PM").
pub fn timestamp_label(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    if timestamp.ordinal() == now.ordinal() && timestamp.year() == now.year() {
        timestamp.format("%-I:%M %p").to_string()
    } else {
        timestamp.format("%b %-d, %-I:%M %p").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entry::EntryId;
    use chrono::TimeZone;

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    #[test]
    fn test_text_entries_become_bubbles() {
        let entries = vec![ConversationEntry::text(SenderRole::Agent, "hello")];
        let rows: Vec<_> = project_at(&entries, ConversationState::Idle, Utc::now()).collect();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].key, RowKey::Entry(entries[0].id));
        match &rows[0].kind {
            RowKind::Bubble { body, sender, .. } => {
                assert_eq!(body, "hello");
                assert_eq!(*sender, SenderRole::Agent);
            }
            other => panic!("expected bubble, got {:?}", other),
        }
    }

    #[test]
    fn test_non_text_entries_become_placeholders() {
        let entries = vec![
            ConversationEntry::new(
                EntryId::new(),
                SenderRole::User,
                Utc::now(),
                EntryPayload::Image {
                    file_name: "photo.png".into(),
                },
            ),
            ConversationEntry::new(
                EntryId::new(),
                SenderRole::Agent,
                Utc::now(),
                EntryPayload::Unknown,
            ),
        ];
        let rows: Vec<_> = project_at(&entries, ConversationState::Idle, Utc::now()).collect();

        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.kind == RowKind::Placeholder));
    }

    #[test]
    fn test_typing_state_appends_indicator_row() {
        let entries = vec![ConversationEntry::text(SenderRole::User, "hi")];
        let rows: Vec<_> = project_at(&entries, ConversationState::Typing, Utc::now()).collect();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].key, RowKey::TypingIndicator);
        assert_eq!(rows[1].kind, RowKind::TypingIndicator);

        let rows: Vec<_> = project_at(&entries, ConversationState::Loading, Utc::now()).collect();
        assert_eq!(rows.len(), 1);
    }

    #[test]
    fn test_projection_is_restartable() {
        let entries = vec![ConversationEntry::text(SenderRole::User, "hi")];
        let rows = project_at(&entries, ConversationState::Idle, Utc::now());
        let first: Vec<_> = rows.collect();
        let second: Vec<_> = project_at(&entries, ConversationState::Idle, Utc::now()).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_timestamp_label_same_day_and_older() {
        let now = at(2026, 8, 29, 18, 0);

        assert_eq!(timestamp_label(at(2026, 8, 29, 15, 7), now), "3:07 PM");
        assert_eq!(timestamp_label(at(2026, 8, 3, 15, 7), now), "Aug 3, 3:07 PM");
        // Same ordinal day in a different year still shows the date.
        assert_eq!(
            timestamp_label(at(2025, 8, 29, 9, 30), now),
            "Aug 29, 9:30 AM"
        );
    }
}
