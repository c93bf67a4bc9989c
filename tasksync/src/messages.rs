//! Change notifications pushed by the store to live subscribers.

use serde::{Deserialize, Serialize};

/// The kind of write a [`ChangeNotification`] reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WriteKind {
    Insert,
    Update,
    Delete,
}

impl WriteKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            WriteKind::Insert => "insert",
            WriteKind::Update => "update",
            WriteKind::Delete => "delete",
        }
    }
}

/// Lightweight event emitted after every successful write to the store.
///
/// Subscribers treat it purely as a "something changed" signal: delivery is
/// at-least-once per write, with no ordering or deduplication guarantee across
/// notifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeNotification {
    /// The table that was written (e.g., `"tasks"`).
    pub table: String,
    pub kind: WriteKind,
    /// Primary key of the affected row.
    pub primary_key: String,
}

impl ChangeNotification {
    pub fn new(table: impl Into<String>, kind: WriteKind, primary_key: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            kind,
            primary_key: primary_key.into(),
        }
    }
}
