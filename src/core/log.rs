//! Game log: the semantic content of each user-facing log line.
//!
//! Rendering (markup, localisation, colour) belongs to the caller; the engine
//! only composes the sentence.

use im::Vector;
use serde::{Deserialize, Serialize};

use super::entity::EntityId;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Operating round the line belongs to (0 during setup).
    pub round: u32,
    /// Entity the line is about, if any.
    pub entity: Option<EntityId>,
    pub message: String,
}

/// Append-only list of log entries.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameLog {
    entries: Vector<LogEntry>,
}

impl GameLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, round: u32, entity: Option<EntityId>, message: impl Into<String>) {
        self.entries.push_back(LogEntry {
            round,
            entity,
            message: message.into(),
        });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    /// Entries from index `from` on.
    pub fn since(&self, from: usize) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter().skip(from)
    }

    /// Messages only, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.message.as_str()).collect()
    }
}
