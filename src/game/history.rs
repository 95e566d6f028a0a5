//! Action history and state snapshots.
//!
//! History is append-only. Undo never mutates state backwards: it truncates
//! the log and replays the remainder against the baseline snapshot.

use serde::{Deserialize, Serialize};

use crate::core::{ActionRecord, GameState};
use crate::error::EngineError;
use crate::round::OperatingRound;

/// Every applied action in order, including synthesized ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionLog {
    records: Vec<ActionRecord>,
}

impl ActionLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record, numbering it by its position in the log.
    pub fn push(&mut self, mut record: ActionRecord) {
        record.sequence = self.records.len() as u32;
        self.records.push(record);
    }

    pub fn extend(&mut self, records: impl IntoIterator<Item = ActionRecord>) {
        for record in records {
            self.push(record);
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn records(&self) -> &[ActionRecord] {
        &self.records
    }

    /// Records that were submitted rather than synthesized.
    pub fn submitted(&self) -> impl Iterator<Item = &ActionRecord> {
        self.records.iter().filter(|r| !r.auto)
    }

    /// Remove the last `count` submitted records, along with any synthesized
    /// records that followed the earliest of them. Returns the number of
    /// submitted records removed.
    pub fn drop_submitted(&mut self, count: usize) -> usize {
        let mut removed = 0;
        let mut cut = self.records.len();
        for (i, record) in self.records.iter().enumerate().rev() {
            if removed == count {
                break;
            }
            if !record.auto {
                removed += 1;
                cut = i;
            }
        }
        self.records.truncate(cut);
        removed
    }
}

/// Serialized game state, optionally with the round in progress.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    state: Vec<u8>,
    round: Option<Vec<u8>>,
}

impl Snapshot {
    pub fn capture(state: &GameState, round: Option<&OperatingRound>) -> Result<Self, EngineError> {
        Ok(Self {
            state: bincode::serialize(state)?,
            round: round.map(bincode::serialize).transpose()?,
        })
    }

    pub fn state(&self) -> Result<GameState, EngineError> {
        Ok(bincode::deserialize(&self.state)?)
    }

    pub fn round(&self) -> Result<Option<OperatingRound>, EngineError> {
        self.round
            .as_deref()
            .map(bincode::deserialize)
            .transpose()
            .map_err(EngineError::from)
    }

    /// Encoded size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.state.len() + self.round.as_ref().map_or(0, Vec::len)
    }
}
