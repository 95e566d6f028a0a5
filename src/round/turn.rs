//! Per-turn scratch state owned by the operating round.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::core::{ActionKind, EntityId};
use crate::economy::Route;

/// What the current entity has done this turn.
///
/// Reset whenever a new entity starts its turn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnState {
    pub entity: EntityId,
    /// Index into the entity's step sequence.
    pub step_index: usize,
    counters: FxHashMap<ActionKind, u32>,
    /// Routes run this turn; `None` until the route step completes.
    pub routes: Option<Vec<Route>>,
    pub dividend_resolved: bool,
}

impl TurnState {
    #[must_use]
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            step_index: 0,
            counters: FxHashMap::default(),
            routes: None,
            dividend_resolved: false,
        }
    }

    /// Number of applied actions of `kind` this turn.
    #[must_use]
    pub fn count(&self, kind: ActionKind) -> u32 {
        self.counters.get(&kind).copied().unwrap_or(0)
    }

    /// Count an applied action.
    pub fn record(&mut self, kind: ActionKind) {
        *self.counters.entry(kind).or_insert(0) += 1;
    }

    /// Total revenue of the routes run this turn (0 if none).
    ///
    /// Saturates; the route step rejects totals that would overflow.
    #[must_use]
    pub fn revenue(&self) -> i64 {
        self.routes.as_ref().map_or(0, |routes| {
            routes.iter().fold(0i64, |total, r| total.saturating_add(r.revenue))
        })
    }
}
