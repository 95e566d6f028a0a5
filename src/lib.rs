//! # rust-18xx
//!
//! The operating-round turn engine for 18xx train and stock-market games.
//!
//! ## Design Principles
//!
//! 1. **Title-Agnostic Core**: The round knows nothing about 1846 or 18EU.
//!    Titles plug in a step registry, a selection policy and a config.
//!
//! 2. **Atomic Actions**: An action is validated and applied against a copy
//!    of the state. It either commits whole or is rejected with nothing
//!    changed.
//!
//! 3. **Explicit Context**: Steps receive the state and turn they act on as
//!    arguments. Nothing is reached through ambient references.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: O(1) cloning via `im-rs` makes the
//!   apply-to-a-copy model cheap.
//!
//! - **Replayable History**: Every applied action is recorded; undo drops
//!   the tail and replays the rest from a bincode baseline.
//!
//! ## Modules
//!
//! - `core`: Entity IDs, players, state, actions, log, RNG, configuration
//! - `economy`: Bank, shares, stock market, trains, companies, track
//! - `steps`: The operating-round steps and the `Step` trait
//! - `round`: The operating round state machine and action outcomes
//! - `rules`: Step registries, selection policies, the `GameTitle` trait
//! - `games`: Base, 1846 and 18EU rules
//! - `game`: The `Game` driver with history, undo and snapshots

pub mod core;
pub mod economy;
pub mod error;
pub mod steps;
pub mod round;
pub mod rules;
pub mod games;
pub mod game;

// Re-export commonly used types
pub use crate::core::{
    Action, ActionKind, ActionKinds, ActionRecord, DividendKind,
    Entity, EntityId, EntityKind, PayoutRule, StepSet, Tokens,
    GameConfig, GameLog, GameRng, GameState, LogEntry, Player, PlayerId, PlayerMap, Title,
};

pub use crate::economy::{
    Bank, Company, CompanyId, Depot, Direction, HexId, Route, ShareBundle, ShareHolder,
    SharePool, SharePrice, StockMarket, Tile, TileId, Train, TrainId,
};

pub use crate::error::{EngineError, ErrorKind};

pub use crate::steps::{Step, StepKind, StepStatus};

pub use crate::round::{ActionOutcome, OperatingRound, StateDelta, TurnState};

pub use crate::rules::{GameTitle, MinorsFirst, PriorityOrder, SelectionPolicy, StepRegistry};

pub use crate::games::{rules_for, Base, G1846, G18EU};

pub use crate::game::{ActionLog, Game, Snapshot};
