//! Core engine types: entities, players, state, actions, RNG, configuration.
//!
//! Everything here is title-agnostic. Titles configure these via
//! `GameConfig` and the step registry rather than modifying the core.

pub mod entity;
pub mod player;
pub mod rng;
pub mod config;
pub mod action;
pub mod log;
pub mod state;

pub use entity::{Capabilities, Entity, EntityId, EntityKind, PayoutRule, StepSet, Tokens};
pub use player::{Player, PlayerId, PlayerMap};
pub use rng::{GameRng, GameRngState};
pub use config::{GameConfig, HomeTokenTiming, SellAfter, SellBuyOrder, Title, TrainRow};
pub use action::{Action, ActionKind, ActionKinds, ActionRecord, DividendKind};
pub use log::{GameLog, LogEntry};
pub use state::GameState;
