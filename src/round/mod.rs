//! The operating round: entity order, per-turn state and action dispatch.

pub mod operating;
pub mod outcome;
pub mod turn;

pub use operating::OperatingRound;
pub use outcome::{ActionOutcome, StateDelta};
pub use turn::TurnState;
