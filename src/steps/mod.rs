//! Steps: the phases of an entity's operating turn.
//!
//! A step is stateless logic over the explicit context it is handed: the
//! `GameState` for everything economic and the round's `TurnState` for what
//! the current entity has done this turn. Steps never hold persistent data.
//!
//! ## Contract
//!
//! - `applies_to`: whether the step is relevant for an entity at all.
//! - `legal_actions`: the action kinds the step offers right now. Empty
//!   means there is nothing to do.
//! - `skip`: pure predicate; by default "no legal actions".
//! - `ignore`: declare an action a harmless duplicate to be dropped rather
//!   than rejected.
//! - `process`: validate and apply an action. The round applies it to a
//!   copy of the state and commits only on success.
//! - `is_auto_resolvable` / `auto_resolve`: a query and a command, invoked
//!   as a pair by the round, for steps that resolve themselves without
//!   player input.
//!
//! ## Per-title behavior
//!
//! Titles change a step by registering a differently configured (or a
//! different) implementation for its `StepKind`; see
//! [`StepRegistry`](crate::rules::StepRegistry).
//!
//! ## Example
//!
//! ```
//! use rust_18xx::steps::{Step, StepKind, TrackStep, TileCostRule};
//!
//! let step = TrackStep::new(TileCostRule::UpgradeCost);
//! assert_eq!(step.kind(), StepKind::Track);
//! assert_eq!(step.description(), "Lay Track");
//! ```

mod company;
mod dividend;
mod issue;
mod route;
mod token;
mod token_or_track;
mod track;
mod train;

#[cfg(test)]
pub(crate) mod test_support;

pub use company::CompanyStep;
pub use dividend::DividendStep;
pub use issue::IssueStep;
pub use route::RouteStep;
pub use token::TokenStep;
pub use token_or_track::TokenOrTrackStep;
pub use track::{TileCostRule, TrackStep};
pub use train::TrainStep;

use serde::{Deserialize, Serialize};

use crate::core::{Action, ActionKinds, Entity, EntityId, GameState};
use crate::economy::ShareBundle;
use crate::error::EngineError;
use crate::round::TurnState;

/// Identifier of a step within a turn sequence.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StepKind {
    Issue,
    Track,
    Token,
    TokenOrTrack,
    Route,
    Dividend,
    Train,
    Company,
}

impl StepKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            StepKind::Issue => "issue",
            StepKind::Track => "track",
            StepKind::Token => "token",
            StepKind::TokenOrTrack => "token_or_track",
            StepKind::Route => "route",
            StepKind::Dividend => "dividend",
            StepKind::Train => "train",
            StepKind::Company => "company",
        }
    }

    /// Long description shown while the step is current.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            StepKind::Issue => "Issue or Redeem Shares",
            StepKind::Track => "Lay Track",
            StepKind::Token => "Place a Token",
            StepKind::TokenOrTrack => "Place a Token or Lay Track",
            StepKind::Route => "Run Routes",
            StepKind::Dividend => "Pay or Withhold Dividends",
            StepKind::Train => "Buy Trains",
            StepKind::Company => "Purchase Companies",
        }
    }

    /// Compact description, if the step has one.
    #[must_use]
    pub const fn short_description(self) -> Option<&'static str> {
        match self {
            StepKind::Issue => Some("Issue/Redeem"),
            StepKind::Track => Some("Track"),
            StepKind::Token => Some("Token"),
            StepKind::TokenOrTrack => Some("Token/Track"),
            StepKind::Route => Some("Routes"),
            StepKind::Dividend => None,
            StepKind::Train => Some("Train"),
            StepKind::Company => Some("Company"),
        }
    }
}

impl std::fmt::Display for StepKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of processing an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepStatus {
    /// The step may still accept actions; the round re-evaluates `skip`.
    Pending,
    /// The step is finished for this turn.
    Complete,
}

/// One phase of an operating turn.
///
/// Implementations must be deterministic: the same state, turn and action
/// always produce the same result.
pub trait Step: Send + Sync + std::fmt::Debug {
    fn kind(&self) -> StepKind;

    fn description(&self) -> &'static str {
        self.kind().description()
    }

    fn short_description(&self) -> Option<&'static str> {
        self.kind().short_description()
    }

    /// Whether the step is relevant for this entity.
    fn applies_to(&self, _entity: &Entity) -> bool {
        true
    }

    /// Action kinds the current entity may submit to this step.
    fn legal_actions(&self, state: &GameState, turn: &TurnState) -> ActionKinds;

    /// Whether the round should pass over this step without input.
    ///
    /// Must be free of side effects.
    fn skip(&self, state: &GameState, turn: &TurnState) -> bool {
        self.legal_actions(state, turn).is_empty()
    }

    /// Whether `action` is a redundant submission to drop silently.
    fn ignore(&self, _state: &GameState, _turn: &TurnState, _action: &Action) -> bool {
        false
    }

    /// Validate and apply `action`.
    ///
    /// Only called with an action whose kind is in `legal_actions`. Pass is
    /// handled by the round and never reaches a step.
    fn process(
        &self,
        state: &mut GameState,
        turn: &mut TurnState,
        action: &Action,
    ) -> Result<StepStatus, EngineError>;

    /// Whether the step can resolve itself for the current entity.
    fn is_auto_resolvable(&self, _state: &GameState, _turn: &TurnState) -> bool {
        false
    }

    /// Synthesize the action that resolves the step. The round processes
    /// it like a submitted action.
    fn auto_resolve(&self, _state: &GameState, _turn: &TurnState) -> Option<Action> {
        None
    }
}

/// Sell a bundle on behalf of `seller`.
///
/// A player sale follows stock-round handling (price drops per share); a
/// sale from an entity's own treasury goes straight to the pool.
pub(crate) fn sell_shares(state: &mut GameState, seller: EntityId, bundle: &ShareBundle) -> Result<(), EngineError> {
    if seller.is_player(state.player_count()) {
        state.sell_shares_and_change_price(bundle)
    } else {
        state.sell_shares(bundle)
    }
}

/// Buy a bundle from the pool on behalf of the operating entity.
pub(crate) fn buy_shares(state: &mut GameState, turn: &TurnState, bundle: &ShareBundle) -> Result<(), EngineError> {
    state.buy_shares(turn.entity, bundle)
}

/// The operating entity of the turn.
pub(crate) fn operating<'a>(state: &'a GameState, turn: &TurnState) -> Result<&'a Entity, EngineError> {
    state.entity(turn.entity)
}

/// Reject an action that reached the wrong step.
pub(crate) fn unexpected(step: StepKind, action: &Action) -> EngineError {
    EngineError::IllegalAction {
        action: action.kind(),
        step,
    }
}
