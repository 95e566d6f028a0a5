//! Lay track: one tile per turn, paid for by the operating entity.

use smallvec::smallvec;
use tracing::trace;

use super::{operating, unexpected, Step, StepKind, StepStatus};
use crate::core::{Action, ActionKind, ActionKinds, GameState};
use crate::economy::{HexId, Tile, TileId};
use crate::error::EngineError;
use crate::round::TurnState;

/// How the cost of laying a tile is computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TileCostRule {
    /// The replaced tile's upgrade cost after ability discounts.
    UpgradeCost,
    /// Never less than the title's flat tile cost.
    AtLeastTileCost,
}

/// Base track step.
#[derive(Clone, Debug)]
pub struct TrackStep {
    cost_rule: TileCostRule,
}

impl TrackStep {
    #[must_use]
    pub fn new(cost_rule: TileCostRule) -> Self {
        Self { cost_rule }
    }

    #[must_use]
    pub fn cost_rule(&self) -> TileCostRule {
        self.cost_rule
    }

    /// Cost of laying over `tile` for the turn's entity.
    pub fn tile_cost(&self, state: &GameState, turn: &TurnState, tile: &Tile) -> i64 {
        let upgrade = tile.upgrade_cost(&state.abilities_of(turn.entity));
        match self.cost_rule {
            TileCostRule::UpgradeCost => upgrade,
            TileCostRule::AtLeastTileCost => state.config.tile_cost.max(upgrade),
        }
    }

    /// Cheapest hex the entity could lay on, if any tile is in the supply.
    fn cheapest_lay(&self, state: &GameState, turn: &TurnState) -> Option<i64> {
        if state.board.supply().is_empty() {
            return None;
        }
        state
            .board
            .hexes()
            .map(|hex| self.tile_cost(state, turn, &hex.tile))
            .min()
    }

    /// Whether a tile can still be laid this turn.
    pub fn can_lay(&self, state: &GameState, turn: &TurnState) -> bool {
        if turn.count(ActionKind::LayTile) > 0 {
            return false;
        }
        let Ok(entity) = operating(state, turn) else {
            return false;
        };
        self.cheapest_lay(state, turn)
            .is_some_and(|cost| cost <= entity.cash)
    }

    /// Lay `tile` on `hex`, charging the entity.
    pub fn lay_tile(
        &self,
        state: &mut GameState,
        turn: &TurnState,
        tile: TileId,
        hex: &HexId,
        rotation: u8,
    ) -> Result<(), EngineError> {
        let current = state
            .board
            .hex(hex)
            .ok_or_else(|| EngineError::InvalidAction(format!("unknown hex {hex}")))?;
        let cost = self.tile_cost(state, turn, &current.tile);
        let available = state.cash(turn.entity)?;
        if available < cost {
            return Err(EngineError::InsufficientFunds {
                entity: turn.entity,
                required: cost,
                available,
            });
        }

        state.board.lay_tile(hex, tile, rotation)?;
        if cost > 0 {
            state.pay_bank(turn.entity, cost)?;
        }

        let name = state.name_of(turn.entity);
        let suffix = if cost > 0 {
            format!(" for {}", state.format_currency(cost))
        } else {
            String::new()
        };
        state.log(
            Some(turn.entity),
            format!("{name} lays tile {tile} with rotation {} on {hex}{suffix}", rotation % 6),
        );
        Ok(())
    }
}

impl Step for TrackStep {
    fn kind(&self) -> StepKind {
        StepKind::Track
    }

    fn legal_actions(&self, state: &GameState, turn: &TurnState) -> ActionKinds {
        let can_lay = self.can_lay(state, turn);
        trace!(entity = %turn.entity, can_lay, "track legality");
        if can_lay {
            smallvec![ActionKind::LayTile, ActionKind::Pass]
        } else {
            ActionKinds::new()
        }
    }

    fn process(
        &self,
        state: &mut GameState,
        turn: &mut TurnState,
        action: &Action,
    ) -> Result<StepStatus, EngineError> {
        match action {
            Action::LayTile { tile, hex, rotation, .. } => {
                self.lay_tile(state, turn, *tile, hex, *rotation)?;
                Ok(StepStatus::Complete)
            }
            _ => Err(unexpected(self.kind(), action)),
        }
    }
}
