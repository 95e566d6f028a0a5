//! Combined token-or-track step.
//!
//! Titles that allow one tile lay and one token placement per turn, in
//! either order, merge the two phases into a single step. The step stays
//! current until both halves are exhausted (or the entity passes):
//!
//! - `skip_track`: the entity has less cash than the flat tile cost, or has
//!   already laid a tile this turn.
//! - `skip_token`: a token was already placed this turn, or the entity has
//!   no token it could place.
//!
//! While the step is still open, a repeat of an exhausted half (a second
//! tile lay or a second token) is ignored rather than rejected, so that a
//! client retrying a submission does not see an error.

use smallvec::SmallVec;
use tracing::trace;

use super::{operating, unexpected, Step, StepKind, StepStatus, TileCostRule, TokenStep, TrackStep};
use crate::core::{Action, ActionKind, ActionKinds, GameState};
use crate::error::EngineError;
use crate::round::TurnState;

#[derive(Clone, Debug)]
pub struct TokenOrTrackStep {
    track: TrackStep,
    token: TokenStep,
}

impl TokenOrTrackStep {
    /// Track costs never drop below the title's flat tile cost.
    #[must_use]
    pub fn new() -> Self {
        Self {
            track: TrackStep::new(TileCostRule::AtLeastTileCost),
            token: TokenStep::new(),
        }
    }

    #[must_use]
    pub fn with_cost_rule(mut self, rule: TileCostRule) -> Self {
        self.track = TrackStep::new(rule);
        self
    }

    pub fn skip_track(&self, state: &GameState, turn: &TurnState) -> bool {
        let Ok(entity) = operating(state, turn) else {
            return true;
        };
        entity.cash < state.config.tile_cost || turn.count(ActionKind::LayTile) >= 1
    }

    pub fn skip_token(&self, state: &GameState, turn: &TurnState) -> bool {
        turn.count(ActionKind::PlaceToken) > 0 || !self.token.token_available(state, turn)
    }
}

impl Default for TokenOrTrackStep {
    fn default() -> Self {
        Self::new()
    }
}

impl Step for TokenOrTrackStep {
    fn kind(&self) -> StepKind {
        StepKind::TokenOrTrack
    }

    fn legal_actions(&self, state: &GameState, turn: &TurnState) -> ActionKinds {
        let mut actions = SmallVec::new();
        if !self.skip_track(state, turn) {
            actions.push(ActionKind::LayTile);
        }
        if !self.skip_token(state, turn) {
            actions.push(ActionKind::PlaceToken);
        }
        if !actions.is_empty() {
            actions.push(ActionKind::Pass);
        }
        actions
    }

    fn skip(&self, state: &GameState, turn: &TurnState) -> bool {
        let skip_track = self.skip_track(state, turn);
        let skip_token = self.skip_token(state, turn);
        trace!(entity = %turn.entity, skip_track, skip_token, "token_or_track skip");
        skip_track && skip_token
    }

    fn ignore(&self, state: &GameState, turn: &TurnState, action: &Action) -> bool {
        let exhausted = match action.kind() {
            ActionKind::LayTile => turn.count(ActionKind::LayTile) > 0,
            ActionKind::PlaceToken => turn.count(ActionKind::PlaceToken) > 0,
            _ => return false,
        };
        exhausted && !self.skip(state, turn)
    }

    fn process(
        &self,
        state: &mut GameState,
        turn: &mut TurnState,
        action: &Action,
    ) -> Result<StepStatus, EngineError> {
        match action {
            Action::LayTile { tile, hex, rotation, .. } => {
                self.track.lay_tile(state, turn, *tile, hex, *rotation)?;
            }
            Action::PlaceToken { hex, .. } => {
                self.token.place_token(state, turn, hex)?;
            }
            _ => return Err(unexpected(self.kind(), action)),
        }
        Ok(StepStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::economy::{HexId, TileId};
    use crate::steps::test_support::{add_corporation, add_minor, state, turn};

    fn lay(entity: EntityId) -> Action {
        Action::LayTile {
            entity,
            tile: TileId(57),
            hex: HexId::new("A1"),
            rotation: 1,
        }
    }

    fn token(entity: EntityId) -> Action {
        Action::PlaceToken {
            entity,
            hex: HexId::new("C3"),
        }
    }

    #[test]
    fn test_skip_track_below_tile_cost() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 19);
        let step = TokenOrTrackStep::new();

        assert!(step.skip_track(&state, &turn(minor)));
        assert!(!step.skip_token(&state, &turn(minor)));
        assert_eq!(
            step.legal_actions(&state, &turn(minor)).as_slice(),
            &[ActionKind::PlaceToken, ActionKind::Pass]
        );
    }

    #[test]
    fn test_skip_track_after_one_lay() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 100);
        let step = TokenOrTrackStep::new();
        let mut turn = turn(minor);

        assert!(!step.skip_track(&state, &turn));
        turn.record(ActionKind::LayTile);
        assert!(step.skip_track(&state, &turn));
    }

    #[test]
    fn test_skip_whole_needs_both() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 100);
        let step = TokenOrTrackStep::new();
        let mut turn = turn(minor);

        turn.record(ActionKind::LayTile);
        assert!(!step.skip(&state, &turn));
        turn.record(ActionKind::PlaceToken);
        assert!(step.skip(&state, &turn));
        assert!(step.legal_actions(&state, &turn).is_empty());
    }

    #[test]
    fn test_repeat_lay_is_ignored_while_open() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 100);
        let step = TokenOrTrackStep::new();
        let mut turn = turn(minor);

        assert!(!step.ignore(&state, &turn, &lay(minor)));
        step.process(&mut state, &mut turn, &lay(minor)).unwrap();
        turn.record(ActionKind::LayTile);

        assert!(step.ignore(&state, &turn, &lay(minor)));
        assert!(!step.ignore(&state, &turn, &token(minor)));
    }

    #[test]
    fn test_repeat_token_is_ignored_while_open() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 100);
        let step = TokenOrTrackStep::new();
        let mut turn = turn(minor);

        step.process(&mut state, &mut turn, &token(minor)).unwrap();
        turn.record(ActionKind::PlaceToken);

        assert!(step.ignore(&state, &turn, &token(minor)));
        assert!(!step.ignore(&state, &turn, &lay(minor)));
    }

    #[test]
    fn test_lay_charges_at_least_tile_cost() {
        let mut state = state();
        let corp = add_corporation(&mut state, "NYC", 100);
        let mut turn = turn(corp);

        let status = TokenOrTrackStep::new().process(&mut state, &mut turn, &lay(corp)).unwrap();

        assert_eq!(status, StepStatus::Pending);
        assert_eq!(state.entity(corp).unwrap().cash, 480);
        assert_eq!(state.board.hex(&HexId::new("A1")).unwrap().rotation, 1);
    }

    #[test]
    fn test_pass_is_only_offered_with_a_real_action() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        state.entity_mut(minor).unwrap().tokens.available = 0;

        assert!(TokenOrTrackStep::new().legal_actions(&state, &turn(minor)).is_empty());
    }
}
