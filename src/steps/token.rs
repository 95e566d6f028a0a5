//! Place a station token.

use smallvec::smallvec;

use super::{operating, unexpected, Step, StepKind, StepStatus};
use crate::core::{Action, ActionKind, ActionKinds, GameState};
use crate::economy::HexId;
use crate::error::EngineError;
use crate::round::TurnState;

#[derive(Clone, Debug, Default)]
pub struct TokenStep;

impl TokenStep {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Whether the entity has a token and a free slot to put it in.
    ///
    /// Cash is not considered; an unaffordable placement fails when processed.
    /// Ignores what was already done this turn.
    pub fn token_available(&self, state: &GameState, turn: &TurnState) -> bool {
        let Ok(entity) = operating(state, turn) else {
            return false;
        };
        entity.tokens.available > 0
            && state
                .board
                .hexes()
                .any(|hex| hex.has_free_slot() && !hex.tokens.contains(&entity.id))
    }

    pub fn can_place(&self, state: &GameState, turn: &TurnState) -> bool {
        turn.count(ActionKind::PlaceToken) == 0 && self.token_available(state, turn)
    }

    pub fn place_token(&self, state: &mut GameState, turn: &TurnState, hex: &HexId) -> Result<(), EngineError> {
        let entity = operating(state, turn)?;
        if entity.tokens.available == 0 {
            return Err(EngineError::InvalidAction(format!("{} has no tokens left", entity.sym)));
        }
        let cost = entity.tokens.cost;

        state.board.place_token(hex, turn.entity)?;
        if cost > 0 {
            state.pay_bank(turn.entity, cost)?;
        }
        let entity = state.entity_mut(turn.entity)?;
        entity.tokens.available -= 1;
        entity.tokens.placed.push(hex.clone());

        let name = state.name_of(turn.entity);
        let suffix = if cost > 0 {
            format!(" for {}", state.format_currency(cost))
        } else {
            String::new()
        };
        state.log(Some(turn.entity), format!("{name} places a token on {hex}{suffix}"));
        Ok(())
    }
}

impl Step for TokenStep {
    fn kind(&self) -> StepKind {
        StepKind::Token
    }

    fn legal_actions(&self, state: &GameState, turn: &TurnState) -> ActionKinds {
        if self.can_place(state, turn) {
            smallvec![ActionKind::PlaceToken, ActionKind::Pass]
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
            Action::PlaceToken { hex, .. } => {
                self.place_token(state, turn, hex)?;
                Ok(StepStatus::Complete)
            }
            _ => Err(unexpected(self.kind(), action)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{EntityId, Tokens};
    use crate::steps::test_support::{add_corporation, add_minor, state, turn};

    #[test]
    fn test_place_token_pays_and_consumes() {
        let mut state = state();
        let corp = add_corporation(&mut state, "NYC", 100);
        let mut turn = turn(corp);
        let action = Action::PlaceToken {
            entity: corp,
            hex: HexId::new("C3"),
        };

        TokenStep::new().process(&mut state, &mut turn, &action).unwrap();

        let nyc = state.entity(corp).unwrap();
        assert_eq!(nyc.tokens.available, 2);
        assert_eq!(nyc.tokens.placed, vec![HexId::new("C3")]);
        assert_eq!(nyc.cash, 460);
        assert!(state.board.hex(&HexId::new("C3")).unwrap().tokens.contains(&corp));
    }

    #[test]
    fn test_free_token_available_without_cash() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        let turn = turn(minor);

        assert!(TokenStep::new().can_place(&state, &turn));
    }

    #[test]
    fn test_paid_token_available_without_cash() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 10);
        state.entity_mut(minor).unwrap().tokens = Tokens::new(2, 40);
        let mut turn = turn(minor);
        let step = TokenStep::new();
        assert!(step.can_place(&state, &turn));

        let action = Action::PlaceToken {
            entity: minor,
            hex: HexId::new("C3"),
        };
        let err = step.process(&mut state, &mut turn, &action).unwrap_err();

        assert!(matches!(err, EngineError::InsufficientFunds { required: 40, available: 10, .. }));
    }

    #[test]
    fn test_no_token_when_slots_full() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        let other = add_minor(&mut state, "M2", 0);
        state.board.place_token(&HexId::new("A1"), other).unwrap();
        state.board.place_token(&HexId::new("C3"), other).unwrap();
        state.board.place_token(&HexId::new("C3"), EntityId(9)).unwrap();

        assert!(!TokenStep::new().can_place(&state, &turn(minor)));
    }

    #[test]
    fn test_no_token_without_charter_tokens() {
        let mut state = state();
        let corp = add_corporation(&mut state, "NYC", 100);
        state.entity_mut(corp).unwrap().tokens.available = 0;

        assert!(TokenStep::new().legal_actions(&state, &turn(corp)).is_empty());
    }
}
