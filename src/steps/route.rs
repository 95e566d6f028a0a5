//! Run routes.
//!
//! Route-finding is external: the caller submits the routes it found and
//! the step checks only that they are consistent with the entity's trains.

use smallvec::smallvec;

use super::{operating, unexpected, Step, StepKind, StepStatus};
use crate::core::{Action, ActionKind, ActionKinds, GameState};
use crate::economy::Route;
use crate::error::EngineError;
use crate::round::TurnState;

#[derive(Clone, Debug, Default)]
pub struct RouteStep;

impl RouteStep {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn validate(&self, state: &GameState, turn: &TurnState, routes: &[Route]) -> Result<(), EngineError> {
        let entity = operating(state, turn)?;
        let mut total: i64 = 0;
        for (i, route) in routes.iter().enumerate() {
            if !entity.trains.iter().any(|t| t.id == route.train) {
                return Err(EngineError::InvalidAction(format!(
                    "{} does not own {}",
                    entity.sym, route.train
                )));
            }
            if routes[..i].iter().any(|r| r.train == route.train) {
                return Err(EngineError::InvalidAction(format!("{} runs more than once", route.train)));
            }
            if route.revenue < 0 {
                return Err(EngineError::InvalidAction(format!(
                    "route for {} has negative revenue",
                    route.train
                )));
            }
            total = total
                .checked_add(route.revenue)
                .ok_or_else(|| EngineError::InvalidAction(format!("revenue for {} overflows", entity.sym)))?;
        }
        Ok(())
    }
}

impl Step for RouteStep {
    fn kind(&self) -> StepKind {
        StepKind::Route
    }

    fn legal_actions(&self, state: &GameState, turn: &TurnState) -> ActionKinds {
        let has_trains = operating(state, turn).is_ok_and(|e| !e.trains.is_empty());
        if has_trains && turn.routes.is_none() {
            smallvec![ActionKind::RunRoutes]
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
        let Action::RunRoutes { routes, .. } = action else {
            return Err(unexpected(self.kind(), action));
        };
        self.validate(state, turn, routes)?;

        let name = state.name_of(turn.entity);
        for route in routes {
            let train = operating(state, turn)?
                .trains
                .iter()
                .find(|t| t.id == route.train)
                .map_or_else(|| route.train.to_string(), |t| t.name.clone());
            let path: Vec<&str> = route.hexes.iter().map(|h| h.0.as_str()).collect();
            let line = format!(
                "{name} runs a {train} train for {}: {}",
                state.format_currency(route.revenue),
                path.join("-")
            );
            state.log(Some(turn.entity), line);
        }
        turn.routes = Some(routes.clone());
        Ok(StepStatus::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::economy::{HexId, Train, TrainId};
    use crate::steps::test_support::{add_minor, state, turn};

    fn run(entity: EntityId, routes: Vec<Route>) -> Action {
        Action::RunRoutes { entity, routes }
    }

    #[test]
    fn test_requires_trains() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        let step = RouteStep::new();
        assert!(step.skip(&state, &turn(minor)));

        state
            .entity_mut(minor)
            .unwrap()
            .add_train(Train::new(TrainId(0), "2", 2, 80));
        assert_eq!(step.legal_actions(&state, &turn(minor)).as_slice(), &[ActionKind::RunRoutes]);
    }

    #[test]
    fn test_records_routes() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        state
            .entity_mut(minor)
            .unwrap()
            .add_train(Train::new(TrainId(0), "2", 2, 80));
        let mut turn = turn(minor);
        let route = Route::new(TrainId(0), vec![HexId::new("A1"), HexId::new("C3")], 50);

        let status = RouteStep::new().process(&mut state, &mut turn, &run(minor, vec![route])).unwrap();

        assert_eq!(status, StepStatus::Complete);
        assert_eq!(turn.revenue(), 50);
        assert_eq!(state.log.messages().last().copied(), Some("M1 runs a 2 train for $50: A1-C3"));
        assert!(RouteStep::new().legal_actions(&state, &turn).is_empty());
    }

    #[test]
    fn test_rejects_foreign_or_repeated_trains() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        state
            .entity_mut(minor)
            .unwrap()
            .add_train(Train::new(TrainId(0), "2", 2, 80));
        let mut turn = turn(minor);

        let foreign = run(minor, vec![Route::new(TrainId(7), vec![], 10)]);
        assert!(RouteStep::new().process(&mut state, &mut turn, &foreign).is_err());

        let twice = run(
            minor,
            vec![Route::new(TrainId(0), vec![], 10), Route::new(TrainId(0), vec![], 10)],
        );
        assert!(RouteStep::new().process(&mut state, &mut turn, &twice).is_err());
        assert!(turn.routes.is_none());
    }

    #[test]
    fn test_rejects_overflowing_revenue() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        let entity = state.entity_mut(minor).unwrap();
        entity.add_train(Train::new(TrainId(0), "2", 2, 80));
        entity.add_train(Train::new(TrainId(1), "2", 2, 80));
        let mut turn = turn(minor);

        let huge = run(
            minor,
            vec![Route::new(TrainId(0), vec![], i64::MAX), Route::new(TrainId(1), vec![], 1)],
        );
        let err = RouteStep::new().process(&mut state, &mut turn, &huge).unwrap_err();

        assert!(matches!(err, EngineError::InvalidAction(_)));
        assert!(turn.routes.is_none());
    }
}
