//! The operating round state machine.
//!
//! ## Flow
//!
//! At round start the title's selection policy fixes the operating order.
//! Each entity in turn walks its step sequence. Before waiting on a step
//! the round, in order:
//!
//! 1. passes over steps that do not apply to the entity,
//! 2. lets an auto-resolvable step synthesize its action and processes it,
//! 3. passes over steps whose `skip` predicate holds.
//!
//! The first step left standing waits for input. When the sequence is
//! exhausted the next entity starts; after the last entity the round is
//! finished.
//!
//! ## Submissions
//!
//! `process_action` checks, in order: the round is running, the action
//! comes from the operating entity (or is a share sale by its president),
//! the step does not ignore it, and its kind is legal. It then applies the
//! action to a copy of the state and round, advances, and commits only if
//! every part succeeded. A rejected action leaves both untouched.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use super::outcome::{ActionOutcome, StateDelta};
use super::turn::TurnState;
use crate::core::{Action, ActionKind, ActionKinds, ActionRecord, EntityId, GameState};
use crate::error::EngineError;
use crate::rules::GameTitle;
use crate::steps::{Step, StepKind, StepStatus};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingRound {
    number: u32,
    order: Vec<EntityId>,
    index: usize,
    /// `None` once the round is finished.
    turn: Option<TurnState>,
    actions: Vec<ActionRecord>,
}

impl OperatingRound {
    /// Compute the operating order and advance to the first waiting step.
    pub fn start(number: u32, title: &dyn GameTitle, state: &mut GameState) -> Result<Self, EngineError> {
        let mut working = state.clone();
        working.round = number;
        let order = title.selection().select(&working);
        debug!(round = number, entities = ?order, "operating round starts");
        working.log(None, format!("-- Operating Round {number} --"));

        let mut round = Self {
            number,
            turn: order.first().copied().map(TurnState::new),
            order,
            index: 0,
            actions: Vec::new(),
        };
        let mut events = Vec::new();
        if round.turn.is_none() {
            round.finish(&mut events);
        }
        round.advance(title, &mut working, &mut events)?;

        *state = working;
        Ok(round)
    }

    #[must_use]
    pub fn number(&self) -> u32 {
        self.number
    }

    /// Entities operating this round, in order.
    #[must_use]
    pub fn order(&self) -> &[EntityId] {
        &self.order
    }

    #[must_use]
    pub fn current_entity(&self) -> Option<EntityId> {
        self.turn.as_ref().map(|t| t.entity)
    }

    #[must_use]
    pub fn turn(&self) -> Option<&TurnState> {
        self.turn.as_ref()
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.turn.is_none()
    }

    /// Actions applied this round, including synthesized ones.
    #[must_use]
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    /// The step waiting for input.
    pub fn current_step(&self, title: &dyn GameTitle, state: &GameState) -> Result<Arc<dyn Step>, EngineError> {
        let turn = self.turn.as_ref().ok_or(EngineError::RoundFinished)?;
        let set = state.entity(turn.entity)?.capabilities().steps;
        let kind = title
            .registry()
            .sequence(set)
            .get(turn.step_index)
            .copied()
            .ok_or_else(|| EngineError::InvariantViolation(format!("{} has no current step", turn.entity)))?;
        step_for(title, kind)
    }

    #[must_use]
    pub fn current_step_kind(&self, title: &dyn GameTitle, state: &GameState) -> Option<StepKind> {
        self.current_step(title, state).ok().map(|s| s.kind())
    }

    /// Action kinds the operating entity may submit now.
    #[must_use]
    pub fn legal_actions(&self, title: &dyn GameTitle, state: &GameState) -> ActionKinds {
        match (self.turn.as_ref(), self.current_step(title, state)) {
            (Some(turn), Ok(step)) => step.legal_actions(state, turn),
            _ => ActionKinds::new(),
        }
    }

    /// Whether a tile may be laid in the current step.
    #[must_use]
    pub fn can_lay_track(&self, title: &dyn GameTitle, state: &GameState) -> bool {
        matches!(
            self.current_step_kind(title, state),
            Some(StepKind::Track | StepKind::TokenOrTrack)
        ) && self.legal_actions(title, state).contains(&ActionKind::LayTile)
    }

    /// Whether a token may be placed in the current step.
    #[must_use]
    pub fn can_place_token(&self, title: &dyn GameTitle, state: &GameState) -> bool {
        matches!(
            self.current_step_kind(title, state),
            Some(StepKind::Token | StepKind::TokenOrTrack)
        ) && self.legal_actions(title, state).contains(&ActionKind::PlaceToken)
    }

    /// Validate and apply a submitted action.
    pub fn process_action(
        &mut self,
        title: &dyn GameTitle,
        state: &mut GameState,
        action: &Action,
    ) -> Result<ActionOutcome, EngineError> {
        let result = self.try_process(title, state, action);
        if let Err(err) = &result {
            warn!(round = self.number, action = %action.kind(), entity = %action.entity(), %err, "action rejected");
        }
        result
    }

    fn try_process(
        &mut self,
        title: &dyn GameTitle,
        state: &mut GameState,
        action: &Action,
    ) -> Result<ActionOutcome, EngineError> {
        let turn = self.turn.as_ref().ok_or(EngineError::RoundFinished)?;
        let current = turn.entity;
        let actor = action.entity();
        if actor != current {
            let president_sale =
                action.kind() == ActionKind::SellShares && state.entity(current)?.owner == Some(actor);
            if !president_sale {
                return Err(EngineError::OutOfTurn {
                    expected: current,
                    actual: actor,
                });
            }
        }

        let step = self.current_step(title, state)?;
        if step.ignore(state, turn, action) {
            info!(entity = %current, step = %step.kind(), action = %action.kind(), "action ignored");
            if state.config.log_ignored_actions {
                let line = format!("{} {} ignored", state.name_of(current), action.kind());
                state.log(Some(current), line);
            }
            return Ok(ActionOutcome::Ignored {
                step: step.kind(),
                action: action.kind(),
            });
        }
        if !step.legal_actions(state, turn).contains(&action.kind()) {
            return Err(EngineError::IllegalAction {
                action: action.kind(),
                step: step.kind(),
            });
        }

        let mut working = state.clone();
        let mut next = self.clone();
        let log_start = state.log.len();
        let mut events = Vec::new();
        next.apply(step.as_ref(), &mut working, action, false, &mut events)?;
        next.advance(title, &mut working, &mut events)?;

        let mut deltas = StateDelta::diff(state, &working);
        deltas.extend(events);
        let log = working.log.since(log_start).cloned().collect();
        info!(round = self.number, entity = %current, action = %action.kind(), "action applied");

        *state = working;
        *self = next;
        Ok(ActionOutcome::Applied { deltas, log })
    }

    /// Process an action against the current step and record it.
    fn apply(
        &mut self,
        step: &dyn Step,
        state: &mut GameState,
        action: &Action,
        auto: bool,
        events: &mut Vec<StateDelta>,
    ) -> Result<(), EngineError> {
        let turn = self.turn.as_mut().ok_or(EngineError::RoundFinished)?;
        let status = if action.kind() == ActionKind::Pass {
            let line = format!("{} passes {}", state.name_of(turn.entity), step.description().to_lowercase());
            state.log(Some(turn.entity), line);
            StepStatus::Complete
        } else {
            step.process(state, turn, action)?
        };
        turn.record(action.kind());
        if status == StepStatus::Complete {
            turn.step_index += 1;
        }

        let record = ActionRecord::new(action.clone(), self.number, self.index as u32, self.actions.len() as u32);
        if auto {
            self.actions.push(record.auto());
            events.push(StateDelta::AutoAction { action: action.clone() });
        } else {
            self.actions.push(record);
        }
        Ok(())
    }

    /// Move forward until a step waits for input or the round ends.
    fn advance(
        &mut self,
        title: &dyn GameTitle,
        state: &mut GameState,
        events: &mut Vec<StateDelta>,
    ) -> Result<(), EngineError> {
        let start = self.position();
        loop {
            let Some(turn) = self.turn.as_ref() else {
                return Ok(());
            };
            let entity = state.entity(turn.entity)?;
            let kinds = title.registry().sequence(entity.capabilities().steps);

            let Some(&kind) = kinds.get(turn.step_index) else {
                debug!(round = self.number, entity = %turn.entity, "turn ends");
                events.push(StateDelta::TurnEnded { entity: turn.entity });
                self.next_entity(events);
                continue;
            };
            let step = step_for(title, kind)?;

            if !step.applies_to(entity) {
                trace!(entity = %turn.entity, step = %kind, "step does not apply");
                self.bump_step();
                continue;
            }
            if step.is_auto_resolvable(state, turn) {
                if let Some(action) = step.auto_resolve(state, turn) {
                    info!(entity = %turn.entity, step = %kind, action = %action.kind(), "auto-resolving");
                    self.apply(step.as_ref(), state, &action, true, events)?;
                    continue;
                }
            }
            let skip = step.skip(state, turn);
            trace!(entity = %turn.entity, step = %kind, skip, "skip evaluated");
            if skip {
                self.bump_step();
                continue;
            }

            if self.position() != start {
                debug!(round = self.number, entity = %turn.entity, step = %kind, "step waiting");
                events.push(StateDelta::StepAdvanced {
                    entity: turn.entity,
                    step: kind,
                });
            }
            return Ok(());
        }
    }

    fn position(&self) -> Option<(usize, usize)> {
        self.turn.as_ref().map(|t| (self.index, t.step_index))
    }

    fn bump_step(&mut self) {
        if let Some(turn) = self.turn.as_mut() {
            turn.step_index += 1;
        }
    }

    fn next_entity(&mut self, events: &mut Vec<StateDelta>) {
        self.index += 1;
        match self.order.get(self.index) {
            Some(&entity) => {
                debug!(round = self.number, %entity, "turn starts");
                self.turn = Some(TurnState::new(entity));
            }
            None => self.finish(events),
        }
    }

    fn finish(&mut self, events: &mut Vec<StateDelta>) {
        debug!(round = self.number, "operating round finished");
        self.turn = None;
        events.push(StateDelta::RoundFinished { round: self.number });
    }
}

fn step_for(title: &dyn GameTitle, kind: StepKind) -> Result<Arc<dyn Step>, EngineError> {
    title
        .registry()
        .step(kind)
        .cloned()
        .ok_or_else(|| EngineError::InvariantViolation(format!("no step registered for {kind}")))
}
