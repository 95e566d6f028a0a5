//! The game driver: title, state, current round and history.
//!
//! `Game` is the action submission interface. It runs the title's setup
//! hook once, keeps a baseline snapshot of the state right after setup, and
//! appends every applied action to its log. Undo discards the tail of the
//! log and replays what remains against the baseline.
//!
//! ```
//! use rust_18xx::core::{Entity, GameState, PlayerId};
//! use rust_18xx::game::Game;
//! use rust_18xx::games::G18EU;
//! use rust_18xx::rules::GameTitle;
//!
//! let title = G18EU::new();
//! let mut state = GameState::new(title.config(), &["Alice", "Bob"]);
//! let minor = state.alloc_entity();
//! state.add_entity(Entity::minor(minor, "1", PlayerId::new(0)));
//!
//! let game = Game::new(Box::new(title), state).unwrap();
//! assert_eq!(game.state().entity(minor).unwrap().trains.len(), 1);
//! assert_eq!(game.round().current_entity(), Some(minor));
//! ```

mod history;

pub use history::{ActionLog, Snapshot};

use tracing::debug;

use crate::core::{Action, ActionKinds, GameState};
use crate::error::EngineError;
use crate::round::{ActionOutcome, OperatingRound};
use crate::rules::GameTitle;
use crate::steps::StepKind;

#[derive(Debug)]
pub struct Game {
    title: Box<dyn GameTitle>,
    baseline: Snapshot,
    timeline: Timeline,
}

/// Everything that replaying from the baseline reconstructs.
#[derive(Debug)]
struct Timeline {
    state: GameState,
    round: OperatingRound,
    history: ActionLog,
}

impl Timeline {
    fn start(title: &dyn GameTitle, mut state: GameState) -> Result<Self, EngineError> {
        let round = OperatingRound::start(1, title, &mut state)?;
        let mut history = ActionLog::new();
        history.extend(round.actions().iter().cloned());
        Ok(Self { state, round, history })
    }

    fn process_action(&mut self, title: &dyn GameTitle, action: &Action) -> Result<ActionOutcome, EngineError> {
        let before = self.round.actions().len();
        let outcome = self.round.process_action(title, &mut self.state, action)?;
        self.history.extend(self.round.actions()[before..].iter().cloned());
        Ok(outcome)
    }

    fn next_round(&mut self, title: &dyn GameTitle) -> Result<(), EngineError> {
        if !self.round.is_finished() {
            return Err(EngineError::InvalidAction(format!(
                "operating round {} is still in progress",
                self.round.number()
            )));
        }
        let round = OperatingRound::start(self.round.number() + 1, title, &mut self.state)?;
        self.history.extend(round.actions().iter().cloned());
        self.round = round;
        Ok(())
    }
}

impl Game {
    /// Run setup on a populated state and start the first operating round.
    pub fn new(title: Box<dyn GameTitle>, mut state: GameState) -> Result<Self, EngineError> {
        title.registry().validate()?;
        title.setup(&mut state)?;
        let baseline = Snapshot::capture(&state, None)?;
        debug!(title = %title.title(), players = state.player_count(), "game set up");

        let timeline = Timeline::start(title.as_ref(), state)?;
        Ok(Self {
            title,
            baseline,
            timeline,
        })
    }

    #[must_use]
    pub fn title(&self) -> &dyn GameTitle {
        self.title.as_ref()
    }

    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.timeline.state
    }

    #[must_use]
    pub fn round(&self) -> &OperatingRound {
        &self.timeline.round
    }

    #[must_use]
    pub fn history(&self) -> &ActionLog {
        &self.timeline.history
    }

    #[must_use]
    pub fn current_step(&self) -> Option<StepKind> {
        self.round().current_step_kind(self.title(), self.state())
    }

    #[must_use]
    pub fn legal_actions(&self) -> ActionKinds {
        self.round().legal_actions(self.title(), self.state())
    }

    #[must_use]
    pub fn can_lay_track(&self) -> bool {
        self.round().can_lay_track(self.title(), self.state())
    }

    #[must_use]
    pub fn can_place_token(&self) -> bool {
        self.round().can_place_token(self.title(), self.state())
    }

    /// Submit an action to the current round.
    pub fn process_action(&mut self, action: &Action) -> Result<ActionOutcome, EngineError> {
        self.timeline.process_action(self.title.as_ref(), action)
    }

    /// Start the next operating round once the current one is finished.
    pub fn next_round(&mut self) -> Result<(), EngineError> {
        self.timeline.next_round(self.title.as_ref())
    }

    /// Take back the last `count` submitted actions.
    ///
    /// Returns how many were actually undone.
    pub fn undo(&mut self, count: usize) -> Result<usize, EngineError> {
        let mut log = self.timeline.history.clone();
        let undone = log.drop_submitted(count);
        // Resume in the round of the earliest action taken back.
        let resume = self
            .timeline
            .history
            .records()
            .get(log.len())
            .map_or(self.timeline.round.number(), |r| r.round);

        let title = self.title.as_ref();
        let mut timeline = Timeline::start(title, self.baseline.state()?)?;
        for record in log.submitted() {
            while timeline.round.number() < record.round {
                timeline.next_round(title)?;
            }
            timeline.process_action(title, &record.action)?;
        }
        while timeline.round.number() < resume {
            timeline.next_round(title)?;
        }
        debug!(undone, remaining = timeline.history.submitted().count(), "undo");
        self.timeline = timeline;
        Ok(undone)
    }

    /// Rebuild the game from the baseline by applying `actions` in order,
    /// starting new rounds as earlier ones finish.
    ///
    /// On error the game is left as it was.
    pub fn replay(&mut self, actions: &[Action]) -> Result<(), EngineError> {
        let title = self.title.as_ref();
        let mut timeline = Timeline::start(title, self.baseline.state()?)?;
        for action in actions {
            if timeline.round.is_finished() {
                timeline.next_round(title)?;
            }
            timeline.process_action(title, action)?;
        }
        self.timeline = timeline;
        Ok(())
    }

    /// Capture the current state and round.
    pub fn checkpoint(&self) -> Result<Snapshot, EngineError> {
        Snapshot::capture(self.state(), Some(self.round()))
    }
}
