//! Game driver tests: setup hooks, undo, replay and snapshots.

mod common;

use common::{add_board, game_1846, lay, pass, run, token, ALICE};
use rust_18xx::core::{Action, DividendKind, Entity, GameConfig, GameState, PlayerId, StepSet, Title};
use rust_18xx::economy::TrainId;
use rust_18xx::error::EngineError;
use rust_18xx::game::Game;
use rust_18xx::games::{Base, G18EU};
use rust_18xx::rules::{GameTitle, PriorityOrder, SelectionPolicy, StepRegistry};
use rust_18xx::steps::{DividendStep, StepKind};

// =============================================================================
// Undo
// =============================================================================

#[test]
fn test_undo_last_action() {
    let (mut game, ids) = game_1846(60);
    game.process_action(&lay(ids.minor, 57, "A1")).unwrap();
    game.process_action(&token(ids.minor, "C3")).unwrap();
    assert_eq!(game.current_step(), Some(StepKind::Route));

    assert_eq!(game.undo(1).unwrap(), 1);

    assert_eq!(game.current_step(), Some(StepKind::TokenOrTrack));
    assert_eq!(game.state().entity(ids.minor).unwrap().cash, 40);
    assert_eq!(game.state().entity(ids.minor).unwrap().tokens.available, 1);
    assert_eq!(game.history().submitted().count(), 1);
}

#[test]
fn test_undo_takes_auto_actions_with_it() {
    let (mut game, ids) = game_1846(60);
    game.process_action(&lay(ids.minor, 57, "A1")).unwrap();
    game.process_action(&token(ids.minor, "C3")).unwrap();
    game.process_action(&run(ids.minor, 0, 50)).unwrap();
    game.process_action(&pass(ids.corp)).unwrap();
    assert_eq!(game.history().len(), 5);

    assert_eq!(game.undo(2).unwrap(), 2);

    assert_eq!(game.history().len(), 2);
    assert!(game.history().records().iter().all(|r| !r.auto));
    assert_eq!(game.round().current_entity(), Some(ids.minor));
    assert_eq!(game.current_step(), Some(StepKind::Route));
    assert_eq!(game.state().cash(ALICE).unwrap(), 400);
}

#[test]
fn test_undo_everything_restores_the_start() {
    let (fresh, ids) = game_1846(60);
    let (mut game, _) = game_1846(60);
    game.process_action(&lay(ids.minor, 57, "A1")).unwrap();
    game.process_action(&pass(ids.minor)).unwrap();

    assert_eq!(game.undo(10).unwrap(), 2);

    assert_eq!(game.state(), fresh.state());
    assert_eq!(game.round(), fresh.round());
    assert!(game.history().is_empty());
}

#[test]
fn test_undo_across_rounds() {
    let (mut game, ids) = game_1846(60);
    let round_one = [
        pass(ids.minor),
        run(ids.minor, 0, 20),
        pass(ids.corp),
        pass(ids.corp),
        Action::BuyTrain {
            entity: ids.corp,
            train: TrainId(1),
            price: 80,
        },
        pass(ids.corp),
    ];
    for action in &round_one {
        game.process_action(action).unwrap();
    }
    game.next_round().unwrap();
    game.process_action(&lay(ids.minor, 57, "A1")).unwrap();
    let cash_after_round_one = game.state().entity(ids.minor).unwrap().cash + 20;

    game.undo(1).unwrap();

    assert_eq!(game.round().number(), 2);
    assert_eq!(game.round().current_entity(), Some(ids.minor));
    assert_eq!(game.state().entity(ids.minor).unwrap().cash, cash_after_round_one);
}

// =============================================================================
// Replay
// =============================================================================

#[test]
fn test_replay_matches_live_play() {
    let (mut live, ids) = game_1846(60);
    let actions = [lay(ids.minor, 57, "A1"), token(ids.minor, "C3"), run(ids.minor, 0, 40)];
    for action in &actions {
        live.process_action(action).unwrap();
    }

    let (mut replayed, _) = game_1846(60);
    replayed.replay(&actions).unwrap();

    assert_eq!(replayed.state(), live.state());
    assert_eq!(replayed.round(), live.round());
    assert_eq!(replayed.history(), live.history());
}

#[test]
fn test_failed_replay_keeps_the_game() {
    let (mut game, ids) = game_1846(60);
    game.process_action(&lay(ids.minor, 57, "A1")).unwrap();
    let state = game.state().clone();

    let err = game.replay(&[pass(ids.corp)]).unwrap_err();

    assert!(matches!(err, EngineError::OutOfTurn { .. }));
    assert_eq!(game.state(), &state);
}

// =============================================================================
// Snapshots
// =============================================================================

#[test]
fn test_checkpoint_round_trip() {
    let (mut game, ids) = game_1846(60);
    game.process_action(&lay(ids.minor, 57, "A1")).unwrap();

    let snapshot = game.checkpoint().unwrap();

    assert_eq!(&snapshot.state().unwrap(), game.state());
    assert_eq!(snapshot.round().unwrap().as_ref(), Some(game.round()));
}

// =============================================================================
// 18EU
// =============================================================================

fn state_18eu() -> (GameState, rust_18xx::EntityId) {
    let title = G18EU::new();
    let mut state = GameState::new(title.config().with_seating_shuffle(false), &["Alice", "Bob"]);
    add_board(&mut state);
    let minor = state.alloc_entity();
    state.add_entity(Entity::minor(minor, "1", PlayerId::new(0)));
    (state, minor)
}

#[test]
fn test_18eu_minors_start_with_a_free_train() {
    let (state, minor) = state_18eu();
    let bank = state.bank.cash();

    let game = Game::new(Box::new(G18EU::new()), state).unwrap();

    let entity = game.state().entity(minor).unwrap();
    assert_eq!(entity.trains.len(), 1);
    assert_eq!(entity.trains[0].id, TrainId(0));
    assert_eq!(entity.cash, 0);
    assert_eq!(game.state().bank.cash(), bank);
    assert!(game.state().log.messages().contains(&"1 receives a free train"));
}

#[test]
fn test_18eu_minor_turn() {
    let (state, minor) = state_18eu();
    let mut game = Game::new(Box::new(G18EU::new()), state).unwrap();
    assert_eq!(game.current_step(), Some(StepKind::Track));

    game.process_action(&lay(minor, 57, "A1")).unwrap();
    assert_eq!(game.current_step(), Some(StepKind::Token));
    game.process_action(&token(minor, "C3")).unwrap();
    game.process_action(&run(minor, 0, 30)).unwrap();

    // No auto-resolution in 18EU: the owner chooses.
    assert_eq!(game.current_step(), Some(StepKind::Dividend));
    game.process_action(&Action::Dividend {
        entity: minor,
        kind: DividendKind::Payout,
    })
    .unwrap();

    assert!(game.round().is_finished());
    assert_eq!(game.state().entity(minor).unwrap().cash, 15);
    assert_eq!(game.state().cash(ALICE).unwrap(), 415);
    let messages = game.state().log.messages();
    assert!(messages.contains(&"1 pays out £30"));
    assert!(messages.contains(&"Alice receives £15"));
}

// =============================================================================
// Other Titles
// =============================================================================

#[test]
fn test_base_title_runs_every_step() {
    let mut state = GameState::new(GameConfig::new(Title::Base).with_seating_shuffle(false), &["Alice", "Bob"]);
    add_board(&mut state);
    let minor = state.alloc_entity();
    state.add_entity(Entity::minor(minor, "M", PlayerId::new(1)).with_cash(100));

    let mut game = Game::new(Box::new(Base::new()), state).unwrap();

    assert_eq!(game.current_step(), Some(StepKind::Track));
    game.process_action(&pass(minor)).unwrap();
    assert_eq!(game.current_step(), Some(StepKind::Token));
    game.process_action(&pass(minor)).unwrap();
    // Routes and dividends need trains, so the minor goes straight to buying one.
    assert_eq!(game.current_step(), Some(StepKind::Train));
    game.process_action(&Action::BuyTrain {
        entity: minor,
        train: TrainId(0),
        price: 80,
    })
    .unwrap();

    // Nothing else is affordable, so the turn and the round end.
    assert!(game.round().is_finished());
    assert_eq!(game.state().entity(minor).unwrap().cash, 20);
}

/// A title that skips track and token steps for minors.
#[derive(Debug)]
struct RoutesOnly {
    registry: StepRegistry,
}

impl RoutesOnly {
    fn new() -> Self {
        let registry = StepRegistry::base()
            .override_step(DividendStep::auto_resolving())
            .with_sequence(StepSet::Minor, vec![StepKind::Route, StepKind::Dividend]);
        Self { registry }
    }
}

impl GameTitle for RoutesOnly {
    fn title(&self) -> Title {
        Title::Base
    }

    fn config(&self) -> GameConfig {
        GameConfig::new(Title::Base).with_seating_shuffle(false)
    }

    fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    fn selection(&self) -> &dyn SelectionPolicy {
        &PriorityOrder
    }
}

#[test]
fn test_custom_title_survives_undo() {
    let title = RoutesOnly::new();
    let mut state = GameState::new(title.config(), &["Alice", "Bob"]);
    let minor = state.alloc_entity();
    state.add_entity(Entity::minor(minor, "M", PlayerId::new(0)));
    state.give_depot_train(minor, TrainId(0)).unwrap();
    let mut game = Game::new(Box::new(title), state).unwrap();
    assert_eq!(game.current_step(), Some(StepKind::Route));

    game.process_action(&run(minor, 0, 10)).unwrap();
    assert!(game.round().is_finished());
    game.undo(1).unwrap();

    assert_eq!(game.current_step(), Some(StepKind::Route));
    assert_eq!(game.title().registry().sequence(StepSet::Minor), &[StepKind::Route, StepKind::Dividend]);
}

#[test]
fn test_unregistered_step_is_rejected_at_setup() {
    #[derive(Debug)]
    struct Broken(StepRegistry);

    impl GameTitle for Broken {
        fn title(&self) -> Title {
            Title::Base
        }
        fn config(&self) -> GameConfig {
            GameConfig::default()
        }
        fn registry(&self) -> &StepRegistry {
            &self.0
        }
        fn selection(&self) -> &dyn SelectionPolicy {
            &PriorityOrder
        }
    }

    let registry = StepRegistry::base().with_sequence(StepSet::Full, vec![StepKind::Issue]);
    let state = GameState::new(GameConfig::default(), &["Alice"]);

    let err = Game::new(Box::new(Broken(registry)), state).unwrap_err();

    assert!(matches!(err, EngineError::InvariantViolation(_)));
}
