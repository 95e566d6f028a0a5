//! Shared fixtures for integration tests.

#![allow(dead_code)]

use rust_18xx::core::{Action, Entity, EntityId, GameState, PlayerId, Tokens};
use rust_18xx::economy::{Hex, HexId, Route, ShareHolder, Terrain, Tile, TileId, TrainId};
use rust_18xx::game::Game;
use rust_18xx::games::G1846;
use rust_18xx::rules::GameTitle;

pub const ALICE: EntityId = EntityId(0);
pub const BOB: EntityId = EntityId(1);

/// Entities created by `setup_1846`.
#[derive(Clone, Copy, Debug)]
pub struct Ids {
    pub minor: EntityId,
    pub corp: EntityId,
}

/// A three-hex board with three tiles in the supply.
pub fn add_board(state: &mut GameState) {
    state.board.add_hex(Hex::new(HexId::new("A1"), Tile::new(TileId(1), "plain")).with_slots(1));
    state.board.add_hex(Hex::new(HexId::new("B2"), Tile::new(TileId(2), "hills").with_upgrade(Terrain::Mountain, 40)));
    state.board.add_hex(Hex::new(HexId::new("C3"), Tile::new(TileId(3), "city")).with_slots(2));
    for id in [57, 58, 59] {
        state.board.add_supply(Tile::new(TileId(id), id.to_string()));
    }
}

/// 1846 state for Alice and Bob with one minor and one corporation.
///
/// The minor (owned by Alice) has `minor_cash` and the first 2-train. The
/// corporation is parred at 100 with Alice 3, Bob 2 and 5 in its treasury,
/// so it floats with 500.
pub fn state_1846(minor_cash: i64) -> (GameState, Ids) {
    let config = G1846::new().config().with_seating_shuffle(false);
    let mut state = GameState::new(config, &["Alice", "Bob"]);
    add_board(&mut state);

    let minor = state.alloc_entity();
    state.add_entity(Entity::minor(minor, "MS", PlayerId::new(0)).with_cash(minor_cash));
    state.give_depot_train(minor, TrainId(0)).unwrap();

    let corp = state.alloc_entity();
    state.add_entity(Entity::corporation(corp, "PRR", "Pennsylvania", 10).with_tokens(Tokens::new(3, 40)));
    state.share_pool.grant(corp, ShareHolder::Entity(ALICE), 3);
    state.share_pool.grant(corp, ShareHolder::Entity(BOB), 2);
    state.share_pool.grant(corp, ShareHolder::Entity(corp), 5);
    state.float_corporation(corp, 100).unwrap();

    (state, Ids { minor, corp })
}

pub fn game_1846(minor_cash: i64) -> (Game, Ids) {
    let (state, ids) = state_1846(minor_cash);
    let game = Game::new(Box::new(G1846::new()), state).unwrap();
    (game, ids)
}

pub fn lay(entity: EntityId, tile: u32, hex: &str) -> Action {
    Action::LayTile {
        entity,
        tile: TileId(tile),
        hex: HexId::new(hex),
        rotation: 0,
    }
}

pub fn token(entity: EntityId, hex: &str) -> Action {
    Action::PlaceToken {
        entity,
        hex: HexId::new(hex),
    }
}

pub fn run(entity: EntityId, train: u32, revenue: i64) -> Action {
    Action::RunRoutes {
        entity,
        routes: vec![Route::new(TrainId(train), vec![HexId::new("A1"), HexId::new("C3")], revenue)],
    }
}

pub fn pass(entity: EntityId) -> Action {
    Action::Pass { entity }
}
