//! Shared fixtures for step unit tests.

use crate::core::{Entity, EntityId, GameConfig, GameState, PlayerId, Title, Tokens};
use crate::economy::{Hex, HexId, ShareHolder, Terrain, Tile, TileId};
use crate::round::TurnState;

pub(crate) const ALICE: EntityId = EntityId(0);
pub(crate) const BOB: EntityId = EntityId(1);

/// Two players, no seat shuffle, a small board and a 20 tile cost.
pub(crate) fn state() -> GameState {
    let config = GameConfig::new(Title::G1846)
        .with_tile_cost(20)
        .with_seating_shuffle(false);
    let mut state = GameState::new(config, &["Alice", "Bob"]);
    state.board.add_hex(Hex::new(HexId::new("A1"), Tile::new(TileId(1), "plain")).with_slots(1));
    state.board.add_hex(Hex::new(HexId::new("B2"), Tile::new(TileId(2), "hills").with_upgrade(Terrain::Mountain, 40)));
    state.board.add_hex(Hex::new(HexId::new("C3"), Tile::new(TileId(3), "city")).with_slots(2));
    state.board.add_supply(Tile::new(TileId(57), "57"));
    state.board.add_supply(Tile::new(TileId(58), "58"));
    state
}

/// A minor owned by Alice with one free token.
pub(crate) fn add_minor(state: &mut GameState, sym: &str, cash: i64) -> EntityId {
    let id = state.alloc_entity();
    state.add_entity(Entity::minor(id, sym, PlayerId::new(0)).with_cash(cash));
    id
}

/// A floated ten-share corporation: Alice 3, Bob 2, treasury 5.
pub(crate) fn add_corporation(state: &mut GameState, sym: &str, par: i64) -> EntityId {
    let id = state.alloc_entity();
    state.add_entity(Entity::corporation(id, sym, sym, 10).with_tokens(Tokens::new(3, 40)));
    state.share_pool.grant(id, ShareHolder::Entity(ALICE), 3);
    state.share_pool.grant(id, ShareHolder::Entity(BOB), 2);
    state.share_pool.grant(id, ShareHolder::Entity(id), 5);
    state.float_corporation(id, par).unwrap();
    id
}

pub(crate) fn turn(entity: EntityId) -> TurnState {
    TurnState::new(entity)
}
