//! Entity selection: which entities operate in a round and in what order.
//!
//! The round calls its title's policy once, at round start. Entities that
//! float (or stop being operable) later in the round do not change the
//! order already computed.

use crate::core::{EntityId, GameState, PlayerId};

pub trait SelectionPolicy: Send + Sync + std::fmt::Debug {
    /// The operating order for a round starting from `state`.
    fn select(&self, state: &GameState) -> Vec<EntityId>;
}

/// Seat position of an entity's owner in the priority order.
fn seat_of(state: &GameState, id: EntityId) -> usize {
    let owner = state
        .entity(id)
        .ok()
        .and_then(|e| e.owner)
        .and_then(|o| o.as_player(state.player_count()));
    owner
        .and_then(|player: PlayerId| state.seating.iter().position(|&p| p == player))
        .unwrap_or(usize::MAX)
}

/// Every operable entity: those with a share price by stock-market order,
/// then the rest by their owner's seat in priority order.
#[derive(Clone, Copy, Debug, Default)]
pub struct PriorityOrder;

impl SelectionPolicy for PriorityOrder {
    fn select(&self, state: &GameState) -> Vec<EntityId> {
        let (priced, mut unpriced): (Vec<EntityId>, Vec<EntityId>) = state
            .entities()
            .filter(|e| e.is_operable())
            .map(|e| e.id)
            .partition(|&id| state.stock_market.share_price(id).is_some());
        unpriced.sort_by_key(|&id| (seat_of(state, id), id));

        let mut order = state.stock_market.operating_order(&priced);
        order.extend(unpriced);
        order
    }
}

/// Minors first in ID order, then floated corporations by stock-market
/// order.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinorsFirst;

impl SelectionPolicy for MinorsFirst {
    fn select(&self, state: &GameState) -> Vec<EntityId> {
        let (minors, corporations): (Vec<_>, Vec<_>) = state.entities().partition(|e| e.is_minor());
        let floated: Vec<EntityId> = corporations.iter().filter(|c| c.floated).map(|c| c.id).collect();

        let mut order: Vec<EntityId> = minors.iter().map(|m| m.id).collect();
        order.extend(state.stock_market.operating_order(&floated));
        order
    }
}
