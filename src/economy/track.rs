//! Track: hexes, tiles, station tokens and routes.
//!
//! Connectivity and tile-upgrade legality are not modelled here. The board
//! only knows which tile sits on each hex, which tiles remain in the supply,
//! and which entities hold a station on a hex. Routes arrive precomputed.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::economy::TrainId;
use crate::error::EngineError;

/// Hex coordinate ("H12").
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct HexId(pub String);

impl HexId {
    pub fn new(coord: impl Into<String>) -> Self {
        Self(coord.into())
    }
}

impl std::fmt::Display for HexId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TileId(pub u32);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    Mountain,
    Water,
}

/// Abilities granted by private companies.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Ability {
    /// Reduce the terrain cost of laying track on `terrain`.
    TileDiscount { terrain: Terrain, discount: i64 },
}

/// A terrain cost printed on a tile, paid when the tile is upgraded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upgrade {
    pub terrain: Terrain,
    pub cost: i64,
}

/// A tile: either printed on the map or taken from the supply.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub name: String,
    pub upgrades: Vec<Upgrade>,
}

impl Tile {
    pub fn new(id: TileId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            upgrades: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_upgrade(mut self, terrain: Terrain, cost: i64) -> Self {
        self.upgrades.push(Upgrade { terrain, cost });
        self
    }

    /// Cost of replacing this tile, after discounts from `abilities`.
    ///
    /// Each upgrade is discounted by the matching abilities and floored at 0.
    #[must_use]
    pub fn upgrade_cost(&self, abilities: &[Ability]) -> i64 {
        self.upgrades
            .iter()
            .map(|upgrade| {
                let discount: i64 = abilities
                    .iter()
                    .map(|ability| match ability {
                        Ability::TileDiscount { terrain, discount } if *terrain == upgrade.terrain => {
                            *discount
                        }
                        Ability::TileDiscount { .. } => 0,
                    })
                    .sum();
                (upgrade.cost - discount).max(0)
            })
            .sum()
    }
}

/// A map hex with its current tile and station tokens.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hex {
    pub id: HexId,
    pub tile: Tile,
    pub rotation: u8,
    /// Station slots on the hex (0 for plain track).
    pub slots: u8,
    pub tokens: Vec<EntityId>,
}

impl Hex {
    pub fn new(id: HexId, tile: Tile) -> Self {
        Self {
            id,
            tile,
            rotation: 0,
            slots: 0,
            tokens: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_slots(mut self, slots: u8) -> Self {
        self.slots = slots;
        self
    }

    #[must_use]
    pub fn has_free_slot(&self) -> bool {
        self.tokens.len() < self.slots as usize
    }
}

/// Placed tiles, the tile supply and station tokens.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    hexes: OrdMap<HexId, Hex>,
    supply: Vec<Tile>,
}

impl Board {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_hex(&mut self, hex: Hex) {
        self.hexes.insert(hex.id.clone(), hex);
    }

    pub fn add_supply(&mut self, tile: Tile) {
        self.supply.push(tile);
    }

    #[must_use]
    pub fn hex(&self, id: &HexId) -> Option<&Hex> {
        self.hexes.get(id)
    }

    pub fn hexes(&self) -> impl Iterator<Item = &Hex> {
        self.hexes.values()
    }

    #[must_use]
    pub fn supply(&self) -> &[Tile] {
        &self.supply
    }

    #[must_use]
    pub fn supply_tile(&self, id: TileId) -> Option<&Tile> {
        self.supply.iter().find(|t| t.id == id)
    }

    /// Replace the tile on `hex` with `tile` from the supply.
    ///
    /// The replaced tile leaves the game. Returns the replaced tile.
    pub fn lay_tile(&mut self, hex: &HexId, tile: TileId, rotation: u8) -> Result<Tile, EngineError> {
        let pos = self
            .supply
            .iter()
            .position(|t| t.id == tile)
            .ok_or_else(|| EngineError::InvalidAction(format!("tile {tile} is not in the supply")))?;
        let target = self
            .hexes
            .get_mut(hex)
            .ok_or_else(|| EngineError::InvalidAction(format!("unknown hex {hex}")))?;
        let new_tile = self.supply.remove(pos);
        target.rotation = rotation % 6;
        Ok(std::mem::replace(&mut target.tile, new_tile))
    }

    /// Put a station token for `entity` on `hex`.
    pub fn place_token(&mut self, hex: &HexId, entity: EntityId) -> Result<(), EngineError> {
        let target = self
            .hexes
            .get_mut(hex)
            .ok_or_else(|| EngineError::InvalidAction(format!("unknown hex {hex}")))?;
        if target.tokens.contains(&entity) {
            return Err(EngineError::InvalidAction(format!("{entity} already has a token on {hex}")));
        }
        if !target.has_free_slot() {
            return Err(EngineError::InvalidAction(format!("no free station slot on {hex}")));
        }
        target.tokens.push(entity);
        Ok(())
    }
}

/// A route run by one train, as produced by the route finder.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    pub train: TrainId,
    pub hexes: Vec<HexId>,
    pub revenue: i64,
}

impl Route {
    pub fn new(train: TrainId, hexes: Vec<HexId>, revenue: i64) -> Self {
        Self { train, hexes, revenue }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mountain_tile() -> Tile {
        Tile::new(TileId(0), "blank").with_upgrade(Terrain::Mountain, 40)
    }

    #[test]
    fn test_upgrade_cost_without_abilities() {
        assert_eq!(mountain_tile().upgrade_cost(&[]), 40);
        assert_eq!(Tile::new(TileId(1), "plain").upgrade_cost(&[]), 0);
    }

    #[test]
    fn test_upgrade_cost_discount_matches_terrain() {
        let water = Ability::TileDiscount { terrain: Terrain::Water, discount: 20 };
        let mountain = Ability::TileDiscount { terrain: Terrain::Mountain, discount: 60 };

        assert_eq!(mountain_tile().upgrade_cost(&[water.clone()]), 40);
        // Discount never makes the cost negative
        assert_eq!(mountain_tile().upgrade_cost(&[water, mountain]), 0);
    }

    #[test]
    fn test_lay_tile_consumes_supply() {
        let mut board = Board::new();
        board.add_hex(Hex::new(HexId::new("H12"), mountain_tile()));
        board.add_supply(Tile::new(TileId(7), "7"));

        let old = board.lay_tile(&HexId::new("H12"), TileId(7), 8).unwrap();

        assert_eq!(old.name, "blank");
        let hex = board.hex(&HexId::new("H12")).unwrap();
        assert_eq!(hex.tile.id, TileId(7));
        assert_eq!(hex.rotation, 2);
        assert!(board.supply().is_empty());
    }

    #[test]
    fn test_lay_tile_errors_leave_supply() {
        let mut board = Board::new();
        board.add_supply(Tile::new(TileId(7), "7"));

        assert!(board.lay_tile(&HexId::new("Z1"), TileId(7), 0).is_err());
        assert!(board.lay_tile(&HexId::new("Z1"), TileId(9), 0).is_err());
        assert_eq!(board.supply().len(), 1);
    }

    #[test]
    fn test_place_token_slots() {
        let mut board = Board::new();
        board.add_hex(Hex::new(HexId::new("D6"), Tile::new(TileId(0), "city")).with_slots(1));

        assert!(board.place_token(&HexId::new("D6"), EntityId(5)).is_ok());
        assert!(board.place_token(&HexId::new("D6"), EntityId(5)).is_err());
        assert!(board.place_token(&HexId::new("D6"), EntityId(6)).is_err());
    }
}
