//! Actions: the only way the game state changes.
//!
//! Every action names the entity taking it and carries its payload.
//! `ActionKind` is the payload-free tag used for legality sets and the
//! per-turn counters.
//!
//! Applied actions are appended to the history as `ActionRecord`s, which is
//! what undo replays.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::entity::EntityId;
use crate::economy::{CompanyId, HexId, Route, ShareBundle, TileId, TrainId};

/// Payload-free tag of an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    LayTile,
    PlaceToken,
    SellShares,
    BuyShares,
    RunRoutes,
    Dividend,
    BuyTrain,
    BuyCompany,
    Pass,
}

impl ActionKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionKind::LayTile => "lay_tile",
            ActionKind::PlaceToken => "place_token",
            ActionKind::SellShares => "sell_shares",
            ActionKind::BuyShares => "buy_shares",
            ActionKind::RunRoutes => "run_routes",
            ActionKind::Dividend => "dividend",
            ActionKind::BuyTrain => "buy_train",
            ActionKind::BuyCompany => "buy_company",
            ActionKind::Pass => "pass",
        }
    }
}

impl std::fmt::Display for ActionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Set of legal action kinds. Steps rarely offer more than three.
pub type ActionKinds = SmallVec<[ActionKind; 4]>;

/// How revenue is distributed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DividendKind {
    Payout,
    Withhold,
    /// Half withheld, half paid out (titles that allow it).
    Half,
}

impl DividendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            DividendKind::Payout => "payout",
            DividendKind::Withhold => "withhold",
            DividendKind::Half => "half",
        }
    }
}

/// A player decision.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    LayTile {
        entity: EntityId,
        tile: TileId,
        hex: HexId,
        rotation: u8,
    },
    PlaceToken {
        entity: EntityId,
        hex: HexId,
    },
    /// `entity` is the seller: the operating entity for an issue, or a
    /// player selling from their own holdings.
    SellShares {
        entity: EntityId,
        bundle: ShareBundle,
    },
    BuyShares {
        entity: EntityId,
        bundle: ShareBundle,
    },
    RunRoutes {
        entity: EntityId,
        routes: Vec<Route>,
    },
    Dividend {
        entity: EntityId,
        kind: DividendKind,
    },
    BuyTrain {
        entity: EntityId,
        train: TrainId,
        price: i64,
    },
    BuyCompany {
        entity: EntityId,
        company: CompanyId,
        price: i64,
    },
    Pass {
        entity: EntityId,
    },
}

impl Action {
    /// The entity taking the action.
    #[must_use]
    pub fn entity(&self) -> EntityId {
        match self {
            Action::LayTile { entity, .. }
            | Action::PlaceToken { entity, .. }
            | Action::SellShares { entity, .. }
            | Action::BuyShares { entity, .. }
            | Action::RunRoutes { entity, .. }
            | Action::Dividend { entity, .. }
            | Action::BuyTrain { entity, .. }
            | Action::BuyCompany { entity, .. }
            | Action::Pass { entity } => *entity,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::LayTile { .. } => ActionKind::LayTile,
            Action::PlaceToken { .. } => ActionKind::PlaceToken,
            Action::SellShares { .. } => ActionKind::SellShares,
            Action::BuyShares { .. } => ActionKind::BuyShares,
            Action::RunRoutes { .. } => ActionKind::RunRoutes,
            Action::Dividend { .. } => ActionKind::Dividend,
            Action::BuyTrain { .. } => ActionKind::BuyTrain,
            Action::BuyCompany { .. } => ActionKind::BuyCompany,
            Action::Pass { .. } => ActionKind::Pass,
        }
    }
}

/// An applied action with its position in the game.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionRecord {
    pub action: Action,
    /// Operating round number.
    pub round: u32,
    /// Index of the acting entity in the round's order.
    pub turn: u32,
    /// Position in the whole history.
    pub sequence: u32,
    /// Synthesized by the engine rather than submitted. Replay skips these;
    /// the engine derives them again.
    pub auto: bool,
}

impl ActionRecord {
    #[must_use]
    pub fn new(action: Action, round: u32, turn: u32, sequence: u32) -> Self {
        Self {
            action,
            round,
            turn,
            sequence,
            auto: false,
        }
    }

    #[must_use]
    pub fn auto(mut self) -> Self {
        self.auto = true;
        self
    }
}
