//! Entity identification and the operating-entity record.
//!
//! ## ID Layout
//!
//! Every cash holder has an `EntityId`:
//! - `0..player_count`: Reserved for players (seat index)
//! - `player_count..`: Operating entities (minors and corporations)
//!
//! ```
//! use rust_18xx::core::{EntityId, PlayerId};
//!
//! let player_count = 4;
//! let seat_2 = EntityId::player(PlayerId::new(2));
//! assert!(seat_2.is_player(player_count));
//! assert!(!EntityId(4).is_player(player_count));
//! ```
//!
//! ## Entity kinds
//!
//! `EntityKind` is a closed tagged variant. Everything the engine needs to
//! know about a kind (does it float, how does it pay out, which step
//! sequence does it run) lives in its `Capabilities`, resolved once from the
//! kind instead of branching on `is_minor()` throughout the steps.

use serde::{Deserialize, Serialize};

use super::player::PlayerId;
use crate::economy::{CompanyId, HexId, Train};

/// Identifier for any cash holder: a player or an operating entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(pub u32);

impl EntityId {
    /// Entity ID of a seated player.
    #[must_use]
    pub const fn player(id: PlayerId) -> Self {
        Self(id.0 as u32)
    }

    /// First ID available for operating entities.
    #[must_use]
    pub const fn first_non_player(player_count: usize) -> u32 {
        player_count as u32
    }

    /// Check if this ID refers to a player. Requires the player count.
    #[must_use]
    pub const fn is_player(self, player_count: usize) -> bool {
        self.0 < player_count as u32
    }

    /// Convert to a `PlayerId` if this is a player entity.
    #[must_use]
    pub const fn as_player(self, player_count: usize) -> Option<PlayerId> {
        if self.is_player(player_count) {
            Some(PlayerId(self.0 as u8))
        } else {
            None
        }
    }

    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// Kind of an operating entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Single-owner company. Never floats, always operates.
    Minor,
    /// Share-issuing company. Operates only once floated.
    Corporation,
}

/// How dividends are distributed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PayoutRule {
    /// Half to the entity, half to its owner.
    SplitWithOwner,
    /// Per-share distribution to every holder of the corporation's shares.
    Shareholders,
}

/// Which step sequence an entity runs in the operating round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StepSet {
    Minor,
    Full,
}

/// Capability table for an entity kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Capabilities {
    pub floatable: bool,
    pub payout: PayoutRule,
    pub steps: StepSet,
    pub issues_shares: bool,
}

impl EntityKind {
    #[must_use]
    pub const fn capabilities(self) -> Capabilities {
        match self {
            EntityKind::Minor => Capabilities {
                floatable: false,
                payout: PayoutRule::SplitWithOwner,
                steps: StepSet::Minor,
                issues_shares: false,
            },
            EntityKind::Corporation => Capabilities {
                floatable: true,
                payout: PayoutRule::Shareholders,
                steps: StepSet::Full,
                issues_shares: true,
            },
        }
    }
}

/// Station tokens held by an entity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    /// Tokens still on the charter.
    pub available: u8,
    /// Cost of placing a token.
    pub cost: i64,
    /// Hexes already holding one of this entity's tokens.
    pub placed: Vec<HexId>,
}

impl Tokens {
    #[must_use]
    pub fn new(available: u8, cost: i64) -> Self {
        Self {
            available,
            cost,
            placed: Vec::new(),
        }
    }
}

/// An operating entity: a minor or a corporation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    /// Short symbol used in log lines ("NYC", "1").
    pub sym: String,
    pub name: String,
    pub kind: EntityKind,
    pub cash: i64,
    /// Always false for minors.
    pub floated: bool,
    /// Owning player (fixed for minors, the president for corporations).
    pub owner: Option<EntityId>,
    pub trains: Vec<Train>,
    pub tokens: Tokens,
    pub companies: Vec<CompanyId>,
    /// Shares in the corporation (0 for minors).
    pub total_shares: u32,
    /// Shares that must be player-held before the corporation floats.
    pub float_shares: u32,
}

impl Entity {
    /// Create a minor with a fixed owner.
    pub fn minor(id: EntityId, sym: impl Into<String>, owner: PlayerId) -> Self {
        let sym = sym.into();
        Self {
            id,
            name: sym.clone(),
            sym,
            kind: EntityKind::Minor,
            cash: 0,
            floated: false,
            owner: Some(EntityId::player(owner)),
            trains: Vec::new(),
            tokens: Tokens::new(1, 0),
            companies: Vec::new(),
            total_shares: 0,
            float_shares: 0,
        }
    }

    /// Create an unfloated corporation.
    pub fn corporation(
        id: EntityId,
        sym: impl Into<String>,
        name: impl Into<String>,
        total_shares: u32,
    ) -> Self {
        Self {
            id,
            sym: sym.into(),
            name: name.into(),
            kind: EntityKind::Corporation,
            cash: 0,
            floated: false,
            owner: None,
            trains: Vec::new(),
            tokens: Tokens::default(),
            companies: Vec::new(),
            total_shares,
            float_shares: total_shares / 2,
        }
    }

    #[must_use]
    pub fn with_cash(mut self, cash: i64) -> Self {
        self.cash = cash;
        self
    }

    #[must_use]
    pub fn with_tokens(mut self, tokens: Tokens) -> Self {
        self.tokens = tokens;
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: PlayerId) -> Self {
        self.owner = Some(EntityId::player(owner));
        self
    }

    #[must_use]
    pub fn with_float_shares(mut self, shares: u32) -> Self {
        self.float_shares = shares;
        self
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.kind.capabilities()
    }

    #[must_use]
    pub fn is_minor(&self) -> bool {
        self.kind == EntityKind::Minor
    }

    #[must_use]
    pub fn is_corporation(&self) -> bool {
        self.kind == EntityKind::Corporation
    }

    /// Minors always operate; corporations only once floated.
    #[must_use]
    pub fn is_operable(&self) -> bool {
        !self.capabilities().floatable || self.floated
    }

    /// Mark a corporation floated. Returns false for entities that never float.
    pub fn float(&mut self) -> bool {
        if !self.capabilities().floatable {
            return false;
        }
        self.floated = true;
        true
    }

    pub fn add_train(&mut self, train: Train) {
        self.trains.push(train);
    }

    pub fn remove_train(&mut self, id: crate::economy::TrainId) -> Option<Train> {
        let pos = self.trains.iter().position(|t| t.id == id)?;
        Some(self.trains.remove(pos))
    }
}
