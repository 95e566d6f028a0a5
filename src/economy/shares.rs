//! Share ownership ledger and share bundles.
//!
//! The ledger records how many shares of each corporation every holder owns.
//! A corporation's unissued shares sit in its own treasury
//! (`ShareHolder::Entity(corporation)`), sold shares with players or other
//! entities, and shares returned to the market in the `Pool`.
//!
//! Cash movements for sales and purchases are performed by `GameState`, which
//! owns both the ledger and the cash holders.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::error::EngineError;

/// Who holds a block of shares.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ShareHolder {
    Entity(EntityId),
    Pool,
}

impl std::fmt::Display for ShareHolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShareHolder::Entity(id) => write!(f, "{id}"),
            ShareHolder::Pool => f.write_str("Market"),
        }
    }
}

/// A lot of shares offered for sale, issue or redemption.
///
/// Bundles are built on demand and never stored; `share_price` is set by
/// whoever builds the bundle.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareBundle {
    pub corporation: EntityId,
    pub owner: ShareHolder,
    pub num_shares: u32,
    pub share_price: i64,
}

impl ShareBundle {
    pub fn new(corporation: EntityId, owner: ShareHolder, num_shares: u32, share_price: i64) -> Self {
        Self {
            corporation,
            owner,
            num_shares,
            share_price,
        }
    }

    #[must_use]
    pub fn with_share_price(mut self, share_price: i64) -> Self {
        self.share_price = share_price;
        self
    }

    /// Total price of the bundle.
    #[must_use]
    pub fn price(&self) -> i64 {
        self.num_shares as i64 * self.share_price
    }

    /// Same shares from the same owner, regardless of price.
    #[must_use]
    pub fn same_lot(&self, other: &ShareBundle) -> bool {
        self.corporation == other.corporation
            && self.owner == other.owner
            && self.num_shares == other.num_shares
    }
}

/// Ledger of share holdings keyed by (corporation, holder).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePool {
    holdings: OrdMap<(EntityId, ShareHolder), u32>,
}

impl SharePool {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Place `shares` of `corporation` with `holder` (setup and tests).
    pub fn grant(&mut self, corporation: EntityId, holder: ShareHolder, shares: u32) {
        if shares == 0 {
            return;
        }
        let held = self.shares_of(corporation, holder);
        self.holdings.insert((corporation, holder), held + shares);
    }

    #[must_use]
    pub fn shares_of(&self, corporation: EntityId, holder: ShareHolder) -> u32 {
        self.holdings.get(&(corporation, holder)).copied().unwrap_or(0)
    }

    /// Shares of `corporation` sitting in the open market.
    #[must_use]
    pub fn num_market_shares(&self, corporation: EntityId) -> u32 {
        self.shares_of(corporation, ShareHolder::Pool)
    }

    /// Shares of `corporation` held by players.
    #[must_use]
    pub fn num_player_shares(&self, corporation: EntityId, player_count: usize) -> u32 {
        self.holders(corporation)
            .filter(|(holder, _)| matches!(holder, ShareHolder::Entity(id) if id.is_player(player_count)))
            .map(|(_, shares)| shares)
            .sum()
    }

    /// All holders of `corporation` with a positive share count.
    pub fn holders(&self, corporation: EntityId) -> impl Iterator<Item = (ShareHolder, u32)> + '_ {
        self.holdings
            .iter()
            .filter(move |((corp, _), shares)| *corp == corporation && **shares > 0)
            .map(|((_, holder), shares)| (*holder, *shares))
    }

    /// Every positive holding as `(corporation, holder, shares)`.
    pub fn iter(&self) -> impl Iterator<Item = (EntityId, ShareHolder, u32)> + '_ {
        self.holdings
            .iter()
            .filter(|(_, shares)| **shares > 0)
            .map(|((corp, holder), shares)| (*corp, *holder, *shares))
    }

    /// Bundles of 1..=n shares of `corporation` held by `holder`, all priced
    /// at `share_price`.
    #[must_use]
    pub fn bundles_for_corporation(
        &self,
        holder: ShareHolder,
        corporation: EntityId,
        share_price: i64,
    ) -> Vec<ShareBundle> {
        (1..=self.shares_of(corporation, holder))
            .map(|n| ShareBundle::new(corporation, holder, n, share_price))
            .collect()
    }

    /// Move the shares of `bundle` from its owner to `to`.
    pub fn transfer(&mut self, bundle: &ShareBundle, to: ShareHolder) -> Result<(), EngineError> {
        let held = self.shares_of(bundle.corporation, bundle.owner);
        if held < bundle.num_shares {
            return Err(EngineError::InvalidAction(format!(
                "{} holds {held} shares of {}, cannot move {}",
                bundle.owner, bundle.corporation, bundle.num_shares
            )));
        }
        let remaining = held - bundle.num_shares;
        if remaining == 0 {
            self.holdings.remove(&(bundle.corporation, bundle.owner));
        } else {
            self.holdings.insert((bundle.corporation, bundle.owner), remaining);
        }
        self.grant(bundle.corporation, to, bundle.num_shares);
        Ok(())
    }

    /// The player holding the most shares of `corporation`.
    ///
    /// A tie keeps the `current` president.
    #[must_use]
    pub fn president(
        &self,
        corporation: EntityId,
        player_count: usize,
        current: Option<EntityId>,
    ) -> Option<EntityId> {
        let current_shares = current.map_or(0, |id| self.shares_of(corporation, ShareHolder::Entity(id)));
        let mut best = current.filter(|_| current_shares > 0);
        let mut best_shares = current_shares;
        for (holder, shares) in self.holders(corporation) {
            if let ShareHolder::Entity(id) = holder {
                if id.is_player(player_count) && shares > best_shares {
                    best = Some(id);
                    best_shares = shares;
                }
            }
        }
        best
    }
}
