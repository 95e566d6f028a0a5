//! One-dimensional stock market.
//!
//! Prices sit on a single row of spaces, lowest on the left. Each
//! corporation occupies one space; corporations sharing a space are stacked
//! in arrival order, and the earliest arrival operates first.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::error::EngineError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

/// A space on the market.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SharePrice {
    pub index: usize,
    pub price: i64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
struct Position {
    index: usize,
    arrival: u64,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockMarket {
    prices: Vec<i64>,
    positions: OrdMap<EntityId, Position>,
    arrivals: u64,
}

impl StockMarket {
    /// Create a market from prices in ascending order.
    #[must_use]
    pub fn new(prices: Vec<i64>) -> Self {
        debug_assert!(prices.windows(2).all(|w| w[0] < w[1]), "market prices must ascend");
        Self {
            prices,
            positions: OrdMap::new(),
            arrivals: 0,
        }
    }

    #[must_use]
    pub fn prices(&self) -> &[i64] {
        &self.prices
    }

    /// Place a corporation on the space priced `price`.
    pub fn set_par(&mut self, corporation: EntityId, price: i64) -> Result<SharePrice, EngineError> {
        let index = self
            .prices
            .iter()
            .position(|&p| p == price)
            .ok_or_else(|| EngineError::InvalidAction(format!("no market space priced {price}")))?;
        self.arrive(corporation, index);
        Ok(SharePrice { index, price })
    }

    #[must_use]
    pub fn share_price(&self, corporation: EntityId) -> Option<SharePrice> {
        let position = self.positions.get(&corporation)?;
        Some(SharePrice {
            index: position.index,
            price: self.prices[position.index],
        })
    }

    /// The space one step in `direction` from the corporation's current
    /// space, clamped at either end of the market.
    #[must_use]
    pub fn find_share_price(&self, corporation: EntityId, direction: Direction) -> Option<SharePrice> {
        let current = self.share_price(corporation)?;
        let index = match direction {
            Direction::Left => current.index.saturating_sub(1),
            Direction::Right => (current.index + 1).min(self.prices.len() - 1),
        };
        Some(SharePrice {
            index,
            price: self.prices[index],
        })
    }

    pub fn move_left(&mut self, corporation: EntityId) -> Option<SharePrice> {
        self.shift(corporation, Direction::Left)
    }

    pub fn move_right(&mut self, corporation: EntityId) -> Option<SharePrice> {
        self.shift(corporation, Direction::Right)
    }

    /// Order corporations for operating: price descending, then arrival.
    ///
    /// Corporations without a market position keep their relative order
    /// after all priced ones.
    #[must_use]
    pub fn operating_order(&self, corporations: &[EntityId]) -> Vec<EntityId> {
        let mut ordered = corporations.to_vec();
        ordered.sort_by_key(|id| match self.positions.get(id) {
            Some(position) => (0, std::cmp::Reverse(position.index), position.arrival),
            None => (1, std::cmp::Reverse(0), 0),
        });
        ordered
    }

    fn shift(&mut self, corporation: EntityId, direction: Direction) -> Option<SharePrice> {
        let current = self.share_price(corporation)?;
        let target = self.find_share_price(corporation, direction)?;
        if target.index != current.index {
            self.arrive(corporation, target.index);
        }
        Some(target)
    }

    fn arrive(&mut self, corporation: EntityId, index: usize) {
        self.arrivals += 1;
        self.positions.insert(
            corporation,
            Position {
                index,
                arrival: self.arrivals,
            },
        );
    }
}
