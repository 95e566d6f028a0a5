//! Per-title configuration.
//!
//! Each game title supplies a `GameConfig` with its constants: starting
//! money, the flat tile cost, the market row, the train roster, and the
//! handful of rule switches the operating round consults. The engine never
//! hardcodes a title's numbers; it reads them from here.

use serde::{Deserialize, Serialize};

/// Game title identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Title {
    /// Generic rules with no title-specific overrides.
    Base,
    G1846,
    G18EU,
}

impl std::fmt::Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Title::Base => "Base",
            Title::G1846 => "1846",
            Title::G18EU => "18EU",
        })
    }
}

/// When a corporation places its home station.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HomeTokenTiming {
    /// When it first operates.
    Operate,
    /// When it floats.
    Float,
    /// When its par price is set.
    Par,
}

/// When shares of a corporation may first be sold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellAfter {
    FirstStockRound,
    /// After the corporation has operated.
    Operate,
    Any,
}

/// Allowed order of sells and buys within a stock-round turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SellBuyOrder {
    SellBuy,
    SellBuySell,
}

/// A train row: `(name, distance, price, count)`.
pub type TrainRow = (String, u32, i64, u32);

/// Complete title configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub title: Title,

    /// Currency template; `{}` is replaced by the amount.
    pub currency_format: String,

    pub bank_cash: i64,

    /// Cash dealt to each player at setup.
    pub starting_cash: i64,

    /// Flat minimum charged for laying a tile (TILE_COST).
    pub tile_cost: i64,

    /// Most trains an entity may own.
    pub train_limit: usize,

    pub home_token_timing: HomeTokenTiming,
    pub sell_after: SellAfter,
    pub sell_buy_order: SellBuyOrder,

    /// Whether corporations may split revenue half/half.
    pub allow_half_dividend: bool,

    /// Company purchase price bounds, as percentages of face value.
    pub company_price_range: (i64, i64),

    /// Write a game-log line when an action is ignored as a duplicate.
    pub log_ignored_actions: bool,

    /// Shuffle the seating order at setup.
    pub shuffle_seating: bool,

    /// Stock market prices, ascending.
    pub market: Vec<i64>,

    /// Train roster in depot order.
    pub trains: Vec<TrainRow>,

    pub seed: u64,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            title: Title::Base,
            currency_format: "${}".to_string(),
            bank_cash: 12_000,
            starting_cash: 400,
            tile_cost: 0,
            train_limit: 4,
            home_token_timing: HomeTokenTiming::Operate,
            sell_after: SellAfter::FirstStockRound,
            sell_buy_order: SellBuyOrder::SellBuySell,
            allow_half_dividend: false,
            company_price_range: (50, 200),
            log_ignored_actions: false,
            shuffle_seating: true,
            market: vec![
                0, 10, 20, 30, 40, 50, 60, 70, 80, 90, 100, 112, 124, 137, 150, 165, 180, 195,
                212, 230, 250, 270, 295, 320, 345, 375, 405, 440, 475, 510, 550, 600,
            ],
            trains: vec![
                ("2".to_string(), 2, 80, 6),
                ("3".to_string(), 3, 180, 5),
                ("4".to_string(), 4, 300, 4),
                ("5".to_string(), 5, 450, 3),
                ("6".to_string(), 6, 630, 2),
            ],
            seed: 42,
        }
    }
}

impl GameConfig {
    #[must_use]
    pub fn new(title: Title) -> Self {
        Self {
            title,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_tile_cost(mut self, cost: i64) -> Self {
        self.tile_cost = cost;
        self
    }

    #[must_use]
    pub fn with_bank_cash(mut self, cash: i64) -> Self {
        self.bank_cash = cash;
        self
    }

    #[must_use]
    pub fn with_starting_cash(mut self, cash: i64) -> Self {
        self.starting_cash = cash;
        self
    }

    #[must_use]
    pub fn with_train_limit(mut self, limit: usize) -> Self {
        self.train_limit = limit;
        self
    }

    #[must_use]
    pub fn with_trains(mut self, trains: Vec<TrainRow>) -> Self {
        self.trains = trains;
        self
    }

    #[must_use]
    pub fn with_market(mut self, market: Vec<i64>) -> Self {
        self.market = market;
        self
    }

    #[must_use]
    pub fn with_half_dividend(mut self, allowed: bool) -> Self {
        self.allow_half_dividend = allowed;
        self
    }

    #[must_use]
    pub fn with_ignored_action_logging(mut self, enabled: bool) -> Self {
        self.log_ignored_actions = enabled;
        self
    }

    #[must_use]
    pub fn with_seating_shuffle(mut self, enabled: bool) -> Self {
        self.shuffle_seating = enabled;
        self
    }

    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Format an amount with the title's currency template.
    #[must_use]
    pub fn format_currency(&self, amount: i64) -> String {
        self.currency_format.replace("{}", &amount.to_string())
    }
}
