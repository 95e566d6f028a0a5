//! Shared economic state: bank, shares, stock market, trains and track.
//!
//! These are the collaborators the operating round mutates. They are owned
//! by `GameState` and shared with the (external) stock round; the round
//! only ever reaches them through the state it is handed.

pub mod bank;
pub mod company;
pub mod depot;
pub mod market;
pub mod shares;
pub mod track;

pub use bank::Bank;
pub use company::{Company, CompanyId};
pub use depot::{Depot, Train, TrainId};
pub use market::{Direction, SharePrice, StockMarket};
pub use shares::{ShareBundle, ShareHolder, SharePool};
pub use track::{Ability, Board, Hex, HexId, Route, Terrain, Tile, TileId, Upgrade};
