//! Game state: the context every step reads and mutates.
//!
//! `GameState` owns the players, the operating entities, private companies,
//! and the shared economic state (bank, share ledger, stock market, depot,
//! board). Steps never reach any of this through globals; the round hands
//! them the state explicitly.
//!
//! ## Cloning
//!
//! The large maps are `im` persistent structures, so cloning a state is
//! cheap. The round uses that to apply an action to a copy and commit it
//! only when every part of the action succeeded.
//!
//! ## Cash
//!
//! Players and entities are both addressed by `EntityId`. All cash movement
//! goes through `credit`, `debit`, `bank_spend`, `pay_bank` and
//! `transfer_cash`, which check before they mutate.

use im::OrdMap;
use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::entity::{Entity, EntityId};
use super::log::GameLog;
use super::player::{Player, PlayerId, PlayerMap};
use super::rng::GameRng;
use crate::economy::{
    Ability, Bank, Board, Company, CompanyId, Depot, ShareBundle, ShareHolder, SharePool,
    StockMarket, TrainId,
};
use crate::error::EngineError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameState {
    pub config: GameConfig,
    pub players: PlayerMap<Player>,
    /// Seats in priority (seating) order.
    pub seating: Vec<PlayerId>,
    entities: OrdMap<EntityId, Entity>,
    pub companies: OrdMap<CompanyId, Company>,
    pub bank: Bank,
    pub share_pool: SharePool,
    pub stock_market: StockMarket,
    pub depot: Depot,
    pub board: Board,
    pub log: GameLog,
    pub rng: GameRng,
    /// Current operating round number (0 before the first).
    pub round: u32,
    next_entity_id: u32,
}

impl GameState {
    /// Seat the players, deal starting cash and stock the depot and market.
    ///
    /// Seating is shuffled when the config asks for it.
    #[must_use]
    pub fn new(config: GameConfig, player_names: &[&str]) -> Self {
        let player_count = player_names.len();
        let mut players = PlayerMap::new(player_count, |id| Player::new(id, player_names[id.index()]));
        for player in PlayerId::all(player_count) {
            players[player].cash = config.starting_cash;
        }
        let bank = Bank::new(config.bank_cash - config.starting_cash * player_count as i64);

        let mut rng = GameRng::new(config.seed);
        let seating = if config.shuffle_seating {
            rng.seating(player_count)
        } else {
            PlayerId::all(player_count).collect()
        };

        Self {
            stock_market: StockMarket::new(config.market.clone()),
            depot: Depot::from_rows(&config.trains),
            players,
            seating,
            entities: OrdMap::new(),
            companies: OrdMap::new(),
            bank,
            share_pool: SharePool::new(),
            board: Board::new(),
            log: GameLog::new(),
            rng,
            round: 0,
            next_entity_id: EntityId::first_non_player(player_count),
            config,
        }
    }

    #[must_use]
    pub fn player_count(&self) -> usize {
        self.players.player_count()
    }

    // === Entities ===

    /// Allocate the next entity ID.
    pub fn alloc_entity(&mut self) -> EntityId {
        let id = EntityId(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    /// Add an operating entity. Its ID must come from `alloc_entity`.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, EngineError> {
        self.entities.get(&id).ok_or(EngineError::UnknownEntity(id))
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EngineError> {
        self.entities.get_mut(&id).ok_or(EngineError::UnknownEntity(id))
    }

    /// Operating entities in ID order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    pub fn add_company(&mut self, company: Company) {
        if let Some(owner) = company.owner {
            if let Ok(entity) = self.entity_mut(owner) {
                entity.companies.push(company.id);
            }
        }
        self.companies.insert(company.id, company);
    }

    pub fn company(&self, id: CompanyId) -> Result<&Company, EngineError> {
        self.companies
            .get(&id)
            .ok_or_else(|| EngineError::InvalidAction(format!("unknown company {id}")))
    }

    /// Abilities an entity gains from the companies it owns.
    #[must_use]
    pub fn abilities_of(&self, id: EntityId) -> Vec<Ability> {
        self.companies
            .values()
            .filter(|c| c.owner == Some(id))
            .flat_map(|c| c.abilities.iter().cloned())
            .collect()
    }

    /// Display name: player name or entity symbol.
    #[must_use]
    pub fn name_of(&self, id: EntityId) -> String {
        match id.as_player(self.player_count()) {
            Some(player) => self.players[player].name.clone(),
            None => self
                .entities
                .get(&id)
                .map_or_else(|| id.to_string(), |e| e.sym.clone()),
        }
    }

    #[must_use]
    pub fn format_currency(&self, amount: i64) -> String {
        self.config.format_currency(amount)
    }

    /// Append a game-log line for the current round.
    pub fn log(&mut self, entity: Option<EntityId>, message: impl Into<String>) {
        self.log.push(self.round, entity, message);
    }

    // === Cash ===

    pub fn cash(&self, id: EntityId) -> Result<i64, EngineError> {
        match id.as_player(self.player_count()) {
            Some(player) => Ok(self.players[player].cash),
            None => Ok(self.entity(id)?.cash),
        }
    }

    fn cash_mut(&mut self, id: EntityId) -> Result<&mut i64, EngineError> {
        match id.as_player(self.player_count()) {
            Some(player) => Ok(&mut self.players[player].cash),
            None => Ok(&mut self.entity_mut(id)?.cash),
        }
    }

    pub fn credit(&mut self, id: EntityId, amount: i64) -> Result<(), EngineError> {
        *self.cash_mut(id)? += amount;
        Ok(())
    }

    /// Remove cash from a holder, failing without change if it cannot pay.
    pub fn debit(&mut self, id: EntityId, amount: i64) -> Result<(), EngineError> {
        let available = self.cash(id)?;
        if available < amount {
            return Err(EngineError::InsufficientFunds {
                entity: id,
                required: amount,
                available,
            });
        }
        *self.cash_mut(id)? -= amount;
        Ok(())
    }

    /// Pay `amount` from the bank to `to`.
    pub fn bank_spend(&mut self, amount: i64, to: EntityId) -> Result<(), EngineError> {
        self.cash(to)?;
        self.bank.spend(amount)?;
        self.credit(to, amount)
    }

    /// Pay `amount` from `from` to the bank.
    pub fn pay_bank(&mut self, from: EntityId, amount: i64) -> Result<(), EngineError> {
        self.debit(from, amount)?;
        self.bank.receive(amount);
        Ok(())
    }

    pub fn transfer_cash(&mut self, from: EntityId, to: EntityId, amount: i64) -> Result<(), EngineError> {
        self.cash(to)?;
        self.debit(from, amount)?;
        self.credit(to, amount)
    }

    // === Trains ===

    /// Move an available depot train to `entity` without payment.
    pub fn give_depot_train(&mut self, entity: EntityId, train: TrainId) -> Result<(), EngineError> {
        self.entity(entity)?;
        let train = self
            .depot
            .take(train)
            .ok_or_else(|| EngineError::InvalidAction(format!("{train} is not available")))?;
        self.entity_mut(entity)?.add_train(train);
        Ok(())
    }

    // === Shares ===

    /// Sell a bundle to the open market; the bank pays the owner its price.
    pub fn sell_shares(&mut self, bundle: &ShareBundle) -> Result<(), EngineError> {
        let ShareHolder::Entity(seller) = bundle.owner else {
            return Err(EngineError::InvalidAction("the market cannot sell to itself".into()));
        };
        self.cash(seller)?;
        self.bank.spend(bundle.price())?;
        self.share_pool.transfer(bundle, ShareHolder::Pool)?;
        self.credit(seller, bundle.price())?;
        self.update_president(bundle.corporation)
    }

    /// Buy a bundle out of the open market for `buyer`, paying the bank.
    pub fn buy_shares(&mut self, buyer: EntityId, bundle: &ShareBundle) -> Result<(), EngineError> {
        if bundle.owner != ShareHolder::Pool {
            return Err(EngineError::InvalidAction("only market shares can be bought here".into()));
        }
        self.pay_bank(buyer, bundle.price())?;
        self.share_pool.transfer(bundle, ShareHolder::Entity(buyer))?;
        self.update_president(bundle.corporation)
    }

    /// Stock-round sale: sell at the current price, then drop the price one
    /// space per share sold.
    pub fn sell_shares_and_change_price(&mut self, bundle: &ShareBundle) -> Result<(), EngineError> {
        let price = self
            .stock_market
            .share_price(bundle.corporation)
            .ok_or_else(|| EngineError::InvalidAction(format!("{} has no share price", bundle.corporation)))?;
        let priced = bundle.clone().with_share_price(price.price);
        self.sell_shares(&priced)?;
        for _ in 0..bundle.num_shares {
            self.stock_market.move_left(bundle.corporation);
        }
        Ok(())
    }

    /// Recompute the president of a corporation from its holdings.
    pub fn update_president(&mut self, corporation: EntityId) -> Result<(), EngineError> {
        let player_count = self.player_count();
        let current = self.entity(corporation)?.owner;
        let president = self.share_pool.president(corporation, player_count, current);
        if president.is_some() && president != current {
            self.entity_mut(corporation)?.owner = president;
        }
        Ok(())
    }

    /// Par and float a corporation with shares already distributed.
    ///
    /// Stand-in for the stock round: sets the market position, the
    /// president, the float flag and pays the corporation for the shares
    /// players hold.
    pub fn float_corporation(&mut self, corporation: EntityId, par_price: i64) -> Result<(), EngineError> {
        self.stock_market.set_par(corporation, par_price)?;
        self.update_president(corporation)?;
        let sold = self.share_pool.num_player_shares(corporation, self.player_count());
        let entity = self.entity(corporation)?;
        if sold < entity.float_shares {
            return Err(EngineError::InvalidAction(format!(
                "{} has sold {sold} of {} shares needed to float",
                entity.sym, entity.float_shares
            )));
        }
        self.bank_spend(par_price * sold as i64, corporation)?;
        self.entity_mut(corporation)?.float();
        Ok(())
    }
}
