//! Buy trains.
//!
//! Trains come from the depot (the next upcoming train, or any discarded
//! one) at face value, or from another entity with the same owner at any
//! agreed price of at least 1. An entity below the train limit may buy as
//! many as it likes.
//!
//! An entity without trains must buy one if the depot has one: it cannot
//! pass. If its treasury falls short of the cheapest depot train, the
//! president covers the difference and may sell shares to raise it.

use smallvec::SmallVec;

use super::{operating, sell_shares, unexpected, Step, StepKind, StepStatus};
use crate::core::{Action, ActionKind, ActionKinds, Entity, EntityId, GameState};
use crate::economy::{ShareBundle, ShareHolder, TrainId};
use crate::error::EngineError;
use crate::round::TurnState;

#[derive(Clone, Debug, Default)]
pub struct TrainStep;

impl TrainStep {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn has_room(state: &GameState, entity: &Entity) -> bool {
        entity.trains.len() < state.config.train_limit
    }

    /// Whether the entity has no train and the depot can supply one.
    pub fn must_buy(&self, state: &GameState, entity: &Entity) -> bool {
        entity.trains.is_empty() && state.depot.cheapest_price().is_some()
    }

    /// Whether the entity must buy a train it cannot pay for alone.
    pub fn is_emergency(&self, state: &GameState, entity: &Entity) -> bool {
        self.must_buy(state, entity) && state.depot.cheapest_price().is_some_and(|price| entity.cash < price)
    }

    fn president_cash(state: &GameState, entity: &Entity) -> i64 {
        entity.owner.and_then(|owner| state.cash(owner).ok()).unwrap_or(0)
    }

    /// Bundles the president could sell to fund an emergency purchase.
    ///
    /// Shares of the operating corporation itself are not offered.
    #[must_use]
    pub fn emergency_bundles(&self, state: &GameState, entity: &Entity) -> Vec<ShareBundle> {
        let Some(president) = entity.owner else {
            return Vec::new();
        };
        state
            .share_pool
            .iter()
            .filter(|(corp, holder, _)| *holder == ShareHolder::Entity(president) && *corp != entity.id)
            .filter_map(|(corp, holder, shares)| {
                let price = state.stock_market.share_price(corp)?;
                Some(ShareBundle::new(corp, holder, shares, price.price))
            })
            .collect()
    }

    fn can_buy_from_depot(&self, state: &GameState, entity: &Entity) -> bool {
        let Some(price) = state.depot.cheapest_price() else {
            return false;
        };
        if entity.cash >= price {
            return true;
        }
        self.is_emergency(state, entity) && entity.cash + Self::president_cash(state, entity) >= price
    }

    fn can_buy_from_entity(&self, state: &GameState, entity: &Entity) -> bool {
        entity.cash >= 1
            && entity.owner.is_some()
            && state
                .entities()
                .any(|other| other.id != entity.id && other.owner == entity.owner && !other.trains.is_empty())
    }

    fn buy_from_depot(&self, state: &mut GameState, turn: &TurnState, train: TrainId, price: i64) -> Result<(), EngineError> {
        let entity = operating(state, turn)?;
        let listed = state
            .depot
            .available()
            .find(|t| t.id == train)
            .ok_or_else(|| EngineError::InvalidAction(format!("{train} is not available")))?;
        if price != listed.price {
            return Err(EngineError::InvalidAction(format!(
                "depot trains cost {}, not {price}",
                listed.price
            )));
        }

        let emergency = self.is_emergency(state, entity);
        let entity_cash = entity.cash;
        let owner = entity.owner;
        let name = entity.sym.clone();
        let train_name = listed.name.clone();

        if entity_cash < price {
            let Some(president) = owner.filter(|_| emergency) else {
                return Err(EngineError::InsufficientFunds {
                    entity: turn.entity,
                    required: price,
                    available: entity_cash,
                });
            };
            let shortfall = price - entity_cash;
            state.transfer_cash(president, turn.entity, shortfall)?;
            let line = format!(
                "{} contributes {} toward the train",
                state.name_of(president),
                state.format_currency(shortfall)
            );
            state.log(Some(turn.entity), line);
        }

        state.pay_bank(turn.entity, price)?;
        let train = state
            .depot
            .take(train)
            .ok_or_else(|| EngineError::InvariantViolation(format!("{train} vanished from the depot")))?;
        state.entity_mut(turn.entity)?.add_train(train);
        let line = format!(
            "{name} buys a {train_name} train for {} from The Depot",
            state.format_currency(price)
        );
        state.log(Some(turn.entity), line);
        Ok(())
    }

    fn buy_from_entity(&self, state: &mut GameState, turn: &TurnState, train: TrainId, price: i64) -> Result<(), EngineError> {
        let entity = operating(state, turn)?;
        let seller = state
            .entities()
            .find(|other| other.id != entity.id && other.trains.iter().any(|t| t.id == train))
            .ok_or_else(|| EngineError::InvalidAction(format!("no entity owns {train}")))?;
        if seller.owner != entity.owner || entity.owner.is_none() {
            return Err(EngineError::InvalidAction(format!(
                "{} and {} have different owners",
                entity.sym, seller.sym
            )));
        }
        if price < 1 {
            return Err(EngineError::InvalidAction(format!("trains cost at least {}", state.format_currency(1))));
        }
        let seller_id: EntityId = seller.id;

        state.transfer_cash(turn.entity, seller_id, price)?;
        let bought = state
            .entity_mut(seller_id)?
            .remove_train(train)
            .ok_or_else(|| EngineError::InvariantViolation(format!("{train} vanished")))?;
        let train_name = bought.name.clone();
        state.entity_mut(turn.entity)?.add_train(bought);

        let line = format!(
            "{} buys a {train_name} train for {} from {}",
            state.name_of(turn.entity),
            state.format_currency(price),
            state.name_of(seller_id)
        );
        state.log(Some(turn.entity), line);
        Ok(())
    }

    fn emergency_sale(&self, state: &mut GameState, turn: &TurnState, seller: EntityId, requested: &ShareBundle) -> Result<(), EngineError> {
        let entity = operating(state, turn)?;
        if Some(seller) != entity.owner || !self.is_emergency(state, entity) {
            return Err(EngineError::InvalidAction(format!(
                "{} may not sell shares now",
                state.name_of(seller)
            )));
        }
        let held = self
            .emergency_bundles(state, entity)
            .into_iter()
            .find(|b| b.corporation == requested.corporation)
            .ok_or_else(|| EngineError::InvalidAction("no such shares to sell".into()))?;
        if requested.num_shares == 0 || requested.num_shares > held.num_shares {
            return Err(EngineError::InvalidAction(format!(
                "cannot sell {} of {} shares",
                requested.num_shares, held.num_shares
            )));
        }
        let bundle = ShareBundle::new(held.corporation, held.owner, requested.num_shares, held.share_price);

        sell_shares(state, seller, &bundle)?;
        let line = format!(
            "{} sells {} shares of {} for {}",
            state.name_of(seller),
            bundle.num_shares,
            state.name_of(bundle.corporation),
            state.format_currency(bundle.price())
        );
        state.log(Some(turn.entity), line);
        Ok(())
    }
}

impl Step for TrainStep {
    fn kind(&self) -> StepKind {
        StepKind::Train
    }

    fn legal_actions(&self, state: &GameState, turn: &TurnState) -> ActionKinds {
        let mut actions = SmallVec::new();
        let Ok(entity) = operating(state, turn) else {
            return actions;
        };
        if !Self::has_room(state, entity) {
            return actions;
        }
        if self.can_buy_from_depot(state, entity) || self.can_buy_from_entity(state, entity) {
            actions.push(ActionKind::BuyTrain);
        }
        if self.is_emergency(state, entity) && !self.emergency_bundles(state, entity).is_empty() {
            actions.push(ActionKind::SellShares);
        }
        if !actions.is_empty() && !self.must_buy(state, entity) {
            actions.push(ActionKind::Pass);
        }
        actions
    }

    fn process(
        &self,
        state: &mut GameState,
        turn: &mut TurnState,
        action: &Action,
    ) -> Result<StepStatus, EngineError> {
        match action {
            Action::BuyTrain { train, price, .. } => {
                if state.depot.is_available(*train) {
                    self.buy_from_depot(state, turn, *train, *price)?;
                } else {
                    self.buy_from_entity(state, turn, *train, *price)?;
                }
            }
            Action::SellShares { entity, bundle } => self.emergency_sale(state, turn, *entity, bundle)?,
            _ => return Err(unexpected(self.kind(), action)),
        }
        Ok(StepStatus::Pending)
    }
}
