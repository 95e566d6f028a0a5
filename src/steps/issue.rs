//! Issue or redeem treasury shares.
//!
//! Issuing sells treasury shares to the open market at the price one space
//! left of the current one and moves the price left. Redeeming buys shares
//! back from the market at the price one space right and moves the price
//! right. Raising cash costs share value; shoring up ownership costs a
//! premium.

use smallvec::SmallVec;

use super::{buy_shares, operating, sell_shares, unexpected, Step, StepKind, StepStatus};
use crate::core::{Action, ActionKind, ActionKinds, Entity, GameState};
use crate::economy::{Direction, ShareBundle, ShareHolder};
use crate::error::EngineError;
use crate::round::TurnState;

#[derive(Clone, Debug, Default)]
pub struct IssueStep;

impl IssueStep {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Treasury bundles the entity may issue, priced one space left.
    ///
    /// The entity may not issue more shares than players hold beyond those
    /// already in the market.
    #[must_use]
    pub fn issuable_shares(&self, state: &GameState, entity: &Entity) -> Vec<ShareBundle> {
        let Some(price) = state.stock_market.find_share_price(entity.id, Direction::Left) else {
            return Vec::new();
        };
        let player_shares = state.share_pool.num_player_shares(entity.id, state.player_count());
        let market_shares = state.share_pool.num_market_shares(entity.id);
        let limit = player_shares.saturating_sub(market_shares);

        state
            .share_pool
            .bundles_for_corporation(ShareHolder::Entity(entity.id), entity.id, price.price)
            .into_iter()
            .filter(|bundle| bundle.num_shares <= limit)
            .collect()
    }

    /// Market bundles the entity can afford to redeem, priced one space right.
    #[must_use]
    pub fn redeemable_shares(&self, state: &GameState, entity: &Entity) -> Vec<ShareBundle> {
        let Some(price) = state.stock_market.find_share_price(entity.id, Direction::Right) else {
            return Vec::new();
        };
        state
            .share_pool
            .bundles_for_corporation(ShareHolder::Pool, entity.id, price.price)
            .into_iter()
            .filter(|bundle| bundle.price() <= entity.cash)
            .collect()
    }

    fn issue(&self, state: &mut GameState, turn: &TurnState, requested: &ShareBundle) -> Result<(), EngineError> {
        let entity = operating(state, turn)?;
        let bundle = self
            .issuable_shares(state, entity)
            .into_iter()
            .find(|b| b.same_lot(requested))
            .ok_or_else(|| {
                EngineError::InvalidAction(format!(
                    "{} cannot issue {} shares",
                    entity.sym, requested.num_shares
                ))
            })?;

        sell_shares(state, turn.entity, &bundle)?;
        let moved = state.stock_market.move_left(turn.entity);

        let name = state.name_of(turn.entity);
        state.log(
            Some(turn.entity),
            format!(
                "{name} issues {} shares and receives {}",
                bundle.num_shares,
                state.format_currency(bundle.price())
            ),
        );
        if let Some(price) = moved {
            let line = format!("{name}'s share price moves to {}", state.format_currency(price.price));
            state.log(Some(turn.entity), line);
        }
        Ok(())
    }

    fn redeem(&self, state: &mut GameState, turn: &TurnState, requested: &ShareBundle) -> Result<(), EngineError> {
        let entity = operating(state, turn)?;
        let price = state
            .stock_market
            .find_share_price(entity.id, Direction::Right)
            .ok_or_else(|| EngineError::InvalidAction(format!("{} has no share price", entity.sym)))?;
        let bundle = state
            .share_pool
            .bundles_for_corporation(ShareHolder::Pool, entity.id, price.price)
            .into_iter()
            .find(|b| b.same_lot(requested))
            .ok_or_else(|| {
                EngineError::InvalidAction(format!(
                    "the market does not hold {} shares of {}",
                    requested.num_shares, entity.sym
                ))
            })?;
        if bundle.price() > entity.cash {
            return Err(EngineError::InsufficientFunds {
                entity: entity.id,
                required: bundle.price(),
                available: entity.cash,
            });
        }

        buy_shares(state, turn, &bundle)?;
        let moved = state.stock_market.move_right(turn.entity);

        let name = state.name_of(turn.entity);
        state.log(
            Some(turn.entity),
            format!(
                "{name} redeems {} shares for {}",
                bundle.num_shares,
                state.format_currency(bundle.price())
            ),
        );
        if let Some(price) = moved {
            let line = format!("{name}'s share price moves to {}", state.format_currency(price.price));
            state.log(Some(turn.entity), line);
        }
        Ok(())
    }
}

impl Step for IssueStep {
    fn kind(&self) -> StepKind {
        StepKind::Issue
    }

    fn applies_to(&self, entity: &Entity) -> bool {
        entity.capabilities().issues_shares
    }

    fn legal_actions(&self, state: &GameState, turn: &TurnState) -> ActionKinds {
        let mut actions = SmallVec::new();
        let Ok(entity) = operating(state, turn) else {
            return actions;
        };
        if !self.issuable_shares(state, entity).is_empty() {
            actions.push(ActionKind::SellShares);
        }
        if !self.redeemable_shares(state, entity).is_empty() {
            actions.push(ActionKind::BuyShares);
        }
        if !actions.is_empty() {
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
            Action::SellShares { bundle, .. } => self.issue(state, turn, bundle)?,
            Action::BuyShares { bundle, .. } => self.redeem(state, turn, bundle)?,
            _ => return Err(unexpected(self.kind(), action)),
        }
        Ok(StepStatus::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityId;
    use crate::steps::test_support::{add_corporation, add_minor, state, turn};

    fn sell(corp: EntityId, n: u32) -> Action {
        Action::SellShares {
            entity: corp,
            bundle: ShareBundle::new(corp, ShareHolder::Entity(corp), n, 0),
        }
    }

    fn buy(corp: EntityId, n: u32) -> Action {
        Action::BuyShares {
            entity: corp,
            bundle: ShareBundle::new(corp, ShareHolder::Pool, n, 0),
        }
    }

    #[test]
    fn test_issuable_priced_left_and_capped() {
        let mut state = state();
        let corp = add_corporation(&mut state, "PRR", 100);
        state.share_pool.grant(corp, ShareHolder::Pool, 1);
        state
            .share_pool
            .transfer(&ShareBundle::new(corp, ShareHolder::Entity(corp), 1, 0), ShareHolder::Pool)
            .unwrap();

        let entity = state.entity(corp).unwrap();
        let bundles = IssueStep::new().issuable_shares(&state, entity);

        // players hold 5, market holds 2: at most 3 may be issued
        assert_eq!(bundles.iter().map(|b| b.num_shares).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(bundles.iter().all(|b| b.share_price == 90));
    }

    #[test]
    fn test_redeemable_priced_right_and_affordable() {
        let mut state = state();
        let corp = add_corporation(&mut state, "PRR", 100);
        state.share_pool.grant(corp, ShareHolder::Pool, 5);
        state.entity_mut(corp).unwrap().cash = 250;

        let entity = state.entity(corp).unwrap();
        let bundles = IssueStep::new().redeemable_shares(&state, entity);

        assert_eq!(bundles.len(), 2);
        assert!(bundles.iter().all(|b| b.share_price == 112 && b.price() <= 250));
    }

    #[test]
    fn test_issue_sells_to_market_and_moves_left() {
        let mut state = state();
        let corp = add_corporation(&mut state, "PRR", 100);
        let mut turn = turn(corp);

        let status = IssueStep::new().process(&mut state, &mut turn, &sell(corp, 2)).unwrap();

        assert_eq!(status, StepStatus::Complete);
        assert_eq!(state.entity(corp).unwrap().cash, 500 + 180);
        assert_eq!(state.share_pool.num_market_shares(corp), 2);
        assert_eq!(state.share_pool.shares_of(corp, ShareHolder::Entity(corp)), 3);
        assert_eq!(state.stock_market.share_price(corp).unwrap().price, 90);
    }

    #[test]
    fn test_redeem_buys_from_market_and_moves_right() {
        let mut state = state();
        let corp = add_corporation(&mut state, "PRR", 100);
        state.share_pool.grant(corp, ShareHolder::Pool, 2);
        let mut turn = turn(corp);

        IssueStep::new().process(&mut state, &mut turn, &buy(corp, 1)).unwrap();

        assert_eq!(state.entity(corp).unwrap().cash, 500 - 112);
        assert_eq!(state.share_pool.num_market_shares(corp), 1);
        assert_eq!(state.stock_market.share_price(corp).unwrap().price, 112);
    }

    #[test]
    fn test_redeem_unaffordable_is_insufficient_funds() {
        let mut state = state();
        let corp = add_corporation(&mut state, "PRR", 100);
        state.share_pool.grant(corp, ShareHolder::Pool, 5);
        state.entity_mut(corp).unwrap().cash = 100;
        let mut turn = turn(corp);

        let err = IssueStep::new().process(&mut state, &mut turn, &buy(corp, 1)).unwrap_err();
        assert!(matches!(err, EngineError::InsufficientFunds { required: 112, .. }));
    }

    #[test]
    fn test_minors_do_not_issue() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 100);
        let entity = state.entity(minor).unwrap();

        assert!(!IssueStep::new().applies_to(entity));
        assert!(IssueStep::new().legal_actions(&state, &turn(minor)).is_empty());
    }
}
