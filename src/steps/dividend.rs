//! Pay or withhold dividends.
//!
//! Offers nothing until the entity has run routes this turn. How revenue is
//! distributed depends on the entity's payout rule:
//!
//! - `SplitWithOwner` (minors): a payout sends half the revenue (integer
//!   division) to the entity and half to its owner, both from the bank. An
//!   odd unit stays in the bank.
//! - `Shareholders` (corporations): revenue is divided per share; each
//!   holder receives its shares' worth, and shares in the treasury or the
//!   market pay the corporation, as does any remainder.
//!
//! Titles may let split-payout entities resolve the step on their own: the
//! step then synthesizes a payout (or a withhold for zero revenue) and the
//! round processes it without waiting for the player.

use smallvec::smallvec;

use super::{operating, unexpected, Step, StepKind, StepStatus};
use crate::core::{Action, ActionKind, ActionKinds, DividendKind, EntityId, GameState, PayoutRule};
use crate::economy::ShareHolder;
use crate::error::EngineError;
use crate::round::TurnState;

#[derive(Clone, Debug, Default)]
pub struct DividendStep {
    auto_resolve: bool,
}

impl DividendStep {
    /// Every entity chooses its dividend explicitly.
    #[must_use]
    pub fn new() -> Self {
        Self { auto_resolve: false }
    }

    /// Split-payout entities resolve the step without player input.
    #[must_use]
    pub fn auto_resolving() -> Self {
        Self { auto_resolve: true }
    }

    fn payout_rule(state: &GameState, turn: &TurnState) -> Option<PayoutRule> {
        operating(state, turn).ok().map(|e| e.capabilities().payout)
    }

    /// Distribute `revenue` according to `kind`.
    pub fn pay(&self, state: &mut GameState, entity: EntityId, kind: DividendKind, revenue: i64) -> Result<(), EngineError> {
        let rule = state.entity(entity)?.capabilities().payout;
        match (rule, kind) {
            (_, DividendKind::Withhold) => withhold(state, entity, revenue),
            (PayoutRule::SplitWithOwner, DividendKind::Payout) => split_with_owner(state, entity, revenue),
            (PayoutRule::SplitWithOwner, DividendKind::Half) => Err(EngineError::InvalidAction(format!(
                "{} cannot pay half dividends",
                state.name_of(entity)
            ))),
            (PayoutRule::Shareholders, DividendKind::Payout) => {
                pay_shareholders(state, entity, revenue)?;
                if revenue > 0 {
                    let price = state.stock_market.share_price(entity).map(|p| p.price);
                    if price.is_some_and(|p| revenue >= p) {
                        move_price(state, entity, true);
                    }
                }
                Ok(())
            }
            (PayoutRule::Shareholders, DividendKind::Half) => {
                if !state.config.allow_half_dividend {
                    return Err(EngineError::InvalidAction(format!(
                        "{} does not allow half dividends",
                        state.config.title
                    )));
                }
                let total = i64::from(state.entity(entity)?.total_shares.max(1));
                let paid = revenue / 2 / total * total;
                let kept = revenue - paid;
                let name = state.name_of(entity);
                let line = format!("{name} withholds {}", state.format_currency(kept));
                state.log(Some(entity), line);
                state.bank_spend(kept, entity)?;
                pay_shareholders(state, entity, paid)
            }
        }
    }
}

fn withhold(state: &mut GameState, entity: EntityId, revenue: i64) -> Result<(), EngineError> {
    let name = state.name_of(entity);
    let line = format!("{name} withholds {}", state.format_currency(revenue));
    state.log(Some(entity), line);
    state.bank_spend(revenue, entity)?;
    if state.entity(entity)?.capabilities().payout == PayoutRule::Shareholders {
        move_price(state, entity, false);
    }
    Ok(())
}

fn split_with_owner(state: &mut GameState, entity: EntityId, revenue: i64) -> Result<(), EngineError> {
    let owner = state
        .entity(entity)?
        .owner
        .ok_or_else(|| EngineError::InvariantViolation(format!("{} has no owner", state.name_of(entity))))?;
    let name = state.name_of(entity);
    let line = format!("{name} pays out {}", state.format_currency(revenue));
    state.log(Some(entity), line);

    let amount = revenue / 2;
    for receiver in [entity, owner] {
        let line = format!("{} receives {}", state.name_of(receiver), state.format_currency(amount));
        state.log(Some(entity), line);
        state.bank_spend(amount, receiver)?;
    }
    Ok(())
}

fn pay_shareholders(state: &mut GameState, corporation: EntityId, revenue: i64) -> Result<(), EngineError> {
    let total = state.entity(corporation)?.total_shares;
    let per_share = if total == 0 { 0 } else { revenue / i64::from(total) };
    let name = state.name_of(corporation);
    let line = format!("{name} pays out {} per share", state.format_currency(per_share));
    state.log(Some(corporation), line);

    let holders: Vec<(ShareHolder, u32)> = state.share_pool.holders(corporation).collect();
    let mut to_corporation = revenue;
    for (holder, shares) in holders {
        let ShareHolder::Entity(receiver) = holder else {
            continue;
        };
        if receiver == corporation {
            continue;
        }
        let amount = per_share * i64::from(shares);
        if amount == 0 {
            continue;
        }
        to_corporation -= amount;
        let line = format!("{} receives {}", state.name_of(receiver), state.format_currency(amount));
        state.log(Some(corporation), line);
        state.bank_spend(amount, receiver)?;
    }
    if to_corporation > 0 {
        let line = format!("{name} receives {}", state.format_currency(to_corporation));
        state.log(Some(corporation), line);
        state.bank_spend(to_corporation, corporation)?;
    }
    Ok(())
}

fn move_price(state: &mut GameState, corporation: EntityId, right: bool) {
    let Some(before) = state.stock_market.share_price(corporation) else {
        return;
    };
    let after = if right {
        state.stock_market.move_right(corporation)
    } else {
        state.stock_market.move_left(corporation)
    };
    if let Some(after) = after.filter(|a| a.index != before.index) {
        let line = format!(
            "{}'s share price moves from {} to {}",
            state.name_of(corporation),
            state.format_currency(before.price),
            state.format_currency(after.price)
        );
        state.log(Some(corporation), line);
    }
}

impl Step for DividendStep {
    fn kind(&self) -> StepKind {
        StepKind::Dividend
    }

    fn legal_actions(&self, _state: &GameState, turn: &TurnState) -> ActionKinds {
        if turn.routes.is_none() || turn.dividend_resolved {
            return ActionKinds::new();
        }
        smallvec![ActionKind::Dividend]
    }

    fn is_auto_resolvable(&self, state: &GameState, turn: &TurnState) -> bool {
        self.auto_resolve
            && !turn.dividend_resolved
            && Self::payout_rule(state, turn) == Some(PayoutRule::SplitWithOwner)
    }

    fn auto_resolve(&self, state: &GameState, turn: &TurnState) -> Option<Action> {
        if !self.is_auto_resolvable(state, turn) {
            return None;
        }
        let kind = if turn.revenue() > 0 {
            DividendKind::Payout
        } else {
            DividendKind::Withhold
        };
        Some(Action::Dividend {
            entity: turn.entity,
            kind,
        })
    }

    fn process(
        &self,
        state: &mut GameState,
        turn: &mut TurnState,
        action: &Action,
    ) -> Result<StepStatus, EngineError> {
        let Action::Dividend { kind, .. } = action else {
            return Err(unexpected(self.kind(), action));
        };
        if turn.dividend_resolved {
            return Err(EngineError::InvariantViolation(format!(
                "dividend already resolved for {}",
                turn.entity
            )));
        }
        self.pay(state, turn.entity, *kind, turn.revenue())?;
        turn.dividend_resolved = true;
        Ok(StepStatus::Complete)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::{Route, TrainId};
    use crate::steps::test_support::{add_corporation, add_minor, state, turn, ALICE, BOB};

    fn routed(entity: EntityId, revenue: i64) -> TurnState {
        let mut turn = turn(entity);
        turn.routes = Some(vec![Route::new(TrainId(0), vec![], revenue)]);
        turn
    }

    #[test]
    fn test_nothing_before_routes() {
        let mut state = state();
        let corp = add_corporation(&mut state, "NYC", 100);

        assert!(DividendStep::new().legal_actions(&state, &turn(corp)).is_empty());
        assert_eq!(
            DividendStep::new().legal_actions(&state, &routed(corp, 10)).as_slice(),
            &[ActionKind::Dividend]
        );
    }

    #[test]
    fn test_minor_split_boundaries() {
        for (revenue, each) in [(1, 0), (2, 1), (3, 1), (80, 40)] {
            let mut state = state();
            let minor = add_minor(&mut state, "M1", 0);
            let bank = state.bank.cash();
            let step = DividendStep::auto_resolving();
            let mut turn = routed(minor, revenue);

            let action = step.auto_resolve(&state, &turn).unwrap();
            step.process(&mut state, &mut turn, &action).unwrap();

            assert_eq!(state.entity(minor).unwrap().cash, each, "revenue {revenue}");
            assert_eq!(state.cash(ALICE).unwrap(), 400 + each, "revenue {revenue}");
            assert_eq!(state.bank.cash(), bank - 2 * each, "revenue {revenue}");
            assert!(turn.dividend_resolved);
        }
    }

    #[test]
    fn test_minor_auto_resolve_logs() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        let step = DividendStep::auto_resolving();
        let mut turn = routed(minor, 50);

        let action = step.auto_resolve(&state, &turn).unwrap();
        step.process(&mut state, &mut turn, &action).unwrap();

        assert_eq!(
            state.log.messages()[state.log.len() - 3..],
            ["M1 pays out $50", "M1 receives $25", "Alice receives $25"]
        );
    }

    #[test]
    fn test_zero_revenue_auto_withholds() {
        let mut state = state();
        let minor = add_minor(&mut state, "M1", 0);
        let step = DividendStep::auto_resolving();

        assert!(step.is_auto_resolvable(&state, &turn(minor)));
        let action = step.auto_resolve(&state, &turn(minor)).unwrap();
        assert_eq!(
            action,
            Action::Dividend {
                entity: minor,
                kind: DividendKind::Withhold
            }
        );
    }

    #[test]
    fn test_corporations_never_auto_resolve() {
        let mut state = state();
        let corp = add_corporation(&mut state, "NYC", 100);
        let step = DividendStep::auto_resolving();

        assert!(!step.is_auto_resolvable(&state, &routed(corp, 100)));
        assert!(step.auto_resolve(&state, &routed(corp, 100)).is_none());
        assert!(!DividendStep::new().is_auto_resolvable(&state, &turn(corp)));
    }

    #[test]
    fn test_corporation_payout_to_shareholders() {
        let mut state = state();
        let corp = add_corporation(&mut state, "NYC", 100);
        let mut turn = routed(corp, 125);

        let action = Action::Dividend {
            entity: corp,
            kind: DividendKind::Payout,
        };
        DividendStep::new().process(&mut state, &mut turn, &action).unwrap();

        // 12 per share; Alice 3, Bob 2, treasury 5 plus the 5 remainder
        assert_eq!(state.cash(ALICE).unwrap(), 436);
        assert_eq!(state.cash(BOB).unwrap(), 424);
        assert_eq!(state.entity(corp).unwrap().cash, 500 + 65);
        assert_eq!(state.stock_market.share_price(corp).unwrap().price, 112);
    }

    #[test]
    fn test_corporation_withhold_moves_left() {
        let mut state = state();
        let corp = add_corporation(&mut state, "NYC", 100);
        let mut turn = routed(corp, 60);

        let action = Action::Dividend {
            entity: corp,
            kind: DividendKind::Withhold,
        };
        DividendStep::new().process(&mut state, &mut turn, &action).unwrap();

        assert_eq!(state.entity(corp).unwrap().cash, 560);
        assert_eq!(state.stock_market.share_price(corp).unwrap().price, 90);
    }

    #[test]
    fn test_half_dividend() {
        let mut state = state();
        state.config.allow_half_dividend = true;
        let corp = add_corporation(&mut state, "NYC", 100);
        let mut turn = routed(corp, 130);

        let action = Action::Dividend {
            entity: corp,
            kind: DividendKind::Half,
        };
        DividendStep::new().process(&mut state, &mut turn, &action).unwrap();

        // 60 paid out at 6 per share, 70 kept
        assert_eq!(state.cash(ALICE).unwrap(), 418);
        assert_eq!(state.cash(BOB).unwrap(), 412);
        assert_eq!(state.entity(corp).unwrap().cash, 500 + 70 + 30);
        assert_eq!(state.stock_market.share_price(corp).unwrap().price, 100);
    }

    #[test]
    fn test_half_dividend_needs_title_support() {
        let mut state = state();
        let corp = add_corporation(&mut state, "NYC", 100);
        let mut turn = routed(corp, 130);

        let action = Action::Dividend {
            entity: corp,
            kind: DividendKind::Half,
        };
        assert!(DividendStep::new().process(&mut state, &mut turn, &action).is_err());
        assert!(!turn.dividend_resolved);
    }
}
