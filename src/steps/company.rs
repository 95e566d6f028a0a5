//! Purchase private companies from players.

use smallvec::SmallVec;

use super::{operating, unexpected, Step, StepKind, StepStatus};
use crate::core::{Action, ActionKind, ActionKinds, Entity, GameState};
use crate::economy::{Company, CompanyId};
use crate::error::EngineError;
use crate::round::TurnState;

#[derive(Clone, Debug, Default)]
pub struct CompanyStep;

impl CompanyStep {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Player-owned companies the entity can afford at the minimum price.
    pub fn purchasable<'a>(&self, state: &'a GameState, entity: &Entity) -> Vec<&'a Company> {
        let range = state.config.company_price_range;
        state
            .companies
            .values()
            .filter(|c| c.owner.is_some_and(|owner| owner.is_player(state.player_count())))
            .filter(|c| c.price_range(range).0 <= entity.cash)
            .collect()
    }

    fn buy(&self, state: &mut GameState, turn: &TurnState, company: CompanyId, price: i64) -> Result<(), EngineError> {
        let entity = operating(state, turn)?;
        let target = state.company(company)?;
        let seller = target
            .owner
            .filter(|owner| owner.is_player(state.player_count()))
            .ok_or_else(|| EngineError::InvalidAction(format!("{} is not owned by a player", target.name)))?;
        let (min, max) = target.price_range(state.config.company_price_range);
        if price < min || price > max {
            return Err(EngineError::InvalidAction(format!(
                "{} must cost between {} and {}",
                target.name,
                state.format_currency(min),
                state.format_currency(max)
            )));
        }
        if entity.cash < price {
            return Err(EngineError::InsufficientFunds {
                entity: entity.id,
                required: price,
                available: entity.cash,
            });
        }
        let company_name = target.name.clone();

        state.transfer_cash(turn.entity, seller, price)?;
        if let Some(bought) = state.companies.get_mut(&company) {
            bought.owner = Some(turn.entity);
        }
        state.entity_mut(turn.entity)?.companies.push(company);

        let line = format!(
            "{} buys {company_name} from {} for {}",
            state.name_of(turn.entity),
            state.name_of(seller),
            state.format_currency(price)
        );
        state.log(Some(turn.entity), line);
        Ok(())
    }
}

impl Step for CompanyStep {
    fn kind(&self) -> StepKind {
        StepKind::Company
    }

    fn legal_actions(&self, state: &GameState, turn: &TurnState) -> ActionKinds {
        let mut actions = SmallVec::new();
        if let Ok(entity) = operating(state, turn) {
            if !self.purchasable(state, entity).is_empty() {
                actions.push(ActionKind::BuyCompany);
                actions.push(ActionKind::Pass);
            }
        }
        actions
    }

    fn process(
        &self,
        state: &mut GameState,
        turn: &mut TurnState,
        action: &Action,
    ) -> Result<StepStatus, EngineError> {
        let Action::BuyCompany { company, price, .. } = action else {
            return Err(unexpected(self.kind(), action));
        };
        self.buy(state, turn, *company, *price)?;
        Ok(StepStatus::Pending)
    }
}
