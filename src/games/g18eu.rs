//! 18EU.
//!
//! Minors operate first and run the base steps without buying trains; at
//! setup every minor receives the next depot train for free.

use crate::core::{GameConfig, GameState, HomeTokenTiming, SellAfter, SellBuyOrder, StepSet, Title};
use crate::error::EngineError;
use crate::rules::{GameTitle, MinorsFirst, SelectionPolicy, StepRegistry, TitleInfo};
use crate::steps::StepKind;

pub const GAME_LOCATION: &str = "Europe";
pub const GAME_RULES_URL: &str = "http://www.deepthoughtgames.com/games/18EU/Rules.pdf";
pub const GAME_DESIGNER: &str = "David Hecht";

#[derive(Debug)]
pub struct G18EU {
    registry: StepRegistry,
}

impl G18EU {
    #[must_use]
    pub fn new() -> Self {
        let registry = StepRegistry::base().with_sequence(
            StepSet::Minor,
            vec![StepKind::Track, StepKind::Token, StepKind::Route, StepKind::Dividend],
        );
        Self { registry }
    }
}

impl Default for G18EU {
    fn default() -> Self {
        Self::new()
    }
}

impl GameTitle for G18EU {
    fn title(&self) -> Title {
        Title::G18EU
    }

    fn config(&self) -> GameConfig {
        let mut config = GameConfig::new(Title::G18EU);
        config.currency_format = "£{}".to_string();
        config.home_token_timing = HomeTokenTiming::Float;
        config.sell_after = SellAfter::Operate;
        config.sell_buy_order = SellBuyOrder::SellBuy;
        config
    }

    fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    fn selection(&self) -> &dyn SelectionPolicy {
        &MinorsFirst
    }

    /// Each minor takes the next upcoming train without paying for it.
    fn setup(&self, state: &mut GameState) -> Result<(), EngineError> {
        let minors: Vec<_> = state.entities().filter(|e| e.is_minor()).map(|e| e.id).collect();
        for minor in minors {
            let Some(train) = state.depot.upcoming().first().map(|t| t.id) else {
                break;
            };
            state.give_depot_train(minor, train)?;
            let line = format!("{} receives a free train", state.name_of(minor));
            state.log(Some(minor), line);
        }
        Ok(())
    }

    fn info(&self) -> TitleInfo {
        TitleInfo {
            location: Some(GAME_LOCATION),
            designer: Some(GAME_DESIGNER),
            rules_url: Some(GAME_RULES_URL),
        }
    }
}
