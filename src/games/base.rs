//! Generic rules with no title-specific overrides.

use crate::core::{GameConfig, Title};
use crate::rules::{GameTitle, PriorityOrder, SelectionPolicy, StepRegistry};

#[derive(Debug)]
pub struct Base {
    registry: StepRegistry,
}

impl Base {
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: StepRegistry::base(),
        }
    }
}

impl Default for Base {
    fn default() -> Self {
        Self::new()
    }
}

impl GameTitle for Base {
    fn title(&self) -> Title {
        Title::Base
    }

    fn config(&self) -> GameConfig {
        GameConfig::new(Title::Base)
    }

    fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    fn selection(&self) -> &dyn SelectionPolicy {
        &PriorityOrder
    }
}
