//! Game titles.
//!
//! A title bundles everything that distinguishes one game from another at
//! the operating-round level: its constants, its step registry, its
//! selection policy and a one-time setup hook.

use crate::core::{GameConfig, GameState, Title};
use crate::error::EngineError;

use super::registry::StepRegistry;
use super::selection::SelectionPolicy;

/// Descriptive metadata about a title.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TitleInfo {
    pub location: Option<&'static str>,
    pub designer: Option<&'static str>,
    pub rules_url: Option<&'static str>,
}

pub trait GameTitle: Send + Sync + std::fmt::Debug {
    fn title(&self) -> Title;

    /// Constants for a new game of this title.
    fn config(&self) -> GameConfig;

    fn registry(&self) -> &StepRegistry;

    fn selection(&self) -> &dyn SelectionPolicy;

    /// One-time initialization after entities are in place and before the
    /// first round.
    fn setup(&self, _state: &mut GameState) -> Result<(), EngineError> {
        Ok(())
    }

    fn info(&self) -> TitleInfo {
        TitleInfo::default()
    }
}
