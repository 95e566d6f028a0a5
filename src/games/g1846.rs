//! 1846: The Race for the Midwest.
//!
//! Operating-round differences from the base rules:
//!
//! - Corporations may issue and redeem shares at the start of their turn.
//! - Tile lays and token placements share one step, at most one of each per
//!   turn, and a tile lay always costs at least the flat tile cost.
//! - Minors only lay track or place a token, run routes and pay out. Their
//!   dividend resolves itself: half to the minor, half to its owner.
//! - Minors operate first, then floated corporations by share price.
//! - Corporations may pay half dividends.

use crate::core::{GameConfig, StepSet, Title};
use crate::rules::{GameTitle, MinorsFirst, SelectionPolicy, StepRegistry};
use crate::steps::{DividendStep, IssueStep, StepKind, TokenOrTrackStep};

/// Flat minimum charged for any tile lay.
pub const TILE_COST: i64 = 20;

#[derive(Debug)]
pub struct G1846 {
    registry: StepRegistry,
}

impl G1846 {
    #[must_use]
    pub fn new() -> Self {
        let registry = StepRegistry::base()
            .with_step(IssueStep::new())
            .with_step(TokenOrTrackStep::new())
            .override_step(DividendStep::auto_resolving())
            .with_sequence(
                StepSet::Full,
                vec![
                    StepKind::Issue,
                    StepKind::TokenOrTrack,
                    StepKind::Route,
                    StepKind::Dividend,
                    StepKind::Train,
                    StepKind::Company,
                ],
            )
            .with_sequence(
                StepSet::Minor,
                vec![StepKind::TokenOrTrack, StepKind::Route, StepKind::Dividend],
            );
        Self { registry }
    }
}

impl Default for G1846 {
    fn default() -> Self {
        Self::new()
    }
}

impl GameTitle for G1846 {
    fn title(&self) -> Title {
        Title::G1846
    }

    fn config(&self) -> GameConfig {
        GameConfig::new(Title::G1846)
            .with_tile_cost(TILE_COST)
            .with_half_dividend(true)
            .with_bank_cash(6_500)
            .with_trains(vec![
                ("2".to_string(), 2, 80, 7),
                ("4".to_string(), 4, 180, 6),
                ("5".to_string(), 5, 500, 5),
                ("6".to_string(), 6, 800, 9),
            ])
    }

    fn registry(&self) -> &StepRegistry {
        &self.registry
    }

    fn selection(&self) -> &dyn SelectionPolicy {
        &MinorsFirst
    }
}
