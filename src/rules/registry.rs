//! Step registry: which steps a title runs, in what order, and which
//! implementation handles each step kind.
//!
//! ## Overrides
//!
//! A title starts from a registry of base steps and replaces individual
//! kinds with `override_step`. Replacing one kind never touches another, so
//! a title can change dividend handling without restating track or trains.
//!
//! ```
//! use rust_18xx::core::StepSet;
//! use rust_18xx::rules::StepRegistry;
//! use rust_18xx::steps::{DividendStep, StepKind};
//!
//! let registry = StepRegistry::base().override_step(DividendStep::auto_resolving());
//! assert_eq!(registry.sequence(StepSet::Full)[0], StepKind::Track);
//! assert!(registry.step(StepKind::Dividend).is_some());
//! ```

use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::core::StepSet;
use crate::error::EngineError;
use crate::steps::{
    CompanyStep, DividendStep, RouteStep, Step, StepKind, TileCostRule, TokenStep, TrackStep, TrainStep,
};

/// Step sequences per step set plus the implementation for each kind.
#[derive(Clone, Debug, Default)]
pub struct StepRegistry {
    steps: FxHashMap<StepKind, Arc<dyn Step>>,
    sequences: FxHashMap<StepSet, Vec<StepKind>>,
}

impl StepRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Base steps: track, token, routes, dividend, trains, companies.
    /// Minors skip company purchases.
    #[must_use]
    pub fn base() -> Self {
        Self::new()
            .with_step(TrackStep::new(TileCostRule::UpgradeCost))
            .with_step(TokenStep::new())
            .with_step(RouteStep::new())
            .with_step(DividendStep::new())
            .with_step(TrainStep::new())
            .with_step(CompanyStep::new())
            .with_sequence(
                StepSet::Full,
                vec![
                    StepKind::Track,
                    StepKind::Token,
                    StepKind::Route,
                    StepKind::Dividend,
                    StepKind::Train,
                    StepKind::Company,
                ],
            )
            .with_sequence(
                StepSet::Minor,
                vec![
                    StepKind::Track,
                    StepKind::Token,
                    StepKind::Route,
                    StepKind::Dividend,
                    StepKind::Train,
                ],
            )
    }

    /// Register `step` for its kind.
    #[must_use]
    pub fn with_step(mut self, step: impl Step + 'static) -> Self {
        self.steps.insert(step.kind(), Arc::new(step));
        self
    }

    /// Replace the implementation of one step kind.
    #[must_use]
    pub fn override_step(self, step: impl Step + 'static) -> Self {
        self.with_step(step)
    }

    /// Set the ordered step kinds for a step set.
    #[must_use]
    pub fn with_sequence(mut self, set: StepSet, kinds: Vec<StepKind>) -> Self {
        self.sequences.insert(set, kinds);
        self
    }

    /// The ordered step kinds for `set` (empty if none registered).
    #[must_use]
    pub fn sequence(&self, set: StepSet) -> &[StepKind] {
        self.sequences.get(&set).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn step(&self, kind: StepKind) -> Option<&Arc<dyn Step>> {
        self.steps.get(&kind)
    }

    /// Steps for `set` in order.
    pub fn steps_for(&self, set: StepSet) -> impl Iterator<Item = &Arc<dyn Step>> {
        self.sequence(set).iter().filter_map(|kind| self.steps.get(kind))
    }

    /// Check that every sequenced kind has an implementation.
    pub fn validate(&self) -> Result<(), EngineError> {
        let mut sets: Vec<_> = self.sequences.iter().collect();
        sets.sort_by_key(|(set, _)| **set);
        for (set, kinds) in sets {
            if let Some(missing) = kinds.iter().find(|kind| !self.steps.contains_key(*kind)) {
                return Err(EngineError::InvariantViolation(format!(
                    "{set:?} sequence names {missing} but no step is registered for it"
                )));
            }
        }
        Ok(())
    }
}
