//! Per-title rules: step registries, entity selection and the title trait.
//!
//! The operating round never interprets title-specific behavior directly;
//! it asks the `GameTitle` for the steps to run and the order to run
//! entities in.

pub mod registry;
pub mod selection;
pub mod title;

pub use registry::StepRegistry;
pub use selection::{MinorsFirst, PriorityOrder, SelectionPolicy};
pub use title::{GameTitle, TitleInfo};
