//! Game titles.
//!
//! Each title supplies its constants, step registry and selection policy
//! through [`GameTitle`](crate::rules::GameTitle).

mod base;
pub mod g1846;
pub mod g18eu;

pub use base::Base;
pub use g1846::G1846;
pub use g18eu::G18EU;

use crate::core::Title;
use crate::rules::GameTitle;

/// Rules for a title.
#[must_use]
pub fn rules_for(title: Title) -> Box<dyn GameTitle> {
    match title {
        Title::Base => Box::new(Base::new()),
        Title::G1846 => Box::new(G1846::new()),
        Title::G18EU => Box::new(G18EU::new()),
    }
}
