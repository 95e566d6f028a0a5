//! Private companies: purchasable by operating entities, granting abilities.

use serde::{Deserialize, Serialize};

use crate::core::EntityId;
use crate::economy::Ability;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompanyId(pub u32);

impl std::fmt::Display for CompanyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Company({})", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub sym: String,
    pub name: String,
    /// Face value.
    pub value: i64,
    pub revenue: i64,
    pub owner: Option<EntityId>,
    pub abilities: Vec<Ability>,
}

impl Company {
    pub fn new(id: CompanyId, sym: impl Into<String>, name: impl Into<String>, value: i64) -> Self {
        Self {
            id,
            sym: sym.into(),
            name: name.into(),
            value,
            revenue: 0,
            owner: None,
            abilities: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_revenue(mut self, revenue: i64) -> Self {
        self.revenue = revenue;
        self
    }

    #[must_use]
    pub fn with_ability(mut self, ability: Ability) -> Self {
        self.abilities.push(ability);
        self
    }

    #[must_use]
    pub fn with_owner(mut self, owner: EntityId) -> Self {
        self.owner = Some(owner);
        self
    }

    /// Inclusive purchase price range given min/max percentages of face value.
    #[must_use]
    pub fn price_range(&self, (min_percent, max_percent): (i64, i64)) -> (i64, i64) {
        let min = (self.value * min_percent / 100).max(1);
        let max = (self.value * max_percent / 100).max(min);
        (min, max)
    }
}
