use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// The bank: source of all revenue and sink of all costs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bank {
    cash: i64,
}

impl Bank {
    #[must_use]
    pub fn new(cash: i64) -> Self {
        Self { cash }
    }

    #[must_use]
    pub fn cash(&self) -> i64 {
        self.cash
    }

    /// Debit the bank. Fails without change if the bank cannot cover it.
    pub fn spend(&mut self, amount: i64) -> Result<(), EngineError> {
        if amount < 0 {
            return Err(EngineError::InvariantViolation(format!(
                "bank asked to spend a negative amount ({amount})"
            )));
        }
        if amount > self.cash {
            return Err(EngineError::BankBroken {
                requested: amount,
                available: self.cash,
            });
        }
        self.cash -= amount;
        Ok(())
    }

    pub fn receive(&mut self, amount: i64) {
        self.cash += amount;
    }

    #[must_use]
    pub fn is_broken(&self) -> bool {
        self.cash <= 0
    }
}
