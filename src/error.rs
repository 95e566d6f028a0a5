//! Engine errors.
//!
//! Every rejected action returns an `EngineError` and leaves the game
//! exactly as it was. `EngineError::kind` folds the variants into the
//! coarse taxonomy callers react to. Ignored actions are not errors; they
//! come back as `ActionOutcome::Ignored`.

use serde::{Deserialize, Serialize};

use crate::core::{ActionKind, EntityId};
use crate::steps::StepKind;

/// Coarse classification of a failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Not permitted now: wrong step, wrong entity, malformed payload.
    IllegalAction,
    /// The payer cannot cover the cost.
    InsufficientFunds,
    /// Skip/legality gating let through something it should not have.
    /// A bug in the engine, never a user error.
    InvariantViolation,
    /// A baseline snapshot could not be encoded or decoded.
    Snapshot,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EngineError {
    #[error("{action} is not legal during {step}")]
    IllegalAction { action: ActionKind, step: StepKind },

    #[error("{actual} acted out of turn; {expected} is operating")]
    OutOfTurn { expected: EntityId, actual: EntityId },

    #[error("the operating round is finished")]
    RoundFinished,

    #[error("invalid action: {0}")]
    InvalidAction(String),

    #[error("unknown entity {0}")]
    UnknownEntity(EntityId),

    #[error("{entity} needs {required} but has {available}")]
    InsufficientFunds {
        entity: EntityId,
        required: i64,
        available: i64,
    },

    #[error("bank cannot pay {requested}, it holds {available}")]
    BankBroken { requested: i64, available: i64 },

    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    #[error("snapshot failed: {0}")]
    Snapshot(String),
}

impl EngineError {
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::IllegalAction { .. }
            | EngineError::OutOfTurn { .. }
            | EngineError::RoundFinished
            | EngineError::InvalidAction(_)
            | EngineError::UnknownEntity(_) => ErrorKind::IllegalAction,
            EngineError::InsufficientFunds { .. } | EngineError::BankBroken { .. } => {
                ErrorKind::InsufficientFunds
            }
            EngineError::InvariantViolation(_) => ErrorKind::InvariantViolation,
            EngineError::Snapshot(_) => ErrorKind::Snapshot,
        }
    }
}

impl From<bincode::Error> for EngineError {
    fn from(err: bincode::Error) -> Self {
        EngineError::Snapshot(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        let illegal = EngineError::IllegalAction {
            action: ActionKind::LayTile,
            step: StepKind::Route,
        };
        assert_eq!(illegal.kind(), ErrorKind::IllegalAction);
        assert_eq!(EngineError::RoundFinished.kind(), ErrorKind::IllegalAction);

        let broke = EngineError::InsufficientFunds {
            entity: EntityId(4),
            required: 20,
            available: 19,
        };
        assert_eq!(broke.kind(), ErrorKind::InsufficientFunds);
        assert_eq!(
            EngineError::BankBroken { requested: 1, available: 0 }.kind(),
            ErrorKind::InsufficientFunds
        );
        assert_eq!(
            EngineError::InvariantViolation("two tiles".into()).kind(),
            ErrorKind::InvariantViolation
        );
    }

    #[test]
    fn test_messages() {
        let err = EngineError::IllegalAction {
            action: ActionKind::PlaceToken,
            step: StepKind::Dividend,
        };
        assert_eq!(err.to_string(), "place_token is not legal during dividend");

        let err = EngineError::InsufficientFunds {
            entity: EntityId(4),
            required: 20,
            available: 19,
        };
        assert_eq!(err.to_string(), "Entity(4) needs 20 but has 19");
    }
}
