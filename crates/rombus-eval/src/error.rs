//! Error types for rombus-eval.
//!
//! All failures are fatal for the current `evaluate` call: they indicate
//! caller misuse or irrecoverable inconsistency, and silently proceeding
//! would produce numerically wrong operators.

use thiserror::Error;

use rombus_core::ProblemId;

#[derive(Debug, Error)]
pub enum Error {
    #[error("theta length {thetas} does not match operator count {operators}")]
    ShapeMismatch { thetas: usize, operators: usize },

    #[error("unsupported operand kind: {0}")]
    UnsupportedOperandKind(String),

    #[error("operands reference different owning problems: {expected} and {found}")]
    InconsistentOwnership {
        expected: ProblemId,
        found: ProblemId,
    },

    #[error("missing configuration for term {0:?}")]
    MissingConfiguration(String),

    #[error(transparent)]
    Core(#[from] rombus_core::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
