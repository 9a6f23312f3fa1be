//! Error types for rombus-core.

use thiserror::Error;

use crate::form::{FormId, FormRank};

#[derive(Debug, Error)]
pub enum Error {
    #[error("rank mismatch: expected {expected} form, found {found} form")]
    RankMismatch { expected: FormRank, found: FormRank },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("form {0} is not registered with this backend")]
    UnregisteredForm(FormId),

    #[error("index {index} out of bounds for storage of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("cannot persist {0} operands: assemble them first")]
    UnsupportedPersistence(&'static str),

    #[error("storage i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
