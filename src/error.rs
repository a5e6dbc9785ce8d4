//! Error types for the tile environment

use thiserror::Error;

use crate::puzzle::Move;

#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid permutation: {reason}")]
    InvalidPermutation { reason: String },

    #[error("invalid board size {size} (must be at least 1)")]
    InvalidSize { size: usize },

    #[error("taking action {action} from ({row}, {col}) would move the blank out of bounds")]
    OutOfBounds { action: Move, row: usize, col: usize },

    #[error("blank cache points at ({row}, {col}) but that cell holds {found}")]
    InvariantViolation { row: usize, col: usize, found: u32 },

    #[error("invalid configuration in '{path}': {message}")]
    Config { path: String, message: String },

    #[error("failed to {operation}: {source}")]
    Io {
        operation: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
