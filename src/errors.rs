//! Typed error definitions for reorg.
//! Fatal, run-ending failures get a variant here so the CLI can log them with a
//! stable code; per-item failures live in the run report instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReorgError {
    #[error("{label} does not exist: {path}")]
    RootMissing { label: &'static str, path: PathBuf },

    #[error("{label} is not a directory: {path}")]
    NotADirectory { label: &'static str, path: PathBuf },

    #[error("Invalid file name '{0}': must be a single path component")]
    InvalidName(String),

    #[error("Insufficient disk space for destination {dest}: need {required} bytes, have {available} bytes")]
    InsufficientSpace {
        required: u64,
        available: u64,
        dest: PathBuf,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    Config { path: PathBuf, reason: String },

    #[error("Operation interrupted by user")]
    Interrupted,
}

impl ReorgError {
    /// Stable numeric code, emitted as a structured log field.
    pub fn code(&self) -> u16 {
        match self {
            ReorgError::RootMissing { .. } => 10,
            ReorgError::NotADirectory { .. } => 11,
            ReorgError::InvalidName(_) => 20,
            ReorgError::InsufficientSpace { .. } => 30,
            ReorgError::Config { .. } => 40,
            ReorgError::Interrupted => 130,
        }
    }

    /// Short machine-friendly kind, paired with `code()` in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            ReorgError::RootMissing { .. } => "root_missing",
            ReorgError::NotADirectory { .. } => "not_a_directory",
            ReorgError::InvalidName(_) => "invalid_name",
            ReorgError::InsufficientSpace { .. } => "insufficient_space",
            ReorgError::Config { .. } => "config",
            ReorgError::Interrupted => "interrupted",
        }
    }
}
