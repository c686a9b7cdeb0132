//! Crate-wide error type.
//!
//! Only *configuration* problems surface here: unreadable inputs, malformed documents, and placeholder
//! pools that are too small. Problems with a single user-authored override directive are not errors;
//! they are collected into the [`BuildReport`](crate::BuildReport) and the build carries on.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

use crate::placeholder::PoolKind;

#[derive(Error, Debug)]
pub enum Error {
    #[error("failed to read '{path}': {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Stream(#[from] io::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("{kind} placeholder pool exhausted: {needed} needed, {available} available")]
    PlaceholdersExhausted { kind: PoolKind, needed: usize, available: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("worker pool failure: {0}")]
    Worker(String),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io { path: path.into(), source }
    }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
