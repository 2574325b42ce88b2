//! Error types for store operations.

use std::path::PathBuf;
use thiserror::Error;

/// A precondition of [`StateStore::add`](crate::StateStore::add).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Precondition {
    #[error("state")]
    State,
    #[error("version")]
    Version,
    #[error("inputs")]
    Inputs,
}

/// Every precondition an `add` call failed, in check order.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe_failures(.failed))]
pub struct ValidationError {
    pub failed: Vec<Precondition>,
}

fn describe_failures(failed: &[Precondition]) -> String {
    let causes: Vec<String> = failed.iter().map(|p| format!("invalid {p}")).collect();
    causes.join(", ")
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// File content did not have the expected shape.
    #[error("invalid format in {path}: {reason}")]
    Format { path: PathBuf, reason: String },

    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to write csv: {0}")]
    Csv(#[from] csv::Error),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn format(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Error::Format {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
