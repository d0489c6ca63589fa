//! Error types for ledger operations.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while reading or extending the seen-URL ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger exists but could not be read.
    #[error("failed to read ledger {path}: {source}")]
    Read {
        /// Ledger location.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Appending an entry failed.
    #[error("failed to append to ledger {path}: {source}")]
    Append {
        /// Ledger location.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Something other than a regular file sits at the ledger path.
    #[error("ledger path {path} is not a regular file")]
    NotAFile {
        /// Ledger location.
        path: PathBuf,
    },

    /// The ledger was required to exist but does not.
    #[error("ledger {path} not found")]
    Missing {
        /// Ledger location.
        path: PathBuf,
    },
}

impl LedgerError {
    /// Creates a read error.
    pub fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Creates an append error.
    pub fn append(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Append {
            path: path.into(),
            source,
        }
    }
}
