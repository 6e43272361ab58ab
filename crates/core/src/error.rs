//! Catalog error type.

use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the catalog store and access layer.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// No row matches the requested identifier.
    #[error("no game with id '{0}'")]
    NotFound(String),
    /// The underlying SQLite call failed.
    #[error("catalog storage failure: {0}")]
    Storage(#[from] rusqlite::Error),
    /// The database was written by an unknown schema version.
    #[error("unsupported catalog schema version {found} (expected {expected})")]
    UnsupportedSchema {
        /// Version recorded in the database file.
        found: i64,
        /// Version this build understands.
        expected: i64,
    },
    /// The database directory could not be prepared.
    #[error("failed to prepare catalog directory {}: {source}", path.display())]
    Io {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// A blocking store task panicked or was cancelled.
    #[error("catalog task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl CatalogError {
    /// Whether this error reports a missing entry.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

/// Result alias for catalog operations.
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;
