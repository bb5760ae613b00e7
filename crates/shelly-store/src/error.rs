//! Error types for shelly-store.

use std::path::PathBuf;

/// Result type for shelly-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in shelly-store.
///
/// Device failures never appear here: [`Store::log_reading`](crate::Store::log_reading)
/// turns them into "no row written". Everything in this enum is a storage
/// problem and is returned to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create database directory.
    #[error("Failed to create database directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// An existing `readings` table lacks expected columns.
    #[error("Existing readings table is missing columns: {}", missing.join(", "))]
    SchemaMismatch { missing: Vec<String> },

    /// Invalid timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(#[from] shelly_types::ParseError),
}
