//! Error types for data parsing in shelly-types.

use thiserror::Error;

/// Errors that can occur when parsing meter data.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A timestamp did not match `YYYY-MM-DD HH:MM:SS` (or `YYYY-MM-DD` where allowed).
    #[error("Invalid timestamp '{0}': expected YYYY-MM-DD HH:MM:SS")]
    InvalidTimestamp(String),
}

/// Result type alias using shelly-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;
