//! Error types for shelly-core.
//!
//! Every device call returns a [`Result`] instead of printing and returning
//! nothing. The variants keep enough detail to tell a timeout from a 404 from
//! a malformed body, and [`Error::kind`] folds them into the coarse
//! [`FailureKind`] most callers care about.
//!
//! | Variant | Kind |
//! |---------|------|
//! | [`Error::InvalidAddress`], [`Error::Client`] | [`FailureKind::Config`] |
//! | [`Error::Unreachable`], [`Error::Timeout`], [`Error::HttpStatus`], [`Error::Decode`] | [`FailureKind::Transport`] |
//! | [`Error::Shape`], [`Error::MissingField`] | [`FailureKind::Shape`] |
//! | [`Error::IndexOutOfRange`] | [`FailureKind::AbsentIndex`] |
//!
//! Callers that want the "no data" behaviour simply call `.ok()`.

use std::time::Duration;

use thiserror::Error;

/// Coarse classification of a device failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// The client could not be built (bad address, TLS backend failure).
    Config,
    /// The request did not produce a JSON body: network error, timeout,
    /// non-2xx status, or unparseable body.
    Transport,
    /// The JSON arrived but lacks the expected structure or field.
    Shape,
    /// The requested meter index is past the end of `emeters`.
    AbsentIndex,
}

/// Errors that can occur when talking to a Shelly device.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, Error)]
#[non_exhaustive]
pub enum Error {
    /// The device address could not be turned into an HTTP base URL.
    #[error("Invalid device address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    /// The HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    Client(String),

    /// Connection refused, DNS failure, or any other transport error.
    #[error("Device not reachable at {url}: {reason}")]
    Unreachable { url: String, reason: String },

    /// The request exceeded the client timeout.
    #[error("Request to {url} timed out after {}s", timeout.as_secs_f32())]
    Timeout { url: String, timeout: Duration },

    /// The device answered with a non-2xx status.
    #[error("GET {url} returned HTTP {status}")]
    HttpStatus { url: String, status: u16 },

    /// The response body was not valid JSON.
    #[error("Malformed JSON from {url}: {reason}")]
    Decode { url: String, reason: String },

    /// The JSON did not have the expected structure.
    #[error("Unexpected response shape: {0}")]
    Shape(String),

    /// The meter index is past the end of the `emeters` array.
    #[error("Meter index {index} out of range ({available} meters reported)")]
    IndexOutOfRange { index: usize, available: usize },

    /// A meter object lacks a numeric field.
    #[error("Field '{field}' missing from meter {index}")]
    MissingField { field: &'static str, index: usize },
}

impl Error {
    /// Classify this error.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Error::InvalidAddress { .. } | Error::Client(_) => FailureKind::Config,
            Error::Unreachable { .. }
            | Error::Timeout { .. }
            | Error::HttpStatus { .. }
            | Error::Decode { .. } => FailureKind::Transport,
            Error::Shape(_) | Error::MissingField { .. } => FailureKind::Shape,
            Error::IndexOutOfRange { .. } => FailureKind::AbsentIndex,
        }
    }

    /// True for network-level failures.
    #[must_use]
    pub fn is_transport(&self) -> bool {
        self.kind() == FailureKind::Transport
    }
}

/// Result type alias using shelly-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;
