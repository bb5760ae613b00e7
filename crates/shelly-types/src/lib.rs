//! Shared types for Shelly EM energy meter readings.
//!
//! This crate holds the data shapes passed between the device client
//! (`shelly-core`) and the reading store (`shelly-store`), plus the fixed
//! timestamp format used for persisted records.
//!
//! # Example
//!
//! ```
//! use shelly_types::{MeterReading, timestamp};
//!
//! let reading = MeterReading::new(Some(120.5), Some(34_567.0), Some(12.0));
//! assert_eq!(reading.power, Some(120.5));
//!
//! assert!(timestamp::validate_timestamp("2024-01-01 00:05:00").is_ok());
//! ```

pub mod error;
pub mod timestamp;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use timestamp::TIMESTAMP_FORMAT;
pub use types::{LogRecord, MeterReading};
