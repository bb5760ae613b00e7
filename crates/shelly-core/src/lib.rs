//! HTTP client for Shelly Gen1 energy meters.
//!
//! This crate provides blocking request/response access to a single Shelly
//! device over its local HTTP/JSON API, with typed accessors for the Shelly
//! EM's metering channels.
//!
//! # Features
//!
//! - **Generic device access**: Fetch `/status`, `/settings`, or any endpoint
//! - **Energy meter channels**: Power, consumed and returned energy per index
//! - **Tagged failures**: Transport, shape, and absent-index errors are
//!   distinguishable via [`Error::kind`]
//! - **Pluggable transport**: Swap the HTTP layer for [`MockTransport`] in tests
//!
//! # Layers
//!
//! | Type | Role |
//! |------|------|
//! | [`Transport`] | GET a URL and decode JSON ([`HttpTransport`] uses `reqwest`) |
//! | [`DeviceClient`] | One device address; `fetch`, `status`, `settings` |
//! | [`EnergyMeter`] | Wraps a client; `meter_info`, `power_w`, ... |
//! | [`MeterSource`] | What the reading store consumes |
//!
//! # Quick Start
//!
//! ```no_run
//! use shelly_core::EnergyMeter;
//!
//! let meter = EnergyMeter::new("192.168.1.50")?;
//!
//! match meter.reading(0) {
//!     Ok(reading) => println!("{}", reading),
//!     Err(e) => eprintln!("No data ({:?}): {}", e.kind(), e),
//! }
//! # Ok::<(), shelly_core::Error>(())
//! ```

pub mod device;
pub mod error;
pub mod meter;
pub mod mock;
pub mod traits;
pub mod transport;

pub use device::{DeviceClient, SETTINGS_ENDPOINT, STATUS_ENDPOINT};
pub use error::{Error, FailureKind, Result};
pub use meter::{EnergyMeter, extract_meter, reading_from_value};
pub use mock::MockTransport;
pub use traits::{MeterSource, Transport};
pub use transport::{DEFAULT_TIMEOUT, HttpTransport};

// Re-export from shelly-types
pub use shelly_types::{LogRecord, MeterReading};
