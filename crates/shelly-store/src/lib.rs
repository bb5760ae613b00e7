//! Local persistence for Shelly EM meter readings.
//!
//! Readings live in a single SQLite table that is only ever appended to.
//! Each operation opens its own connection, so a [`Store`] is just a path
//! and can be cloned or shared freely.
//!
//! # Example
//!
//! ```no_run
//! use shelly_core::EnergyMeter;
//! use shelly_store::{RangeQuery, Store};
//!
//! let store = Store::open_default()?;
//! let meter = EnergyMeter::new("192.168.1.50")?;
//!
//! // Poll channel 0 once; None means the device did not answer
//! if let Some(record) = store.log_reading(&meter, 0)? {
//!     println!("stored row {}", record.id);
//! }
//!
//! let today = store.data_in_range("2024-01-01 00:00:00", "2024-01-01 23:59:59")?;
//! let last_ten = store.query(&RangeQuery::new().newest_first().limit(10))?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod queries;
mod schema;
mod store;

pub use error::{Error, Result};
pub use queries::RangeQuery;
pub use schema::{COLUMNS, READINGS_TABLE};
pub use store::Store;

pub use shelly_types::{LogRecord, MeterReading};

/// File name of the reading log.
pub const DB_FILE_NAME: &str = "shem_data.db";

/// Default database path following platform conventions.
///
/// - Linux: `~/.local/share/shelly/shem_data.db`
/// - macOS: `~/Library/Application Support/shelly/shem_data.db`
/// - Windows: `C:\Users\<user>\AppData\Local\shelly\shem_data.db`
pub fn default_db_path() -> std::path::PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("shelly")
        .join(DB_FILE_NAME)
}
