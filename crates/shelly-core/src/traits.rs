//! Trait abstractions for device access.
//!
//! [`Transport`] is the seam between the device client and the network, so
//! tests can swap in [`MockTransport`](crate::MockTransport). [`MeterSource`]
//! is what the reading store consumes, so it never depends on HTTP details.

use serde_json::Value;

use shelly_types::MeterReading;

use crate::error::Result;
use crate::meter::reading_from_value;

/// Blocking GET-and-decode of a JSON document.
pub trait Transport: Send + Sync {
    /// Fetch `url` and decode the body as JSON.
    ///
    /// Implementations map every failure onto a transport-kind
    /// [`Error`](crate::Error) variant.
    fn get_json(&self, url: &str) -> Result<Value>;
}

/// Anything that can produce per-channel meter data.
///
/// # Example
///
/// ```ignore
/// use shelly_core::MeterSource;
///
/// fn print_power<M: MeterSource>(meter: &M) {
///     match meter.reading(0) {
///         Ok(reading) => println!("{}", reading),
///         Err(e) => eprintln!("no data: {}", e),
///     }
/// }
/// ```
pub trait MeterSource {
    /// Short identifier for logs (usually the device base URL).
    fn source_name(&self) -> &str;

    /// The raw JSON object for one metering channel.
    fn meter_info(&self, index: usize) -> Result<Value>;

    /// Typed view of [`meter_info`](Self::meter_info).
    fn reading(&self, index: usize) -> Result<MeterReading> {
        self.meter_info(index).map(|v| reading_from_value(&v))
    }
}
