//! Energy meter capability for Shelly EM devices.
//!
//! The Shelly EM reports its measurement channels in the `emeters` array of
//! `/status`:
//!
//! ```json
//! {
//!   "emeters": [
//!     { "power": 412.35, "reactive": 12.1, "voltage": 231.4,
//!       "is_valid": true, "total": 123456.7, "total_returned": 89.0 },
//!     { "power": 0.0, "total": 0.0, "total_returned": 0.0 }
//!   ]
//! }
//! ```
//!
//! Every accessor here performs its own `/status` request; nothing is cached
//! or batched between calls.

use std::time::Duration;

use serde_json::Value;

use shelly_types::MeterReading;

use crate::device::DeviceClient;
use crate::error::{Error, Result};
use crate::traits::{MeterSource, Transport};
use crate::transport::HttpTransport;

/// Key of the meter array inside `/status`.
pub const EMETERS_KEY: &str = "emeters";
/// Instantaneous power, W.
pub const POWER_FIELD: &str = "power";
/// Cumulative consumed energy, Wh.
pub const TOTAL_FIELD: &str = "total";
/// Cumulative returned energy, Wh.
pub const TOTAL_RETURNED_FIELD: &str = "total_returned";

/// A Shelly EM: a [`DeviceClient`] plus meter-channel accessors.
///
/// # Example
///
/// ```no_run
/// use shelly_core::EnergyMeter;
///
/// let meter = EnergyMeter::new("192.168.1.50")?;
/// let watts = meter.power_w(0)?;
/// println!("Drawing {:.1} W", watts);
/// # Ok::<(), shelly_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct EnergyMeter<T: Transport = HttpTransport> {
    client: DeviceClient<T>,
}

impl EnergyMeter<HttpTransport> {
    /// Create a meter client for `address` with the default timeout.
    pub fn new(address: &str) -> Result<Self> {
        Ok(Self::from_client(DeviceClient::new(address)?))
    }

    /// Like [`new`](Self::new) with a custom request timeout.
    pub fn with_timeout(address: &str, timeout: Duration) -> Result<Self> {
        Ok(Self::from_client(DeviceClient::with_timeout(
            address, timeout,
        )?))
    }
}

impl<T: Transport> EnergyMeter<T> {
    /// Wrap an existing device client.
    pub fn from_client(client: DeviceClient<T>) -> Self {
        Self { client }
    }

    /// The generic device client.
    pub fn client(&self) -> &DeviceClient<T> {
        &self.client
    }

    /// Number of meter channels the device currently reports.
    pub fn meter_count(&self) -> Result<usize> {
        let status = self.client.status()?;
        emeters(&status).map(<[Value]>::len)
    }

    /// The raw JSON object for channel `index`, exactly as the device sent it.
    pub fn meter_info(&self, index: usize) -> Result<Value> {
        let status = self.client.status()?;
        extract_meter(&status, index)
    }

    /// Typed reading for channel `index`. Missing fields become `None`.
    pub fn reading(&self, index: usize) -> Result<MeterReading> {
        self.meter_info(index).map(|v| reading_from_value(&v))
    }

    /// Instantaneous power in watts.
    pub fn power_w(&self, index: usize) -> Result<f64> {
        self.field(index, POWER_FIELD)
    }

    /// Total consumed energy in watt-hours.
    pub fn energy_consumed_wh(&self, index: usize) -> Result<f64> {
        self.field(index, TOTAL_FIELD)
    }

    /// Total returned energy in watt-hours.
    pub fn energy_returned_wh(&self, index: usize) -> Result<f64> {
        self.field(index, TOTAL_RETURNED_FIELD)
    }

    fn field(&self, index: usize, field: &'static str) -> Result<f64> {
        let meter = self.meter_info(index)?;
        meter
            .get(field)
            .and_then(Value::as_f64)
            .ok_or(Error::MissingField { field, index })
    }
}

impl<T: Transport> MeterSource for EnergyMeter<T> {
    fn source_name(&self) -> &str {
        self.client.base_url()
    }

    fn meter_info(&self, index: usize) -> Result<Value> {
        EnergyMeter::meter_info(self, index)
    }
}

fn emeters(status: &Value) -> Result<&[Value]> {
    match status.get(EMETERS_KEY) {
        Some(Value::Array(items)) => Ok(items),
        Some(_) => Err(Error::Shape(format!("'{}' is not an array", EMETERS_KEY))),
        None => Err(Error::Shape(format!(
            "status has no '{}' field",
            EMETERS_KEY
        ))),
    }
}

/// Pick channel `index` out of a `/status` document.
///
/// The element must be a non-empty JSON object; `null`, scalars, arrays and
/// `{}` are shape errors.
pub fn extract_meter(status: &Value, index: usize) -> Result<Value> {
    let items = emeters(status)?;
    let meter = items.get(index).ok_or(Error::IndexOutOfRange {
        index,
        available: items.len(),
    })?;
    match meter {
        Value::Object(fields) if !fields.is_empty() => Ok(meter.clone()),
        other => Err(Error::Shape(format!(
            "{}[{}] is not a meter object: {}",
            EMETERS_KEY, index, other
        ))),
    }
}

/// Build a [`MeterReading`] from one `emeters` element.
///
/// Fields that are missing or not numbers are left as `None`.
pub fn reading_from_value(meter: &Value) -> MeterReading {
    let number = |key: &str| meter.get(key).and_then(Value::as_f64);
    MeterReading {
        power: number(POWER_FIELD),
        total: number(TOTAL_FIELD),
        total_returned: number(TOTAL_RETURNED_FIELD),
    }
}
