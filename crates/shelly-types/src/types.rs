//! Core types for meter data.

use core::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One snapshot of a single metering channel.
///
/// Shaped from one element of the device's `emeters` array. Every field is
/// optional because the device may omit any of them.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeterReading {
    /// Instantaneous active power in watts. Negative while exporting.
    pub power: Option<f64>,
    /// Cumulative consumed energy in watt-hours.
    pub total: Option<f64>,
    /// Cumulative returned (exported) energy in watt-hours.
    pub total_returned: Option<f64>,
}

impl MeterReading {
    pub fn new(power: Option<f64>, total: Option<f64>, total_returned: Option<f64>) -> Self {
        Self {
            power,
            total,
            total_returned,
        }
    }

    /// True when the device reported none of the three fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.power.is_none() && self.total.is_none() && self.total_returned.is_none()
    }

    /// Consumed minus returned energy, in watt-hours.
    ///
    /// Only available when both counters are present.
    #[must_use]
    pub fn net_energy_wh(&self) -> Option<f64> {
        Some(self.total? - self.total_returned?)
    }
}

impl fmt::Display for MeterReading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "power={} W, total={} Wh, returned={} Wh",
            fmt_opt(self.power),
            fmt_opt(self.total),
            fmt_opt(self.total_returned)
        )
    }
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.2}", v))
}

/// A reading persisted in the store.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LogRecord {
    /// Row id assigned by the store. Strictly increasing, never reused.
    pub id: i64,
    /// Instantaneous power in watts.
    pub power: Option<f64>,
    /// Cumulative consumed energy in watt-hours.
    pub total: Option<f64>,
    /// Cumulative returned energy in watt-hours.
    pub total_returned: Option<f64>,
    /// Local wall-clock insertion time, `YYYY-MM-DD HH:MM:SS`.
    pub timestamp: String,
}

impl LogRecord {
    /// The meter values carried by this record.
    #[must_use]
    pub fn reading(&self) -> MeterReading {
        MeterReading {
            power: self.power,
            total: self.total,
            total_returned: self.total_returned,
        }
    }
}
