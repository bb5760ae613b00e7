//! Mock transport for testing without a device on the network.
//!
//! [`MockTransport`] implements [`Transport`] by serving canned JSON keyed by
//! URL path. It records every request so tests can assert on how many
//! `/status` round trips an operation made.
//!
//! # Features
//!
//! - **Canned responses**: Register a JSON body per endpoint path
//! - **Failure injection**: Make every request fail with a chosen [`Error`]
//! - **Request log**: Inspect the URLs that were requested

use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{PoisonError, RwLock};

use reqwest::Url;
use serde_json::{Value, json};

use shelly_types::MeterReading;

use crate::device::{DeviceClient, SETTINGS_ENDPOINT, STATUS_ENDPOINT};
use crate::error::{Error, Result};
use crate::meter::EnergyMeter;
use crate::traits::Transport;

/// Base address used by [`MockTransport::into_meter`].
pub const MOCK_ADDRESS: &str = "mock.local";

/// A fake device reachable through [`Transport`].
///
/// # Example
///
/// ```
/// use shelly_core::MockTransport;
/// use shelly_core::MeterReading;
///
/// let meter = MockTransport::new()
///     .with_readings(&[MeterReading::new(Some(250.0), Some(1000.0), Some(0.0))])
///     .into_meter();
///
/// assert_eq!(meter.power_w(0).unwrap(), 250.0);
/// ```
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: RwLock<HashMap<String, Value>>,
    failure: RwLock<Option<Error>>,
    requests: RwLock<Vec<String>>,
    request_count: AtomicU32,
}

impl MockTransport {
    /// Create a mock with no endpoints registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a JSON body for `path`.
    pub fn with_response(self, path: &str, body: Value) -> Self {
        self.set_response(path, body);
        self
    }

    /// Register the `/status` body.
    pub fn with_status(self, status: Value) -> Self {
        self.with_response(STATUS_ENDPOINT, status)
    }

    /// Register a `/status` body built from `readings`, one channel each.
    pub fn with_readings(self, readings: &[MeterReading]) -> Self {
        self.with_status(status_payload(readings))
            .with_response(SETTINGS_ENDPOINT, settings_payload())
    }

    /// Replace the body for `path`.
    pub fn set_response(&self, path: &str, body: Value) {
        self.responses
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(path.to_string(), body);
    }

    /// Replace the `/status` body with one built from `readings`.
    pub fn set_readings(&self, readings: &[MeterReading]) {
        self.set_response(STATUS_ENDPOINT, status_payload(readings));
    }

    /// Make every subsequent request fail with `error`.
    pub fn fail_with(&self, error: Error) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = Some(error);
    }

    /// Stop injecting failures.
    pub fn clear_failure(&self) {
        *self.failure.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    /// Number of requests served (including failed ones).
    pub fn request_count(&self) -> u32 {
        self.request_count.load(Ordering::Relaxed)
    }

    /// URLs requested so far, oldest first.
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Wrap this mock in an [`EnergyMeter`] at [`MOCK_ADDRESS`].
    pub fn into_meter(self) -> EnergyMeter<MockTransport> {
        EnergyMeter::from_client(self.into_client())
    }

    /// Wrap this mock in a [`DeviceClient`] at [`MOCK_ADDRESS`].
    pub fn into_client(self) -> DeviceClient<MockTransport> {
        DeviceClient::with_transport(MOCK_ADDRESS, self)
            .unwrap_or_else(|e| unreachable!("mock address is valid: {}", e))
    }
}

impl Transport for MockTransport {
    fn get_json(&self, url: &str) -> Result<Value> {
        self.request_count.fetch_add(1, Ordering::Relaxed);
        self.requests
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(url.to_string());

        if let Some(err) = self
            .failure
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
        {
            return Err(err);
        }

        let path = Url::parse(url)
            .map(|u| u.path().to_string())
            .unwrap_or_default();

        self.responses
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&path)
            .cloned()
            .ok_or_else(|| Error::HttpStatus {
                url: url.to_string(),
                status: 404,
            })
    }
}

/// A Shelly EM style `/status` document with one `emeters` entry per reading.
///
/// Missing reading fields are omitted from the JSON entirely.
pub fn status_payload(readings: &[MeterReading]) -> Value {
    let emeters: Vec<Value> = readings
        .iter()
        .map(|r| {
            let mut meter = json!({
                "reactive": 0.0,
                "voltage": 230.0,
                "is_valid": true,
            });
            if let Some(obj) = meter.as_object_mut() {
                if let Some(p) = r.power {
                    obj.insert("power".into(), json!(p));
                }
                if let Some(t) = r.total {
                    obj.insert("total".into(), json!(t));
                }
                if let Some(t) = r.total_returned {
                    obj.insert("total_returned".into(), json!(t));
                }
            }
            meter
        })
        .collect();

    json!({
        "wifi_sta": {"connected": true, "ssid": "mock", "ip": "192.0.2.10", "rssi": -55},
        "has_update": false,
        "uptime": 3600,
        "emeters": emeters,
    })
}

/// A minimal `/settings` document.
pub fn settings_payload() -> Value {
    json!({
        "device": {"type": "SHEM", "mac": "C45BBE000000", "hostname": "shellyem-000000", "num_emeters": 2},
        "name": "mock-em",
        "fw": "20230913-114150/v1.14.0-gcb84623",
    })
}
