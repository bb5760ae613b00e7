//! Generic Shelly Gen1 HTTP/JSON device.
//!
//! [`DeviceClient`] knows how to reach one device and fetch JSON documents
//! from it. It has no notion of meters; that capability lives in
//! [`EnergyMeter`](crate::EnergyMeter), which wraps a client.

use std::time::Duration;

use reqwest::Url;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::Transport;
use crate::transport::HttpTransport;

/// Endpoint for the device status document.
pub const STATUS_ENDPOINT: &str = "/status";
/// Endpoint for the device settings document.
pub const SETTINGS_ENDPOINT: &str = "/settings";

/// Client for a single Shelly Gen1 device.
///
/// # Example
///
/// ```no_run
/// use shelly_core::DeviceClient;
///
/// let client = DeviceClient::new("192.168.1.50")?;
/// let status = client.status()?;
/// println!("{}", status["uptime"]);
/// # Ok::<(), shelly_core::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DeviceClient<T: Transport = HttpTransport> {
    base_url: String,
    transport: T,
}

impl DeviceClient<HttpTransport> {
    /// Create a client for `address` with the default 3 second timeout.
    ///
    /// `address` may be a bare host (`192.168.1.50`, `shelly-em.local`), a
    /// host with port, or a full `http://` / `https://` URL.
    pub fn new(address: &str) -> Result<Self> {
        Self::with_transport(address, HttpTransport::new()?)
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(address: &str, timeout: Duration) -> Result<Self> {
        Self::with_transport(address, HttpTransport::with_timeout(timeout)?)
    }
}

impl<T: Transport> DeviceClient<T> {
    /// Create a client that sends requests through `transport`.
    pub fn with_transport(address: &str, transport: T) -> Result<Self> {
        let base_url = normalize_address(address)?;
        Ok(Self {
            base_url,
            transport,
        })
    }

    /// The normalized base URL, without trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GET `base_url + endpoint` and decode the JSON body.
    ///
    /// Failures are returned to the caller, which decides how loudly to
    /// report them. Nothing here panics or retries.
    pub fn fetch(&self, endpoint: &str) -> Result<Value> {
        let url = self.url_for(endpoint);
        self.transport.get_json(&url).inspect_err(|e| {
            debug!("GET {} failed: {}", endpoint, e);
        })
    }

    /// Fetch `/status`.
    pub fn status(&self) -> Result<Value> {
        self.fetch(STATUS_ENDPOINT)
    }

    /// Fetch `/settings`.
    pub fn settings(&self) -> Result<Value> {
        self.fetch(SETTINGS_ENDPOINT)
    }

    fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}

/// Turn a user-supplied address into a base URL.
fn normalize_address(address: &str) -> Result<String> {
    let trimmed = address.trim();
    let invalid = |reason: &str| Error::InvalidAddress {
        address: address.to_string(),
        reason: reason.to_string(),
    };

    if trimmed.is_empty() {
        return Err(invalid("address is empty"));
    }

    let with_scheme = if trimmed.contains("://") {
        if !trimmed.starts_with("http://") && !trimmed.starts_with("https://") {
            return Err(invalid("only http:// and https:// are supported"));
        }
        trimmed.to_string()
    } else {
        format!("http://{}", trimmed)
    };

    let url = Url::parse(&with_scheme).map_err(|e| invalid(&e.to_string()))?;
    if url.host_str().is_none_or(str::is_empty) {
        return Err(invalid("missing host"));
    }

    Ok(with_scheme.trim_end_matches('/').to_string())
}
