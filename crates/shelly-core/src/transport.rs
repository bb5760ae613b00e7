//! Blocking HTTP transport backed by `reqwest`.

use std::time::Duration;

use reqwest::blocking::Client;
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::Transport;

/// Timeout applied to every device request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// HTTP transport with a fixed per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    timeout: Duration,
}

impl HttpTransport {
    /// Create a transport with [`DEFAULT_TIMEOUT`].
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Client(e.to_string()))?;
        Ok(Self { client, timeout })
    }

    /// The per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn classify(&self, url: &str, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                url: url.to_string(),
                timeout: self.timeout,
            }
        } else {
            Error::Unreachable {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl Transport for HttpTransport {
    fn get_json(&self, url: &str) -> Result<Value> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| self.classify(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        // Read the body first so a slow body surfaces as a timeout rather
        // than a decode error.
        let body = response.text().map_err(|e| self.classify(url, e))?;
        serde_json::from_str(&body).map_err(|e| Error::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
