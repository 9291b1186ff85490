//! HTTP fetching with a bounded retry loop.
//!
//! The [`Transport`] trait is the seam between the API client and the
//! network. [`HttpTransport`] is the real implementation on top of a blocking
//! `reqwest` client; tests substitute scripted transports.

use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, warn};

use crate::error::CheckError;

/// Something that can GET a URL and hand back the full response body.
pub trait Transport {
    /// Performs a single GET request.
    ///
    /// Non-2xx responses are not errors; their body is returned as-is.
    fn get(&self, url: &str) -> Result<Vec<u8>, CheckError>;
}

/// Blocking HTTP transport backed by `reqwest`.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, CheckError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("labscheck/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| CheckError::from(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<Vec<u8>, CheckError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| CheckError::Transport {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "upstream returned a non-success status");
        }

        // The response is consumed here, so the connection is released
        // whether or not the read succeeds.
        let body = response.bytes().map_err(|e| CheckError::BodyRead {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        debug!(%url, bytes = body.len(), "read response body");
        Ok(body.to_vec())
    }
}

/// GETs `url`, retrying transport failures up to `attempts` times in total.
///
/// Returns the first successful body, or the last error once every attempt
/// has failed. There is no delay between attempts. Non-transport errors
/// (for example a body that could not be read) are returned immediately.
pub fn fetch_with_retry<T: Transport + ?Sized>(
    transport: &T,
    url: &str,
    attempts: u32,
) -> Result<Vec<u8>, CheckError> {
    let attempts = attempts.max(1);
    let mut last_error = None;

    for attempt in 1..=attempts {
        match transport.get(url) {
            Ok(body) => return Ok(body),
            Err(e) if e.is_transient() => {
                warn!(%url, attempt, attempts, error = %e, "request failed");
                last_error = Some(e);
            }
            Err(e) => return Err(e),
        }
    }

    Err(last_error
        .unwrap_or_else(|| CheckError::from(format!("No attempt was made to fetch {}", url))))
}
