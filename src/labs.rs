//! Client for the SSL Labs assessment API.
//!
//! Checking a host takes two calls: `analyze` reports the endpoints the scan
//! found, and `getEndpointData` returns certificate details for one of them.

use serde::Deserialize;
use tracing::{debug, instrument};
use url::Url;

use crate::de;
use crate::error::CheckError;
use crate::fetch::{fetch_with_retry, Transport};
use crate::{AnalyzeResult, CertificateInfo};

/// Default base URL of the public assessment API.
pub const DEFAULT_API_BASE: &str = "https://api.ssllabs.com/api/v2";

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EndpointData {
    #[serde(deserialize_with = "de::null_as_default")]
    details: EndpointDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EndpointDetails {
    #[serde(deserialize_with = "de::null_as_default")]
    cert: CertificateInfo,
}

pub struct LabsClient<T> {
    transport: T,
    api_base: String,
    retry_attempts: u32,
}

impl<T: Transport> LabsClient<T> {
    pub fn new(transport: T, api_base: &str, retry_attempts: u32) -> Self {
        Self {
            transport,
            api_base: api_base.trim_end_matches('/').to_string(),
            retry_attempts,
        }
    }

    /// URL of the `analyze` call for `host`.
    pub fn analyze_url(&self, host: &str) -> Result<Url, CheckError> {
        self.endpoint("analyze", &[("host", host)])
    }

    /// URL of the `getEndpointData` call for `host` at `ip`.
    pub fn endpoint_data_url(&self, host: &str, ip: &str) -> Result<Url, CheckError> {
        self.endpoint("getEndpointData", &[("host", host), ("s", ip)])
    }

    fn endpoint(&self, name: &str, params: &[(&str, &str)]) -> Result<Url, CheckError> {
        Url::parse_with_params(&format!("{}/{}", self.api_base, name), params).map_err(|e| {
            CheckError::InvalidInput {
                field: "api_base".to_string(),
                reason: e.to_string(),
            }
        })
    }

    /// Runs the analyze stage and returns the decoded payload.
    pub fn analyze(&self, host: &str) -> Result<AnalyzeResult, CheckError> {
        let url = self.analyze_url(host)?;
        debug!(%url, "fetching analyze payload");
        let body = fetch_with_retry(&self.transport, url.as_str(), self.retry_attempts)?;

        serde_json::from_slice(&body).map_err(|source| CheckError::Decode {
            stage: "analyze".to_string(),
            source,
        })
    }

    /// Resolves the IP address of the first endpoint reported for `host`.
    ///
    /// The scan behind `analyze` may still be running on the first request,
    /// in which case the endpoint list is empty or incomplete.
    #[instrument(skip(self))]
    pub fn resolve_ip_address(&self, host: &str) -> Result<String, CheckError> {
        let analysis = self.analyze(host)?;
        debug!(status = %analysis.status, endpoints = analysis.endpoints.len(), "parsed analyze payload");

        let endpoint = analysis
            .endpoints
            .first()
            .ok_or_else(|| CheckError::NoEndpoints {
                host: host.to_string(),
            })?;

        let ip = endpoint
            .get("ipAddress")
            .and_then(|value| value.as_str())
            .ok_or_else(|| CheckError::NoIpAddress {
                host: host.to_string(),
            })?;

        debug!(ip, "resolved endpoint");
        Ok(ip.to_string())
    }

    /// Fetches certificate details for `host` served from `ip`.
    ///
    /// Fields missing from the payload are left at their zero values.
    #[instrument(skip(self))]
    pub fn certificate(&self, host: &str, ip: &str) -> Result<CertificateInfo, CheckError> {
        let url = self.endpoint_data_url(host, ip)?;
        debug!(%url, "fetching endpoint data payload");
        let body = fetch_with_retry(&self.transport, url.as_str(), self.retry_attempts)?;

        let data: EndpointData =
            serde_json::from_slice(&body).map_err(|source| CheckError::Decode {
                stage: "endpoint data".to_string(),
                source,
            })?;

        Ok(data.details.cert)
    }
}
