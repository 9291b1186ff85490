//! Certificate reports from the SSL Labs assessment API.
//!
//! For each host, the analyze stage resolves the IP address of the first
//! endpoint the scan found, the endpoint-data stage fetches that endpoint's
//! certificate details, and a [`Report`] is built from them.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use labscheck::{HttpTransport, LabsClient, Report, DEFAULT_API_BASE};
//!
//! let transport = HttpTransport::new(Duration::from_secs(30))?;
//! let client = LabsClient::new(transport, DEFAULT_API_BASE, 5);
//! let ip = client.resolve_ip_address("example.com")?;
//! let cert = client.certificate("example.com", &ip)?;
//! print!("{}", Report::new("example.com", &cert).render_text());
//! # Ok::<(), labscheck::CheckError>(())
//! ```

use serde::Deserialize;
use serde_json::{Map, Value};

pub mod config;
mod de;
pub mod error;
pub mod fetch;
pub mod labs;
pub mod output;
pub mod report;
pub mod runner;

pub use error::CheckError;
pub use fetch::{fetch_with_retry, HttpTransport, Transport};
pub use labs::{LabsClient, DEFAULT_API_BASE};
pub use report::{format_epoch, Report, Validity};
pub use runner::{run, HostFailure, RunSummary};

/// Payload of the `analyze` call.
///
/// Endpoint summaries are kept as open-ended maps; only `ipAddress` of the
/// first one is read.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyzeResult {
    #[serde(deserialize_with = "de::null_as_default")]
    pub host: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "de::lenient_i64")]
    pub start_time: i64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub endpoints: Vec<Map<String, Value>>,
}

/// Certificate fields from `details.cert` of the `getEndpointData` call.
///
/// Decoding is tolerant: absent or `null` fields keep their zero value and
/// numbers may arrive as floats.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateInfo {
    /// Start of validity, epoch seconds
    #[serde(deserialize_with = "de::lenient_i64")]
    pub not_before: i64,
    /// End of validity, epoch seconds
    #[serde(deserialize_with = "de::lenient_i64")]
    pub not_after: i64,
    #[serde(deserialize_with = "de::null_as_default")]
    pub common_names: Vec<String>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub alt_names: Vec<String>,
    #[serde(deserialize_with = "de::null_as_default")]
    pub sig_alg: String,
    #[serde(deserialize_with = "de::null_as_default")]
    pub issuer_label: String,
    #[serde(deserialize_with = "de::lenient_i64")]
    pub crl_revocation_status: i64,
    #[serde(deserialize_with = "de::lenient_i64")]
    pub ocsp_revocation_status: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_result_decodes_camel_case() {
        let result: AnalyzeResult = serde_json::from_str(
            r#"{"host":"example.com","status":"READY","startTime":1690000000000,
                "endpoints":[{"ipAddress":"93.184.216.34","statusMessage":"Ready"}]}"#,
        )
        .unwrap();
        assert_eq!(result.host, "example.com");
        assert_eq!(result.status, "READY");
        assert_eq!(result.start_time, 1690000000000);
        assert_eq!(result.endpoints.len(), 1);
        assert_eq!(result.endpoints[0]["statusMessage"], "Ready");
    }

    #[test]
    fn test_certificate_info_ignores_unknown_fields() {
        let cert: CertificateInfo =
            serde_json::from_str(r#"{"subject":"CN=example.com","sigAlg":"SHA256withECDSA"}"#)
                .unwrap();
        assert_eq!(cert.sig_alg, "SHA256withECDSA");
        assert_eq!(cert.not_after, 0);
    }

    #[test]
    fn test_certificate_info_null_and_float_fields() {
        let cert: CertificateInfo = serde_json::from_str(
            r#"{"notBefore":1690000000.0,"notAfter":null,"commonNames":null,
                "issuerLabel":null,"crlRevocationStatus":2.0,"ocspRevocationStatus":4}"#,
        )
        .unwrap();
        assert_eq!(cert.not_before, 1690000000);
        assert_eq!(cert.not_after, 0);
        assert!(cert.common_names.is_empty());
        assert_eq!(cert.issuer_label, "");
        assert_eq!(cert.crl_revocation_status, 2);
        assert_eq!(cert.ocsp_revocation_status, 4);
    }

    #[test]
    fn test_analyze_result_null_endpoints() {
        let result: AnalyzeResult =
            serde_json::from_str(r#"{"host":null,"status":"DNS","startTime":null,"endpoints":null}"#)
                .unwrap();
        assert_eq!(result.status, "DNS");
        assert!(result.endpoints.is_empty());
    }
}
