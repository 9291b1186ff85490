//! Certificate report construction.
//!
//! A [`Report`] is built once per host from the decoded [`CertificateInfo`]
//! and never changes afterwards. It renders as the plain-text report and
//! serializes for JSON output.

use chrono::{DateTime, Utc};
use serde::Serialize;
use strum_macros::Display;

use crate::CertificateInfo;

/// Layout used for validity timestamps (RFC 850, always in UTC).
pub const DATE_FORMAT: &str = "%A, %d-%b-%y %H:%M:%S UTC";

/// Verdict derived from the CRL and OCSP revocation codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Validity {
    Valid,
    Invalid { crl: i64, ocsp: i64 },
}

impl Validity {
    /// A certificate is valid only when one check reports "not revoked"
    /// (code 2) and the other "good" (code 4), in either order.
    pub fn from_codes(crl: i64, ocsp: i64) -> Self {
        match (crl, ocsp) {
            (2, 4) | (4, 2) => Validity::Valid,
            _ => Validity::Invalid { crl, ocsp },
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Validity::Valid)
    }
}

/// Formats epoch seconds with [`DATE_FORMAT`].
///
/// Values outside chrono's range fall back to the Unix epoch.
pub fn format_epoch(secs: i64) -> String {
    DateTime::<Utc>::from_timestamp(secs, 0)
        .unwrap_or_default()
        .format(DATE_FORMAT)
        .to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub host: String,
    #[serde(flatten)]
    pub validity: Validity,
    pub issuer: String,
    pub not_before: i64,
    pub not_after: i64,
    pub valid_from: String,
    pub valid_until: String,
    pub common_names: Vec<String>,
    pub alt_names: Vec<String>,
    pub signature_algorithm: String,
}

impl Report {
    pub fn new(host: &str, cert: &CertificateInfo) -> Self {
        Report {
            host: host.to_string(),
            validity: Validity::from_codes(
                cert.crl_revocation_status,
                cert.ocsp_revocation_status,
            ),
            issuer: cert.issuer_label.clone(),
            not_before: cert.not_before,
            not_after: cert.not_after,
            valid_from: format_epoch(cert.not_before),
            valid_until: format_epoch(cert.not_after),
            common_names: cert.common_names.clone(),
            alt_names: cert.alt_names.clone(),
            signature_algorithm: cert.sig_alg.clone(),
        }
    }

    /// Renders the human-readable report. Every line ends with a newline.
    pub fn render_text(&self) -> String {
        let verdict = match self.validity {
            Validity::Valid => "Certificate Valid\n".to_string(),
            Validity::Invalid { crl, ocsp } => format!(
                "Certificate Invalid\nOCSP Revocation Status: {}\nCRL Revocation Status: {}\n",
                ocsp, crl
            ),
        };

        format!(
            "Attempting to verify certificate for {}\n\
             {}\
             Issuer: {}\n\
             Valid from: {}\n\
             Valid until: {}\n\
             Common Names: {}\n\
             Alternate Names: {}\n\
             Signature Algorithim: {}\n",
            self.host,
            verdict,
            self.issuer,
            self.valid_from,
            self.valid_until,
            self.common_names.join(","),
            self.alt_names.join(","),
            self.signature_algorithm,
        )
    }
}
