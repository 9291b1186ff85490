//! Sequential driver over the configured host list.

use tracing::{error, info, info_span};

use crate::error::CheckError;
use crate::fetch::Transport;
use crate::labs::LabsClient;
use crate::report::Report;

/// A host that could not be checked, with the reason.
#[derive(Debug)]
pub struct HostFailure {
    pub host: String,
    pub error: CheckError,
}

/// Outcome of one pass over the host list.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub reports: Vec<Report>,
    pub failures: Vec<HostFailure>,
}

impl RunSummary {
    pub fn all_succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Number of reports whose certificate was judged invalid.
    pub fn invalid_count(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| !r.validity.is_valid())
            .count()
    }
}

/// Checks a single host: resolve its endpoint, fetch the certificate, build
/// the report.
pub fn check_host<T: Transport>(client: &LabsClient<T>, host: &str) -> Result<Report, CheckError> {
    let ip = client.resolve_ip_address(host)?;
    let cert = client.certificate(host, &ip)?;
    Ok(Report::new(host, &cert))
}

/// Checks every host in order, one at a time.
///
/// A failure in either stage is logged and recorded against that host; the
/// remaining hosts are still checked.
pub fn run<T: Transport>(hosts: &[String], client: &LabsClient<T>) -> RunSummary {
    let mut summary = RunSummary::default();

    for host in hosts {
        let _span = info_span!("host", %host).entered();
        info!("retrieving host info");

        match check_host(client, host) {
            Ok(report) => {
                info!(verdict = %report.validity, "report assembled");
                summary.reports.push(report);
            }
            Err(e) => {
                error!(error = %e, "failed to check host");
                summary.failures.push(HostFailure {
                    host: host.clone(),
                    error: e,
                });
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Validity;
    use std::collections::HashMap;

    /// Serves fixed bodies keyed by URL; unknown URLs fail as transport errors.
    struct RoutedTransport {
        routes: HashMap<String, String>,
    }

    impl RoutedTransport {
        fn new(routes: &[(&str, &str)]) -> Self {
            Self {
                routes: routes
                    .iter()
                    .map(|(url, body)| (url.to_string(), body.to_string()))
                    .collect(),
            }
        }
    }

    impl Transport for RoutedTransport {
        fn get(&self, url: &str) -> Result<Vec<u8>, CheckError> {
            self.routes
                .get(url)
                .map(|body| body.as_bytes().to_vec())
                .ok_or_else(|| CheckError::Transport {
                    url: url.to_string(),
                    reason: "connection refused".to_string(),
                })
        }
    }

    const BASE: &str = "http://labs.test";

    fn cert_body(crl: i64, ocsp: i64) -> String {
        format!(
            r#"{{"details":{{"cert":{{"issuerLabel":"Test CA","crlRevocationStatus":{},"ocspRevocationStatus":{}}}}}}}"#,
            crl, ocsp
        )
    }

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|h| h.to_string()).collect()
    }

    #[test]
    fn test_all_hosts_succeed() {
        let good = cert_body(2, 4);
        let bad = cert_body(2, 2);
        let transport = RoutedTransport::new(&[
            ("http://labs.test/analyze?host=a.test", r#"{"endpoints":[{"ipAddress":"10.0.0.1"}]}"#),
            ("http://labs.test/getEndpointData?host=a.test&s=10.0.0.1", good.as_str()),
            ("http://labs.test/analyze?host=b.test", r#"{"endpoints":[{"ipAddress":"10.0.0.2"}]}"#),
            ("http://labs.test/getEndpointData?host=b.test&s=10.0.0.2", bad.as_str()),
        ]);
        let client = LabsClient::new(transport, BASE, 1);

        let summary = run(&hosts(&["a.test", "b.test"]), &client);

        assert!(summary.all_succeeded());
        assert_eq!(summary.reports.len(), 2);
        assert_eq!(summary.reports[0].host, "a.test");
        assert_eq!(summary.reports[0].validity, Validity::Valid);
        assert_eq!(summary.reports[1].validity, Validity::Invalid { crl: 2, ocsp: 2 });
        assert_eq!(summary.invalid_count(), 1);
    }

    #[test]
    fn test_analyze_failure_skips_host() {
        let good = cert_body(4, 2);
        let transport = RoutedTransport::new(&[
            ("http://labs.test/analyze?host=a.test", r#"{"status":"IN_PROGRESS","endpoints":[]}"#),
            ("http://labs.test/analyze?host=b.test", r#"{"endpoints":[{"ipAddress":"10.0.0.2"}]}"#),
            ("http://labs.test/getEndpointData?host=b.test&s=10.0.0.2", good.as_str()),
        ]);
        let client = LabsClient::new(transport, BASE, 1);

        let summary = run(&hosts(&["a.test", "b.test"]), &client);

        assert!(!summary.all_succeeded());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].host, "a.test");
        assert!(matches!(
            summary.failures[0].error,
            CheckError::NoEndpoints { .. }
        ));
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].host, "b.test");
    }

    #[test]
    fn test_endpoint_data_failure_does_not_abort_run() {
        let good = cert_body(2, 4);
        let transport = RoutedTransport::new(&[
            ("http://labs.test/analyze?host=a.test", r#"{"endpoints":[{"ipAddress":"10.0.0.1"}]}"#),
            ("http://labs.test/analyze?host=b.test", r#"{"endpoints":[{"ipAddress":"10.0.0.2"}]}"#),
            ("http://labs.test/getEndpointData?host=b.test&s=10.0.0.2", good.as_str()),
        ]);
        let client = LabsClient::new(transport, BASE, 3);

        let summary = run(&hosts(&["a.test", "b.test"]), &client);

        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].host, "a.test");
        assert!(matches!(
            summary.failures[0].error,
            CheckError::Transport { .. }
        ));
        assert_eq!(summary.reports.len(), 1);
        assert_eq!(summary.reports[0].host, "b.test");
    }

    #[test]
    fn test_empty_host_list() {
        let client = LabsClient::new(RoutedTransport::new(&[]), BASE, 1);
        let summary = run(&[], &client);
        assert!(summary.all_succeeded());
        assert!(summary.reports.is_empty());
    }
}
