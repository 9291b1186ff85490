//! Error types for certificate report checks.
//!
//! This module defines the errors that can occur while talking to the
//! assessment API and decoding its responses.

use std::fmt;

/// Error type for a failed certificate check.
///
/// Returned when a host cannot be checked because the API was unreachable,
/// returned an unusable payload, or had not finished its scan yet.
#[derive(Debug)]
pub enum CheckError {
    /// The request could not be sent or no response arrived
    Transport {
        /// The URL that was requested
        url: String,
        /// Why the request failed
        reason: String,
    },

    /// A response arrived but its body could not be read
    BodyRead {
        /// The URL that was requested
        url: String,
        /// Why reading failed
        reason: String,
    },

    /// The response body was not the JSON shape we expected
    Decode {
        /// Which stage produced the payload ("analyze", "endpoint data")
        stage: String,
        /// The underlying JSON error
        source: serde_json::Error,
    },

    /// The analyze payload listed no endpoints
    NoEndpoints {
        /// The host being analyzed
        host: String,
    },

    /// The first endpoint had no usable `ipAddress`
    NoIpAddress {
        /// The host being analyzed
        host: String,
    },

    /// Invalid input provided to the API
    InvalidInput {
        /// Which field/parameter was invalid
        field: String,
        /// Why it was invalid
        reason: String,
    },

    /// A generic error with a custom message
    Other {
        /// Error message
        message: String,
    },
}

impl CheckError {
    /// Whether another attempt at the same request might succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transport { .. })
    }
}

impl fmt::Display for CheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport { url, reason } => {
                write!(f, "Request to {} failed: {}", url, reason)
            }
            Self::BodyRead { url, reason } => {
                write!(f, "Failed to read response from {}: {}", url, reason)
            }
            Self::Decode { stage, source } => {
                write!(f, "Malformed {} payload: {}", stage, source)
            }
            Self::NoEndpoints { host } => {
                write!(
                    f,
                    "No endpoints found in analyze payload for {}. Rerunning once usually fixes this.",
                    host
                )
            }
            Self::NoIpAddress { host } => {
                write!(
                    f,
                    "No ip address listed in payload for {}. Rerunning once usually fixes this.",
                    host
                )
            }
            Self::InvalidInput { field, reason } => {
                write!(f, "Invalid input for '{}': {}", field, reason)
            }
            Self::Other { message } => {
                write!(f, "{}", message)
            }
        }
    }
}

impl std::error::Error for CheckError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Decode { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<String> for CheckError {
    fn from(s: String) -> Self {
        Self::Other { message: s }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_error_display() {
        let err = CheckError::InvalidInput {
            field: "host".to_string(),
            reason: "cannot be empty".to_string(),
        };
        assert_eq!(err.to_string(), "Invalid input for 'host': cannot be empty");
    }

    #[test]
    fn test_no_endpoints_message_suggests_rerun() {
        let err = CheckError::NoEndpoints {
            host: "example.com".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("No endpoints found"));
        assert!(msg.contains("example.com"));
        assert!(msg.contains("Rerunning once usually fixes this."));
    }

    #[test]
    fn test_decode_error_keeps_source() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = CheckError::Decode {
            stage: "analyze".to_string(),
            source,
        };
        assert!(err.to_string().starts_with("Malformed analyze payload"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_only_transport_errors_are_transient() {
        let transport = CheckError::Transport {
            url: "https://api.example/analyze".to_string(),
            reason: "connection refused".to_string(),
        };
        let body = CheckError::BodyRead {
            url: "https://api.example/analyze".to_string(),
            reason: "connection reset".to_string(),
        };
        assert!(transport.is_transient());
        assert!(!body.is_transient());
    }

    #[test]
    fn test_error_from_string() {
        let err: CheckError = format!("Failed to create HTTP client: {}", "no TLS backend").into();
        assert!(matches!(err, CheckError::Other { .. }));
        assert_eq!(err.to_string(), "Failed to create HTTP client: no TLS backend");
    }
}
