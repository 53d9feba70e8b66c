//! Error types for the height consensus checker
//!
//! Upstream failures are always recoverable and stay inside a refresh
//! batch. Lookup errors surface to the HTTP caller as client errors.

use std::fmt;

/// Main error type for the checker
#[derive(Debug)]
pub enum HaCheckError {
    /// Failure while talking to a monitored daemon or reference pool
    Upstream(UpstreamError),

    /// The mandatory pool directory could not be obtained during startup
    Bootstrap { reason: String },

    /// Lookup key is neither configured nor present in the current snapshot
    UnknownTarget { key: String, mining_address: bool },

    /// Malformed health check request
    InvalidRequest { reason: String },
}

/// Upstream call error variants
#[derive(Debug)]
pub enum UpstreamError {
    /// Connection refused, DNS or TLS failure
    Transport { url: String, reason: String },

    /// No response within the configured timeout
    Timeout { url: String },

    /// Non-success HTTP status
    HttpStatus { url: String, status: u16 },

    /// Response body was not the expected JSON shape
    Parse { url: String, reason: String },
}

impl UpstreamError {
    /// Classify a reqwest failure that happened before a body was decoded
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_decode() {
            UpstreamError::Parse {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            UpstreamError::Transport {
                url: url.to_string(),
                reason: err.to_string(),
            }
        }
    }
}

impl fmt::Display for HaCheckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HaCheckError::Upstream(e) => write!(f, "Upstream error: {}", e),
            HaCheckError::Bootstrap { reason } => write!(f, "Bootstrap failed: {}", reason),
            HaCheckError::UnknownTarget {
                key,
                mining_address,
            } => {
                if *mining_address {
                    write!(f, "Specified mining address ({}) is not valid!", key)
                } else {
                    write!(f, "Specified name ({}) is not valid!", key)
                }
            }
            HaCheckError::InvalidRequest { reason } => write!(f, "Invalid request: {}", reason),
        }
    }
}

impl fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamError::Transport { url, reason } => {
                write!(f, "Request to {} failed: {}", url, reason)
            }
            UpstreamError::Timeout { url } => write!(f, "Request to {} timed out", url),
            UpstreamError::HttpStatus { url, status } => {
                write!(f, "Request to {} returned HTTP {}", url, status)
            }
            UpstreamError::Parse { url, reason } => {
                write!(f, "Unexpected response from {}: {}", url, reason)
            }
        }
    }
}

impl std::error::Error for HaCheckError {}
impl std::error::Error for UpstreamError {}

impl From<UpstreamError> for HaCheckError {
    fn from(err: UpstreamError) -> Self {
        HaCheckError::Upstream(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_target_message_names_the_key() {
        let err = HaCheckError::UnknownTarget {
            key: "pool/a".to_string(),
            mining_address: false,
        };
        assert_eq!(err.to_string(), "Specified name (pool/a) is not valid!");

        let err = HaCheckError::UnknownTarget {
            key: "TRTL123".to_string(),
            mining_address: true,
        };
        assert!(err.to_string().contains("mining address (TRTL123)"));
    }

    #[test]
    fn test_upstream_error_names_the_url() {
        let err = UpstreamError::HttpStatus {
            url: "http://pool/stats".to_string(),
            status: 502,
        };
        assert_eq!(
            HaCheckError::from(err).to_string(),
            "Upstream error: Request to http://pool/stats returned HTTP 502"
        );
    }
}
