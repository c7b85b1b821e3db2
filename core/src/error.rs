//! Error types for the typed client.
//!
//! # Design
//! Failures of the wrapped HTTP client pass through `Transport` untouched.
//! Non-2xx responses land in `Status` with the raw status code and body, and
//! callers that care about a missing resource ask `is_not_found()` instead of
//! matching on a dedicated variant.

use thiserror::Error;

/// Errors returned by `TypedClient` and its transports.
#[derive(Debug, Error)]
pub enum Error {
    /// The configured prefix URL is not an absolute http(s) URL.
    #[error("invalid base URL `{url}`: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Client configuration could not be assembled.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// The request body could not be serialized to JSON.
    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// The query parameters could not be form-encoded.
    #[error("failed to encode query parameters: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    /// The wrapped HTTP client failed before a response was produced.
    #[error(transparent)]
    Transport(#[from] ureq::Error),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body could not be deserialized into the declared shape.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] serde_json::Error),
}

impl Error {
    /// Status code of a non-success response, if this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Transport(ureq::Error::StatusCode(status)) => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_reports_code_and_body() {
        let err = Error::Status {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert!(!err.is_not_found());
        assert_eq!(err.to_string(), "HTTP 503: unavailable");
    }

    #[test]
    fn not_found_is_detected_from_either_source() {
        let status = Error::Status {
            status: 404,
            body: String::new(),
        };
        assert!(status.is_not_found());

        let transport = Error::Transport(ureq::Error::StatusCode(404));
        assert!(transport.is_not_found());
    }

    #[test]
    fn decode_error_has_no_status() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = Error::Decode(source);
        assert_eq!(err.status(), None);
        assert!(err.to_string().starts_with("failed to decode response body"));
    }
}
