//! Failures reported by the remote API.

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

/// Error payload returned by the API alongside a 4xx/5xx status.
///
/// Every field is optional because the payload is decoded best-effort.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error name (e.g. "Too Many Requests")
    #[serde(default)]
    pub error: Option<String>,
    /// Status code echoed in the payload
    #[serde(default)]
    pub status: Option<u16>,
    /// Human readable explanation
    #[serde(default)]
    pub message: Option<String>,
}

/// A request completed on the wire but the server answered with a status in `[400, 600)`.
///
/// The response headers are kept verbatim so callers can read rate-limit
/// metadata (`Ratelimit-Remaining`, `Ratelimit-Reset`, ...) themselves.
///
/// # Examples
///
/// ```
/// use pacer_error::ClientError;
/// use reqwest::header::HeaderMap;
///
/// let err = ClientError::new(429, HeaderMap::new(), None);
/// assert!(err.is_rate_limited());
/// assert!(format!("{}", err).contains("429"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Client Error: HTTP {} at line {} in {}", status, line, file)]
pub struct ClientError {
    status: u16,
    headers: HeaderMap,
    error_response: Option<ErrorResponse>,
    line: u32,
    file: &'static str,
}

impl ClientError {
    /// Create a new ClientError with automatic location tracking.
    #[track_caller]
    pub fn new(status: u16, headers: HeaderMap, error_response: Option<ErrorResponse>) -> Self {
        let location = std::panic::Location::caller();
        Self {
            status,
            headers,
            error_response,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Numeric HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers as received.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Decoded error payload, if the body could be read as one.
    pub fn error_response(&self) -> Option<&ErrorResponse> {
        self.error_response.as_ref()
    }

    /// True for `429 Too Many Requests`.
    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}
