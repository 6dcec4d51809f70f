//! Rate-limit metadata carried on API responses.
//!
//! The API reports its accounting on every response:
//! - `Ratelimit-Limit`: size of the window (120 signals a per-credential window)
//! - `Ratelimit-Remaining`: requests left in the window
//! - `Ratelimit-Reset`: unix timestamp (seconds) when the window refills
//!
//! The server's `Date` header anchors the reset timestamp, so the computed
//! delay does not depend on the local clock.

use chrono::DateTime;
use reqwest::header::HeaderMap;
use std::time::Duration;
use tracing::{debug, instrument};

/// `Ratelimit-Limit` header name.
pub const RATELIMIT_LIMIT: &str = "ratelimit-limit";
/// `Ratelimit-Remaining` header name.
pub const RATELIMIT_REMAINING: &str = "ratelimit-remaining";
/// `Ratelimit-Reset` header name.
pub const RATELIMIT_RESET: &str = "ratelimit-reset";
/// `Date` header name.
pub const DATE: &str = "date";

/// Window size that marks per-credential accounting.
pub const PER_CREDENTIAL_LIMIT: u32 = 120;

/// The rate-limit headers of one response, each parsed independently.
///
/// A header that is missing or malformed is simply `None`; callers decide
/// whether that makes the response actionable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RateLimitHeaders {
    /// `Ratelimit-Limit`
    pub limit: Option<u32>,
    /// `Ratelimit-Remaining`
    pub remaining: Option<u32>,
    /// `Ratelimit-Reset`, unix seconds
    pub reset: Option<i64>,
    /// `Date`, unix seconds
    pub date: Option<i64>,
}

impl RateLimitHeaders {
    /// Parse the four headers of interest from a response.
    ///
    /// # Example
    ///
    /// ```
    /// use pacer_rate_limit::RateLimitHeaders;
    /// use reqwest::header::{HeaderMap, HeaderValue};
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("ratelimit-reset", HeaderValue::from_static("1700000005"));
    /// headers.insert("date", HeaderValue::from_static("Tue, 14 Nov 2023 22:13:20 GMT"));
    ///
    /// let parsed = RateLimitHeaders::from_headers(&headers);
    /// assert_eq!(parsed.reset_delay(), Some(std::time::Duration::from_secs(5)));
    /// ```
    #[instrument(skip(headers))]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let parsed = Self {
            limit: parse_header(headers, RATELIMIT_LIMIT),
            remaining: parse_header(headers, RATELIMIT_REMAINING),
            reset: parse_header(headers, RATELIMIT_RESET),
            date: parse_http_date(headers),
        };
        debug!(
            limit = ?parsed.limit,
            remaining = ?parsed.remaining,
            reset = ?parsed.reset,
            date = ?parsed.date,
            "Parsed rate limit headers"
        );
        parsed
    }

    /// Seconds from the server's `Date` until `Ratelimit-Reset`.
    ///
    /// `None` unless both headers parsed and their difference is
    /// representable. A reset already in the past yields a zero delay.
    pub fn reset_delay(&self) -> Option<Duration> {
        let seconds = self.reset?.checked_sub(self.date?)?;
        Some(Duration::from_secs(seconds.max(0) as u64))
    }

    /// True when the window has no requests left.
    pub fn is_exhausted(&self) -> bool {
        self.remaining == Some(0)
    }

    /// True when the window is the per-credential one.
    pub fn is_per_credential_tier(&self, per_credential_limit: u32) -> bool {
        self.limit == Some(per_credential_limit)
    }
}

fn parse_header<T: std::str::FromStr>(headers: &HeaderMap, key: &str) -> Option<T> {
    headers.get(key)?.to_str().ok()?.trim().parse().ok()
}

fn parse_http_date(headers: &HeaderMap) -> Option<i64> {
    let value = headers.get(DATE)?.to_str().ok()?;
    DateTime::parse_from_rfc2822(value.trim())
        .ok()
        .map(|date| date.timestamp())
}
