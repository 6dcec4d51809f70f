//! Cool-down policy families.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// How a bucket paces itself between consecutive requests.
///
/// The family is fixed when a bucket is created and never re-derived at
/// dispatch time.
///
/// | Family          | Cool-down before the next request                               |
/// |-----------------|-----------------------------------------------------------------|
/// | `PerCredential` | the next request's credential window, else the bucket window    |
/// | `StrictSerial`  | a fixed floor (one second by default), headers are ignored      |
/// | `FixedFloor`    | the configured default floor                                    |
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BucketFamily {
    /// Rate-limit windows are tracked per authorization credential (Helix style).
    PerCredential,
    /// One request per second, no matter what (Kraken style).
    StrictSerial,
    /// A fixed configured pause between any two requests.
    #[default]
    FixedFloor,
}

impl BucketFamily {
    /// Classify an API by its base URL.
    ///
    /// ```
    /// use pacer_rate_limit::BucketFamily;
    ///
    /// assert_eq!(BucketFamily::from_base_url("https://api.twitch.tv/helix"), BucketFamily::PerCredential);
    /// assert_eq!(BucketFamily::from_base_url("https://api.twitch.tv/kraken"), BucketFamily::StrictSerial);
    /// assert_eq!(BucketFamily::from_base_url("https://example.com/v1"), BucketFamily::FixedFloor);
    /// ```
    pub fn from_base_url(base_url: &str) -> Self {
        let family = if base_url.contains("helix") {
            BucketFamily::PerCredential
        } else if base_url.contains("kraken") {
            BucketFamily::StrictSerial
        } else {
            BucketFamily::FixedFloor
        };
        debug!(base_url, %family, "Classified bucket family");
        family
    }

    /// Whether response headers feed this family's cool-down.
    pub fn honours_headers(&self) -> bool {
        matches!(self, BucketFamily::PerCredential)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_string_forms_round_trip() {
        for family in BucketFamily::iter() {
            assert_eq!(BucketFamily::from_str(&family.to_string()).unwrap(), family);
        }
        assert_eq!(BucketFamily::PerCredential.to_string(), "per_credential");
    }

    #[test]
    fn test_only_per_credential_honours_headers() {
        assert!(BucketFamily::PerCredential.honours_headers());
        assert!(!BucketFamily::StrictSerial.honours_headers());
        assert!(!BucketFamily::FixedFloor.honours_headers());
    }
}
