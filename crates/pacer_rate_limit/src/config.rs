//! Configuration for the dispatcher.
//!
//! The configuration system supports:
//! - Bundled defaults (include_str! from pacer.toml)
//! - User overrides (./pacer.toml or ~/.config/pacer/pacer.toml)
//! - Automatic merging with user values taking precedence

use crate::BucketFamily;
use crate::headers::PER_CREDENTIAL_LIMIT;
use config::{Config, File, FileFormat};
use pacer_error::{ConfigError, ConfigErrorKind, PacerError, PacerResult};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::time::Duration;
use tracing::{debug, instrument};

/// Tuning knobs for bucket pacing and retries.
///
/// # Example
///
/// ```toml
/// base_url = "https://api.twitch.tv/helix"
/// default_floor_ms = 250
/// max_rate_limit_retries = 3
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct DispatchConfig {
    /// Base URL of the API; also used to classify buckets when `family` is unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Forces every bucket into one family instead of classifying by base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<BucketFamily>,

    /// `User-Agent` sent with every request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,

    /// Pause between requests in a fixed-floor bucket, in milliseconds
    #[serde(default)]
    pub default_floor_ms: u64,

    /// Pause between requests in a strict-serial bucket, in milliseconds
    #[serde(default = "default_strict_serial_floor_ms")]
    pub strict_serial_floor_ms: u64,

    /// `Ratelimit-Limit` value that marks a per-credential window
    #[serde(default = "default_per_credential_limit")]
    pub per_credential_limit: u32,

    /// Re-attempts allowed after a 429; `None` retries without bound
    ///
    /// Written in TOML as a count or as `"unbounded"`.
    #[serde(
        default = "default_max_rate_limit_retries",
        deserialize_with = "deserialize_retry_ceiling",
        serialize_with = "serialize_retry_ceiling"
    )]
    pub max_rate_limit_retries: Option<usize>,
}

const UNBOUNDED: &str = "unbounded";

#[derive(Deserialize)]
#[serde(untagged)]
enum RetryCeiling {
    Count(usize),
    Keyword(String),
}

fn deserialize_retry_ceiling<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<usize>, D::Error> {
    match RetryCeiling::deserialize(deserializer)? {
        RetryCeiling::Count(count) => Ok(Some(count)),
        RetryCeiling::Keyword(keyword) if keyword == UNBOUNDED => Ok(None),
        RetryCeiling::Keyword(keyword) => Err(D::Error::custom(format!(
            "expected a retry count or \"{}\", got \"{}\"",
            UNBOUNDED, keyword
        ))),
    }
}

fn serialize_retry_ceiling<S: Serializer>(
    ceiling: &Option<usize>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match ceiling {
        Some(count) => serializer.serialize_u64(*count as u64),
        None => serializer.serialize_str(UNBOUNDED),
    }
}

fn default_max_rate_limit_retries() -> Option<usize> {
    Some(10)
}

#[track_caller]
fn invalid(err: config::ConfigError) -> PacerError {
    ConfigError::new(ConfigErrorKind::Invalid(err.to_string())).into()
}

fn default_strict_serial_floor_ms() -> u64 {
    1000
}

fn default_per_credential_limit() -> u32 {
    PER_CREDENTIAL_LIMIT
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            family: None,
            user_agent: None,
            default_floor_ms: 0,
            strict_serial_floor_ms: default_strict_serial_floor_ms(),
            per_credential_limit: default_per_credential_limit(),
            max_rate_limit_retries: default_max_rate_limit_retries(),
        }
    }
}

impl DispatchConfig {
    /// Load configuration from a specific file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<std::path::Path>) -> PacerResult<Self> {
        debug!("Loading dispatch configuration from file");

        Config::builder()
            .add_source(File::from(path.as_ref()))
            .build()
            .map_err(|e| {
                PacerError::from(ConfigError::new(ConfigErrorKind::Unreadable {
                    source_name: path.as_ref().display().to_string(),
                    message: e.to_string(),
                }))
            })?
            .try_deserialize()
            .map_err(invalid)
    }

    /// Load configuration with precedence: user override > bundled default.
    ///
    /// Configuration sources in order of precedence (later sources override earlier):
    /// 1. Bundled defaults (pacer.toml shipped with the library)
    /// 2. User config in home directory (~/.config/pacer/pacer.toml)
    /// 3. User config in current directory (./pacer.toml)
    ///
    /// User config files are optional and silently skipped if not found.
    #[instrument]
    pub fn load() -> PacerResult<Self> {
        debug!("Loading configuration with precedence: current dir > home dir > bundled defaults");

        const DEFAULT_CONFIG: &str = include_str!("../../../pacer.toml");

        let mut builder =
            Config::builder().add_source(File::from_str(DEFAULT_CONFIG, FileFormat::Toml));

        if let Some(home) = dirs::home_dir() {
            let home_config = home.join(".config/pacer/pacer.toml");
            builder = builder.add_source(File::from(home_config).required(false));
        }

        builder = builder.add_source(File::with_name("pacer").required(false));

        builder
            .build()
            .map_err(|e| {
                PacerError::from(ConfigError::new(ConfigErrorKind::Unreadable {
                    source_name: "bundled, home and local pacer.toml".to_string(),
                    message: e.to_string(),
                }))
            })?
            .try_deserialize()
            .map_err(invalid)
    }

    /// The family buckets start in: the explicit override, else classified
    /// from `base_url`, else `FixedFloor`.
    pub fn family(&self) -> BucketFamily {
        match (self.family, self.base_url.as_deref()) {
            (Some(family), _) => family,
            (None, Some(base_url)) => BucketFamily::from_base_url(base_url),
            (None, None) => BucketFamily::default(),
        }
    }

    /// Minimum pause between two requests for `family`.
    ///
    /// Header-driven families have no floor of their own.
    pub fn floor_for(&self, family: BucketFamily) -> Duration {
        match family {
            BucketFamily::PerCredential => Duration::ZERO,
            BucketFamily::StrictSerial => Duration::from_millis(self.strict_serial_floor_ms),
            BucketFamily::FixedFloor => Duration::from_millis(self.default_floor_ms),
        }
    }

    /// Set the base URL.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Force every bucket into `family`.
    pub fn with_family(mut self, family: BucketFamily) -> Self {
        self.family = Some(family);
        self
    }

    /// Set the fixed-floor pause.
    pub fn with_default_floor(mut self, floor: Duration) -> Self {
        self.default_floor_ms = floor.as_millis() as u64;
        self
    }

    /// Set the 429 retry ceiling; `None` retries without bound.
    pub fn with_max_rate_limit_retries(mut self, retries: Option<usize>) -> Self {
        self.max_rate_limit_retries = retries;
        self
    }
}
