//! Configuration loading failures.

/// What went wrong while loading dispatch configuration.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum ConfigErrorKind {
    /// A configuration source could not be read or merged
    #[display("cannot read {}: {}", source_name, message)]
    Unreadable {
        /// File path, or a description of the layered sources
        source_name: String,
        /// Underlying failure
        message: String,
    },
    /// The sources were read but do not describe a valid configuration
    #[display("invalid configuration: {}", _0)]
    Invalid(String),
}

/// Configuration error with source location.
///
/// # Examples
///
/// ```
/// use pacer_error::{ConfigError, ConfigErrorKind};
///
/// let err = ConfigError::new(ConfigErrorKind::Invalid("default_floor_ms: not a number".into()));
/// assert!(format!("{}", err).contains("default_floor_ms"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Configuration Error: {} at line {} in {}", kind, line, file)]
pub struct ConfigError {
    kind: ConfigErrorKind,
    line: u32,
    file: &'static str,
}

impl ConfigError {
    /// Create a new ConfigError at the caller's location.
    #[track_caller]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}
