//! Top-level error wrapper types.

use crate::{BuilderError, ClientError, ConfigError, DispatchError, HttpError, JsonError};

/// Every error condition a Pacer operation can produce.
///
/// # Examples
///
/// ```
/// use pacer_error::{PacerError, HttpError};
///
/// let http_err = HttpError::new("Connection failed");
/// let err: PacerError = http_err.into();
/// assert!(format!("{}", err).contains("HTTP Error"));
/// ```
#[derive(Debug, derive_more::From, derive_more::Display, derive_more::Error)]
pub enum PacerErrorKind {
    /// Transport-level failure
    #[from(HttpError)]
    Http(HttpError),
    /// The server answered with a 4xx/5xx status
    #[from(ClientError)]
    Client(ClientError),
    /// JSON serialization/deserialization error
    #[from(JsonError)]
    Json(JsonError),
    /// Configuration error
    #[from(ConfigError)]
    Config(ConfigError),
    /// Builder error
    #[from(BuilderError)]
    Builder(BuilderError),
    /// Dispatcher error
    #[from(DispatchError)]
    Dispatch(DispatchError),
}

/// Pacer error with kind discrimination.
///
/// # Examples
///
/// ```
/// use pacer_error::{PacerResult, ConfigError, ConfigErrorKind};
///
/// fn might_fail() -> PacerResult<()> {
///     Err(ConfigError::new(ConfigErrorKind::Invalid("missing field".into())))?
/// }
///
/// assert!(might_fail().is_err());
/// ```
#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("Pacer Error: {}", _0)]
pub struct PacerError(Box<PacerErrorKind>);

impl PacerError {
    /// Create a new error from a kind.
    pub fn new(kind: PacerErrorKind) -> Self {
        Self(Box::new(kind))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &PacerErrorKind {
        &self.0
    }

    /// The server's failure, if this error carries one.
    ///
    /// Also looks inside an exhausted retry, whose last 429 is kept.
    pub fn client_error(&self) -> Option<&ClientError> {
        match self.kind() {
            PacerErrorKind::Client(err) => Some(err),
            PacerErrorKind::Dispatch(err) => match err.kind() {
                crate::DispatchErrorKind::RetriesExhausted { last, .. } => Some(last),
                _ => None,
            },
            _ => None,
        }
    }
}

// Generic From implementation for any type that converts to PacerErrorKind
impl<T> From<T> for PacerError
where
    T: Into<PacerErrorKind>,
{
    fn from(err: T) -> Self {
        Self::new(err.into())
    }
}

/// Result type for Pacer operations.
pub type PacerResult<T> = std::result::Result<T, PacerError>;
