//! Dispatcher error types.

use crate::ClientError;

/// Dispatcher-specific error conditions.
#[derive(Debug, Clone, derive_more::Display)]
pub enum DispatchErrorKind {
    /// The bucket's processing loop stopped before resolving the request
    #[display("Request queue for bucket {} closed before the request resolved", _0)]
    QueueClosed(String),
    /// The server kept answering 429 past the configured retry ceiling
    #[display("Rate limit retries exhausted after {} attempts: {}", attempts, last)]
    RetriesExhausted {
        /// Number of attempts made, including the first
        attempts: usize,
        /// The final 429 response
        last: ClientError,
    },
}

/// Dispatcher error with source location tracking.
///
/// # Examples
///
/// ```
/// use pacer_error::{DispatchError, DispatchErrorKind};
///
/// let err = DispatchError::new(DispatchErrorKind::QueueClosed("/users".to_string()));
/// assert!(format!("{}", err).contains("/users"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Dispatch Error: {} at line {} in {}", kind, line, file)]
pub struct DispatchError {
    kind: DispatchErrorKind,
    line: u32,
    file: &'static str,
}

impl DispatchError {
    /// Create a new DispatchError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: DispatchErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Get the error kind.
    pub fn kind(&self) -> &DispatchErrorKind {
        &self.kind
    }
}
