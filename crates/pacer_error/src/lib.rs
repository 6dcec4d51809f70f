//! Error types for the Pacer dispatcher.
//!
//! This crate provides the error types shared by every Pacer crate.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Failures produced by the remote API itself (status codes in `[400, 600)`)
//! are carried by [`ClientError`], which keeps the status and the response
//! headers so callers can inspect rate-limit metadata.
//!
//! # Examples
//!
//! ```
//! use pacer_error::{HttpError, PacerResult};
//!
//! fn fetch_data() -> PacerResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod client;
mod config;
mod dispatch;
mod error;
mod http;
mod json;

pub use builder::{BuilderError, BuilderErrorKind};
pub use client::{ClientError, ErrorResponse};
pub use config::{ConfigError, ConfigErrorKind};
pub use dispatch::{DispatchError, DispatchErrorKind};
pub use error::{PacerError, PacerErrorKind, PacerResult};
pub use http::HttpError;
pub use json::JsonError;
