//! Pacer - rate-limit aware REST dispatch
//!
//! Requests are grouped into buckets by URI template and major parameter.
//! Each bucket issues one request at a time, in submission order, and waits
//! out whatever cool-down the server's rate-limit headers demand before the
//! next. Independent buckets proceed concurrently.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pacer::{DispatchConfig, ReqwestTransport, Route, Router};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     pacer::init_telemetry()?;
//!
//!     let transport = ReqwestTransport::builder()
//!         .base_url("https://api.twitch.tv/helix")
//!         .default_header("Client-ID", std::env::var("CLIENT_ID")?)
//!         .build()?;
//!     let router = Router::new(transport, DispatchConfig::load()?);
//!
//!     let request = Route::get("/users")
//!         .request()
//!         .query("login", "alice")
//!         .header("Authorization", format!("Bearer {}", std::env::var("TOKEN")?));
//!     let users: serde_json::Value = router.exchange_as(request).await?;
//!     println!("{users}");
//!     Ok(())
//! }
//! ```
//!
//! # Architecture
//!
//! - `pacer_error` - Error types
//! - `pacer_rate_limit` - Bucket keys, rate-limit headers, cool-down state, configuration
//! - `pacer_rest` - Routes, request descriptors, transports, per-bucket streams, router
//!
//! This crate re-exports everything for convenience.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod telemetry;

pub use pacer_error::*;
pub use pacer_rate_limit::*;
pub use pacer_rest::*;
pub use telemetry::{TelemetryConfig, init_telemetry, init_telemetry_with_config};
