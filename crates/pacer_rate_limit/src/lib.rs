//! Bucket keys and reactive rate-limit bookkeeping.
//!
//! The remote API partitions its rate-limit accounting into buckets. This
//! crate provides the vocabulary the dispatcher uses to honour them:
//!
//! - [`BucketKey`] - which bucket a request belongs to
//! - [`BucketFamily`] - which cool-down policy a bucket follows
//! - [`RateLimitHeaders`] - rate-limit metadata parsed from a response
//! - [`RateLimitState`] - per-bucket sleep deadlines derived from that metadata
//! - [`DispatchConfig`] - TOML-backed tuning knobs
//!
//! Nothing here is predictive: every deadline is recorded after a response
//! arrives and consumed before the next request in the bucket is issued.

mod bucket;
mod config;
mod family;
mod headers;
mod state;

pub use bucket::{BucketKey, major_param};
pub use config::DispatchConfig;
pub use family::BucketFamily;
pub use headers::{
    DATE, PER_CREDENTIAL_LIMIT, RATELIMIT_LIMIT, RATELIMIT_REMAINING, RATELIMIT_RESET,
    RateLimitHeaders,
};
pub use state::RateLimitState;
