//! Rate-limit aware dispatch of REST requests.
//!
//! Requests are grouped into buckets by [`BucketKey`](pacer_rate_limit::BucketKey).
//! Each bucket owns one [`RequestStream`], a queue drained by a single reader
//! task, so requests in a bucket go out strictly one at a time in submission
//! order while independent buckets run concurrently.
//!
//! ```rust,ignore
//! use pacer_rest::{ReqwestTransport, Route, Router};
//! use pacer_rate_limit::DispatchConfig;
//!
//! let transport = ReqwestTransport::builder()
//!     .base_url("https://api.twitch.tv/helix")
//!     .default_header("Client-ID", "my-client-id")
//!     .build()?;
//! let router = Router::new(transport, DispatchConfig::load()?);
//!
//! let users = Route::get("/users");
//! let body = users
//!     .request()
//!     .query("login", "ninja")
//!     .header("Authorization", "Bearer token")
//!     .exchange(&router)
//!     .await?;
//! ```

mod handle;
mod http_client;
mod request;
mod route;
pub mod route_utils;
mod router;
mod stream;
mod transport;

pub use handle::ResponseHandle;
pub use http_client::{ReqwestTransport, ReqwestTransportBuilder};
pub use request::RequestDescriptor;
pub use route::{Route, RouteBuilder};
pub use router::Router;
pub use stream::RequestStream;
pub use transport::{Exchange, ResponseBody, Transport};
