//! The seam between the dispatcher and the wire.

use crate::RequestDescriptor;
use async_trait::async_trait;
use pacer_error::{ClientError, ErrorResponse, HttpError, JsonError, PacerResult};
use pacer_rate_limit::RateLimitHeaders;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

/// Performs a single request/response exchange.
///
/// Implementations report every completed exchange as `Ok`, whatever its
/// status; `Err` is reserved for failures where no response arrived
/// (connection refused, TLS, timeouts). The dispatcher never retries those.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Issue `request` once.
    async fn exchange(&self, request: &RequestDescriptor) -> Result<Exchange, HttpError>;

    /// Base URL requests are resolved against, if the transport has one.
    ///
    /// Used to pick the default bucket family when configuration names none.
    fn base_url(&self) -> Option<&str> {
        None
    }
}

/// A decoded response body.
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    /// `application/json` content
    Json(serde_json::Value),
    /// Any other content, read as text
    Text(String),
    /// No content
    Empty,
}

impl ResponseBody {
    /// Decode the body into `T`.
    ///
    /// Text bodies are parsed as JSON; an empty body decodes as `null`, so
    /// `()` and `Option<_>` targets accept it.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if the body does not match `T`.
    pub fn json<T: DeserializeOwned>(self) -> PacerResult<T> {
        let decoded = match self {
            ResponseBody::Json(value) => serde_json::from_value(value),
            ResponseBody::Text(text) => serde_json::from_str(&text),
            ResponseBody::Empty => serde_json::from_value(serde_json::Value::Null),
        };
        decoded.map_err(|e| JsonError::from(e).into())
    }
}

/// What came back from one exchange.
#[derive(Debug, Clone)]
pub struct Exchange {
    status: u16,
    headers: HeaderMap,
    body: ResponseBody,
}

impl Exchange {
    /// Assemble an exchange outcome.
    pub fn new(status: u16, headers: HeaderMap, body: ResponseBody) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// HTTP status code.
    pub fn status(&self) -> u16 {
        self.status
    }

    /// Response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Decoded body.
    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    /// True for statuses below 400.
    pub fn is_success(&self) -> bool {
        self.status < 400
    }

    /// The response's rate-limit headers.
    pub fn rate_limit_headers(&self) -> RateLimitHeaders {
        RateLimitHeaders::from_headers(&self.headers)
    }

    /// Convert a failed exchange into the error surfaced to callers.
    ///
    /// The body is decoded as an [`ErrorResponse`] when possible.
    #[track_caller]
    pub fn into_client_error(self) -> ClientError {
        let error_response = match self.body {
            ResponseBody::Json(value) => serde_json::from_value::<ErrorResponse>(value).ok(),
            ResponseBody::Text(text) => serde_json::from_str::<ErrorResponse>(&text).ok(),
            ResponseBody::Empty => None,
        };
        ClientError::new(self.status, self.headers, error_response)
    }

    /// Resolve the exchange: the body on success, a client error otherwise.
    #[track_caller]
    pub fn into_result(self) -> PacerResult<ResponseBody> {
        if self.is_success() {
            Ok(self.body)
        } else {
            Err(self.into_client_error().into())
        }
    }
}
