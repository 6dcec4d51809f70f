//! reqwest-backed transport.

use crate::{Exchange, RequestDescriptor, ResponseBody, Transport};
use async_trait::async_trait;
use pacer_error::{BuilderError, BuilderErrorKind, HttpError, PacerResult};
use pacer_rate_limit::DispatchConfig;
use reqwest::Client;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use tracing::{debug, error, instrument};

/// HTTP transport over a shared [`reqwest::Client`].
///
/// Every request URI is appended to the base URL. Default headers are sent
/// with every request that does not set the same header itself.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
    default_headers: HeaderMap,
}

impl ReqwestTransport {
    /// Start building a transport.
    pub fn builder() -> ReqwestTransportBuilder {
        ReqwestTransportBuilder::default()
    }

    /// Headers added to every request.
    pub fn default_headers(&self) -> &HeaderMap {
        &self.default_headers
    }

    fn url_for(&self, request: &RequestDescriptor) -> String {
        format!("{}{}", self.base_url, request.complete_uri())
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(request = %request))]
    async fn exchange(&self, request: &RequestDescriptor) -> Result<Exchange, HttpError> {
        let mut builder = self
            .client
            .request(request.route().method().clone(), self.url_for(request));

        let query = request.query_pairs();
        if !query.is_empty() {
            builder = builder.query(&query);
        }

        for (name, value) in &self.default_headers {
            if request.header_values(name.as_str()).is_none() {
                builder = builder.header(name, value);
            }
        }
        for (name, value) in request.header_pairs() {
            builder = builder.header(name, value);
        }

        if let Some(body) = request.body_json() {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|e| {
            error!(error = ?e, "Failed to send request");
            HttpError::from(e)
        })?;

        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let is_json = headers
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        let text = response.text().await.map_err(|e| {
            error!(error = ?e, status, "Failed to read response body");
            HttpError::from(e)
        })?;

        let body = if text.is_empty() {
            ResponseBody::Empty
        } else if is_json {
            match serde_json::from_str(&text) {
                Ok(value) => ResponseBody::Json(value),
                Err(e) => {
                    debug!(error = %e, "Declared JSON body did not parse, keeping text");
                    ResponseBody::Text(text)
                }
            }
        } else {
            ResponseBody::Text(text)
        };

        debug!(status, "Exchange completed");
        Ok(Exchange::new(status, headers, body))
    }

    fn base_url(&self) -> Option<&str> {
        Some(&self.base_url)
    }
}

/// Builder for [`ReqwestTransport`].
///
/// # Examples
///
/// ```
/// use pacer_rest::ReqwestTransport;
///
/// let transport = ReqwestTransport::builder()
///     .base_url("https://api.twitch.tv/helix")
///     .default_header("Client-ID", "abc123")
///     .build()
///     .unwrap();
///
/// assert_eq!(transport.default_headers().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransportBuilder {
    base_url: Option<String>,
    default_headers: Vec<(String, String)>,
    user_agent: Option<String>,
    timeout: Option<Duration>,
}

impl ReqwestTransportBuilder {
    /// Take the base URL and user agent from `config`, where set.
    pub fn config(mut self, config: &DispatchConfig) -> Self {
        if let Some(base_url) = &config.base_url {
            self.base_url = Some(base_url.clone());
        }
        if let Some(user_agent) = &config.user_agent {
            self.user_agent = Some(user_agent.clone());
        }
        self
    }

    /// Base URL every request URI is appended to. Required.
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Send `key: value` with every request that does not set `key` itself.
    pub fn default_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((key.into(), value.into()));
        self
    }

    /// `User-Agent` for every request.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Whole-exchange timeout. A timed-out exchange is a transport error.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the transport.
    ///
    /// # Errors
    ///
    /// Returns a builder error if the base URL is missing or not an
    /// `http://`/`https://` URL, if a default header is malformed, or if the
    /// HTTP client cannot be created.
    #[instrument(skip(self))]
    pub fn build(self) -> PacerResult<ReqwestTransport> {
        let base_url = self
            .base_url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| BuilderError::new(BuilderErrorKind::MissingField("base_url".to_string())))?;

        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(BuilderError::new(BuilderErrorKind::InvalidField {
                field: "base_url".to_string(),
                reason: format!("{} is not an http(s) URL", base_url),
            })
            .into());
        }

        let mut default_headers = HeaderMap::new();
        for (key, value) in self.default_headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                BuilderError::new(BuilderErrorKind::InvalidField {
                    field: key.clone(),
                    reason: e.to_string(),
                })
            })?;
            let value = HeaderValue::from_str(&value).map_err(|e| {
                BuilderError::new(BuilderErrorKind::InvalidField {
                    field: key.clone(),
                    reason: e.to_string(),
                })
            })?;
            default_headers.append(name, value);
        }

        let mut client = Client::builder().gzip(true);
        if let Some(user_agent) = self.user_agent {
            client = client.user_agent(user_agent);
        }
        if let Some(timeout) = self.timeout {
            client = client.timeout(timeout);
        }
        let client = client.build().map_err(HttpError::from)?;

        debug!(base_url = %base_url, "Built HTTP transport");
        Ok(ReqwestTransport {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            default_headers,
        })
    }
}
