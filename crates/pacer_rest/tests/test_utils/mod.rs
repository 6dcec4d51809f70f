//! Scripted in-memory transport shared by the dispatch tests.

#![allow(dead_code)]

use async_trait::async_trait;
use pacer_error::HttpError;
use pacer_rest::{Exchange, RequestDescriptor, ResponseBody, Transport};
use parking_lot::Mutex;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::Instant;

/// `Date` header for unix time 1_700_000_000.
pub const DATE_1700000000: &str = "Tue, 14 Nov 2023 22:13:20 GMT";

/// One exchange as observed by the transport.
#[derive(Debug, Clone)]
pub struct Call {
    pub uri: String,
    pub tag: Option<String>,
    pub credential: Option<String>,
    pub at: Instant,
}

/// A scripted reply.
pub enum Reply {
    Respond(Exchange),
    Fail(String),
}

/// Transport answering from per-URI scripts, recording every call.
///
/// URIs without a script (or whose script ran out) get `200` with a JSON
/// body echoing the request's `tag` query parameter.
pub struct ScriptedTransport {
    latency: Duration,
    base_url: Option<String>,
    scripts: Mutex<HashMap<String, VecDeque<Reply>>>,
    calls: Mutex<Vec<Call>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            latency: Duration::ZERO,
            base_url: None,
            scripts: Mutex::new(HashMap::new()),
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every exchange takes `latency` of (virtual) time.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = Some(base_url.to_string());
        self
    }

    /// Queue `reply` for the next call to `uri`.
    pub fn script(&self, uri: &str, reply: Reply) {
        self.scripts
            .lock()
            .entry(uri.to_string())
            .or_default()
            .push_back(reply);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| call.tag)
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, request: &RequestDescriptor) -> Result<Exchange, HttpError> {
        let tag = request
            .query_pairs()
            .into_iter()
            .find(|(key, _)| *key == "tag")
            .map(|(_, value)| value.to_string());

        self.calls.lock().push(Call {
            uri: request.complete_uri().to_string(),
            tag: tag.clone(),
            credential: request.credential().map(str::to_owned),
            at: Instant::now(),
        });

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        let reply = self
            .scripts
            .lock()
            .get_mut(request.complete_uri())
            .and_then(VecDeque::pop_front);

        match reply {
            Some(Reply::Respond(exchange)) => Ok(exchange),
            Some(Reply::Fail(message)) => Err(HttpError::new(message)),
            None => Ok(Exchange::new(
                200,
                HeaderMap::new(),
                ResponseBody::Json(serde_json::json!({ "tag": tag })),
            )),
        }
    }

    fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }
}

/// Build a header map from `(name, value)` pairs.
pub fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
    let mut map = HeaderMap::new();
    for (name, value) in pairs {
        map.insert(
            HeaderName::from_bytes(name.as_bytes()).unwrap(),
            HeaderValue::from_str(value).unwrap(),
        );
    }
    map
}

/// `status` with rate-limit headers anchored at unix 1_700_000_000.
pub fn rate_limited_exchange(status: u16, limit: &str, remaining: &str, reset: &str) -> Exchange {
    Exchange::new(
        status,
        headers(&[
            ("Ratelimit-Limit", limit),
            ("Ratelimit-Remaining", remaining),
            ("Ratelimit-Reset", reset),
            ("Date", DATE_1700000000),
        ]),
        ResponseBody::Empty,
    )
}
