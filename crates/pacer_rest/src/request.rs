//! Request descriptors.

use crate::{ResponseHandle, Route, Router, route_utils};
use pacer_error::{JsonError, PacerResult};
use pacer_rate_limit::BucketKey;
use serde::Serialize;
use std::fmt;

/// Multi-valued parameters: insertion-ordered keys, each with a set of values.
type MultiMap = Vec<(String, Vec<String>)>;

/// Everything needed to issue one call against a [`Route`].
///
/// Built incrementally, then handed to a [`Router`] which takes ownership.
/// Optional parts are `None` until first set so the dispatcher can tell
/// "absent" from "empty".
///
/// # Examples
///
/// ```
/// use pacer_rest::Route;
///
/// let request = Route::get("/users")
///     .request()
///     .query("id", 1)
///     .query("id", 1)
///     .query("id", 2)
///     .header("Authorization", "Bearer abc");
///
/// assert_eq!(request.query_pairs(), vec![("id", "1"), ("id", "2")]);
/// assert_eq!(request.credential(), Some("Bearer abc"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    route: Route,
    complete_uri: String,
    body: Option<serde_json::Value>,
    query_params: Option<MultiMap>,
    headers: Option<MultiMap>,
}

impl RequestDescriptor {
    /// Describe a call to `route` at the already-substituted `complete_uri`.
    pub fn new(route: Route, complete_uri: impl Into<String>) -> Self {
        Self {
            route,
            complete_uri: complete_uri.into(),
            body: None,
            query_params: None,
            headers: None,
        }
    }

    /// Set the JSON body.
    pub fn body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Serialize `body` and set it as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns a JSON error if `body` cannot be serialized.
    pub fn json_body<T: Serialize + ?Sized>(self, body: &T) -> PacerResult<Self> {
        let value = serde_json::to_value(body).map_err(JsonError::from)?;
        Ok(self.body(value))
    }

    /// Add a query parameter. Repeating a key/value pair is a no-op.
    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        put(
            self.query_params.get_or_insert_with(Vec::new),
            key.into(),
            value.to_string(),
        );
        self
    }

    /// Add every pair of `params` as query parameters.
    pub fn query_all<K, V, I>(self, params: I) -> Self
    where
        K: Into<String>,
        V: ToString,
        I: IntoIterator<Item = (K, V)>,
    {
        params
            .into_iter()
            .fold(self, |request, (key, value)| request.query(key, value))
    }

    /// Add a header. The key is stored lowercased.
    pub fn header(mut self, key: impl AsRef<str>, value: impl Into<String>) -> Self {
        put(
            self.headers.get_or_insert_with(Vec::new),
            key.as_ref().to_lowercase(),
            value.into(),
        );
        self
    }

    /// The route this request targets.
    pub fn route(&self) -> &Route {
        &self.route
    }

    /// The URI with path parameters substituted, without query.
    pub fn complete_uri(&self) -> &str {
        &self.complete_uri
    }

    /// The JSON body, if one was set.
    pub fn body_json(&self) -> Option<&serde_json::Value> {
        self.body.as_ref()
    }

    /// Query parameters, if any were added.
    pub fn query_params(&self) -> Option<&[(String, Vec<String>)]> {
        self.query_params.as_deref()
    }

    /// Headers, if any were added.
    pub fn headers(&self) -> Option<&[(String, Vec<String>)]> {
        self.headers.as_deref()
    }

    /// Query parameters flattened to `(key, value)` pairs in insertion order.
    pub fn query_pairs(&self) -> Vec<(&str, &str)> {
        flatten(self.query_params.as_deref())
    }

    /// Headers flattened to `(key, value)` pairs in insertion order.
    pub fn header_pairs(&self) -> Vec<(&str, &str)> {
        flatten(self.headers.as_deref())
    }

    /// Values of header `key` (case-insensitive), if present.
    pub fn header_values(&self, key: &str) -> Option<&[String]> {
        let key = key.to_lowercase();
        self.headers
            .as_deref()?
            .iter()
            .find(|(name, _)| *name == key)
            .map(|(_, values)| values.as_slice())
    }

    /// The authorization credential, i.e. the first `Authorization` value.
    pub fn credential(&self) -> Option<&str> {
        self.header_values("authorization")?
            .first()
            .map(String::as_str)
    }

    /// The bucket this request is serialized in.
    pub fn bucket_key(&self) -> BucketKey {
        BucketKey::of(self.route.uri_template().as_str(), &self.complete_uri)
    }

    /// Submit this request through `router`.
    pub fn exchange(self, router: &Router) -> ResponseHandle {
        router.submit(self)
    }
}

impl fmt::Display for RequestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let uri = match self.query_params.as_deref() {
            Some(query) => route_utils::expand_query(&self.complete_uri, query),
            None => self.complete_uri.clone(),
        };
        write!(f, "{} {}", self.route.method(), uri)
    }
}

fn put(map: &mut MultiMap, key: String, value: String) {
    match map.iter_mut().find(|(existing, _)| *existing == key) {
        Some((_, values)) => {
            if !values.contains(&value) {
                values.push(value);
            }
        }
        None => map.push((key, vec![value])),
    }
}

fn flatten(map: Option<&[(String, Vec<String>)]>) -> Vec<(&str, &str)> {
    map.unwrap_or_default()
        .iter()
        .flat_map(|(key, values)| values.iter().map(move |value| (key.as_str(), value.as_str())))
        .collect()
}
