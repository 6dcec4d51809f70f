//! Static endpoint descriptors.

use crate::RequestDescriptor;
use crate::route_utils;
use pacer_error::{BuilderError, BuilderErrorKind, PacerResult};
use pacer_rate_limit::BucketFamily;
use reqwest::Method;
use std::fmt::Display;

/// An API endpoint: HTTP method plus URI template.
///
/// Routes are defined once and reused; each call produces a
/// [`RequestDescriptor`] with the template's placeholders filled in.
///
/// # Examples
///
/// ```
/// use pacer_rest::Route;
/// use reqwest::Method;
///
/// let route = Route::builder()
///     .method(Method::DELETE)
///     .uri_template("/moderation/messages/{id}")
///     .private_bucket(true)
///     .build()
///     .unwrap();
///
/// assert!(*route.private_bucket());
/// assert_eq!(route.uri_template(), "/moderation/messages/{id}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, derive_getters::Getters, derive_builder::Builder)]
#[builder(setter(into), build_fn(error = "pacer_error::BuilderError"))]
pub struct Route {
    /// HTTP method
    method: Method,
    /// URI template with `{name}` placeholders
    uri_template: String,
    /// Cool-down family for this route's buckets, overriding the router default
    #[builder(default, setter(strip_option))]
    family: Option<BucketFamily>,
    /// Every request on this route gets a bucket of its own
    #[builder(default)]
    private_bucket: bool,
}

impl Route {
    /// Start building a route.
    pub fn builder() -> RouteBuilder {
        RouteBuilder::default()
    }

    /// A route with the router's default pacing.
    pub fn new(method: Method, uri_template: impl Into<String>) -> Self {
        Self {
            method,
            uri_template: uri_template.into(),
            family: None,
            private_bucket: false,
        }
    }

    /// `GET` route.
    pub fn get(uri_template: impl Into<String>) -> Self {
        Self::new(Method::GET, uri_template)
    }

    /// `POST` route.
    pub fn post(uri_template: impl Into<String>) -> Self {
        Self::new(Method::POST, uri_template)
    }

    /// `PUT` route.
    pub fn put(uri_template: impl Into<String>) -> Self {
        Self::new(Method::PUT, uri_template)
    }

    /// `PATCH` route.
    pub fn patch(uri_template: impl Into<String>) -> Self {
        Self::new(Method::PATCH, uri_template)
    }

    /// `DELETE` route.
    pub fn delete(uri_template: impl Into<String>) -> Self {
        Self::new(Method::DELETE, uri_template)
    }

    /// Request this route with a template that has no placeholders.
    pub fn request(&self) -> RequestDescriptor {
        RequestDescriptor::new(self.clone(), self.uri_template.clone())
    }

    /// Request this route with its placeholders filled by `values`, in order.
    ///
    /// # Errors
    ///
    /// Returns a builder error if there are fewer values than placeholders.
    ///
    /// ```
    /// use pacer_rest::Route;
    ///
    /// let request = Route::get("/users/{id}/follows").expand(&[&1234]).unwrap();
    /// assert_eq!(request.complete_uri(), "/users/1234/follows");
    /// ```
    pub fn expand(&self, values: &[&dyn Display]) -> PacerResult<RequestDescriptor> {
        let complete_uri = route_utils::expand(&self.uri_template, values).ok_or_else(|| {
            BuilderError::new(BuilderErrorKind::InvalidField {
                field: "uri_template".to_string(),
                reason: format!(
                    "not enough values ({}) for placeholders in {}",
                    values.len(),
                    self.uri_template
                ),
            })
        })?;
        Ok(RequestDescriptor::new(self.clone(), complete_uri))
    }
}
