//! Bucket identity.

/// Identifies the rate-limit bucket a request falls into.
///
/// Requests share a bucket when their URI templates are equal and the value
/// substituted into the template's first placeholder (the major parameter)
/// is equal. The HTTP method is deliberately not part of the key.
///
/// # Example
///
/// ```
/// use pacer_rate_limit::BucketKey;
///
/// let a = BucketKey::of("/channels/{id}/videos", "/channels/42/videos");
/// let b = BucketKey::of("/channels/{id}/videos", "/channels/42/videos");
/// assert_eq!(a, b);
/// assert_eq!(a.major_param(), Some("42"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BucketKey {
    uri_template: String,
    major_param: Option<String>,
}

impl BucketKey {
    /// Derive the key for a template and its fully-substituted URI.
    ///
    /// Never fails; a template that does not line up with its URI produces
    /// a best-effort (possibly empty) major parameter.
    pub fn of(uri_template: impl Into<String>, complete_uri: &str) -> Self {
        let uri_template = uri_template.into();
        let major_param = major_param(&uri_template, complete_uri);
        Self {
            uri_template,
            major_param,
        }
    }

    /// The route's URI template.
    pub fn uri_template(&self) -> &str {
        &self.uri_template
    }

    /// The value filling the template's first placeholder, if it has one.
    pub fn major_param(&self) -> Option<&str> {
        self.major_param.as_deref()
    }
}

impl std::fmt::Display for BucketKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]", self.uri_template, self.major_param().unwrap_or(""))
    }
}

/// Extract the major parameter of `complete` for `template`.
///
/// Takes the substring of `complete` starting at the byte offset of the first
/// `{` in `template` and ending at the next `/` (or the end). Returns `None`
/// when the template has no placeholder.
///
/// ```
/// use pacer_rate_limit::major_param;
///
/// assert_eq!(major_param("/users/{id}", "/users/7"), Some("7".to_string()));
/// assert_eq!(major_param("/streams", "/streams"), None);
/// ```
pub fn major_param(template: &str, complete: &str) -> Option<String> {
    let start = template.find('{')?;

    // Offsets that overshoot the URI or split a character fall back to empty.
    let Some(tail) = complete.get(start..) else {
        return Some(String::new());
    };
    let end = tail.find('/').unwrap_or(tail.len());
    Some(tail[..end].to_string())
}
