//! URI template helpers.

use std::fmt::Display;

/// Substitute `{name}` placeholders in `template`, in order, with `values`.
///
/// Returns `None` when there are fewer values than placeholders. Surplus
/// values are ignored.
///
/// ```
/// use pacer_rest::route_utils::expand;
///
/// let uri = expand("/channels/{id}/clips/{clip}", &[&42, &"abc"]);
/// assert_eq!(uri.as_deref(), Some("/channels/42/clips/abc"));
/// ```
pub fn expand(template: &str, values: &[&dyn Display]) -> Option<String> {
    let mut expanded = String::with_capacity(template.len());
    let mut rest = template;
    let mut values = values.iter();

    while let Some(open) = rest.find('{') {
        let Some(close) = rest[open..].find('}') else {
            break;
        };
        expanded.push_str(&rest[..open]);
        expanded.push_str(&values.next()?.to_string());
        rest = &rest[open + close + 1..];
    }
    expanded.push_str(rest);
    Some(expanded)
}

/// Append `query` to `uri` as `key=value` pairs joined by `&`.
///
/// Keys repeat once per value. Values are not percent-encoded; this form is
/// meant for display and logging, the transport encodes on the wire.
///
/// ```
/// use pacer_rest::route_utils::expand_query;
///
/// let query = vec![("id".to_string(), vec!["1".to_string(), "2".to_string()])];
/// assert_eq!(expand_query("/users", &query), "/users?id=1&id=2");
/// ```
pub fn expand_query(uri: &str, query: &[(String, Vec<String>)]) -> String {
    let pairs: Vec<String> = query
        .iter()
        .flat_map(|(key, values)| values.iter().map(move |value| format!("{}={}", key, value)))
        .collect();

    if pairs.is_empty() {
        return uri.to_string();
    }

    let separator = if uri.contains('?') { '&' } else { '?' };
    format!("{}{}{}", uri, separator, pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_without_placeholders() {
        assert_eq!(expand("/streams", &[]).as_deref(), Some("/streams"));
    }

    #[test]
    fn test_expand_with_too_few_values() {
        assert_eq!(expand("/channels/{id}/clips/{clip}", &[&1]), None);
    }

    #[test]
    fn test_expand_query_extends_existing_query() {
        let query = vec![("first".to_string(), vec!["20".to_string()])];
        assert_eq!(expand_query("/streams?game=1", &query), "/streams?game=1&first=20");
    }

    #[test]
    fn test_expand_query_without_values() {
        assert_eq!(expand_query("/streams", &[]), "/streams");
    }
}
