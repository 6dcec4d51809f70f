//! Tests for building request descriptors.

use pacer_error::{BuilderErrorKind, PacerErrorKind};
use pacer_rate_limit::BucketKey;
use pacer_rest::Route;
use serde::Serialize;

#[test]
fn test_optional_parts_start_absent() {
    let request = Route::get("/streams").request();

    assert!(request.query_params().is_none());
    assert!(request.headers().is_none());
    assert!(request.body_json().is_none());
    assert!(request.credential().is_none());
    assert_eq!(request.to_string(), "GET /streams");
}

#[test]
fn test_query_keeps_distinct_values_per_key() {
    let request = Route::get("/users")
        .request()
        .query_all([("login", "alice"), ("id", "7"), ("login", "bob"), ("login", "alice")]);

    assert_eq!(
        request.query_pairs(),
        vec![("login", "alice"), ("login", "bob"), ("id", "7")]
    );
    assert_eq!(request.to_string(), "GET /users?login=alice&login=bob&id=7");
}

#[test]
fn test_headers_are_case_insensitive() {
    let request = Route::get("/users")
        .request()
        .header("Client-ID", "abc")
        .header("client-id", "abc")
        .header("AUTHORIZATION", "Bearer token");

    assert_eq!(
        request.header_pairs(),
        vec![("client-id", "abc"), ("authorization", "Bearer token")]
    );
    assert_eq!(request.header_values("Client-Id"), Some(&["abc".to_string()][..]));
    assert_eq!(request.credential(), Some("Bearer token"));
}

#[derive(Serialize)]
struct Marker {
    position_seconds: u32,
    description: &'static str,
}

#[test]
fn test_json_body() {
    let request = Route::post("/streams/markers")
        .request()
        .json_body(&Marker {
            position_seconds: 42,
            description: "goal",
        })
        .unwrap();

    assert_eq!(
        request.body_json(),
        Some(&serde_json::json!({ "position_seconds": 42, "description": "goal" }))
    );
}

#[test]
fn test_expand_requires_a_value_per_placeholder() {
    let route = Route::get("/channels/{id}/videos/{video}");

    let err = route.expand(&[&1]).unwrap_err();
    assert!(matches!(err.kind(), PacerErrorKind::Builder(_)));

    let request = route.expand(&[&1, &"abc"]).unwrap();
    assert_eq!(request.complete_uri(), "/channels/1/videos/abc");
}

#[test]
fn test_bucket_key_uses_template_and_major_param() {
    let route = Route::get("/channels/{id}/videos");
    let first = route.expand(&[&1]).unwrap().bucket_key();
    let second = route.expand(&[&1]).unwrap().query("first", 20).bucket_key();
    let other = route.expand(&[&2]).unwrap().bucket_key();

    assert_eq!(first, second);
    assert_ne!(first, other);
    assert_eq!(first, BucketKey::of("/channels/{id}/videos", "/channels/1/videos"));
    assert_eq!(first.major_param(), Some("1"));
}

#[test]
fn test_builder_rejects_missing_method() {
    let err = Route::builder().uri_template("/users").build().unwrap_err();
    assert_eq!(err.kind(), &BuilderErrorKind::MissingField("method".to_string()));
}
