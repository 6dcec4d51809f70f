//! Tests for bucket key derivation.

use pacer_rate_limit::BucketKey;
use std::collections::HashMap;

#[test]
fn test_same_template_and_major_param_share_a_bucket() {
    let get = BucketKey::of("/channels/{id}/subscriptions", "/channels/1001/subscriptions");
    let post = BucketKey::of("/channels/{id}/subscriptions", "/channels/1001/subscriptions");
    assert_eq!(get, post);
}

#[test]
fn test_different_major_params_split_buckets() {
    let a = BucketKey::of("/channels/{id}/subscriptions", "/channels/1001/subscriptions");
    let b = BucketKey::of("/channels/{id}/subscriptions", "/channels/2002/subscriptions");
    assert_ne!(a, b);
}

#[test]
fn test_different_templates_split_buckets() {
    let a = BucketKey::of("/channels/{id}/subscriptions", "/channels/1001/subscriptions");
    let b = BucketKey::of("/channels/{id}/videos", "/channels/1001/videos");
    assert_ne!(a, b);
}

#[test]
fn test_template_without_placeholder_has_no_major_param() {
    let key = BucketKey::of("/streams", "/streams");
    assert_eq!(key.major_param(), None);
    assert_eq!(key, BucketKey::of("/streams", "/streams"));
}

#[test]
fn test_only_the_major_param_partitions() {
    // Later placeholders do not split the bucket.
    let a = BucketKey::of("/channels/{id}/clips/{clip}", "/channels/7/clips/a");
    let b = BucketKey::of("/channels/{id}/clips/{clip}", "/channels/7/clips/b");
    assert_eq!(a, b);
}

#[test]
fn test_derivation_is_idempotent() {
    let template = "/users/{login}/follows";
    let uri = "/users/ninja/follows";
    assert_eq!(BucketKey::of(template, uri), BucketKey::of(template, uri));
}

#[test]
fn test_misaligned_template_never_panics() {
    let key = BucketKey::of("/a/really/long/literal/{id}", "/short");
    assert_eq!(key.major_param(), Some(""));
}

#[test]
fn test_usable_as_map_key() {
    let mut buckets = HashMap::new();
    buckets.insert(BucketKey::of("/users/{id}", "/users/1"), "first");
    buckets.insert(BucketKey::of("/users/{id}", "/users/1"), "second");
    buckets.insert(BucketKey::of("/users/{id}", "/users/2"), "third");
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[&BucketKey::of("/users/{id}", "/users/1")], "second");
}
