//! Tests for bucket routing and cross-bucket concurrency.

mod test_utils;

use pacer_rate_limit::{BucketFamily, DispatchConfig};
use pacer_rest::{Route, Router};
use parking_lot::Mutex;
use reqwest::Method;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use test_utils::ScriptedTransport;

fn router(transport: &Arc<ScriptedTransport>, config: DispatchConfig) -> Router {
    Router::with_transport(transport.clone(), config)
}

#[tokio::test(start_paused = true)]
async fn test_same_bucket_preserves_submission_order_across_producers() {
    let transport = Arc::new(ScriptedTransport::new().with_latency(Duration::from_millis(50)));
    let router = router(&transport, DispatchConfig::default());
    let route = Route::get("/channels/{id}/videos");
    let submitted = Arc::new(Mutex::new(Vec::new()));

    let mut producers = Vec::new();
    for producer in 0..4 {
        let router = router.clone();
        let route = route.clone();
        let submitted = Arc::clone(&submitted);
        producers.push(tokio::spawn(async move {
            let mut handles = Vec::new();
            for n in 0..5 {
                let tag = format!("{}-{}", producer, n);
                let request = route.expand(&[&42]).unwrap().query("tag", &tag);
                let handle = {
                    let mut submitted = submitted.lock();
                    submitted.push(tag);
                    router.submit(request)
                };
                handles.push(handle);
                tokio::task::yield_now().await;
            }
            for handle in handles {
                handle.await.unwrap();
            }
        }));
    }
    for producer in producers {
        producer.await.unwrap();
    }

    assert_eq!(transport.tags(), *submitted.lock());
    assert_eq!(transport.tags().len(), 20);
    assert_eq!(transport.max_in_flight(), 1);
    assert_eq!(router.bucket_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_methods_share_a_bucket() {
    let transport = Arc::new(ScriptedTransport::new());
    let router = router(&transport, DispatchConfig::default());

    let get = Route::get("/channels/{id}/videos").expand(&[&1]).unwrap();
    let post = Route::post("/channels/{id}/videos").expand(&[&1]).unwrap();
    let (a, b) = tokio::join!(router.submit(get), router.submit(post));
    a.unwrap();
    b.unwrap();

    assert_eq!(router.bucket_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_independent_buckets_run_concurrently() {
    let transport = Arc::new(ScriptedTransport::new().with_latency(Duration::from_secs(10)));
    let router = router(&transport, DispatchConfig::default());
    let route = Route::get("/users/{id}");

    let first = router.submit(route.expand(&[&1]).unwrap().query("tag", "a"));
    let second = router.submit(route.expand(&[&2]).unwrap().query("tag", "b"));
    first.await.unwrap();
    second.await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].at, calls[1].at);
    assert_eq!(transport.max_in_flight(), 2);
    assert_eq!(router.bucket_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_private_bucket_route_never_shares() {
    let transport = Arc::new(ScriptedTransport::new().with_latency(Duration::from_secs(10)));
    let router = router(&transport, DispatchConfig::default());
    let route = Route::builder()
        .method(Method::DELETE)
        .uri_template("/moderation/messages/{id}")
        .private_bucket(true)
        .build()
        .unwrap();

    let first = router.submit(route.expand(&[&9]).unwrap());
    let second = router.submit(route.expand(&[&9]).unwrap());
    first.await.unwrap();
    second.await.unwrap();

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].at, calls[1].at);
    assert_eq!(router.bucket_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_concurrent_first_submissions_create_one_bucket() {
    let transport = Arc::new(ScriptedTransport::new());
    let router = router(&transport, DispatchConfig::default());
    let route = Route::get("/streams");

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let router = router.clone();
            let request = route.request();
            tokio::spawn(async move { router.submit(request).await })
        })
        .collect();
    for task in tasks {
        task.await.unwrap().unwrap();
    }

    assert_eq!(router.bucket_count(), 1);
    assert_eq!(transport.calls().len(), 16);
}

#[tokio::test]
async fn test_family_from_transport_base_url() {
    let transport = Arc::new(ScriptedTransport::new().with_base_url("https://api.twitch.tv/kraken"));
    assert_eq!(router(&transport, DispatchConfig::default()).family(), BucketFamily::StrictSerial);

    let configured = DispatchConfig::default().with_base_url("https://api.twitch.tv/helix");
    assert_eq!(router(&transport, configured).family(), BucketFamily::PerCredential);

    let forced = DispatchConfig::default().with_family(BucketFamily::FixedFloor);
    assert_eq!(router(&transport, forced).family(), BucketFamily::FixedFloor);
}

#[derive(Debug, Deserialize)]
struct Echo {
    tag: Option<String>,
}

#[tokio::test(start_paused = true)]
async fn test_exchange_as_decodes_body() {
    let transport = Arc::new(ScriptedTransport::new());
    let router = router(&transport, DispatchConfig::default());

    let echo: Echo = router
        .exchange_as(Route::get("/streams").request().query("tag", "hello"))
        .await
        .unwrap();
    assert_eq!(echo.tag.as_deref(), Some("hello"));

    let decoded: Result<Vec<u32>, _> = router
        .exchange_as(Route::get("/streams").request().query("tag", "x"))
        .await;
    assert!(format!("{}", decoded.unwrap_err()).contains("JSON Error"));
}
