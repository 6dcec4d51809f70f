//! Routes requests to their bucket's queue.

use crate::{RequestDescriptor, RequestStream, ResponseHandle, Transport};
use pacer_error::PacerResult;
use pacer_rate_limit::{BucketFamily, BucketKey, DispatchConfig};
use parking_lot::Mutex;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Dispatches requests through per-bucket [`RequestStream`]s.
///
/// Buckets are created lazily the first time their key is seen and live as
/// long as the router. Cloning a router shares its buckets.
///
/// # Example
///
/// ```rust,ignore
/// let router = Router::new(transport, DispatchConfig::default());
/// let handle = router.submit(Route::get("/streams").request());
/// let body = handle.await?;
/// ```
#[derive(Clone)]
pub struct Router {
    transport: Arc<dyn Transport>,
    config: Arc<DispatchConfig>,
    family: BucketFamily,
    streams: Arc<Mutex<HashMap<BucketKey, RequestStream>>>,
}

impl Router {
    /// Create a router over `transport`.
    pub fn new(transport: impl Transport, config: DispatchConfig) -> Self {
        Self::with_transport(Arc::new(transport), config)
    }

    /// Create a router over a shared transport.
    ///
    /// The default bucket family comes from `config`; when it names neither
    /// a family nor a base URL, the transport's base URL is classified.
    pub fn with_transport(transport: Arc<dyn Transport>, config: DispatchConfig) -> Self {
        let family = match (config.family, config.base_url.as_deref(), transport.base_url()) {
            (None, None, Some(base_url)) => BucketFamily::from_base_url(base_url),
            _ => config.family(),
        };
        debug!(%family, "Created router");

        Self {
            transport,
            config: Arc::new(config),
            family,
            streams: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Queue `request` on its bucket and return a handle to its outcome.
    ///
    /// Never blocks and never fails synchronously; transport and rate-limit
    /// failures arrive through the handle. Must be called from within a
    /// Tokio runtime.
    #[instrument(skip(self, request), fields(request = %request))]
    pub fn submit(&self, request: RequestDescriptor) -> ResponseHandle {
        let key = request.bucket_key();
        let family = request.route().family().unwrap_or(self.family);

        if *request.route().private_bucket() {
            debug!(bucket = %key, "Dispatching on a private bucket");
            return self.start_stream(key, family).push(request);
        }

        let stream = {
            let mut streams = self.streams.lock();
            streams
                .entry(key)
                .or_insert_with_key(|key| self.start_stream(key.clone(), family))
                .clone()
        };
        stream.push(request)
    }

    /// Submit `request` and decode the response body into `T`.
    ///
    /// # Errors
    ///
    /// Returns the request's failure, or a JSON error if the body does not
    /// match `T`.
    pub async fn exchange_as<T: DeserializeOwned>(&self, request: RequestDescriptor) -> PacerResult<T> {
        self.submit(request).json().await
    }

    /// Number of shared buckets created so far.
    pub fn bucket_count(&self) -> usize {
        self.streams.lock().len()
    }

    /// The family buckets get unless their route says otherwise.
    pub fn family(&self) -> BucketFamily {
        self.family
    }

    fn start_stream(&self, key: BucketKey, family: BucketFamily) -> RequestStream {
        RequestStream::start(key, family, Arc::clone(&self.transport), Arc::clone(&self.config))
    }
}

impl std::fmt::Debug for Router {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Router")
            .field("family", &self.family)
            .field("buckets", &self.bucket_count())
            .finish()
    }
}
