//! Per-bucket request queues.
//!
//! Any number of requests may be pushed onto a [`RequestStream`], but its
//! reader completes only one at a time. That linearization is what lets the
//! bucket honour the server's rate limits: the authoritative signal arrives
//! with each response, so the reader applies it as a cool-down after the
//! response and before issuing the next request.

use crate::{Exchange, RequestDescriptor, ResponseBody, ResponseHandle, Transport};
use pacer_error::{
    ClientError, DispatchError, DispatchErrorKind, HttpError, PacerError, PacerResult,
};
use pacer_rate_limit::{BucketFamily, BucketKey, DispatchConfig, RateLimitHeaders, RateLimitState};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::{mpsc, oneshot};
use tokio_retry2::strategy::FixedInterval;
use tokio_retry2::{Retry, RetryError};
use tracing::{Instrument, debug, debug_span, warn};

/// A queued request paired with the handle its submitter awaits.
#[derive(Debug)]
struct PendingRequest {
    request: RequestDescriptor,
    callback: oneshot::Sender<PacerResult<ResponseBody>>,
}

/// The inbound side of one bucket's queue.
///
/// Cloning shares the queue. The reader task runs until every clone is
/// dropped and the queue has drained.
#[derive(Debug, Clone)]
pub struct RequestStream {
    key: BucketKey,
    family: BucketFamily,
    sender: mpsc::UnboundedSender<PendingRequest>,
}

impl RequestStream {
    /// Create the queue for `key` and spawn its reader.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(
        key: BucketKey,
        family: BucketFamily,
        transport: Arc<dyn Transport>,
        config: Arc<DispatchConfig>,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let reader = Reader {
            key: key.clone(),
            family,
            transport,
            config,
            state: RateLimitState::new(),
            receiver,
        };

        let span = debug_span!("request_stream", bucket = %key, %family);
        tokio::spawn(reader.run().instrument(span));
        debug!(bucket = %key, %family, "Started request stream");

        Self {
            key,
            family,
            sender,
        }
    }

    /// Enqueue `request` behind everything already pushed.
    ///
    /// Never blocks. If the reader is gone the handle resolves with a
    /// queue-closed error.
    pub fn push(&self, request: RequestDescriptor) -> ResponseHandle {
        let (callback, receiver) = oneshot::channel();
        if self.sender.send(PendingRequest { request, callback }).is_err() {
            warn!(bucket = %self.key, "Request stream reader is gone");
        }
        ResponseHandle::new(self.key.to_string(), receiver)
    }

    /// The bucket this queue serves.
    pub fn key(&self) -> &BucketKey {
        &self.key
    }

    /// The bucket's cool-down family.
    pub fn family(&self) -> BucketFamily {
        self.family
    }
}

/// Why an attempt did not produce a final exchange.
enum AttemptError {
    Transport(HttpError),
    RateLimited(Exchange),
}

/// Reads and completes one request at a time.
struct Reader {
    key: BucketKey,
    family: BucketFamily,
    transport: Arc<dyn Transport>,
    config: Arc<DispatchConfig>,
    state: RateLimitState,
    receiver: mpsc::UnboundedReceiver<PendingRequest>,
}

impl Reader {
    async fn run(mut self) {
        while let Some(pending) = self.receiver.recv().await {
            let PendingRequest { request, callback } = pending;
            let credential = request.credential().map(str::to_owned);

            let floor = self.config.floor_for(self.family);
            if let Some(deadline) =
                self.state
                    .take_cooldown(self.family, credential.as_deref(), floor)
            {
                debug!(
                    wait_ms = deadline
                        .saturating_duration_since(tokio::time::Instant::now())
                        .as_millis() as u64,
                    "Cooling down before next request"
                );
                tokio::time::sleep_until(deadline).await;
            }

            let (result, headers) = self.dispatch(&request).await;

            if callback.send(result).is_err() {
                debug!(bucket = %self.key, request = %request, "Submitter dropped its handle");
            }

            self.state.record(
                self.family,
                &headers.unwrap_or_default(),
                credential.as_deref(),
                self.config.per_credential_limit,
            );
        }
        debug!(bucket = %self.key, "Request stream closed");
    }

    /// Issue `request`, re-attempting it in place while the server answers
    /// 429 with a usable reset.
    ///
    /// Returns the caller's result and the final response's rate-limit
    /// headers, when a response arrived.
    async fn dispatch(
        &self,
        request: &RequestDescriptor,
    ) -> (PacerResult<ResponseBody>, Option<RateLimitHeaders>) {
        let transport = &self.transport;
        let attempts = AtomicUsize::new(0);
        let attempts_ref = &attempts;

        let retries = self.config.max_rate_limit_retries.unwrap_or(usize::MAX);
        let strategy = FixedInterval::from_millis(0).take(retries);

        let outcome = Retry::spawn(strategy, move || async move {
            let attempt = attempts_ref.fetch_add(1, Ordering::SeqCst) + 1;
            debug!(attempt, request = %request, "Dispatching");

            let exchange = match transport.exchange(request).await {
                Ok(exchange) => exchange,
                Err(e) => return Err(RetryError::Permanent(AttemptError::Transport(e))),
            };

            if exchange.status() != 429 {
                return Ok(exchange);
            }

            // A 429 without a usable reset fails closed.
            match exchange.rate_limit_headers().reset_delay() {
                Some(delay) => {
                    // `retry_after` does not delay the next attempt. The last
                    // attempt resolves without waiting.
                    if attempt <= retries {
                        warn!(
                            attempt,
                            delay_secs = delay.as_secs(),
                            "Rate limited, retrying after reset"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Err(RetryError::Transient {
                        err: AttemptError::RateLimited(exchange),
                        retry_after: None,
                    })
                }
                None => Ok(exchange),
            }
        })
        .await;

        match outcome {
            Ok(exchange) => {
                let headers = exchange.rate_limit_headers();
                (exchange.into_result(), Some(headers))
            }
            Err(AttemptError::Transport(e)) => (Err(e.into()), None),
            Err(AttemptError::RateLimited(exchange)) => {
                let attempts = attempts.load(Ordering::SeqCst);
                warn!(attempts, "Rate limit retries exhausted");
                let headers = exchange.rate_limit_headers();
                let last: ClientError = exchange.into_client_error();
                let err: PacerError =
                    DispatchError::new(DispatchErrorKind::RetriesExhausted { attempts, last })
                        .into();
                (Err(err), Some(headers))
            }
        }
    }
}
