//! Single-resolution result handles.

use crate::ResponseBody;
use pacer_error::{DispatchError, DispatchErrorKind, PacerResult};
use serde::de::DeserializeOwned;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// The eventual outcome of a submitted request.
///
/// Resolves exactly once: with the decoded body for statuses below 400, or
/// with an error. Awaiting the handle is optional; dropping it does not
/// cancel the request.
#[derive(Debug)]
pub struct ResponseHandle {
    bucket: String,
    receiver: oneshot::Receiver<PacerResult<ResponseBody>>,
}

impl ResponseHandle {
    pub(crate) fn new(
        bucket: String,
        receiver: oneshot::Receiver<PacerResult<ResponseBody>>,
    ) -> Self {
        Self { bucket, receiver }
    }

    /// Await the response and decode it into `T`.
    ///
    /// # Errors
    ///
    /// Returns the dispatch error, or a JSON error if the body does not
    /// match `T`.
    pub async fn json<T: DeserializeOwned>(self) -> PacerResult<T> {
        self.await?.json()
    }
}

impl Future for ResponseHandle {
    type Output = PacerResult<ResponseBody>;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = &mut *self;
        Pin::new(&mut this.receiver).poll(cx).map(|received| match received {
            Ok(result) => result,
            Err(_) => Err(DispatchError::new(DispatchErrorKind::QueueClosed(this.bucket.clone())).into()),
        })
    }
}
