//! Per-bucket throttling bookkeeping.

use crate::{BucketFamily, RateLimitHeaders};
use std::collections::HashMap;
use std::time::Duration;
use tokio::time::Instant;
use tracing::{debug, instrument};

/// Sleep deadlines for one bucket.
///
/// Owned and mutated by exactly one bucket loop, so it carries no locking.
/// Deadlines are recorded when a response reports an exhausted window and
/// consumed when the next request is about to be issued.
#[derive(Debug, Default)]
pub struct RateLimitState {
    global_sleep_until: Option<Instant>,
    credential_sleep_until: HashMap<String, Instant>,
    last_completed: Option<Instant>,
}

impl RateLimitState {
    /// Create empty bookkeeping: the first request goes out immediately.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of a completed request.
    ///
    /// Only families that honour headers keep deadlines; the others just
    /// note the completion time their floor is measured from. When the
    /// response reports `Ratelimit-Remaining: 0` with a usable
    /// reset/date pair, the window's reset becomes a deadline: under the
    /// request's credential if the window is the per-credential tier and the
    /// request carried one, otherwise for the whole bucket.
    ///
    /// Returns the delay that was recorded, if any. A reset too far out to
    /// represent as a deadline is ignored.
    #[instrument(skip(self, headers, credential))]
    pub fn record(
        &mut self,
        family: BucketFamily,
        headers: &RateLimitHeaders,
        credential: Option<&str>,
        per_credential_limit: u32,
    ) -> Option<Duration> {
        let now = Instant::now();
        self.last_completed = Some(now);

        if !family.honours_headers() || !headers.is_exhausted() {
            return None;
        }
        let delay = headers.reset_delay()?;
        let deadline = now.checked_add(delay)?;

        match credential {
            Some(token) if headers.is_per_credential_tier(per_credential_limit) => {
                debug!(delay_secs = delay.as_secs(), "Credential window exhausted");
                self.credential_sleep_until.insert(token.to_string(), deadline);
            }
            _ => {
                debug!(delay_secs = delay.as_secs(), "Bucket window exhausted");
                self.global_sleep_until = Some(deadline);
            }
        }
        Some(delay)
    }

    /// Compute, and consume, the deadline the next request must wait for.
    ///
    /// - `PerCredential`: the next request's credential deadline if one is
    ///   stored, else the bucket deadline.
    /// - `StrictSerial` / `FixedFloor`: `floor` after the previous completion.
    ///
    /// Returns `None` when the next request may go out immediately.
    #[instrument(skip(self, next_credential))]
    pub fn take_cooldown(
        &mut self,
        family: BucketFamily,
        next_credential: Option<&str>,
        floor: Duration,
    ) -> Option<Instant> {
        let deadline = match family {
            BucketFamily::PerCredential => {
                let credential_deadline =
                    next_credential.and_then(|token| self.credential_sleep_until.remove(token));
                credential_deadline.or_else(|| self.global_sleep_until.take())
            }
            BucketFamily::StrictSerial | BucketFamily::FixedFloor => {
                self.last_completed.map(|completed| completed + floor)
            }
        };

        deadline.filter(|deadline| *deadline > Instant::now())
    }

    /// The bucket-wide deadline, if one is pending.
    pub fn global_sleep_until(&self) -> Option<Instant> {
        self.global_sleep_until
    }

    /// The deadline pending for `credential`, if any.
    pub fn credential_sleep_until(&self, credential: &str) -> Option<Instant> {
        self.credential_sleep_until.get(credential).copied()
    }
}
