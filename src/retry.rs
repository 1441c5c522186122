//! Search with retry and backoff.
//!
//! Rate-limit responses are waited out for exactly the server-provided
//! `Retry-After` and do not count as attempts, so a server that keeps
//! answering 429 can stall a search indefinitely. Other retryable failures
//! back off exponentially with random jitter up to `max_attempts`.

use std::time::Duration;

use tokio::time::sleep;

use crate::{
    events::{EventSink, PipelineEvent},
    spotify::{CatalogService, SpotifyError},
    types::Track,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    /// Delay before the first retry; doubled after every failed attempt.
    pub base_backoff: Duration,
    /// Upper bound (exclusive) of the random jitter added to each backoff.
    pub max_jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_backoff: Duration::from_secs(1),
            max_jitter: Duration::from_secs(1),
        }
    }
}

impl RetryPolicy {
    fn jitter(&self) -> Duration {
        if self.max_jitter.is_zero() {
            return Duration::ZERO;
        }
        self.max_jitter.mul_f64(rand::random::<f64>())
    }
}

/// Runs a track search, retrying according to `policy`.
///
/// # Errors
///
/// Returns the last error once the attempts are exhausted, or immediately
/// for errors that retrying cannot fix (`Fatal`, `Auth`).
pub async fn search_with_retry<C>(
    catalog: &C,
    query: &str,
    limit: u32,
    policy: &RetryPolicy,
    sink: &dyn EventSink,
) -> Result<Vec<Track>, SpotifyError>
where
    C: CatalogService + ?Sized,
{
    let mut attempt = 1;
    let mut backoff = policy.base_backoff;

    loop {
        match catalog.search_tracks(query, limit).await {
            Ok(items) => return Ok(items),
            Err(SpotifyError::RateLimited { retry_after }) => {
                sink.emit(PipelineEvent::RateLimited { retry_after });
                sleep(Duration::from_secs(retry_after)).await;
            }
            Err(error) if error.is_retryable() && attempt < policy.max_attempts => {
                let delay = backoff + policy.jitter();
                sink.emit(PipelineEvent::Retrying {
                    attempt,
                    max_attempts: policy.max_attempts,
                    delay,
                    error,
                });
                sleep(delay).await;
                backoff *= 2;
                attempt += 1;
            }
            Err(error) => return Err(error),
        }
    }
}
