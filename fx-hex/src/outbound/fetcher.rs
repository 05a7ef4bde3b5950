//! Bounded retry over the upstream transport.

use std::time::Duration;

use tracing::{debug, warn};

use fx_types::{UpstreamOutcome, UpstreamTransport};

/// Retries non-success responses a bounded number of times.
///
/// Transport faults are reported straight away; only HTTP responses with a
/// non-success status are retried.
pub struct RetryingFetcher<T: UpstreamTransport> {
    transport: T,
    max_retries: u32,
    delay: Duration,
}

impl<T: UpstreamTransport> RetryingFetcher<T> {
    pub const DEFAULT_MAX_RETRIES: u32 = 3;

    pub fn new(transport: T) -> Self {
        Self {
            transport,
            max_retries: Self::DEFAULT_MAX_RETRIES,
            delay: Duration::ZERO,
        }
    }

    /// Total attempts per fetch. Zero still makes a single attempt.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Pause between attempts.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// GETs `url`, returning the classification of the last response.
    pub async fn fetch(&self, url: &str) -> UpstreamOutcome {
        let attempts = self.max_retries.max(1);
        let mut attempt = 1;
        loop {
            let response = match self.transport.get(url).await {
                Ok(response) => response,
                Err(e) => {
                    warn!(url, attempt, error = %e, "Upstream transport fault");
                    return UpstreamOutcome::TransportFault(e.to_string());
                }
            };

            if response.is_success() {
                debug!(url, attempt, "Upstream request succeeded");
                return response.into_outcome();
            }

            if attempt >= attempts {
                warn!(url, attempt, status = response.status, "Upstream retries exhausted");
                return response.into_outcome();
            }

            warn!(
                url,
                attempt,
                status = response.status,
                "Upstream returned non-success status, retrying"
            );
            attempt += 1;
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
        }
    }
}
