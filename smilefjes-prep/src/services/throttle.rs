//! Fixed post-call delay
//!
//! Outbound request rate is bounded by sleeping a fixed interval after every
//! external call. There is no adaptive backoff: a slow or failing service
//! still costs the full delay per attempt.

use std::time::Duration;

/// Sleep applied after each cache-miss lookup
#[derive(Debug, Clone, Copy)]
pub struct PostCallDelay {
    delay: Duration,
    service: &'static str,
}

impl PostCallDelay {
    pub fn new(service: &'static str, delay: Duration) -> Self {
        Self { delay, service }
    }

    pub fn from_millis(service: &'static str, delay_ms: u64) -> Self {
        Self::new(service, Duration::from_millis(delay_ms))
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Wait out the configured delay
    pub async fn wait(&self) {
        if self.delay.is_zero() {
            return;
        }
        tracing::trace!(service = self.service, "Throttling: waiting {:?}", self.delay);
        tokio::time::sleep(self.delay).await;
    }
}
