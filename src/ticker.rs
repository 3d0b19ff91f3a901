//! Cancellable fixed-period sleep between poll cycles.

use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Sleeps for a fixed period unless cancelled first.
#[derive(Debug, Clone, Copy)]
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    pub fn new(period: Duration) -> Self {
        Self { period }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Waits one full period. Returns `false` if `cancel` fired before the
    /// period elapsed.
    pub async fn wait(&self, cancel: &CancellationToken) -> bool {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => false,
            _ = tokio::time::sleep(self.period) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn waits_for_the_full_period() {
        let ticker = Ticker::new(Duration::from_secs(10));
        let token = CancellationToken::new();
        let start = tokio::time::Instant::now();

        assert!(ticker.wait(&token).await);
        assert!(start.elapsed() >= Duration::from_secs(10));
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_interrupts_wait() {
        let ticker = Ticker::new(Duration::from_secs(3600));
        let token = CancellationToken::new();

        let child = token.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(1)).await;
            child.cancel();
        });

        let start = tokio::time::Instant::now();
        assert!(!ticker.wait(&token).await);
        assert!(start.elapsed() < Duration::from_secs(3600));
    }

    #[tokio::test]
    async fn already_cancelled_returns_immediately() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(!Ticker::new(Duration::from_secs(60)).wait(&token).await);
    }
}
