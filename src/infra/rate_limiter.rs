use crate::app::ports::RateLimiterPort;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

/// Token bucket over requests per minute, shared by all fetch tasks.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    requests_per_min: Option<u64>,
    // tokens left and time of the last refill
    bucket: Mutex<(f64, Instant)>,
}

impl RateLimiter {
    /// `None` or `Some(0)` never waits.
    pub fn new(requests_per_min: Option<u64>) -> Self {
        let capacity = requests_per_min.unwrap_or(0) as f64;
        Self {
            inner: Arc::new(Inner {
                requests_per_min,
                bucket: Mutex::new((capacity, Instant::now())),
            }),
        }
    }

    pub fn unlimited() -> Self {
        Self::new(None)
    }

    pub async fn acquire(&self) {
        let Some(rpm) = self.inner.requests_per_min.filter(|rpm| *rpm > 0) else {
            return;
        };
        let capacity = rpm as f64;
        let refill_rate = capacity / 60.0; // tokens per second

        loop {
            let mut guard = self.inner.bucket.lock().await;
            let (ref mut tokens, ref mut last) = *guard;
            let now = Instant::now();
            *tokens = (*tokens + now.duration_since(*last).as_secs_f64() * refill_rate).min(capacity);
            *last = now;
            if *tokens >= 1.0 {
                *tokens -= 1.0;
                return;
            }
            let wait = (1.0 - *tokens) / refill_rate;
            drop(guard);
            tokio::time::sleep(Duration::from_secs_f64(wait.max(0.001))).await;
        }
    }
}

#[async_trait]
impl RateLimiterPort for RateLimiter {
    async fn acquire(&self) {
        RateLimiter::acquire(self).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unlimited_never_waits() {
        let limiter = RateLimiter::unlimited();
        let start = Instant::now();
        for _ in 0..100 {
            limiter.acquire().await;
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_waits_once_bucket_is_empty() {
        // 600 per minute refills one token every 100ms
        let limiter = RateLimiter::new(Some(600));
        {
            let mut bucket = limiter.inner.bucket.lock().await;
            bucket.0 = 0.0;
        }
        let start = Instant::now();
        limiter.acquire().await;
        assert!(start.elapsed() >= Duration::from_millis(80));
    }
}
