//! Token bucket request limiting.
//!
//! A bucket holds up to `burst` tokens and refills at `rate` tokens per
//! second. Every allowed request takes one token. The server runs one bucket
//! over all traffic and a tighter one in front of image submission.

use std::sync::Mutex;
use std::time::{Duration, Instant};

pub const GLOBAL_RATE: f64 = 3.0;
pub const GLOBAL_BURST: u32 = 10;
pub const STORE_RATE: f64 = 1.0;
pub const STORE_BURST: u32 = 1;

#[derive(Debug, thiserror::Error)]
#[error("rate limit exceeded, retry in {retry_after:?}")]
pub struct RateLimited {
    pub retry_after: Duration,
}

struct Bucket {
    tokens: f64,
    last: Instant,
}

pub struct TokenBucket {
    rate: f64,
    burst: f64,
    bucket: Mutex<Bucket>,
}

impl TokenBucket {
    /// A full bucket.
    pub fn new(rate: f64, burst: u32) -> Self {
        Self::new_at(rate, burst, Instant::now())
    }

    pub fn new_at(rate: f64, burst: u32, now: Instant) -> Self {
        let burst = f64::from(burst);
        Self {
            rate,
            burst,
            bucket: Mutex::new(Bucket {
                tokens: burst,
                last: now,
            }),
        }
    }

    pub fn check(&self) -> Result<(), RateLimited> {
        self.check_at(Instant::now())
    }

    pub fn check_at(&self, now: Instant) -> Result<(), RateLimited> {
        let mut bucket = self
            .bucket
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let elapsed = now.saturating_duration_since(bucket.last);
        bucket.tokens = (bucket.tokens + elapsed.as_secs_f64() * self.rate).min(self.burst);
        bucket.last = bucket.last.max(now);
        if bucket.tokens < 1.0 {
            return Err(RateLimited {
                retry_after: self.wait_for_token(bucket.tokens),
            });
        }
        bucket.tokens -= 1.0;
        Ok(())
    }

    fn wait_for_token(&self, tokens: f64) -> Duration {
        if self.rate <= 0.0 {
            return Duration::MAX;
        }
        Duration::from_secs_f64((1.0 - tokens).max(0.0) / self.rate)
    }
}

#[cfg(test)]
#[path = "rate_limit_test.rs"]
mod tests;
