use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::error::ChatError;

/// Process-wide limiter in front of the chat endpoint.
///
/// Tracks the theoretical arrival time of the next request: each accepted
/// request pushes it one emission interval (`1 / rps`) forward, and a request
/// is rejected while that time is more than a full burst of `rps` requests
/// ahead of now.
#[derive(Clone)]
pub struct RateLimiter {
    interval: Duration,
    tolerance: Duration,
    next_arrival: Arc<Mutex<Instant>>,
}

impl RateLimiter {
    /// `None` when `rps` is absent or zero (limiting disabled).
    pub fn new(rps: Option<u32>) -> Option<Self> {
        let rps = rps.filter(|&n| n > 0)?;
        let interval = Duration::from_secs(1) / rps;
        Some(Self {
            interval,
            tolerance: interval * (rps - 1),
            next_arrival: Arc::new(Mutex::new(Instant::now())),
        })
    }

    pub async fn check(&self) -> Result<(), ChatError> {
        let mut next_arrival = self.next_arrival.lock().await;
        let now = Instant::now();
        let arrival = (*next_arrival).max(now);
        let ahead = arrival - now;

        if ahead > self.tolerance {
            let wait = ahead - self.tolerance;
            return Err(ChatError::RateLimited {
                retry_after_ms: (wait.as_millis() as u64).max(1),
            });
        }

        *next_arrival = arrival + self.interval;
        Ok(())
    }
}
