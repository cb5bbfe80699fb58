//! Minimum spacing between outgoing requests, shared by every worker.

use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct RateLimiter {
    gap: Duration,
    last: Mutex<Option<Instant>>,
}

impl RateLimiter {
    pub fn new(gap: Duration) -> Self {
        Self {
            gap,
            last: Mutex::new(None),
        }
    }

    pub fn gap(&self) -> Duration {
        self.gap
    }

    /// Block until at least `gap` has passed since the previous call
    /// returned. Callers are admitted one at a time.
    pub fn wait(&self) {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.gap {
                thread::sleep(self.gap - elapsed);
            }
        }
        *last = Some(Instant::now());
    }
}
