use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{sleep_until, Instant};

/// Fixed-interval request throttle.
///
/// Every caller of `wait` is handed the next free slot, at least `delay`
/// after the previous one, and sleeps until it. The first slot is immediate.
pub struct Throttle {
    delay: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            last: Mutex::new(None),
        }
    }

    pub async fn wait(&self) {
        let slot = {
            let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
            let now = Instant::now();
            let slot = match *last {
                Some(prev) => (prev + self.delay).max(now),
                None => now,
            };
            *last = Some(slot);
            slot
        };
        sleep_until(slot).await;
    }
}
