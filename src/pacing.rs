//! Minimum-interval pacing gate for a single provider instance.
//!
//! Unlike `gleif-rs`'s sliding-window [`Throttler`](https://docs.rs/gleif-rs),
//! each provider here enforces a strict `60 / rpm` seconds between the
//! *start* of one paced call and the start of the next, matching
//! `providers/uspto.py::_pace` / `providers/epo.py::_pace`'s
//! `time.monotonic()` gate exactly. One `Throttler` belongs to exactly one
//! provider instance and is never shared.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::time::sleep;

/// Enforces a minimum interval between successive paced calls.
pub struct Throttler {
    state: Mutex<ThrottlerState>,
}

struct ThrottlerState {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Throttler {
    /// Build a throttler gating calls to at most `rpm` requests per minute.
    /// `rpm` is clamped to at least 1, matching `_set_rpm`'s `max(1, rpm)`.
    #[must_use]
    pub fn new(rpm: u32) -> Self {
        Self {
            state: Mutex::new(ThrottlerState {
                min_interval: Self::interval_for(rpm),
                last_call: None,
            }),
        }
    }

    fn interval_for(rpm: u32) -> Duration {
        let rpm = rpm.max(1);
        Duration::from_secs_f64(60.0 / f64::from(rpm))
    }

    /// Change the pacing rate; takes effect on the next call.
    pub async fn set_rpm(&self, rpm: u32) {
        let mut state = self.state.lock().await;
        state.min_interval = Self::interval_for(rpm);
    }

    /// Block until at least one minimum interval has elapsed since the last
    /// call, then record the new call time.
    pub async fn wait(&self) {
        let mut state = self.state.lock().await;
        let now = Instant::now();
        if let Some(last) = state.last_call {
            let elapsed = now.duration_since(last);
            if elapsed < state.min_interval {
                sleep(state.min_interval - elapsed).await;
            }
        }
        state.last_call = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_call_never_waits() {
        let t = Throttler::new(600);
        let start = Instant::now();
        t.wait().await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn second_call_waits_out_the_minimum_interval() {
        let t = Throttler::new(6000);
        t.wait().await;
        let start = Instant::now();
        t.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(9));
    }

    #[tokio::test]
    async fn set_rpm_changes_future_intervals() {
        let t = Throttler::new(1);
        t.set_rpm(6000).await;
        t.wait().await;
        let start = Instant::now();
        t.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
