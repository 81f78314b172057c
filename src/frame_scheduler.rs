//! Frame pacing for self-throttling render functions.
//!
//! Effects share a single loop without a global frame rate: each one owns a
//! [`FrameThrottle`] and skips the frame if its own interval has not elapsed.

use embassy_time::{Duration, Instant};

/// Per-effect frame gate.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last_frame: Option<Instant>,
}

impl FrameThrottle {
    /// Create a new throttle that lets the first call through
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
        }
    }

    /// Minimum time between two frames
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    /// Change the interval without losing the last frame timestamp
    pub fn set_interval(&mut self, interval: Duration) {
        self.interval = interval;
    }

    /// Returns time since the previous frame if a new frame is due, and
    /// records `now` as the last frame.
    ///
    /// The first frame reports a zero delta.
    pub fn ready(&mut self, now: Instant) -> Option<Duration> {
        let delta = match self.last_frame {
            None => Duration::from_millis(0),
            Some(last) => {
                let elapsed = now.checked_duration_since(last)?;
                if elapsed < self.interval {
                    return None;
                }
                elapsed
            }
        };
        self.last_frame = Some(now);
        Some(delta)
    }

    /// Forget the last frame so the next call renders immediately
    pub fn reset(&mut self) {
        self.last_frame = None;
    }
}
