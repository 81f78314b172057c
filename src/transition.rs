//! Time-based value fades.
//!
//! The output stage keeps its brightness in a [`ValueTransition`], which is
//! how the strip fades back in after waking up.

use embassy_time::{Duration, Instant};

use crate::math8::{blend8, progress8};

/// Blends two values of type `T` using a progress value (0-255)
pub type ValueBlender<T> = fn(T, T, u8) -> T;

/// Time-based transition between two values of type `T`
#[derive(Debug, Clone)]
pub struct ValueTransition<T: Copy> {
    /// Mixes `source` and `target` for a given progress
    blend: ValueBlender<T>,
    /// Value seen by the caller right now
    current: T,
    /// Where the running fade started from
    source: T,
    /// Target value (None if no transition in progress)
    target: Option<T>,
    /// Length of the running fade
    duration: Duration,
    start_time: Instant,
}

impl<T: Copy> ValueTransition<T> {
    /// Create an idle transition resting at `initial`
    pub const fn new(initial: T, blend: ValueBlender<T>) -> Self {
        Self {
            blend,
            current: initial,
            source: initial,
            target: None,
            duration: Duration::from_millis(0),
            start_time: Instant::from_millis(0),
        }
    }

    /// Value at the last tick
    pub const fn current(&self) -> T {
        self.current
    }

    /// Check whether a fade is still running
    pub const fn is_transitioning(&self) -> bool {
        self.target.is_some()
    }

    /// Start moving towards `value`
    ///
    /// The fade begins at the current value, so retargeting mid-fade does not
    /// jump. A zero duration applies `value` immediately.
    pub fn set(&mut self, value: T, duration: Duration, start_time: Instant) {
        self.start_time = start_time;
        self.duration = duration;
        if duration.as_millis() == 0 {
            self.jump(value);
        } else {
            self.source = self.current;
            self.target = Some(value);
        }
    }

    /// Jump to `value`, cancelling any transition in progress
    pub fn jump(&mut self, value: T) {
        self.current = value;
        self.source = value;
        self.target = None;
    }

    /// Advance the fade to `now`
    ///
    /// Call once per frame. A clock that reads earlier than the start of the
    /// fade counts as no progress.
    pub fn tick(&mut self, now: Instant) {
        let Some(target) = self.target else {
            return;
        };

        let elapsed = now
            .checked_duration_since(self.start_time)
            .unwrap_or(Duration::from_millis(0));
        if elapsed >= self.duration {
            self.jump(target);
            return;
        }

        let progress = progress8(elapsed, self.duration);
        self.current = (self.blend)(self.source, target, progress);
    }
}

impl ValueTransition<u8> {
    /// Brightness-style `u8` transition blended with [`blend8`]
    pub const fn new_u8(initial: u8) -> Self {
        Self::new(initial, blend8)
    }
}
