//! Police chase effect
//!
//! Both halves of the strip travel towards the center one pixel per frame,
//! while the strip ends pulse red and blue on a beat matched to that travel.

use embassy_time::Duration;

use super::{Effect, RenderContext};
use crate::{bounds::center_of, color::Rgb, frame_scheduler::FrameThrottle, math8::sin8};

const FRAME_INTERVAL: Duration = Duration::from_millis(20);

/// Police chase effect
#[derive(Debug, Clone)]
pub struct PoliceChaseEffect {
    throttle: FrameThrottle,
}

impl Default for PoliceChaseEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl PoliceChaseEffect {
    pub const fn new() -> Self {
        Self {
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }

    /// Pulse intensity at `now_ms` for a strip whose half is `half_len` long
    ///
    /// One full sine period takes as long as a pixel needs to travel from the
    /// strip end to the center.
    #[allow(clippy::cast_possible_truncation)]
    fn pulse(now_ms: u64, half_len: usize) -> u8 {
        let period = FRAME_INTERVAL.as_millis() * (half_len.max(1) as u64);
        let phase = ((now_ms % period) * 256 / period) as u8;
        sin8(phase)
    }
}

/// Move every pixel of each half one step towards the center
fn shift_inward(leds: &mut [Rgb]) {
    let len = leds.len();
    let half = center_of(leds);
    if half < 2 {
        return;
    }
    leds.copy_within(0..half - 1, 1);
    let right_start = len - half;
    leds.copy_within(right_start + 1..len, right_start);
}

impl Effect for PoliceChaseEffect {
    fn render(&mut self, ctx: &mut RenderContext, leds: &mut [Rgb]) {
        if leds.is_empty() || self.throttle.ready(ctx.now).is_none() {
            return;
        }
        shift_inward(leds);

        let level = Self::pulse(ctx.now.as_millis(), center_of(leds));
        let last = leds.len() - 1;
        leds[0] = Rgb {
            r: level,
            g: 0,
            b: 0,
        };
        leds[last] = Rgb {
            r: 0,
            g: 0,
            b: 255 - level,
        };
    }

    fn reset(&mut self) {
        self.throttle.reset();
    }
}
