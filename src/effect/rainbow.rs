//! Rainbow sweep effect
//!
//! The base hue is a linear function of wall-clock time; pixels step through
//! the hue circle at a fixed rate from both strip ends.

use embassy_time::Duration;

use super::{Effect, RenderContext};
use crate::{
    bounds::center_of,
    color::{Hsv, Rgb, hsv2rgb, mirror_half},
    frame_scheduler::FrameThrottle,
};

const FRAME_INTERVAL: Duration = Duration::from_millis(10);
/// Milliseconds per base hue step
const DEFAULT_HUE_PERIOD_MS: u64 = 20;
/// Hue difference between neighbouring pixels
const DEFAULT_HUE_STEP: u8 = 3;

/// Rainbow sweep effect
#[derive(Debug, Clone)]
pub struct RainbowEffect {
    hue_period_ms: u64,
    hue_step: u8,
    saturation: u8,
    value: u8,
    throttle: FrameThrottle,
}

impl Default for RainbowEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl RainbowEffect {
    pub const fn new() -> Self {
        Self {
            hue_period_ms: DEFAULT_HUE_PERIOD_MS,
            hue_step: DEFAULT_HUE_STEP,
            saturation: 255,
            value: 255,
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }

    /// Base hue at `now_ms`
    #[allow(clippy::cast_possible_truncation)]
    pub const fn base_hue(&self, now_ms: u64) -> u8 {
        let period = if self.hue_period_ms == 0 {
            1
        } else {
            self.hue_period_ms
        };
        ((now_ms / period) % 256) as u8
    }
}

impl Effect for RainbowEffect {
    #[allow(clippy::cast_possible_truncation)]
    fn render(&mut self, ctx: &mut RenderContext, leds: &mut [Rgb]) {
        if leds.is_empty() || self.throttle.ready(ctx.now).is_none() {
            return;
        }

        let base = self.base_hue(ctx.now.as_millis());
        let half = center_of(leds);
        for (i, led) in leds.iter_mut().take(half).enumerate() {
            let hue = base.wrapping_add((i as u8).wrapping_mul(self.hue_step));
            *led = hsv2rgb(Hsv {
                hue,
                sat: self.saturation,
                val: self.value,
            });
        }
        mirror_half(leds);
    }

    fn reset(&mut self) {
        self.throttle.reset();
    }
}
