//! Fire effect
//!
//! One-dimensional heat simulation rendered from both strip ends towards the
//! center. All heat arithmetic saturates, so cells never wrap around.

use embassy_time::Duration;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::{Effect, RenderContext};
use crate::{
    bounds::center_of,
    color::{Rgb, heat_color, mirror_half},
    frame_scheduler::FrameThrottle,
};

const FRAME_INTERVAL: Duration = Duration::from_millis(30);

/// How much the cells cool down per frame (higher = shorter flames)
const COOLING: usize = 100;
/// Chance (out of 256) of an extra spark per frame
const SPARKING: u8 = 120;

/// Cells at the origin that are reheated every frame and never diffuse
const EMBER_CELLS: usize = 2;
const EMBER_HEAT_MIN: u8 = 120;
const EMBER_HEAT_MAX: u8 = 200;

/// Sparks land in this many cells closest to the origin
const SPARK_ZONE: usize = 7;
const SPARK_HEAT_MIN: u8 = 160;

/// Fire effect with its heat field
///
/// `N` is the strip length; only the first half of the field is simulated.
#[derive(Debug, Clone)]
pub struct FireEffect<const N: usize> {
    heat: [u8; N],
    rng: SmallRng,
    throttle: FrameThrottle,
}

impl<const N: usize> FireEffect<N> {
    pub fn new(seed: u64) -> Self {
        Self {
            heat: [0; N],
            rng: SmallRng::seed_from_u64(seed),
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }

    /// Current heat field (first half of the strip)
    pub fn heat(&self) -> &[u8] {
        &self.heat[..center_of(&self.heat)]
    }

    /// Advance the simulation by one frame
    pub fn step(&mut self) {
        let len = center_of(&self.heat);
        if len == 0 {
            return;
        }
        let heat = &mut self.heat[..len];

        // Embers keep the base of the flame alive
        for cell in heat.iter_mut().take(EMBER_CELLS) {
            let ember = self.rng.gen_range(EMBER_HEAT_MIN..=EMBER_HEAT_MAX);
            *cell = cell.saturating_add(ember);
        }

        let max_cooling = cooling_limit(N);
        for cell in heat.iter_mut() {
            let cooldown = self.rng.gen_range(0..=max_cooling);
            *cell = cell.saturating_sub(cooldown);
        }

        // Heat drifts away from the origin and diffuses a little
        for k in (2..len).rev() {
            let sum = u16::from(heat[k - 1]) + 2 * u16::from(heat[k - 2]);
            heat[k] = u8::try_from(sum / 3).unwrap_or(u8::MAX);
        }

        if self.rng.r#gen::<u8>() < SPARKING {
            let y = self.rng.gen_range(0..SPARK_ZONE.min(len));
            let spark = self.rng.gen_range(SPARK_HEAT_MIN..=u8::MAX);
            heat[y] = heat[y].saturating_add(spark);
        }
    }
}

/// Upper bound of the per-frame cooldown for a strip of `led_count` pixels
fn cooling_limit(led_count: usize) -> u8 {
    let limit = (COOLING * 10) / led_count.max(1) + 2;
    u8::try_from(limit).unwrap_or(u8::MAX)
}

impl<const N: usize> Effect for FireEffect<N> {
    fn render(&mut self, ctx: &mut RenderContext, leds: &mut [Rgb]) {
        if self.throttle.ready(ctx.now).is_none() {
            return;
        }
        self.step();

        let half = center_of(leds).min(center_of(&self.heat));
        for (led, heat) in leds.iter_mut().zip(&self.heat[..half]) {
            *led = heat_color(*heat);
        }
        mirror_half(leds);
    }

    fn reset(&mut self) {
        self.throttle.reset();
    }
}
