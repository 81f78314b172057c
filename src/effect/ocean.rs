//! Ocean effect
//!
//! Four traveling sine layers sample a sea palette and are added on top of a
//! dim background. Each layer drifts at its own wobbling rate so the sum
//! never visibly repeats. Bright crests get whitecaps, then the result is
//! pushed towards deep blue.

use core::f32::consts::TAU;

use embassy_time::Duration;

use super::{Effect, RenderContext};
use crate::{
    color::{Palette, Rgb, add_colors, fill, luma, rgb_from_u32, scale_color},
    frame_scheduler::FrameThrottle,
    math8::scale8,
};

const FRAME_INTERVAL: Duration = Duration::from_millis(20);

/// Brightness ceiling applied the first time the ocean is shown.
///
/// Four additive layers on a long strip exceed the supply budget at full
/// brightness.
pub const OCEAN_BRIGHTNESS_CEILING: u8 = 160;

const BACKGROUND: Rgb = rgb_from_u32(0x00_02_08);
const FLOOR: Rgb = rgb_from_u32(0x00_01_04);

const PALETTE: Palette<5> = Palette::new([
    rgb_from_u32(0x00_04_18), // Abyss
    rgb_from_u32(0x00_18_50), // Deep blue
    rgb_from_u32(0x00_46_6e), // Teal
    rgb_from_u32(0x10_80_a0), // Shallow cyan
    rgb_from_u32(0x50_b4_c8), // Foam
]);

const WHITECAP_BASE: f32 = 150.0;
const WHITECAP_SWING: f32 = 30.0;
const WHITECAP_RATE: f32 = 0.37;

const DEEPEN_GREEN: u8 = 200;
const DEEPEN_BLUE: u8 = 240;

#[derive(Debug, Clone, Copy)]
struct WaveLayer {
    /// Current phase in radians
    phase: f32,
    /// Phase of the rate modulation in radians
    wobble_phase: f32,
    /// Mean phase speed in radians per second (sign sets travel direction)
    rate: f32,
    /// Relative depth of the rate modulation
    wobble_depth: f32,
    /// Speed of the rate modulation in radians per second
    wobble_rate: f32,
    /// Wave length in pixels
    wavelength: f32,
    /// Contribution of the layer to the composite
    weight: u8,
}

impl WaveLayer {
    const fn new(rate: f32, wobble_depth: f32, wobble_rate: f32, wavelength: f32, weight: u8) -> Self {
        Self {
            phase: 0.0,
            wobble_phase: 0.0,
            rate,
            wobble_depth,
            wobble_rate,
            wavelength,
            weight,
        }
    }

    fn advance(&mut self, delta_s: f32) {
        self.wobble_phase = libm::fmodf(self.wobble_phase + self.wobble_rate * delta_s, TAU);
        let wobble = 1.0 + self.wobble_depth * libm::sinf(self.wobble_phase);
        self.phase = libm::fmodf(self.phase + self.rate * wobble * delta_s, TAU);
    }

    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    fn paint(&self, leds: &mut [Rgb]) {
        let k = TAU / self.wavelength;
        for (i, led) in leds.iter_mut().enumerate() {
            let wave = libm::sinf(i as f32 * k - self.phase);
            let index = ((wave + 1.0) * 127.5).clamp(0.0, 255.0) as u8;
            let color = scale_color(PALETTE.sample(index), self.weight);
            *led = add_colors(*led, color);
        }
    }
}

/// Ocean effect state
#[derive(Debug, Clone)]
pub struct OceanEffect {
    layers: [WaveLayer; 4],
    /// Whitecap swing phase in radians
    whitecap_phase: f32,
    ceiling_applied: bool,
    throttle: FrameThrottle,
}

impl Default for OceanEffect {
    fn default() -> Self {
        Self::new()
    }
}

impl OceanEffect {
    pub const fn new() -> Self {
        Self {
            layers: [
                WaveLayer::new(0.9, 0.35, 0.21, 41.0, 110),
                WaveLayer::new(-1.3, 0.25, 0.33, 23.0, 80),
                WaveLayer::new(0.55, 0.5, 0.13, 67.0, 70),
                WaveLayer::new(-2.1, 0.2, 0.57, 13.0, 45),
            ],
            whitecap_phase: 0.0,
            ceiling_applied: false,
            throttle: FrameThrottle::new(FRAME_INTERVAL),
        }
    }

    /// Current layer phases in radians
    pub fn phases(&self) -> [f32; 4] {
        self.layers.map(|layer| layer.phase)
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn whitecap_threshold(&self) -> u8 {
        let swing = WHITECAP_SWING * libm::sinf(self.whitecap_phase);
        (WHITECAP_BASE + swing).clamp(0.0, 255.0) as u8
    }
}

fn add_whitecaps(leds: &mut [Rgb], threshold: u8) {
    for led in leds.iter_mut() {
        let level = luma(*led);
        if level <= threshold {
            continue;
        }
        let boost = (level - threshold).saturating_mul(2);
        *led = add_colors(
            *led,
            Rgb {
                r: boost / 2,
                g: boost,
                b: boost,
            },
        );
    }
}

fn deepen(leds: &mut [Rgb]) {
    for led in leds.iter_mut() {
        led.g = scale8(led.g, DEEPEN_GREEN);
        led.b = scale8(led.b, DEEPEN_BLUE);
        led.r |= FLOOR.r;
        led.g |= FLOOR.g;
        led.b |= FLOOR.b;
    }
}

impl Effect for OceanEffect {
    #[allow(clippy::cast_precision_loss)]
    fn render(&mut self, ctx: &mut RenderContext, leds: &mut [Rgb]) {
        if !self.ceiling_applied {
            ctx.brightness_ceiling = ctx.brightness_ceiling.min(OCEAN_BRIGHTNESS_CEILING);
            self.ceiling_applied = true;
        }
        let Some(delta) = self.throttle.ready(ctx.now) else {
            return;
        };

        let delta_s = delta.as_millis() as f32 / 1000.0;
        self.whitecap_phase = libm::fmodf(self.whitecap_phase + WHITECAP_RATE * delta_s, TAU);
        for layer in &mut self.layers {
            layer.advance(delta_s);
        }

        fill(leds, BACKGROUND);
        for layer in &self.layers {
            layer.paint(leds);
        }
        add_whitecaps(leds, self.whitecap_threshold());
        deepen(leds);
    }

    fn reset(&mut self) {
        self.throttle.reset();
    }
}

#[cfg(test)]
mod tests {
    use embassy_time::Instant;

    use super::*;

    #[test]
    fn test_phases_stay_wrapped_over_long_uptime() {
        let mut ocean = OceanEffect::new();
        let mut leds = [Rgb::default(); 16];
        // Frames a day apart
        for day in 0..40_u64 {
            let now = Instant::from_secs(day * 86_400);
            ocean.render(&mut RenderContext::new(now, false, 255), &mut leds);
        }

        assert!((0.0..TAU).contains(&ocean.whitecap_phase));
        for layer in &ocean.layers {
            assert!(layer.phase.abs() < TAU);
            assert!((0.0..TAU).contains(&layer.wobble_phase));
        }
    }
}
