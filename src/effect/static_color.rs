//! Static color fill effect
//!
//! Fills all LEDs with a single solid color when the selection changes and
//! leaves the buffer alone on every other frame.

use super::{Effect, RenderContext};
use crate::color::{Rgb, fill, kelvin_to_rgb};

/// Color temperature of the cold white preset
pub const COLD_WHITE_KELVIN: u16 = 6500;
/// Color temperature of the warm white preset
pub const WARM_WHITE_KELVIN: u16 = 2700;

/// Static color effect - fills all LEDs with one color
#[derive(Debug, Clone)]
pub struct StaticColorEffect {
    color: Rgb,
}

impl StaticColorEffect {
    /// Create a new static color effect
    pub const fn new(color: Rgb) -> Self {
        Self { color }
    }

    /// Create a white preset from a color temperature
    pub fn from_kelvin(kelvin: u16) -> Self {
        Self::new(kelvin_to_rgb(kelvin))
    }

    pub const fn color(&self) -> Rgb {
        self.color
    }
}

impl Effect for StaticColorEffect {
    fn render(&mut self, ctx: &mut RenderContext, leds: &mut [Rgb]) {
        if !ctx.state_changed {
            return;
        }
        fill(leds, self.color);
    }
}
