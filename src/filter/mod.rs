//! Output stage between the pixel buffer and the LED driver.
//!
//! The pixel buffer is never scaled in place: effects that shift or cache
//! their pixels need the full-range values on the next frame. The stage
//! copies the buffer, applies the global brightness and the power budget,
//! and hands the result to the driver.

mod brightness;
mod power;

use embassy_time::Instant;

pub use brightness::{BrightnessFilter, BrightnessRange};
pub use power::PowerLimiter;

use crate::{OutputDriver, color::Rgb};

/// Output stage with its scratch frame
#[derive(Debug, Clone)]
pub struct OutputStage<const N: usize> {
    frame: [Rgb; N],
    pub brightness: BrightnessFilter,
    pub power: PowerLimiter,
}

impl<const N: usize> OutputStage<N> {
    pub const fn new(brightness: u8, power_budget_mw: u32) -> Self {
        Self {
            frame: [Rgb { r: 0, g: 0, b: 0 }; N],
            brightness: BrightnessFilter::new(brightness),
            power: PowerLimiter::new(power_budget_mw),
        }
    }

    /// Prepare `leds` for transmission and return the final frame
    pub fn process(&mut self, leds: &[Rgb; N], now: Instant) -> &[Rgb] {
        self.brightness.tick(now);
        self.frame = *leds;

        let level = self.power.limit(&self.frame, self.brightness.current());
        brightness::apply_level(&mut self.frame, level);

        &self.frame
    }

    /// Process `leds` and write them to `driver`
    pub fn flush<D: OutputDriver>(&mut self, driver: &mut D, leds: &[Rgb; N], now: Instant) {
        let frame = self.process(leds, now);
        driver.write(frame);
    }
}
