//! Supply budget limiter.
//!
//! Estimates the strip current from the frame content and lowers the output
//! brightness until the estimate fits the configured budget.

use crate::color::Rgb;

// Full-on draw per channel in milliwatts (5 V supply)
const RED_MW: u32 = 16 * 5;
const GREEN_MW: u32 = 11 * 5;
const BLUE_MW: u32 = 15 * 5;
// Idle draw of a single pixel
const DARK_MW: u32 = 5;

/// Power limiter for a fixed milliwatt budget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PowerLimiter {
    budget_mw: u32,
}

impl PowerLimiter {
    pub const fn new(budget_mw: u32) -> Self {
        Self { budget_mw }
    }

    /// Estimated draw of `frame` at full brightness
    #[allow(clippy::cast_possible_truncation)]
    pub fn full_power_mw(frame: &[Rgb]) -> u32 {
        let channels: u32 = frame
            .iter()
            .map(|p| u32::from(p.r) * RED_MW + u32::from(p.g) * GREEN_MW + u32::from(p.b) * BLUE_MW)
            .sum();
        (channels >> 8) + DARK_MW * frame.len() as u32
    }

    /// Highest brightness not above `brightness` that keeps `frame` within
    /// the budget
    #[allow(clippy::cast_possible_truncation)]
    pub fn limit(self, frame: &[Rgb], brightness: u8) -> u8 {
        let requested = Self::full_power_mw(frame) * u32::from(brightness) / 256;
        if requested <= self.budget_mw || requested == 0 {
            return brightness;
        }
        (u32::from(brightness) * self.budget_mw / requested) as u8
    }
}
