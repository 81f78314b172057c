//! Global brightness with floor/ceiling limits and smooth fades.

use embassy_time::{Duration, Instant};

use crate::{color::Rgb, math8::scale8, transition::ValueTransition};

/// Allowed range of the user brightness
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrightnessRange {
    floor: u8,
    ceiling: u8,
}

impl BrightnessRange {
    /// Create a range; a floor above the ceiling is lowered to the ceiling
    pub const fn new(floor: u8, ceiling: u8) -> Self {
        let floor = if floor > ceiling { ceiling } else { floor };
        Self { floor, ceiling }
    }

    pub const fn floor(self) -> u8 {
        self.floor
    }

    pub const fn ceiling(self) -> u8 {
        self.ceiling
    }

    /// Lower the ceiling; never raises it
    pub fn lower_ceiling(&mut self, ceiling: u8) {
        self.ceiling = self.ceiling.min(ceiling);
        self.floor = self.floor.min(self.ceiling);
    }

    pub const fn clamp(self, value: u8) -> u8 {
        if value < self.floor {
            self.floor
        } else if value > self.ceiling {
            self.ceiling
        } else {
            value
        }
    }

    /// One step brighter, saturating at the ceiling
    pub const fn step_up(self, value: u8, step: u8) -> u8 {
        self.clamp(value.saturating_add(step))
    }

    /// One step dimmer, saturating at the floor
    pub const fn step_down(self, value: u8, step: u8) -> u8 {
        self.clamp(value.saturating_sub(step))
    }
}

/// Output brightness with transition support
#[derive(Debug, Clone)]
pub struct BrightnessFilter {
    level: ValueTransition<u8>,
}

impl BrightnessFilter {
    pub const fn new(brightness: u8) -> Self {
        Self {
            level: ValueTransition::new_u8(brightness),
        }
    }

    /// Current output level
    pub const fn current(&self) -> u8 {
        self.level.current()
    }

    /// Set brightness, fading over `duration`
    pub fn set(&mut self, brightness: u8, duration: Duration, now: Instant) {
        self.level.set(brightness, duration, now);
    }

    /// Set brightness immediately
    pub fn jump(&mut self, brightness: u8) {
        self.level.jump(brightness);
    }

    pub const fn is_transitioning(&self) -> bool {
        self.level.is_transitioning()
    }

    pub fn tick(&mut self, now: Instant) {
        self.level.tick(now);
    }
}

/// Scale every pixel of a frame by `level`
pub(crate) fn apply_level(frame: &mut [Rgb], level: u8) {
    if level == 255 {
        return;
    }
    for pixel in frame.iter_mut() {
        pixel.r = scale8(pixel.r, level);
        pixel.g = scale8(pixel.g, level);
        pixel.b = scale8(pixel.b, level);
    }
}
