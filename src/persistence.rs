//! Durable storage of the selected effect and brightness.
//!
//! Two byte slots hold the configuration. Writes are batched by the
//! [`PersistenceGate`]: a change only marks the configuration dirty, and the
//! commit waits until both buttons have been idle for the settle interval.

use embassy_time::{Duration, Instant};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{button::GestureClassifier, filter::BrightnessRange};

/// Storage address of the effect index
pub const EFFECT_INDEX_ADDRESS: u8 = 0;
/// Storage address of the brightness
pub const BRIGHTNESS_ADDRESS: u8 = 1;

/// Byte-addressable durable storage
///
/// No transactional guarantee and no wear-leveling are expected; the caller
/// keeps the write frequency low.
pub trait ConfigStorage {
    type Error;

    fn read(&mut self, address: u8) -> Result<u8, Self::Error>;
    fn write(&mut self, address: u8, value: u8) -> Result<(), Self::Error>;
}

/// Adapter for `embedded-storage` devices (EEPROM, emulated flash)
#[derive(Debug)]
pub struct EmbeddedStorage<S>(pub S);

impl<S: embedded_storage::Storage> ConfigStorage for EmbeddedStorage<S> {
    type Error = S::Error;

    fn read(&mut self, address: u8) -> Result<u8, Self::Error> {
        let mut byte = [0u8; 1];
        self.0.read(u32::from(address), &mut byte)?;
        Ok(byte[0])
    }

    fn write(&mut self, address: u8, value: u8) -> Result<(), Self::Error> {
        self.0.write(u32::from(address), &[value])
    }
}

/// Error type for the persistence operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PersistenceError {
    /// The storage driver reported a failure
    Driver,
}

/// Configuration kept across reboots and sleep
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistentConfig {
    pub effect_index: u8,
    pub brightness: u8,
}

impl PersistentConfig {
    /// Bring stored values into range
    ///
    /// Garbage in storage degrades to some valid effect instead of an
    /// out-of-bounds selection.
    #[allow(clippy::cast_possible_truncation)]
    pub fn sanitized(self, effect_count: usize, range: BrightnessRange) -> Self {
        let effect_index = usize::from(self.effect_index) % effect_count.max(1);
        Self {
            effect_index: effect_index as u8,
            brightness: range.clamp(self.brightness),
        }
    }

    /// Read and sanitize the configuration
    pub fn load<S: ConfigStorage>(
        storage: &mut S,
        effect_count: usize,
        range: BrightnessRange,
    ) -> Result<Self, PersistenceError> {
        let effect_index = storage
            .read(EFFECT_INDEX_ADDRESS)
            .map_err(|_| PersistenceError::Driver)?;
        let brightness = storage
            .read(BRIGHTNESS_ADDRESS)
            .map_err(|_| PersistenceError::Driver)?;

        Ok(Self {
            effect_index,
            brightness,
        }
        .sanitized(effect_count, range))
    }

    /// Write the configuration, skipping bytes that already match
    pub fn save<S: ConfigStorage>(self, storage: &mut S) -> Result<(), PersistenceError> {
        for (address, value) in [
            (EFFECT_INDEX_ADDRESS, self.effect_index),
            (BRIGHTNESS_ADDRESS, self.brightness),
        ] {
            let stored = storage.read(address).map_err(|_| PersistenceError::Driver)?;
            if stored != value {
                storage
                    .write(address, value)
                    .map_err(|_| PersistenceError::Driver)?;
            }
        }
        Ok(())
    }
}

/// Debounced commit of configuration changes
#[derive(Debug, Clone)]
pub struct PersistenceGate {
    settle: Duration,
    pending: bool,
}

impl PersistenceGate {
    pub const fn new(settle: Duration) -> Self {
        Self {
            settle,
            pending: false,
        }
    }

    /// Flag the configuration as changed
    pub fn mark_dirty(&mut self) {
        self.pending = true;
    }

    /// Drop a pending change, e.g. after the configuration was reloaded
    pub fn discard(&mut self) {
        self.pending = false;
    }

    pub const fn is_pending(&self) -> bool {
        self.pending
    }

    /// Check whether both buttons have been released long enough
    pub fn is_settled(&self, buttons: [&GestureClassifier; 2], now: Instant) -> bool {
        buttons
            .iter()
            .all(|button| button.released_for(now).is_some_and(|idle| idle >= self.settle))
    }

    /// Commit `config` if a change is pending and the buttons settled
    ///
    /// Returns true if a commit was attempted. The pending flag is cleared
    /// even if the write failed; the next change retries.
    pub fn poll<S: ConfigStorage>(
        &mut self,
        storage: &mut S,
        config: PersistentConfig,
        buttons: [&GestureClassifier; 2],
        now: Instant,
    ) -> Result<bool, PersistenceError> {
        if !self.pending || !self.is_settled(buttons, now) {
            return Ok(false);
        }
        self.pending = false;

        #[cfg(feature = "esp32-log")]
        println!(
            "[PersistenceGate.poll] committing effect {} brightness {}",
            config.effect_index, config.brightness
        );
        config.save(storage).map(|()| true)
    }
}
