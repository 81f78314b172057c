//! `smart-leds` driver adapter.

use smart_leds::SmartLedsWrite;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{OutputDriver, color::Rgb};

/// Output driver for any [`SmartLedsWrite`] implementation
///
/// Transmission errors are dropped; the next frame is sent anyway.
#[derive(Debug)]
pub struct SmartLedsOutput<W>(pub W);

impl<W> OutputDriver for SmartLedsOutput<W>
where
    W: SmartLedsWrite,
    Rgb: Into<W::Color>,
{
    fn write(&mut self, colors: &[Rgb]) {
        if self.0.write(colors.iter().copied()).is_err() {
            #[cfg(feature = "esp32-log")]
            println!("[SmartLedsOutput.write] transmission failed");
        }
    }
}
