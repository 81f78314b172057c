//! 8-bit fixed-point helpers shared by effects and the output stage.

use embassy_time::Duration;

/// Scale an 8-bit value by a factor (0-255 = 0.0-1.0)
///
/// Uses integer math for efficiency on embedded systems.
#[inline]
#[allow(clippy::cast_lossless, clippy::cast_possible_truncation)]
pub const fn scale8(value: u8, scale: u8) -> u8 {
    ((value as u16 * (1 + scale as u16)) >> 8) as u8
}

/// Scale an 8-bit value, never dimming a non-zero value down to zero
#[inline]
pub const fn scale8_video(value: u8, scale: u8) -> u8 {
    let scaled = scale8(value, scale);
    if scaled == 0 && value != 0 && scale != 0 {
        1
    } else {
        scaled
    }
}

/// Blend two 8-bit values
#[inline]
#[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
pub const fn blend8(a: u8, b: u8, amount_of_b: u8) -> u8 {
    let delta = b as i16 - a as i16;

    let mut partial: u32 = (a as u32) << 16;
    partial = partial.wrapping_add(
        (delta as u32)
            .wrapping_mul(amount_of_b as u32)
            .wrapping_mul(257),
    );
    partial = partial.wrapping_add(0x8000);

    (partial >> 16) as u8
}

/// Calculate progress (0-255) based on elapsed time and duration
#[allow(clippy::cast_possible_truncation)]
#[inline]
pub const fn progress8(elapsed: Duration, duration: Duration) -> u8 {
    if duration.as_millis() == 0 {
        return 255;
    }
    if elapsed.as_millis() >= duration.as_millis() {
        return 255;
    }

    ((elapsed.as_millis() * 255) / duration.as_millis()) as u8
}

const SIN8_TABLE: [u8; 8] = [0, 49, 49, 41, 90, 27, 117, 10];

/// Piecewise-linear sine over a full 0-255 turn, returning 0-255 (128 = zero)
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn sin8(theta: u8) -> u8 {
    let mut offset = theta;
    if theta & 0x40 != 0 {
        offset = 255 - offset;
    }
    offset &= 0x3F;

    let mut secoffset = offset & 0x0F;
    if theta & 0x40 != 0 {
        secoffset += 1;
    }

    let section = (offset >> 4) as usize;
    let b = SIN8_TABLE[section * 2] as i16;
    let m16 = SIN8_TABLE[section * 2 + 1] as i16;

    let mut y = ((m16 * secoffset as i16) >> 4) + b;
    if theta & 0x80 != 0 {
        y = -y;
    }

    (y + 128) as u8
}
