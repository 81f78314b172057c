use crate::{
    color::Rgb,
    math8::{blend8, scale8},
};

/// Mirror the first half of the array around the center
pub fn mirror_half(leds: &mut [Rgb]) {
    if leds.is_empty() {
        return;
    }
    let leds_len = leds.len();
    let center = crate::bounds::center_of(leds);
    for i in 0..center {
        let mirrored = leds_len - 1 - i;
        leds[mirrored] = leds[i];
    }
}

/// Blend two RGB colors
///
/// # Arguments
/// * `a` - First color
/// * `b` - Second color
/// * `amount_of_b` - Blend factor (0 = all a, 255 = all b)
#[inline]
pub fn blend_colors(a: Rgb, b: Rgb, amount_of_b: u8) -> Rgb {
    Rgb {
        r: blend8(a.r, b.r, amount_of_b),
        g: blend8(a.g, b.g, amount_of_b),
        b: blend8(a.b, b.b, amount_of_b),
    }
}

/// Add two colors channel-wise, clamping at 255
#[inline]
pub fn add_colors(a: Rgb, b: Rgb) -> Rgb {
    Rgb {
        r: a.r.saturating_add(b.r),
        g: a.g.saturating_add(b.g),
        b: a.b.saturating_add(b.b),
    }
}

/// Scale all channels of a color
#[inline]
pub fn scale_color(color: Rgb, scale: u8) -> Rgb {
    Rgb {
        r: scale8(color.r, scale),
        g: scale8(color.g, scale),
        b: scale8(color.b, scale),
    }
}

/// Perceived brightness (0-255), weighted towards green
#[allow(clippy::cast_possible_truncation)]
pub fn luma(color: Rgb) -> u8 {
    ((u16::from(color.r) * 54 + u16::from(color.g) * 183 + u16::from(color.b) * 19) >> 8) as u8
}

/// Fill every pixel with one color
pub fn fill(leds: &mut [Rgb], color: Rgb) {
    for led in leds {
        *led = color;
    }
}

/// Create an RGB color from a u32 value (0xRRGGBB format)
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}
