use crate::{color::Rgb, math8::scale8_video};

/// Map a heat value to a black -> red -> yellow -> white ramp
///
/// The heat range is squeezed into 0-191 and split into three 64-step
/// sections; the low six bits drive the ramp inside each section.
pub const fn heat_color(temperature: u8) -> Rgb {
    let t192 = scale8_video(temperature, 191);
    let ramp = (t192 & 0x3F) << 2;

    if t192 & 0x80 != 0 {
        Rgb {
            r: 255,
            g: 255,
            b: ramp,
        }
    } else if t192 & 0x40 != 0 {
        Rgb {
            r: 255,
            g: ramp,
            b: 0,
        }
    } else {
        Rgb { r: ramp, g: 0, b: 0 }
    }
}
