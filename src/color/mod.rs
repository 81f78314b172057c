mod heat;
mod kelvin;
mod palette;
mod utils;

pub use heat::heat_color;
pub use kelvin::kelvin_to_rgb;
pub use palette::Palette;
use smart_leds::{RGB8, hsv::Hsv as HSV};
pub use smart_leds::hsv::hsv2rgb;
pub use utils::{add_colors, blend_colors, fill, luma, mirror_half, rgb_from_u32, scale_color};

pub type Rgb = RGB8;
pub type Hsv = HSV;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
