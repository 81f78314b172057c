use crate::color::{Rgb, blend_colors};

/// Evenly spaced color stops sampled with linear blending
#[derive(Debug, Clone, Copy)]
pub struct Palette<const N: usize> {
    stops: [Rgb; N],
}

impl<const N: usize> Palette<N> {
    pub const fn new(stops: [Rgb; N]) -> Self {
        Self { stops }
    }

    /// Sample the palette at position t (0-255)
    #[allow(clippy::cast_possible_truncation)]
    pub fn sample(&self, t: u8) -> Rgb {
        let segments = N.saturating_sub(1);
        if segments == 0 {
            return self.stops.first().copied().unwrap_or_default();
        }

        let scaled = u32::from(t) * (segments as u32);
        let segment = ((scaled >> 8) as usize).min(segments - 1);
        let local_t = (scaled & 0xFF) as u8;

        blend_colors(self.stops[segment], self.stops[segment + 1], local_t)
    }
}
