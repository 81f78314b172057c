//! Half-open pixel spans used by the mini-game and flash regions.

/// Pixel range `[begin, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    /// Empty span returned when two ranges do not intersect
    pub const EMPTY: Self = Self { begin: 0, end: 0 };

    pub const fn new(begin: usize, end: usize) -> Self {
        Self { begin, end }
    }

    /// Span of `len` pixels centered in a strip of `count` pixels
    pub const fn centered(count: usize, len: usize) -> Self {
        let len = if len > count { count } else { len };
        let begin = (count - len) / 2;
        Self {
            begin,
            end: begin + len,
        }
    }

    /// Number of pixels covered
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.begin)
    }

    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Check whether both spans share at least one pixel
    pub const fn intersects(self, other: Self) -> bool {
        !self.is_empty() && !other.is_empty() && self.begin < other.end && other.begin < self.end
    }

    /// Intersection of two spans, or [`Span::EMPTY`] if they are disjoint
    pub const fn overlap(self, other: Self) -> Self {
        if !self.intersects(other) {
            return Self::EMPTY;
        }
        let begin = if self.begin > other.begin {
            self.begin
        } else {
            other.begin
        };
        let end = if self.end < other.end {
            self.end
        } else {
            other.end
        };
        Self { begin, end }
    }

    /// Shift the span by one pixel in `direction`
    #[must_use]
    pub const fn shifted(self, direction: Direction) -> Self {
        match direction {
            Direction::Forward => Self {
                begin: self.begin + 1,
                end: self.end + 1,
            },
            Direction::Backward => Self {
                begin: self.begin.saturating_sub(1),
                end: self.end.saturating_sub(1),
            },
        }
    }

    /// Clip the span to a strip of `count` pixels
    #[must_use]
    pub const fn clipped(self, count: usize) -> Self {
        let end = if self.end > count { count } else { self.end };
        let begin = if self.begin > end { end } else { self.begin };
        Self { begin, end }
    }
}

/// Movement direction along the strip
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    #[must_use]
    pub const fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Backward,
            Self::Backward => Self::Forward,
        }
    }
}

/// Get the center of the array
///
/// Odd lengths round up so the middle pixel belongs to the first half.
pub const fn center_of<T>(arr: &[T]) -> usize {
    let count = arr.len();
    let mut center_len = count / 2;
    if !count.is_multiple_of(2) {
        center_len += 1;
    }

    if center_len <= count {
        return center_len;
    }
    count
}
