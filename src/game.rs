//! Catch-the-platform mini-game.
//!
//! A train of pixels bounces between the strip ends above a centered
//! platform of the same length. Pressing the button while the train overlaps
//! the platform trims the train to the overlap and scores; pressing while
//! they are apart ends the game. Letting the train come back to the start
//! without a press costs one pixel.
//!
//! This module holds the rules only. The scheduler feeds it time and button
//! presses and draws the result.

use embassy_time::{Duration, Instant};

use crate::{
    bounds::{Direction, Span},
    color::{Rgb, fill},
    frame_scheduler::FrameThrottle,
};

const TRAIN_COLOR: Rgb = Rgb {
    r: 255,
    g: 110,
    b: 0,
};
const PLATFORM_COLOR: Rgb = Rgb { r: 0, g: 0, b: 70 };
const ON_PLATFORM_COLOR: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

/// Tuning of the mini-game
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GameConfig {
    /// Train length; zero picks a sixth of the strip
    pub train_len: usize,
    /// Frame interval at speed scale 1.0
    pub frame_interval: Duration,
    /// Speed scale multiplier applied after every catch
    pub speed_gain: f32,
    /// Minimum time between two accepted presses
    pub input_cooldown: Duration,
    /// Duration of success/loss flashes
    pub flash: Duration,
    /// Per-pixel delay of the scoring animation
    pub score_step: Duration,
    /// Time the final score stays on the strip
    pub score_hold: Duration,
}

impl GameConfig {
    pub const DEFAULT: Self = Self {
        train_len: 0,
        frame_interval: Duration::from_millis(25),
        speed_gain: 1.12,
        input_cooldown: Duration::from_millis(250),
        flash: Duration::from_millis(300),
        score_step: Duration::from_millis(8),
        score_hold: Duration::from_millis(1500),
    };
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Check whether the train overlaps the platform
pub const fn is_on_platform(train: Span, platform: Span) -> bool {
    train.intersects(platform)
}

/// Result of a frame step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Frame interval not elapsed yet
    Waiting,
    /// Train moved one pixel
    Moved,
    /// Train came back to the start without a press and lost a pixel
    Penalty,
    /// The game is over
    Over,
}

/// Result of a successful catch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Catch {
    /// Train after trimming
    pub kept: Span,
    /// Pixels cut off before the platform
    pub trimmed_before: Span,
    /// Pixels cut off after the platform
    pub trimmed_after: Span,
    /// Points awarded for this catch
    pub points: f32,
}

impl Catch {
    pub const fn is_perfect(&self) -> bool {
        self.trimmed_before.is_empty() && self.trimmed_after.is_empty()
    }
}

/// Result of a button press
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Press {
    /// Game over or still in cooldown
    Ignored,
    Caught(Catch),
    /// Train and platform were apart; the game is over
    Missed { train: Span, platform: Span },
}

/// Mini-game state
#[derive(Debug, Clone)]
pub struct Game {
    count: usize,
    train: Span,
    platform: Span,
    direction: Direction,
    speed_scale: f32,
    score: f32,
    last_input_time: Option<Instant>,
    last_bounce_time: Instant,
    over: bool,
    throttle: FrameThrottle,
    config: GameConfig,
}

impl Game {
    /// Start a game on a strip of `count` pixels
    pub fn new(count: usize, config: &GameConfig, now: Instant) -> Self {
        let train_len = if config.train_len == 0 {
            (count / 6).max(1)
        } else {
            config.train_len
        };
        let train_len = train_len.min(count.saturating_sub(1)).max(1);

        Self {
            count,
            train: Span::new(0, train_len).clipped(count),
            platform: Span::centered(count, train_len),
            direction: Direction::Forward,
            speed_scale: 1.0,
            score: 0.0,
            last_input_time: None,
            last_bounce_time: now,
            over: count == 0,
            throttle: FrameThrottle::new(config.frame_interval),
            config: *config,
        }
    }

    pub const fn train(&self) -> Span {
        self.train
    }

    pub const fn platform(&self) -> Span {
        self.platform
    }

    pub const fn direction(&self) -> Direction {
        self.direction
    }

    pub const fn speed_scale(&self) -> f32 {
        self.speed_scale
    }

    pub const fn score(&self) -> f32 {
        self.score
    }

    pub const fn is_over(&self) -> bool {
        self.over
    }

    /// Current frame interval
    pub const fn frame_interval(&self) -> Duration {
        self.throttle.interval()
    }

    /// End the game early
    pub fn quit(&mut self) {
        self.over = true;
    }

    /// Move the train if its frame is due
    pub fn advance(&mut self, now: Instant) -> Advance {
        if self.over {
            return Advance::Over;
        }
        if self.throttle.ready(now).is_none() {
            return Advance::Waiting;
        }

        match self.direction {
            Direction::Forward => {
                if self.train.end < self.count {
                    self.train = self.train.shifted(Direction::Forward);
                }
                if self.train.end >= self.count {
                    self.direction = self.direction.reversed();
                }
                Advance::Moved
            }
            Direction::Backward => {
                if self.train.begin > 0 {
                    self.train = self.train.shifted(Direction::Backward);
                }
                if self.train.begin == 0 {
                    self.direction = self.direction.reversed();
                    return self.bounce_at_start(now);
                }
                Advance::Moved
            }
        }
    }

    fn bounce_at_start(&mut self, now: Instant) -> Advance {
        let pressed_since_bounce = self
            .last_input_time
            .is_some_and(|input| input > self.last_bounce_time);
        self.last_bounce_time = now;
        if pressed_since_bounce {
            return Advance::Moved;
        }

        let len = self.train.len().saturating_sub(1);
        self.train = Span::new(self.train.begin, self.train.begin + len);
        self.platform = Span::centered(self.count, len);
        if len == 0 {
            self.over = true;
            return Advance::Over;
        }
        Advance::Penalty
    }

    /// Handle a button press
    #[allow(clippy::cast_precision_loss)]
    pub fn press(&mut self, now: Instant) -> Press {
        if self.over {
            return Press::Ignored;
        }
        if let Some(last) = self.last_input_time {
            let since = now
                .checked_duration_since(last)
                .unwrap_or(Duration::from_millis(0));
            if since < self.config.input_cooldown {
                return Press::Ignored;
            }
        }
        self.last_input_time = Some(now);

        let overlap = self.train.overlap(self.platform);
        if overlap.is_empty() {
            self.over = true;
            return Press::Missed {
                train: self.train,
                platform: self.platform,
            };
        }

        let catch = Catch {
            kept: overlap,
            trimmed_before: Span::new(self.train.begin, overlap.begin),
            trimmed_after: Span::new(overlap.end, self.train.end),
            points: overlap.len() as f32 * self.speed_scale,
        };

        self.train = overlap;
        self.platform = Span::centered(self.count, overlap.len());
        self.score += catch.points;
        self.speed_scale *= self.config.speed_gain;
        self.throttle.set_interval(scaled_interval(
            self.config.frame_interval,
            self.speed_scale,
        ));

        Press::Caught(catch)
    }

    /// Draw the platform and the train
    pub fn draw(&self, leds: &mut [Rgb]) {
        fill(leds, Rgb::default());
        let count = leds.len();
        let platform = self.platform.clipped(count);
        fill(&mut leds[platform.begin..platform.end], PLATFORM_COLOR);
        let train = self.train.clipped(count);
        let on_platform = self.train.overlap(self.platform);
        for i in train.begin..train.end {
            leds[i] = if i >= on_platform.begin && i < on_platform.end {
                ON_PLATFORM_COLOR
            } else {
                TRAIN_COLOR
            };
        }
    }
}

#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn scaled_interval(base: Duration, speed_scale: f32) -> Duration {
    let ms = base.as_millis() as f32 / speed_scale.max(0.01);
    Duration::from_millis((ms as u64).max(1))
}

/// Layout of the scoring animation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScorePlan {
    /// Number of full-strip fills
    pub full_loops: u32,
    /// Pixels of the final partial fill
    pub remainder: usize,
}

impl ScorePlan {
    /// One pixel per point, rounded down
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn new(score: f32, count: usize) -> Self {
        if count == 0 || score <= 0.0 {
            return Self {
                full_loops: 0,
                remainder: 0,
            };
        }
        let points = score as usize;
        Self {
            full_loops: u32::try_from(points / count).unwrap_or(u32::MAX),
            remainder: points % count,
        }
    }

    pub const fn is_empty(&self) -> bool {
        self.full_loops == 0 && self.remainder == 0
    }

    /// Delay before lighting pixel `i` of the partial fill
    ///
    /// Grows quadratically towards the last pixel so the fill slows down as
    /// it reaches the final score.
    #[allow(clippy::cast_possible_truncation)]
    pub fn remainder_delay(&self, i: usize, step: Duration) -> Duration {
        if self.remainder == 0 {
            return step;
        }
        let i = i.min(self.remainder) as u64;
        let rem = self.remainder as u64;
        let extra = step.as_millis() * 8 * i * i / (rem * rem);
        Duration::from_millis(step.as_millis() + extra)
    }
}
