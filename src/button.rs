//! Button gesture classification.
//!
//! Each button is sampled once per poll. The classifier tracks how long the
//! current press has lasted and turns the level into gestures:
//!
//! | Gesture         | Condition                               | Event            |
//! |-----------------|-----------------------------------------|------------------|
//! | Press           | released -> pressed edge                | `Pressed`        |
//! | Long hold       | held >= long threshold, every poll      | `Repeat`         |
//! | Extra-long hold | held >= extra-long threshold, once      | `ExtraLongHold`  |
//! | Tap             | released before the long threshold      | `Tap`            |
//!
//! A press that reached the long threshold never produces a tap.

use embassy_time::{Duration, Instant};
use embedded_hal::digital::InputPin;

/// Debounced level of a single button
pub trait ButtonInput {
    /// Returns true while the button is held down
    fn is_pressed(&mut self) -> bool;
}

/// Adapter for buttons wired to ground with a pull-up
///
/// Pin read errors count as "released".
#[derive(Debug)]
pub struct ActiveLow<P>(pub P);

impl<P: InputPin> ButtonInput for ActiveLow<P> {
    fn is_pressed(&mut self) -> bool {
        self.0.is_low().unwrap_or(false)
    }
}

/// Hold classification of the current press episode
///
/// Ordered by hold duration; the value only grows until the release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HoldClass {
    Released,
    ShortHeld,
    LongHeld,
    ExtraLongHeld,
}

/// Classified button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonEvent {
    /// Press edge
    Pressed,
    /// Released before the long-press threshold
    Tap,
    /// Long hold in progress; fired on every poll
    Repeat,
    /// Extra-long threshold reached; fired once per press
    ExtraLongHold,
}

/// Hold thresholds of one button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldThresholds {
    pub long_press: Duration,
    /// One-shot threshold, if the button has one
    pub extra_long: Option<Duration>,
}

/// Gesture state machine for one button
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    thresholds: HoldThresholds,
    is_pressed: bool,
    changed_at: Instant,
    press_start: Instant,
    class: HoldClass,
    /// Set once a one-shot action fired for the current press
    edge_latch: bool,
}

impl GestureClassifier {
    pub const fn new(thresholds: HoldThresholds, now: Instant) -> Self {
        Self {
            thresholds,
            is_pressed: false,
            changed_at: now,
            press_start: now,
            class: HoldClass::Released,
            edge_latch: false,
        }
    }

    pub const fn class(&self) -> HoldClass {
        self.class
    }

    pub const fn is_pressed(&self) -> bool {
        self.is_pressed
    }

    /// Time the button has been held, if it is held
    pub fn pressed_for(&self, now: Instant) -> Option<Duration> {
        self.is_pressed.then(|| elapsed(self.press_start, now))
    }

    /// Time since the last release, if the button is released
    pub fn released_for(&self, now: Instant) -> Option<Duration> {
        (!self.is_pressed).then(|| elapsed(self.changed_at, now))
    }

    /// Feed one sample of the button level
    pub fn poll(&mut self, pressed: bool, now: Instant) -> Option<ButtonEvent> {
        match (self.is_pressed, pressed) {
            (false, true) => {
                self.is_pressed = true;
                self.changed_at = now;
                self.press_start = now;
                self.class = HoldClass::ShortHeld;
                self.edge_latch = false;
                Some(ButtonEvent::Pressed)
            }
            (true, true) => self.classify_hold(now),
            (true, false) => {
                self.is_pressed = false;
                self.changed_at = now;
                let consumed = self.class >= HoldClass::LongHeld;
                self.class = HoldClass::Released;
                self.edge_latch = false;
                (!consumed).then_some(ButtonEvent::Tap)
            }
            (false, false) => None,
        }
    }

    fn classify_hold(&mut self, now: Instant) -> Option<ButtonEvent> {
        if self.edge_latch {
            return None;
        }
        let held = elapsed(self.press_start, now);

        if let Some(extra_long) = self.thresholds.extra_long {
            if held >= extra_long {
                self.class = HoldClass::ExtraLongHeld;
                self.edge_latch = true;
                return Some(ButtonEvent::ExtraLongHold);
            }
        }

        if held >= self.thresholds.long_press {
            self.class = self.class.max(HoldClass::LongHeld);
            return Some(ButtonEvent::Repeat);
        }

        None
    }

    /// Treat the current press as already consumed
    ///
    /// Used after waking up: the press that woke the device must not turn
    /// into a tap, a brightness change or another sleep request.
    pub fn force_hold(&mut self, now: Instant) {
        self.is_pressed = true;
        self.changed_at = now;
        self.press_start = now;
        self.class = HoldClass::LongHeld;
        self.edge_latch = true;
    }
}

fn elapsed(since: Instant, now: Instant) -> Duration {
    now.checked_duration_since(since)
        .unwrap_or(Duration::from_millis(0))
}
