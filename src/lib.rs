#![no_std]

pub mod bounds;
pub mod button;
pub mod color;
pub mod effect;
pub mod filter;
pub mod frame_scheduler;
pub mod game;
pub mod math8;
pub mod output;
pub mod persistence;
pub mod power;
pub mod scheduler;
pub mod transition;

pub use bounds::{Direction, Span};
pub use button::{ActiveLow, ButtonEvent, ButtonInput, GestureClassifier, HoldClass, HoldThresholds};
pub use effect::{EFFECT_COUNT, EffectId, EffectRegistry, EffectSlot, RenderContext};
pub use filter::{BrightnessRange, OutputStage, PowerLimiter};
pub use frame_scheduler::FrameThrottle;
pub use game::{Game, GameConfig, ScorePlan};
pub use output::SmartLedsOutput;
pub use persistence::{
    ConfigStorage, EmbeddedStorage, PersistenceError, PersistenceGate, PersistentConfig,
};
pub use power::{PowerController, PowerState, WakeLatch};
pub use scheduler::{ButtonTimings, FeedbackTimings, Scheduler, SchedulerConfig, SleepTimings};

pub use color::{Hsv, Rgb};
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The scheduler is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// Source of the current time
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Clock backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}
