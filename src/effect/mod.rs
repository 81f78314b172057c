//! Effect system with compile-time known effect variants
//!
//! All effects are stored in an enum to avoid heap allocations.
//! Each effect implements the `Effect` trait and throttles itself: a render
//! call that comes too early leaves the buffer untouched.

mod fire;
mod ocean;
mod police;
mod rainbow;
mod static_color;

use embassy_time::Instant;
pub use fire::FireEffect;
pub use ocean::{OCEAN_BRIGHTNESS_CEILING, OceanEffect};
pub use police::PoliceChaseEffect;
pub use rainbow::RainbowEffect;
pub use static_color::{COLD_WHITE_KELVIN, StaticColorEffect, WARM_WHITE_KELVIN};

use crate::color::Rgb;

const EFFECT_NAME_FIRE: &str = "fire";
const EFFECT_NAME_POLICE_CHASE: &str = "police_chase";
const EFFECT_NAME_RAINBOW: &str = "rainbow";
const EFFECT_NAME_OCEAN: &str = "ocean";
const EFFECT_NAME_COLD_WHITE: &str = "cold_white";
const EFFECT_NAME_WARM_WHITE: &str = "warm_white";

const EFFECT_ID_FIRE: u8 = 0;
const EFFECT_ID_POLICE_CHASE: u8 = 1;
const EFFECT_ID_RAINBOW: u8 = 2;
const EFFECT_ID_OCEAN: u8 = 3;
const EFFECT_ID_COLD_WHITE: u8 = 4;
const EFFECT_ID_WARM_WHITE: u8 = 5;

/// Number of effects in the registry
pub const EFFECT_COUNT: usize = 6;

/// Per-frame inputs and outputs shared by all effects
#[derive(Debug, Clone, Copy)]
pub struct RenderContext {
    /// Wall-clock time of the frame
    pub now: Instant,
    /// Set for the first frame after the selection changed or the buffer was
    /// drawn over by something else
    pub state_changed: bool,
    /// Global brightness ceiling; effects may only lower it
    pub brightness_ceiling: u8,
}

impl RenderContext {
    pub const fn new(now: Instant, state_changed: bool, brightness_ceiling: u8) -> Self {
        Self {
            now,
            state_changed,
            brightness_ceiling,
        }
    }
}

pub trait Effect {
    /// Render a single frame
    fn render(&mut self, ctx: &mut RenderContext, leds: &mut [Rgb]);

    /// Forget frame timing after the loop was suspended
    ///
    /// Animation state is kept so the effect resumes where it stopped.
    fn reset(&mut self) {}
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot<const N: usize> {
    /// Heat diffusion fire rising from both ends
    Fire(FireEffect<N>),
    /// Red and blue comets traveling towards the center
    PoliceChase(PoliceChaseEffect),
    /// Time-driven rainbow sweep
    Rainbow(RainbowEffect),
    /// Layered wave field
    Ocean(OceanEffect),
    /// Cold white fill
    ColdWhite(StaticColorEffect),
    /// Warm white fill
    WarmWhite(StaticColorEffect),
}

/// Known effect ids, in registry order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum EffectId {
    Fire = EFFECT_ID_FIRE,
    PoliceChase = EFFECT_ID_POLICE_CHASE,
    Rainbow = EFFECT_ID_RAINBOW,
    Ocean = EFFECT_ID_OCEAN,
    ColdWhite = EFFECT_ID_COLD_WHITE,
    WarmWhite = EFFECT_ID_WARM_WHITE,
}

impl EffectId {
    /// All effects in registry order
    pub const ALL: [Self; EFFECT_COUNT] = [
        Self::Fire,
        Self::PoliceChase,
        Self::Rainbow,
        Self::Ocean,
        Self::ColdWhite,
        Self::WarmWhite,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            EFFECT_ID_FIRE => Self::Fire,
            EFFECT_ID_POLICE_CHASE => Self::PoliceChase,
            EFFECT_ID_RAINBOW => Self::Rainbow,
            EFFECT_ID_OCEAN => Self::Ocean,
            EFFECT_ID_COLD_WHITE => Self::ColdWhite,
            EFFECT_ID_WARM_WHITE => Self::WarmWhite,
            _ => return None,
        })
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn to_slot<const N: usize>(self, seed: u64) -> EffectSlot<N> {
        match self {
            Self::Fire => EffectSlot::Fire(FireEffect::new(seed)),
            Self::PoliceChase => EffectSlot::PoliceChase(PoliceChaseEffect::new()),
            Self::Rainbow => EffectSlot::Rainbow(RainbowEffect::new()),
            Self::Ocean => EffectSlot::Ocean(OceanEffect::new()),
            Self::ColdWhite => {
                EffectSlot::ColdWhite(StaticColorEffect::from_kelvin(COLD_WHITE_KELVIN))
            }
            Self::WarmWhite => {
                EffectSlot::WarmWhite(StaticColorEffect::from_kelvin(WARM_WHITE_KELVIN))
            }
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Fire => EFFECT_NAME_FIRE,
            Self::PoliceChase => EFFECT_NAME_POLICE_CHASE,
            Self::Rainbow => EFFECT_NAME_RAINBOW,
            Self::Ocean => EFFECT_NAME_OCEAN,
            Self::ColdWhite => EFFECT_NAME_COLD_WHITE,
            Self::WarmWhite => EFFECT_NAME_WARM_WHITE,
        }
    }
}

impl<const N: usize> EffectSlot<N> {
    /// Render the current effect
    pub fn render(&mut self, ctx: &mut RenderContext, leds: &mut [Rgb]) {
        match self {
            Self::Fire(effect) => effect.render(ctx, leds),
            Self::PoliceChase(effect) => effect.render(ctx, leds),
            Self::Rainbow(effect) => effect.render(ctx, leds),
            Self::Ocean(effect) => effect.render(ctx, leds),
            Self::ColdWhite(effect) | Self::WarmWhite(effect) => effect.render(ctx, leds),
        }
    }

    /// Reset the effect timing
    pub fn reset(&mut self) {
        match self {
            Self::Fire(effect) => Effect::reset(effect),
            Self::PoliceChase(effect) => Effect::reset(effect),
            Self::Rainbow(effect) => Effect::reset(effect),
            Self::Ocean(effect) => Effect::reset(effect),
            Self::ColdWhite(effect) | Self::WarmWhite(effect) => Effect::reset(effect),
        }
    }

    /// Get the effect ID for external observation
    pub fn id(&self) -> EffectId {
        match self {
            Self::Fire(_) => EffectId::Fire,
            Self::PoliceChase(_) => EffectId::PoliceChase,
            Self::Rainbow(_) => EffectId::Rainbow,
            Self::Ocean(_) => EffectId::Ocean,
            Self::ColdWhite(_) => EffectId::ColdWhite,
            Self::WarmWhite(_) => EffectId::WarmWhite,
        }
    }
}

/// Ordered effect registry with the current selection
///
/// Every effect keeps its state for the whole program; switching away and
/// back resumes the animation where it stopped.
#[derive(Debug, Clone)]
pub struct EffectRegistry<const N: usize> {
    slots: [EffectSlot<N>; EFFECT_COUNT],
    index: usize,
}

impl<const N: usize> EffectRegistry<N> {
    /// Create all effects; `seed` feeds the random sources
    pub fn new(seed: u64) -> Self {
        Self {
            slots: EffectId::ALL.map(|id| id.to_slot(seed)),
            index: 0,
        }
    }

    pub const fn len(&self) -> usize {
        EFFECT_COUNT
    }

    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Index of the selected effect
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Id of the selected effect
    pub fn current(&self) -> EffectId {
        self.slots[self.index].id()
    }

    /// Select an effect by index, reduced modulo the registry length
    pub fn select(&mut self, index: usize) -> EffectId {
        self.index = index % EFFECT_COUNT;
        self.current()
    }

    /// Select the next effect, wrapping at the end
    pub fn next(&mut self) -> EffectId {
        self.select(self.index + 1)
    }

    /// Select the previous effect, wrapping at the start
    pub fn previous(&mut self) -> EffectId {
        self.select(self.index + EFFECT_COUNT - 1)
    }

    /// Reset timing of every effect, e.g. after sleeping
    pub fn reset_timing(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }

    /// Render the selected effect
    pub fn render(&mut self, ctx: &mut RenderContext, leds: &mut [Rgb]) {
        self.slots[self.index].render(ctx, leds);
    }
}
