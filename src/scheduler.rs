//! Cooperative main loop.
//!
//! The [`Scheduler`] owns the pixel buffer and every piece of runtime state.
//! One [`Scheduler::tick`] polls both buttons, applies the resulting actions,
//! runs any pending blocking work (feedback flash, sleep cycle, mini-game),
//! commits settled configuration and renders one frame of the selected
//! effect.
//!
//! Blocking work never stops polling the buttons: every busy-wait re-reads
//! both classifiers on each iteration, so edges are never missed and a new
//! tap can cancel a feedback flash in progress.

use embassy_time::{Duration, Instant};
use rand::{Rng, SeedableRng, rngs::SmallRng};

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::{
    Clock, OutputDriver,
    bounds::{Span, center_of},
    button::{ButtonEvent, ButtonInput, GestureClassifier, HoldThresholds},
    color::{BLACK, Hsv, Rgb, fill, hsv2rgb},
    effect::{EFFECT_COUNT, EffectId, EffectRegistry, RenderContext},
    filter::{BrightnessRange, OutputStage},
    game::{Advance, Game, GameConfig, Press, ScorePlan},
    persistence::{ConfigStorage, PersistenceGate, PersistentConfig},
    power::{PowerController, PowerState},
};

const BUTTON_1: usize = 0;
const BUTTON_2: usize = 1;

const CATCH_COLOR: Rgb = Rgb { r: 0, g: 255, b: 0 };
const LOSS_COLOR: Rgb = Rgb { r: 255, g: 0, b: 0 };

/// Hold thresholds of both buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonTimings {
    /// Start of the brightness repeat on either button
    pub long_press: Duration,
    /// Button 1 hold that puts the strip to sleep
    pub sleep_hold: Duration,
    /// Button 2 hold that starts the mini-game
    pub mode_hold: Duration,
    /// Idle time of both buttons before a change is committed
    pub settle: Duration,
}

/// Timing of the tap acknowledgement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedbackTimings {
    /// Delay between two pixels of the sweep
    pub step: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepTimings {
    /// Delay between two pixels of the fade-out sweep
    pub fade_step: Duration,
    /// Brightness fade-in after waking up
    pub fade_in: Duration,
}

/// Configuration for the scheduler
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulerConfig {
    pub buttons: ButtonTimings,
    pub brightness_range: BrightnessRange,
    /// Brightness change per poll during a long hold
    pub brightness_step: u8,
    /// Used when storage cannot be read
    pub default_brightness: u8,
    /// Maximum power drawn by the strip
    pub power_budget_mw: u32,
    pub feedback: FeedbackTimings,
    pub sleep: SleepTimings,
    pub game: GameConfig,
    /// Seed of the random sources
    pub seed: u64,
}

impl SchedulerConfig {
    pub const DEFAULT: Self = Self {
        buttons: ButtonTimings {
            long_press: Duration::from_millis(600),
            sleep_hold: Duration::from_secs(3),
            mode_hold: Duration::from_secs(4),
            settle: Duration::from_secs(5),
        },
        brightness_range: BrightnessRange::new(10, 255),
        brightness_step: 1,
        default_brightness: 128,
        power_budget_mw: 7500,
        feedback: FeedbackTimings {
            step: Duration::from_millis(6),
        },
        sleep: SleepTimings {
            fade_step: Duration::from_millis(8),
            fade_in: Duration::from_millis(800),
        },
        game: GameConfig::DEFAULT,
        seed: 0x5EED,
    };
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Action requested by a classified button event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    PreviousEffect,
    NextEffect,
    Dimmer,
    Brighter,
    Sleep,
    Game,
}

impl Action {
    const fn from_event(button: usize, event: ButtonEvent) -> Option<Self> {
        Some(match (button, event) {
            (BUTTON_1, ButtonEvent::Tap) => Self::PreviousEffect,
            (BUTTON_2, ButtonEvent::Tap) => Self::NextEffect,
            (BUTTON_1, ButtonEvent::Repeat) => Self::Dimmer,
            (BUTTON_2, ButtonEvent::Repeat) => Self::Brighter,
            (BUTTON_1, ButtonEvent::ExtraLongHold) => Self::Sleep,
            (BUTTON_2, ButtonEvent::ExtraLongHold) => Self::Game,
            _ => return None,
        })
    }
}

/// Blocking sub-program requested by a button
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ModeRequest {
    Sleep,
    Game,
}

/// State before the first brightness repeat of a hold
///
/// A hold that goes on to trigger sleep or the game is a single action, so
/// the repeats it produced on the way are rolled back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HoldOrigin {
    brightness: u8,
    pending: bool,
}

/// How a busy-wait treats button events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Polling {
    /// Apply them as in the main loop
    Apply,
    /// Keep the classifiers in sync but drop the events
    Discard,
}

/// Main loop context
///
/// `N` is the number of pixels of the strip.
pub struct Scheduler<D, B, S, P, C, const N: usize> {
    driver: D,
    buttons: [B; 2],
    storage: S,
    power: P,
    clock: C,
    config: SchedulerConfig,

    leds: [Rgb; N],
    output: OutputStage<N>,
    registry: EffectRegistry<N>,
    classifiers: [GestureClassifier; 2],
    gate: PersistenceGate,
    rng: SmallRng,

    brightness: u8,
    range: BrightnessRange,
    state_changed: bool,
    power_state: PowerState,
    mode_request: Option<ModeRequest>,
    hold_origins: [Option<HoldOrigin>; 2],

    feedback_generation: u32,
    feedback_pending: bool,
}

impl<D, B, S, P, C, const N: usize> Scheduler<D, B, S, P, C, N>
where
    D: OutputDriver,
    B: ButtonInput,
    S: ConfigStorage,
    P: PowerController,
    C: Clock,
{
    /// Create the scheduler and load the stored configuration
    pub fn new(
        driver: D,
        buttons: [B; 2],
        storage: S,
        power: P,
        clock: C,
        config: &SchedulerConfig,
    ) -> Self {
        let now = clock.now();
        let timings = config.buttons;
        let range = config.brightness_range;

        let mut scheduler = Self {
            driver,
            buttons,
            storage,
            power,
            clock,
            config: *config,
            leds: [BLACK; N],
            output: OutputStage::new(range.clamp(config.default_brightness), config.power_budget_mw),
            registry: EffectRegistry::new(config.seed),
            classifiers: [
                GestureClassifier::new(
                    HoldThresholds {
                        long_press: timings.long_press,
                        extra_long: Some(timings.sleep_hold),
                    },
                    now,
                ),
                GestureClassifier::new(
                    HoldThresholds {
                        long_press: timings.long_press,
                        extra_long: Some(timings.mode_hold),
                    },
                    now,
                ),
            ],
            gate: PersistenceGate::new(timings.settle),
            rng: SmallRng::seed_from_u64(config.seed.rotate_left(17)),
            brightness: range.clamp(config.default_brightness),
            range,
            state_changed: true,
            power_state: PowerState::Awake,
            mode_request: None,
            hold_origins: [None; 2],
            feedback_generation: 0,
            feedback_pending: false,
        };
        scheduler.load_config();
        scheduler.output.brightness.jump(scheduler.brightness);
        scheduler
    }

    /// Run the loop forever
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    /// One iteration of the main loop
    pub fn tick(&mut self) {
        let now = self.clock.now();
        self.poll_buttons(Polling::Apply, now);
        self.run_feedback();

        match self.mode_request.take() {
            Some(ModeRequest::Sleep) => self.sleep_cycle(),
            Some(ModeRequest::Game) => self.run_game(),
            None => {}
        }

        let now = self.clock.now();
        self.commit_if_settled(now);
        self.render_frame(now);
    }

    /// Index of the selected effect
    pub const fn effect_index(&self) -> usize {
        self.registry.index()
    }

    pub fn current_effect(&self) -> EffectId {
        self.registry.current()
    }

    /// User brightness
    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn brightness_range(&self) -> BrightnessRange {
        self.range
    }

    pub const fn power_state(&self) -> PowerState {
        self.power_state
    }

    /// Check whether a change waits for the settle interval
    pub const fn is_persistence_pending(&self) -> bool {
        self.gate.is_pending()
    }

    pub const fn feedback_generation(&self) -> u32 {
        self.feedback_generation
    }

    /// Pixel buffer before brightness and power limiting
    pub const fn leds(&self) -> &[Rgb; N] {
        &self.leds
    }

    pub const fn driver(&self) -> &D {
        &self.driver
    }

    pub const fn storage(&self) -> &S {
        &self.storage
    }

    pub const fn power(&self) -> &P {
        &self.power
    }

    /// Configuration as it would be committed now
    #[allow(clippy::cast_possible_truncation)]
    pub const fn persistent_config(&self) -> PersistentConfig {
        PersistentConfig {
            effect_index: self.registry.index() as u8,
            brightness: self.brightness,
        }
    }

    fn load_config(&mut self) {
        let config = match PersistentConfig::load(&mut self.storage, EFFECT_COUNT, self.range) {
            Ok(config) => config,
            Err(_err) => {
                #[cfg(feature = "esp32-log")]
                println!("[Scheduler.load_config] storage read failed: {:?}", _err);
                PersistentConfig {
                    effect_index: 0,
                    brightness: self.config.default_brightness,
                }
                .sanitized(EFFECT_COUNT, self.range)
            }
        };

        self.registry.select(usize::from(config.effect_index));
        self.brightness = config.brightness;
        self.state_changed = true;

        #[cfg(feature = "esp32-log")]
        println!(
            "[Scheduler.load_config] effect {} brightness {}",
            self.registry.current().as_str(),
            self.brightness
        );
    }

    fn poll_events(&mut self, now: Instant) -> [Option<ButtonEvent>; 2] {
        let first = self.buttons[BUTTON_1].is_pressed();
        let second = self.buttons[BUTTON_2].is_pressed();
        let events = [
            self.classifiers[BUTTON_1].poll(first, now),
            self.classifiers[BUTTON_2].poll(second, now),
        ];
        for (origin, event) in self.hold_origins.iter_mut().zip(events) {
            if event == Some(ButtonEvent::Pressed) {
                *origin = None;
            }
        }
        events
    }

    fn poll_buttons(&mut self, polling: Polling, now: Instant) {
        let events = self.poll_events(now);
        if polling == Polling::Discard {
            return;
        }

        for (button, event) in events.into_iter().enumerate() {
            if let Some(action) = event.and_then(|event| Action::from_event(button, event)) {
                self.apply(button, action);
            }
        }
    }

    fn apply(&mut self, button: usize, action: Action) {
        match action {
            Action::PreviousEffect | Action::NextEffect => {
                let _id = if action == Action::NextEffect {
                    self.registry.next()
                } else {
                    self.registry.previous()
                };
                #[cfg(feature = "esp32-log")]
                println!("[Scheduler.apply] effect {}", _id.as_str());

                self.state_changed = true;
                self.gate.mark_dirty();
                self.feedback_generation = self.feedback_generation.wrapping_add(1);
                self.feedback_pending = true;
            }
            Action::Dimmer | Action::Brighter => {
                if self.hold_origins[button].is_none() {
                    self.hold_origins[button] = Some(HoldOrigin {
                        brightness: self.brightness,
                        pending: self.gate.is_pending(),
                    });
                }
                let step = self.config.brightness_step;
                let brightness = if action == Action::Brighter {
                    self.range.step_up(self.brightness, step)
                } else {
                    self.range.step_down(self.brightness, step)
                };
                if brightness != self.brightness {
                    self.brightness = brightness;
                    self.output.brightness.jump(brightness);
                    self.gate.mark_dirty();
                }
            }
            Action::Sleep => {
                self.roll_back_hold(button);
                self.mode_request = Some(ModeRequest::Sleep);
            }
            Action::Game => {
                self.roll_back_hold(button);
                self.mode_request = Some(ModeRequest::Game);
            }
        }
    }

    /// Undo the brightness repeats of the hold on `button`
    fn roll_back_hold(&mut self, button: usize) {
        let Some(origin) = self.hold_origins[button].take() else {
            return;
        };
        self.brightness = self.range.clamp(origin.brightness);
        self.output.brightness.jump(self.brightness);
        if !origin.pending {
            self.gate.discard();
        }
    }

    fn commit_if_settled(&mut self, now: Instant) {
        let config = self.persistent_config();
        let [first, second] = &self.classifiers;
        if let Err(_err) = self.gate.poll(&mut self.storage, config, [first, second], now) {
            #[cfg(feature = "esp32-log")]
            println!("[Scheduler.commit_if_settled] storage write failed: {:?}", _err);
        }
    }

    fn render_frame(&mut self, now: Instant) {
        let mut ctx = RenderContext::new(now, self.state_changed, self.range.ceiling());
        self.registry.render(&mut ctx, &mut self.leds);
        self.state_changed = false;

        if ctx.brightness_ceiling < self.range.ceiling() {
            self.range.lower_ceiling(ctx.brightness_ceiling);
            self.brightness = self.range.clamp(self.brightness);
            self.output.brightness.jump(self.brightness);
            #[cfg(feature = "esp32-log")]
            println!(
                "[Scheduler.render_frame] brightness ceiling lowered to {}",
                self.range.ceiling()
            );
        }

        self.flush(now);
    }

    fn flush(&mut self, now: Instant) {
        self.output.flush(&mut self.driver, &self.leds, now);
    }

    /// Busy-wait for `duration` while polling the buttons
    fn wait(&mut self, duration: Duration, polling: Polling) {
        let start = self.clock.now();
        loop {
            let now = self.clock.now();
            if elapsed(start, now) >= duration {
                return;
            }
            self.poll_buttons(polling, now);
        }
    }

    /// Run queued feedback flashes until none is pending
    fn run_feedback(&mut self) {
        while self.feedback_pending {
            self.feedback_pending = false;
            self.feedback_flash(self.feedback_generation);
        }
    }

    /// Sweep a random color from both ends towards the center
    ///
    /// Returns early once `generation` is no longer the latest one.
    fn feedback_flash(&mut self, generation: u32) {
        let color = hsv2rgb(Hsv {
            hue: self.rng.r#gen(),
            sat: 255,
            val: 255,
        });
        let step = self.config.feedback.step;

        fill(&mut self.leds, BLACK);
        for i in 0..center_of(&self.leds) {
            self.leds[i] = color;
            self.leds[N - 1 - i] = color;
            self.flush(self.clock.now());

            let start = self.clock.now();
            loop {
                if self.feedback_generation != generation {
                    self.state_changed = true;
                    return;
                }
                let now = self.clock.now();
                if elapsed(start, now) >= step {
                    break;
                }
                self.poll_buttons(Polling::Apply, now);
            }
        }
        self.state_changed = true;
    }

    /// Fade out, sleep until the wake edge, reload and fade in
    fn sleep_cycle(&mut self) {
        self.power_state = PowerState::EnteringSleep;
        #[cfg(feature = "esp32-log")]
        println!("[Scheduler.sleep_cycle] entering sleep");

        let step = self.config.sleep.fade_step;
        for i in 0..center_of(&self.leds) {
            self.leds[i] = BLACK;
            self.leds[N - 1 - i] = BLACK;
            self.flush(self.clock.now());
            self.wait(step, Polling::Discard);
        }

        self.power_state = PowerState::Asleep;
        fill(&mut self.leds, BLACK);
        self.flush(self.clock.now());
        self.power.attach_wake_interrupt();
        self.power.sleep_until_wake();
        self.power.detach_wake_interrupt();

        self.power_state = PowerState::Waking;
        #[cfg(feature = "esp32-log")]
        println!("[Scheduler.sleep_cycle] woke up");

        let now = self.clock.now();
        self.load_config();
        self.gate.discard();
        self.classifiers[BUTTON_1].force_hold(now);
        self.registry.reset_timing();

        self.output.brightness.jump(0);
        self.output
            .brightness
            .set(self.brightness, self.config.sleep.fade_in, now);
        while self.output.brightness.is_transitioning() {
            let now = self.clock.now();
            self.poll_buttons(Polling::Discard, now);
            self.render_frame(now);
        }

        self.power_state = PowerState::Awake;
    }

    /// Play the mini-game until it is over, then show the score
    fn run_game(&mut self) {
        let remembered = self.registry.index();
        let now = self.clock.now();
        let mut game = Game::new(N, &self.config.game, now);
        #[cfg(feature = "esp32-log")]
        println!("[Scheduler.run_game] game started");

        game.draw(&mut self.leds);
        self.flush(now);

        loop {
            let now = self.clock.now();
            let [first, second] = self.poll_events(now);
            if second == Some(ButtonEvent::ExtraLongHold) {
                game.quit();
            }
            if first == Some(ButtonEvent::Pressed) {
                self.game_press(&mut game, now);
            }

            match game.advance(now) {
                Advance::Over => break,
                Advance::Waiting => {}
                Advance::Moved | Advance::Penalty => {
                    game.draw(&mut self.leds);
                    self.flush(now);
                }
            }
        }

        #[cfg(feature = "esp32-log")]
        println!("[Scheduler.run_game] game over, score {}", game.score());

        self.play_score(game.score());

        // The press that ended the game is still going
        let now = self.clock.now();
        for classifier in &mut self.classifiers {
            if classifier.is_pressed() {
                classifier.force_hold(now);
            }
        }

        self.registry.select(remembered);
        self.registry.reset_timing();
        self.state_changed = true;
    }

    fn game_press(&mut self, game: &mut Game, now: Instant) {
        match game.press(now) {
            Press::Ignored => {}
            Press::Caught(catch) => {
                if catch.is_perfect() {
                    self.flash_spans(game, &[catch.kept], CATCH_COLOR);
                } else {
                    self.flash_spans(game, &[catch.trimmed_before, catch.trimmed_after], LOSS_COLOR);
                }
            }
            Press::Missed { train, platform } => {
                self.flash_spans(game, &[train, platform], LOSS_COLOR);
            }
        }
    }

    /// Draw the game with `spans` painted in `color` for the flash duration
    fn flash_spans(&mut self, game: &Game, spans: &[Span], color: Rgb) {
        game.draw(&mut self.leds);
        for span in spans {
            let span = span.clipped(N);
            fill(&mut self.leds[span.begin..span.end], color);
        }
        self.flush(self.clock.now());
        self.wait(self.config.game.flash, Polling::Discard);
    }

    /// Show the score: one full fill per `N` points, then the remainder
    fn play_score(&mut self, score: f32) {
        let plan = ScorePlan::new(score, N);
        if plan.is_empty() {
            return;
        }
        let step = self.config.game.score_step;

        for lap in 0..plan.full_loops {
            #[allow(clippy::cast_possible_truncation)]
            let color = hsv2rgb(Hsv {
                hue: (lap as u8).wrapping_mul(48),
                sat: 255,
                val: 255,
            });
            fill(&mut self.leds, BLACK);
            for i in 0..N {
                self.leds[i] = color;
                self.flush(self.clock.now());
                self.wait(step, Polling::Discard);
            }
        }

        fill(&mut self.leds, BLACK);
        for i in 0..plan.remainder {
            self.leds[i] = CATCH_COLOR;
            self.flush(self.clock.now());
            self.wait(plan.remainder_delay(i, step), Polling::Discard);
        }
        self.wait(self.config.game.score_hold, Polling::Discard);
    }
}

fn elapsed(since: Instant, now: Instant) -> Duration {
    now.checked_duration_since(since)
        .unwrap_or(Duration::from_millis(0))
}
