//! Power states and the wake-up interrupt hand-off.

use core::cell::Cell;

use critical_section::Mutex;

/// Deep-sleep primitive of the board
pub trait PowerController {
    /// Arm the edge interrupt that ends the sleep
    fn attach_wake_interrupt(&mut self);

    /// Suspend all processing until the wake interrupt fires
    fn sleep_until_wake(&mut self);

    /// Disarm the wake interrupt; called right after waking up
    fn detach_wake_interrupt(&mut self);
}

/// Power state of the scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerState {
    Awake,
    /// Fade-out in progress
    EnteringSleep,
    /// Processor suspended
    Asleep,
    /// Configuration reload and fade-in in progress
    Waking,
}

/// Interrupt-safe flag for the wake edge
///
/// Boards implementing [`PowerController`] can share one latch between the
/// interrupt handler and the sleep loop. The latch accepts at most one
/// signal per arming.
pub struct WakeLatch {
    armed: Mutex<Cell<bool>>,
    fired: Mutex<Cell<bool>>,
}

impl WakeLatch {
    pub const fn new() -> Self {
        Self {
            armed: Mutex::new(Cell::new(false)),
            fired: Mutex::new(Cell::new(false)),
        }
    }

    /// Accept the next wake signal
    pub fn arm(&self) {
        critical_section::with(|cs| {
            self.fired.borrow(cs).set(false);
            self.armed.borrow(cs).set(true);
        });
    }

    /// Ignore wake signals until armed again
    pub fn disarm(&self) {
        critical_section::with(|cs| self.armed.borrow(cs).set(false));
    }

    pub fn is_armed(&self) -> bool {
        critical_section::with(|cs| self.armed.borrow(cs).get())
    }

    /// Record a wake edge; call from the interrupt handler
    ///
    /// Returns false if the latch was not armed. An accepted signal disarms
    /// the latch, so bouncing edges cannot fire twice.
    pub fn signal(&self) -> bool {
        critical_section::with(|cs| {
            let armed = self.armed.borrow(cs);
            if !armed.get() {
                return false;
            }
            armed.set(false);
            self.fired.borrow(cs).set(true);
            true
        })
    }

    /// Consume a recorded wake edge
    pub fn take(&self) -> bool {
        critical_section::with(|cs| self.fired.borrow(cs).replace(false))
    }
}

impl Default for WakeLatch {
    fn default() -> Self {
        Self::new()
    }
}
