//! Wall clock driven by a periodic tick
//!
//! The tick hook runs in interrupt context and only counts. Whole seconds
//! are published as a wrapping counter; the main loop applies them to the
//! time of day when it polls.

use portable_atomic::{AtomicU32, Ordering};
use vperiph_protocol::TimeOfDay;

/// Interrupt-side tick divider
///
/// `tick` has a single caller (the timer interrupt); `elapsed_seconds` may
/// be read from anywhere.
pub struct TickCounter {
    ticks_per_second: u32,
    divider: AtomicU32,
    elapsed: AtomicU32,
}

impl TickCounter {
    /// Counter for a tick hook called `ticks_per_second` times a second
    ///
    /// A rate of zero is treated as one.
    pub const fn new(ticks_per_second: u32) -> Self {
        let ticks_per_second = if ticks_per_second == 0 {
            1
        } else {
            ticks_per_second
        };
        Self {
            ticks_per_second,
            divider: AtomicU32::new(0),
            elapsed: AtomicU32::new(0),
        }
    }

    pub fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    /// Per-tick hook
    ///
    /// Must be called at exactly the configured rate; drift in the call
    /// rate drifts the clock.
    pub fn tick(&self) {
        let count = self.divider.load(Ordering::Relaxed) + 1;
        if count < self.ticks_per_second {
            self.divider.store(count, Ordering::Relaxed);
            return;
        }

        self.divider.store(0, Ordering::Relaxed);
        let elapsed = self.elapsed.load(Ordering::Relaxed);
        self.elapsed.store(elapsed.wrapping_add(1), Ordering::Release);
    }

    /// Whole seconds counted so far (wrapping)
    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed.load(Ordering::Acquire)
    }
}

/// Main-loop side of the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Clock {
    time: TimeOfDay,
    applied: u32,
}

impl Clock {
    pub const fn new(time: TimeOfDay) -> Self {
        Self { time, applied: 0 }
    }

    /// Current time of day
    pub fn now(&self) -> TimeOfDay {
        self.time
    }

    /// Replace the time of day; already applied seconds stay applied
    pub fn set(&mut self, time: TimeOfDay) {
        self.time = time;
    }

    /// Apply every second counted since the last sync
    ///
    /// Returns the number of seconds applied.
    pub fn sync(&mut self, elapsed_seconds: u32) -> u32 {
        let pending = elapsed_seconds.wrapping_sub(self.applied);
        for _ in 0..pending {
            self.time.advance_one_second();
        }
        self.applied = elapsed_seconds;
        pending
    }
}
