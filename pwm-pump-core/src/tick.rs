//! decisecond tick shared between the timer isr and the main loop

use core::sync::atomic::{AtomicU8, Ordering};

//==========================================================

/// free running tenth-second counter, wraps at 256
///
/// Only the timer isr calls [`TickCounter::advance`], the main loop only
/// reads. Both sides touch a single byte, which the AVR loads and stores in
/// one instruction, so no critical section is needed.
pub struct TickCounter(AtomicU8);

impl TickCounter {
    pub const fn new() -> TickCounter {
        TickCounter(AtomicU8::new(0))
    }

    /// called from the isr, single writer
    pub fn advance(&self) {
        let now = self.0.load(Ordering::Relaxed);
        self.0.store(now.wrapping_add(1), Ordering::Relaxed);
    }

    pub fn now(&self) -> u8 {
        self.0.load(Ordering::Relaxed)
    }
}

impl Default for TickCounter {
    fn default() -> Self {
        TickCounter::new()
    }
}

//==========================================================

/// main loop side, remembers the last tick processed
pub struct Ticker {
    last: u8,
}

impl Ticker {
    /// start from whatever the counter shows now
    pub fn new(counter: &TickCounter) -> Ticker {
        Ticker {
            last: counter.now(),
        }
    }

    /// true once for every tick the counter has advanced past the last one
    /// seen. If the loop fell behind, repeated calls catch up one tick at a
    /// time so no tick is skipped or run twice.
    pub fn poll(&mut self, counter: &TickCounter) -> bool {
        if counter.now() == self.last {
            false
        } else {
            self.last = self.last.wrapping_add(1);
            true
        }
    }
}

//==========================================================
