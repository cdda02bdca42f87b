//! small timers stepped from the millisecond and tenth-second interrupts

use crate::config::MS_PER_TICK;

//==========================================================

/// two-pulse heartbeat on the board LED, stepped every tenth second
#[derive(Debug, Default)]
pub struct Heartbeat {
    count: u8,
}

impl Heartbeat {
    pub const fn new() -> Heartbeat {
        Heartbeat { count: 0 }
    }

    /// returns the LED state for this tick: on, off, on, then dark for
    /// the rest of the second
    pub fn step(&mut self) -> bool {
        self.count += 1;
        if self.count < 4 {
            return self.count & 1 == 1;
        }
        if self.count >= 10 {
            self.count = 0;
        }
        false
    }
}

//==========================================================

/// one shot millisecond timer, used for the key beep
#[derive(Debug, Default)]
pub struct PulseTimer {
    remaining: u8,
}

impl PulseTimer {
    pub const fn new() -> PulseTimer {
        PulseTimer { remaining: 0 }
    }

    pub fn start(&mut self, ms: u8) {
        self.remaining = ms;
    }

    pub fn is_active(&self) -> bool {
        self.remaining != 0
    }

    /// step one millisecond, true when the pulse just ended
    pub fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        self.remaining == 0
    }
}

//==========================================================

/// display blink, stepped every millisecond
#[derive(Debug, Default)]
pub struct BlinkPacer {
    /// half period in milliseconds, 0 when not blinking
    half_period: u16,
    elapsed: u16,
    visible: bool,
}

impl BlinkPacer {
    pub const fn new() -> BlinkPacer {
        BlinkPacer {
            half_period: 0,
            elapsed: 0,
            visible: true,
        }
    }

    /// rate in 1/100 second, 0 turns blinking off
    pub fn set_rate(&mut self, rate: u8) {
        self.half_period = rate as u16 * 10;
        self.elapsed = 0;
        self.visible = true;
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// step one millisecond, returns the new visibility when it changes
    pub fn tick(&mut self) -> Option<bool> {
        if self.half_period == 0 {
            return None;
        }
        self.elapsed += 1;
        if self.elapsed < self.half_period {
            return None;
        }
        self.elapsed = 0;
        self.visible = !self.visible;
        Some(self.visible)
    }
}

//==========================================================

/// divides the millisecond interrupt down to the tenth-second tick
#[derive(Debug, Default)]
pub struct MsDivider {
    count: u8,
}

impl MsDivider {
    pub const fn new() -> MsDivider {
        MsDivider { count: 0 }
    }

    /// step one millisecond, true every MS_PER_TICK calls
    pub fn tick(&mut self) -> bool {
        self.count += 1;
        if self.count >= MS_PER_TICK {
            self.count = 0;
            true
        } else {
            false
        }
    }
}

//==========================================================
