//! secondary on/off timer for flows below what the pwm can do
//!
//! While active the gate alternates an OPEN phase of `on_time` ticks with a
//! CLOSED phase of `off_time` ticks. A phase length is read from the
//! configuration when the phase starts, so an edit shows up at the next
//! phase change.

use crate::store::CycleConfig;
use ufmt::derive::uDebug;

//==========================================================

#[derive(Debug, Copy, Clone, PartialEq, Eq, uDebug)]
pub enum GatePhase {
    Open,
    Closed,
}

impl GatePhase {
    fn flip(self) -> GatePhase {
        match self {
            GatePhase::Open => GatePhase::Closed,
            GatePhase::Closed => GatePhase::Open,
        }
    }
}

//==========================================================

#[derive(Debug)]
pub struct DutyCycleGate {
    phase: GatePhase,
    /// ticks left in this phase, 0 when no cycle is running
    remaining: u8,
}

impl DutyCycleGate {
    pub const fn new() -> DutyCycleGate {
        DutyCycleGate {
            phase: GatePhase::Open,
            remaining: 0,
        }
    }

    /// current phase without stepping
    pub fn phase(&self) -> GatePhase {
        self.phase
    }

    /// stop cycling, the next tick starts a fresh OPEN phase
    pub fn reset(&mut self) {
        self.phase = GatePhase::Open;
        self.remaining = 0;
    }

    /// step one tick, returns the phase that applies to this tick
    pub fn tick(&mut self, cycle: &CycleConfig) -> GatePhase {
        if !cycle.is_active() {
            self.reset();
            return GatePhase::Open;
        }
        if self.remaining == 0 {
            self.phase = GatePhase::Open;
            self.remaining = cycle.on_time;
        }
        let current = self.phase;
        self.remaining -= 1;
        if self.remaining == 0 {
            self.phase = self.phase.flip();
            self.remaining = match self.phase {
                GatePhase::Open => cycle.on_time,
                GatePhase::Closed => cycle.off_time,
            };
        }
        current
    }
}

impl Default for DutyCycleGate {
    fn default() -> Self {
        DutyCycleGate::new()
    }
}

//==========================================================
