//! pwm duty and the LED bar

use crate::config::{LED_COUNT, LED_OFFSET, LED_STEP, PWM_SCALE};
use crate::gate::GatePhase;
use crate::hw::Panel;
use crate::mode::RunMode;
use embedded_hal::PwmPin;

//==========================================================

/// commanded percent, zero unless running
pub fn run_duty(mode: RunMode, percent: u8) -> u8 {
    match mode {
        RunMode::Run => percent,
        RunMode::Off => 0,
    }
}

/// what the pump actually gets this tick
pub fn effective_duty(mode: RunMode, percent: u8, gate: GatePhase) -> u8 {
    match gate {
        GatePhase::Open => run_duty(mode, percent),
        GatePhase::Closed => 0,
    }
}

/// percent to timer compare units
pub fn hw_duty(percent: u8) -> u8 {
    percent * PWM_SCALE
}

/// rough duty on the 8 LEDs, (duty - 6) / 12 limited to 0-7
pub fn led_bucket(duty: u8) -> u8 {
    let led = duty.saturating_sub(LED_OFFSET) / LED_STEP;
    if led >= LED_COUNT {
        LED_COUNT - 1
    } else {
        led
    }
}

//==========================================================

/// drives the pwm pin and keeps track of the lit LED
#[derive(Debug)]
pub struct PwmOutput {
    last_led: u8,
    duty: u8,
}

impl PwmOutput {
    pub const fn new() -> PwmOutput {
        PwmOutput {
            last_led: 0,
            duty: 0,
        }
    }

    /// last effective duty written, percent
    pub fn duty(&self) -> u8 {
        self.duty
    }

    /// set the pwm and move the LED, the LED follows the run duty so it
    /// does not flicker with the gate and is only lit while running
    pub fn apply<W, P>(
        &mut self,
        mode: RunMode,
        percent: u8,
        gate: GatePhase,
        pwm: &mut W,
        panel: &mut P,
    ) where
        W: PwmPin<Duty = u8>,
        P: Panel,
    {
        self.duty = effective_duty(mode, percent, gate);
        pwm.set_duty(hw_duty(self.duty));

        panel.set_led(self.last_led, false);
        self.last_led = led_bucket(run_duty(mode, percent));
        if mode == RunMode::Run {
            panel.set_led(self.last_led, true);
        }
    }
}

impl Default for PwmOutput {
    fn default() -> Self {
        PwmOutput::new()
    }
}

//==========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{MockPanel, MockPwm};
    use pretty_assertions::assert_eq;

    #[test]
    fn duty_needs_run_and_open_gate() {
        assert_eq!(effective_duty(RunMode::Run, 40, GatePhase::Open), 40);
        assert_eq!(effective_duty(RunMode::Off, 40, GatePhase::Open), 0);
        assert_eq!(effective_duty(RunMode::Run, 40, GatePhase::Closed), 0);
    }

    #[test]
    fn scaled_to_timer() {
        assert_eq!(hw_duty(0), 0);
        assert_eq!(hw_duty(37), 74);
        assert_eq!(hw_duty(100), 200);
    }

    #[test]
    fn led_buckets() {
        assert_eq!(led_bucket(0), 0);
        assert_eq!(led_bucket(5), 0);
        assert_eq!(led_bucket(17), 0);
        assert_eq!(led_bucket(18), 1);
        assert_eq!(led_bucket(50), 3);
        assert_eq!(led_bucket(89), 6);
        assert_eq!(led_bucket(90), 7);
        assert_eq!(led_bucket(100), 7);
    }

    #[test]
    fn led_lit_only_while_running() {
        let mut out = PwmOutput::new();
        let mut pwm = MockPwm::default();
        let mut panel = MockPanel::default();

        out.apply(RunMode::Run, 50, GatePhase::Open, &mut pwm, &mut panel);
        assert_eq!(pwm.duty, 100);
        assert_eq!(panel.leds, [false, false, false, true, false, false, false, false]);

        out.apply(RunMode::Run, 50, GatePhase::Closed, &mut pwm, &mut panel);
        assert_eq!(pwm.duty, 0);
        assert!(panel.leds[3]);

        out.apply(RunMode::Off, 50, GatePhase::Open, &mut pwm, &mut panel);
        assert_eq!(pwm.duty, 0);
        assert_eq!(panel.leds, [false; 8]);
    }
}
