//! test doubles for the hardware traits

use crate::hw::{Beeper, Panel};
use crate::store::Eeprom;
use std::collections::VecDeque;
use std::string::String;

//==========================================================

#[derive(Debug, Default)]
pub struct MockPanel {
    pub keys: VecDeque<u8>,
    pub text: String,
    pub writes: usize,
    pub leds: [bool; 8],
    pub blink: u8,
}

impl MockPanel {
    pub fn queue(&mut self, code: u8) {
        self.keys.push_back(code);
    }
}

impl Panel for MockPanel {
    fn poll(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }

    fn clear(&mut self) {
        self.text.clear();
    }

    fn write_at(&mut self, cursor: u8, text: &str) {
        assert_eq!(cursor, 0);
        self.text.push_str(text);
        self.writes += 1;
    }

    fn set_led(&mut self, index: u8, on: bool) {
        self.leds[index as usize] = on;
    }

    fn blink(&mut self, rate: u8) {
        self.blink = rate;
    }
}

//==========================================================

#[derive(Debug, Default)]
pub struct MockPwm {
    pub duty: u8,
    pub enabled: bool,
}

impl embedded_hal::PwmPin for MockPwm {
    type Duty = u8;

    fn disable(&mut self) {
        self.enabled = false;
    }

    fn enable(&mut self) {
        self.enabled = true;
    }

    fn get_duty(&self) -> u8 {
        self.duty
    }

    fn get_max_duty(&self) -> u8 {
        crate::config::PWM_TOP
    }

    fn set_duty(&mut self, duty: u8) {
        assert!(duty <= crate::config::PWM_TOP);
        self.duty = duty;
    }
}

//==========================================================

#[derive(Debug, Default)]
pub struct MockBeeper {
    pub pulses: usize,
}

impl Beeper for MockBeeper {
    fn pulse(&mut self) {
        self.pulses += 1;
    }
}

//==========================================================

/// 1K of erased EEPROM that refuses writes while locked
pub struct MemEeprom {
    pub cells: [u8; 1024],
    pub writes: usize,
    unlocked: bool,
}

impl MemEeprom {
    pub fn new() -> MemEeprom {
        MemEeprom {
            cells: [0xFF; 1024],
            writes: 0,
            unlocked: false,
        }
    }

    pub fn is_unlocked(&self) -> bool {
        self.unlocked
    }
}

impl Eeprom for MemEeprom {
    fn unlock(&mut self) {
        self.unlocked = true;
    }

    fn lock(&mut self) {
        self.unlocked = false;
    }

    fn read(&self, address: u16) -> u8 {
        self.cells[address as usize]
    }

    fn write(&mut self, address: u16, val: u8) {
        assert!(self.unlocked, "write to locked eeprom at {}", address);
        self.cells[address as usize] = val;
        self.writes += 1;
    }
}
