//! the atmega328p EEPROM behind the `Eeprom` trait

use avr_device::atmega328p::EEPROM;
use avr_device::interrupt;
use pwm_pump_core::store::Eeprom;

/// EECR bits
const EERE: u8 = 0x1;
const EEPE: u8 = 0x2;
const EEMPE: u8 = 0x4;

//==========================================================

pub struct AvrEeprom {
    eeprom: EEPROM,
    unlocked: bool,
}

impl AvrEeprom {
    pub fn new(eeprom: EEPROM) -> AvrEeprom {
        AvrEeprom {
            eeprom,
            unlocked: false,
        }
    }

    fn busy(&self) -> bool {
        self.eeprom.eecr.read().bits() & EEPE == EEPE
    }
}

//==========================================================

impl Eeprom for AvrEeprom {
    fn unlock(&mut self) {
        self.unlocked = true;
    }

    fn lock(&mut self) {
        // let the last write finish before anything else touches the eeprom
        while self.busy() {}
        self.unlocked = false;
    }

    fn read(&self, address: u16) -> u8 {
        // poll until write op finished, with interrupts on. Only the main
        // loop touches the eeprom so nothing can start a write meanwhile.
        while self.busy() {}
        interrupt::free(|_| {
            unsafe {
                self.eeprom.eear.write(|w| w.bits(address));
                // flag a read
                self.eeprom.eecr.write(|w| w.bits(EERE));
            }
            self.eeprom.eedr.read().bits()
        })
    }

    fn write(&mut self, address: u16, val: u8) {
        if !self.unlocked {
            return;
        }
        // wait for completion of previous write
        while self.busy() {}
        interrupt::free(|_| {
            unsafe {
                self.eeprom.eear.write(|w| w.bits(address));
                self.eeprom.eedr.write(|w| w.bits(val));
                // EEPE has to follow EEMPE within 4 cycles
                self.eeprom.eecr.write(|w| w.bits(EEMPE));
                self.eeprom.eecr.write(|w| w.bits(EEMPE | EEPE));
            }
        });
    }
}
