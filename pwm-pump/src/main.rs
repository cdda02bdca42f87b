//! firmware for the pwm pump controller, arduino nano with a TM1638 panel
//!
//! Shared between the interrupt and the main loop:
//! - `TICKS`, a single byte advanced by the timer isr every 100 ms
//! - the key code queue, lock free spsc (see `panel`)
//! - `panel::PANEL` and `MS_STATE`, only touched inside critical sections

#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

#[cfg(not(debug_assertions))]
use panic_halt as _;

use arduino_hal::hal::{
    pac, port,
    port::{mode, Pin},
};
use avr_device::interrupt;
use avr_device::interrupt::Mutex;
use avr_hal_generic::pwm::Prescaler;
use core::cell::RefCell;
use pwm_pump_core::config::RECORD_ADDRESS;
use pwm_pump_core::pacing::{Heartbeat, MsDivider};
use pwm_pump_core::tick::{TickCounter, Ticker};
use pwm_pump_core::{Board, Config, Controller, DisplayCycle, PersistentStore};

// modules from project
mod eeprom;
use eeprom::AvrEeprom;
mod nanopwm;
use nanopwm::{PwmPin, Timer0Pwm};
mod panel;
use panel::PinBeeper;
mod tm1638;
use tm1638::Tm1638;
#[cfg(debug_assertions)]
mod utility;

#[cfg(debug_assertions)]
#[panic_handler]
fn panic(_pi: &core::panic::PanicInfo<'_>) -> ! {
    // pump off, it is safer stopped than stuck at some speed
    let tc0 = unsafe { &*<pac::TC0>::ptr() };
    tc0.tccr0a.modify(|_, w| w.com0b().disconnected());
    unsafe { tc0.ocr0b.write(|w| w.bits(0)) };
    loop {}
}

//==========================================================

/// tenth-second tick, advanced in TIMER2_COMPA
static TICKS: TickCounter = TickCounter::new();

/// millisecond isr state that is not part of the panel
struct MsState {
    divider: MsDivider,
    heartbeat: Heartbeat,
    led: Pin<mode::Output, port::PB5>,
}

static MS_STATE: Mutex<RefCell<Option<MsState>>> = Mutex::new(RefCell::new(None));

//==========================================================

/// which displays the DISPLAY key steps through
fn config() -> Config {
    #[cfg(feature = "cycle_mode")]
    let cycle = DisplayCycle::PercentHoursCycle;
    #[cfg(not(feature = "cycle_mode"))]
    let cycle = DisplayCycle::PercentHours;
    Config::new(cycle)
}

//==========================================================

#[arduino_hal::entry]
fn main() -> ! {
    let dp = arduino_hal::Peripherals::take().unwrap();

    // turn off unused modules
    let cpu = dp.CPU;
    cpu.prr.write(|w| {
        w.prtim1().set_bit();
        w.prtwi().set_bit();
        w.prspi().set_bit();
        w.pradc().set_bit()
    });
    #[cfg(not(debug_assertions))]
    cpu.prr.modify(|_, w| w.prusart0().set_bit());
    // turn off analog comparator
    dp.AC.acsr.write(|w| w.acd().set_bit());

    let pins = arduino_hal::pins!(dp);

    #[cfg(debug_assertions)]
    let mut serial = arduino_hal::default_serial!(dp, pins, 57600);

    // pump pwm on D5, off until the controller starts
    let mut timer0 = Timer0Pwm::new(dp.TC0, Prescaler::Prescale8);
    let pwm = PwmPin::into_pwm(pins.d5.into_output(), &mut timer0);

    let tm = Tm1638::new(
        pins.d8.into_output(),
        pins.d9.into_opendrain_high(),
        pins.d10.into_output(),
    );
    let beeper = pins.d4.into_output();
    let led = pins.d13.into_output();

    let store = PersistentStore::new(AvrEeprom::new(dp.EEPROM), RECORD_ADDRESS);
    let persisted = store.load();

    let panel = interrupt::free(|cs| {
        MS_STATE.borrow(cs).replace(Some(MsState {
            divider: MsDivider::new(),
            heartbeat: Heartbeat::new(),
            led,
        }));
        panel::init(cs, tm, beeper)
    });

    let mut board = Board {
        panel,
        pwm,
        beeper: PinBeeper,
        store,
    };
    let mut controller = Controller::new(config(), persisted);
    controller.start(&mut board);

    #[cfg(debug_assertions)]
    utility::send_banner(&mut serial, &persisted);

    // timer2, CTC at 1 kHz: 16 MHz / 64 / 250
    let timer2 = dp.TC2;
    timer2.tccr2a.write(|w| w.wgm2().ctc());
    unsafe { timer2.ocr2a.write(|w| w.bits(249)) };
    timer2.tccr2b.write(|w| w.cs2().prescale_64());
    timer2.timsk2.write(|w| w.ocie2a().set_bit());

    // watchdog
    let wdt = dp.WDT;
    interrupt::free(|_cs| {
        cpu.mcusr.modify(|_, w| w.wdrf().clear_bit());
        avr_device::asm::wdr();
        // follow timed sequence to change wdt
        wdt.wdtcsr.modify(|_, w| w.wdce().set_bit().wde().set_bit());
        // reset after 2 seconds without a wdr
        wdt.wdtcsr
            .write(|w| w.wde().set_bit().wdie().clear_bit().wdpl().cycles_256k());
    });

    unsafe { interrupt::enable() };

    let mut ticker = Ticker::new(&TICKS);
    loop {
        avr_device::asm::wdr();
        while ticker.poll(&TICKS) {
            let _events = controller.tick(&mut board);
            #[cfg(debug_assertions)]
            {
                utility::send_events(&mut serial, TICKS.now(), &_events);
                if panel::key_overflow() {
                    panel::clear_key_overflow();
                    utility::send_key_overflow(&mut serial);
                }
            }
        }
    }
}

//==========================================================

#[interrupt(atmega328p)]
fn TIMER2_COMPA() {
    interrupt::free(|cs| {
        panel::ms_tick(cs);
        if let Some(ms) = MS_STATE.borrow(cs).borrow_mut().as_mut() {
            if ms.divider.tick() {
                TICKS.advance();
                if ms.heartbeat.step() {
                    ms.led.set_high();
                } else {
                    ms.led.set_low();
                }
            }
        }
    });
}
