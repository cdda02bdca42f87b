//! the TM1638 panel and the beeper, shared between the millisecond isr and
//! the main loop
//!
//! The isr scans the keys, paces the display blink and ends beeps. Key codes
//! reach the main loop through a lock free spsc queue, everything else goes
//! through `PANEL` inside a critical section.

use crate::tm1638::Tm1638;
use arduino_hal::hal::{
    port,
    port::{mode, Pin},
};
use avr_device::interrupt;
use avr_device::interrupt::{CriticalSection, Mutex};
use core::cell::RefCell;
use core::sync::atomic::{AtomicBool, Ordering};
use heapless::spsc::{Consumer, Producer, Queue};
use pwm_pump_core::config::BEEP_MS;
use pwm_pump_core::hw::{Beeper, Panel};
use pwm_pump_core::keypad::KeyScanner;
use pwm_pump_core::pacing::{BlinkPacer, PulseTimer};

/// holds 7 key codes
const KEY_QUEUE_LEN: usize = 8;

//==========================================================

struct PanelState {
    tm: Tm1638,
    scanner: KeyScanner,
    blink: BlinkPacer,
    beep: PulseTimer,
    beeper: Pin<mode::Output, port::PD4>,
    keys: Producer<'static, u8, KEY_QUEUE_LEN>,
}

/// used in the millisecond isr and by `TmPanel`/`PinBeeper`
static PANEL: Mutex<RefCell<Option<PanelState>>> = Mutex::new(RefCell::new(None));

/// set when a key code was dropped because the queue was full
static KEY_OVERFLOW: AtomicBool = AtomicBool::new(false);

pub fn key_overflow() -> bool {
    KEY_OVERFLOW.load(Ordering::SeqCst)
}

pub fn clear_key_overflow() {
    KEY_OVERFLOW.store(false, Ordering::SeqCst);
}

//==========================================================

/// move the panel hardware into the shared state, return the main loop side
pub fn init(cs: &CriticalSection, tm: Tm1638, beeper: Pin<mode::Output, port::PD4>) -> TmPanel {
    static mut KEY_QUEUE: Queue<u8, KEY_QUEUE_LEN> = Queue::new();

    // SAFETY: called once, before the isr that uses the producer is enabled
    let (producer, consumer) = unsafe { KEY_QUEUE.split() };
    PANEL.borrow(cs).replace(Some(PanelState {
        tm,
        scanner: KeyScanner::new(),
        blink: BlinkPacer::new(),
        beep: PulseTimer::new(),
        beeper,
        keys: producer,
    }));
    TmPanel { keys: consumer }
}

//==========================================================

/// millisecond work, called from the timer isr
pub fn ms_tick(cs: &CriticalSection) {
    if let Some(st) = PANEL.borrow(cs).borrow_mut().as_mut() {
        if st.scanner.due() {
            let bits = st.tm.read_keys();
            for code in st.scanner.sample(bits) {
                if st.keys.enqueue(code).is_err() {
                    KEY_OVERFLOW.store(true, Ordering::SeqCst);
                }
            }
        }
        if let Some(visible) = st.blink.tick() {
            st.tm.set_visible(visible);
        }
        if st.beep.tick() {
            st.beeper.set_low();
        }
    }
}

//==========================================================

fn with_state<F: FnOnce(&mut PanelState)>(f: F) {
    interrupt::free(|cs| {
        if let Some(st) = PANEL.borrow(cs).borrow_mut().as_mut() {
            f(st);
        }
    });
}

//==========================================================

/// main loop side of the panel
pub struct TmPanel {
    keys: Consumer<'static, u8, KEY_QUEUE_LEN>,
}

impl Panel for TmPanel {
    fn poll(&mut self) -> Option<u8> {
        self.keys.dequeue()
    }

    fn clear(&mut self) {
        with_state(|st| st.tm.clear());
    }

    fn write_at(&mut self, cursor: u8, text: &str) {
        with_state(|st| st.tm.write_at(cursor, text));
    }

    fn set_led(&mut self, index: u8, on: bool) {
        with_state(|st| st.tm.set_led(index, on));
    }

    fn blink(&mut self, rate: u8) {
        with_state(|st| {
            st.blink.set_rate(rate);
            // never leave the display dark when blinking stops
            st.tm.set_visible(true);
        });
    }
}

//==========================================================

/// buzzer on D4, switched off again by the isr
pub struct PinBeeper;

impl Beeper for PinBeeper {
    fn pulse(&mut self) {
        with_state(|st| {
            st.beeper.set_high();
            st.beep.start(BEEP_MS);
        });
    }
}
