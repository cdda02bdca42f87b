//! serial trace for debug builds

use pwm_pump_core::{Events, PersistedConfig};
use ufmt::{uWrite, uwrite, uwriteln};

const HEX_CHARS: [char; 16] = [
    '0', '1', '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F',
];

pub fn send_hex_byte<W: uWrite>(serial: &mut W, b: u8) {
    uwrite!(
        serial,
        "{}{}",
        HEX_CHARS[((b & 0xF0) >> 4) as usize],
        HEX_CHARS[(b & 0xF) as usize]
    )
    .ok();
}

/// startup line with the record as loaded from eeprom
pub fn send_banner<W: uWrite>(serial: &mut W, persisted: &PersistedConfig) {
    uwrite!(serial, "pwm-pump record ").ok();
    for b in persisted.to_bytes().iter() {
        send_hex_byte(serial, *b);
    }
    uwriteln!(
        serial,
        " hours {} cycle {}/{}\r",
        persisted.hour_frac,
        persisted.cycle.on_time,
        persisted.cycle.off_time
    )
    .ok();
}

/// one line per event, prefixed with the tick count
pub fn send_events<W: uWrite>(serial: &mut W, tick: u8, events: &Events) {
    for ev in events.iter() {
        uwriteln!(serial, "{} {:?}\r", tick, ev).ok();
    }
}

pub fn send_key_overflow<W: uWrite>(serial: &mut W) {
    uwriteln!(serial, "key queue overflow\r").ok();
}
