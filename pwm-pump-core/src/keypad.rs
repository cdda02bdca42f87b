//! keypad codes, debouncing and key hold timing

use crate::config::SCAN_PERIOD_MS;
use core::convert::TryFrom;
use heapless::Vec;
use ufmt::derive::uDebug;

//==========================================================

/// the eight keys of the panel. OFF/RUN, the 10% up/down and the 1%
/// up/down keys are spread out to avoid accidental changes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, uDebug)]
pub enum Key {
    Off,
    Run,
    Display,
    Down10,
    Up10,
    Reset,
    Down1,
    Up1,
}

pub const KEY_COUNT: usize = 8;

/// keys by index
const KEYS: [Key; KEY_COUNT] = [
    Key::Off,
    Key::Run,
    Key::Display,
    Key::Down10,
    Key::Up10,
    Key::Reset,
    Key::Down1,
    Key::Up1,
];

/// bit set in a raw key code on release
pub const RELEASE_BIT: u8 = 0x80;

/// raw code of key 0, the panel uses '0' to '7'
pub const KEY_BASE: u8 = b'0';

impl From<Key> for usize {
    fn from(original: Key) -> usize {
        match original {
            Key::Off => 0,
            Key::Run => 1,
            Key::Display => 2,
            Key::Down10 => 3,
            Key::Up10 => 4,
            Key::Reset => 5,
            Key::Down1 => 6,
            Key::Up1 => 7,
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum KeyParseError {
    InvalidIndex(u8),
}

/// convert from key index
impl TryFrom<u8> for Key {
    type Error = KeyParseError;

    fn try_from(original: u8) -> Result<Self, Self::Error> {
        match original {
            n if (n as usize) < KEY_COUNT => Ok(KEYS[n as usize]),
            n => Err(KeyParseError::InvalidIndex(n)),
        }
    }
}

//==========================================================

/// a press or release edge
#[derive(Debug, Copy, Clone, PartialEq, Eq, uDebug)]
pub struct KeyEvent {
    pub key: Key,
    pub released: bool,
}

impl KeyEvent {
    pub fn press(key: Key) -> KeyEvent {
        KeyEvent {
            key,
            released: false,
        }
    }

    pub fn release(key: Key) -> KeyEvent {
        KeyEvent {
            key,
            released: true,
        }
    }
}

/// decode a raw panel code, the low three bits are the key index
impl From<u8> for KeyEvent {
    fn from(raw: u8) -> KeyEvent {
        KeyEvent {
            key: KEYS[(raw & 0x07) as usize],
            released: raw & RELEASE_BIT != 0,
        }
    }
}

/// encode as a raw panel code
impl From<KeyEvent> for u8 {
    fn from(original: KeyEvent) -> u8 {
        let idx: usize = original.key.into();
        let code = KEY_BASE + idx as u8;
        if original.released {
            code | RELEASE_BIT
        } else {
            code
        }
    }
}

//==========================================================

/// samples the key bitmap from the millisecond interrupt and turns stable
/// changes into raw key codes
#[derive(Debug)]
pub struct KeyScanner {
    countdown: u8,
    last_sample: u8,
    stable: u8,
}

impl KeyScanner {
    pub const fn new() -> KeyScanner {
        KeyScanner {
            countdown: SCAN_PERIOD_MS,
            last_sample: 0,
            stable: 0,
        }
    }

    /// step one millisecond, true when the keys should be sampled
    pub fn due(&mut self) -> bool {
        self.countdown -= 1;
        if self.countdown == 0 {
            self.countdown = SCAN_PERIOD_MS;
            true
        } else {
            false
        }
    }

    /// feed a sampled bitmap (bit n set while key n is down). A bitmap is
    /// only accepted after two equal samples in a row; the codes for every
    /// key that changed are returned, lowest key first.
    pub fn sample(&mut self, bits: u8) -> Vec<u8, KEY_COUNT> {
        let mut codes = Vec::new();
        if bits != self.last_sample {
            self.last_sample = bits;
            return codes;
        }
        let changed = bits ^ self.stable;
        self.stable = bits;
        for i in 0..KEY_COUNT as u8 {
            if changed & (1 << i) == 0 {
                continue;
            }
            let code = KEY_BASE + i;
            let code = if bits & (1 << i) == 0 {
                code | RELEASE_BIT
            } else {
                code
            };
            // capacity is one per key
            codes.push(code).ok();
        }
        codes
    }
}

impl Default for KeyScanner {
    fn default() -> Self {
        KeyScanner::new()
    }
}

//==========================================================

/// per key hold time in tenths of a second, 0 when the key is up
#[derive(Debug, Default, PartialEq, Eq)]
pub struct KeyTracker {
    hold: [u8; KEY_COUNT],
}

impl KeyTracker {
    pub fn new() -> KeyTracker {
        KeyTracker {
            hold: [0; KEY_COUNT],
        }
    }

    pub fn press(&mut self, key: Key) {
        self.hold[usize::from(key)] = 1;
    }

    pub fn release(&mut self, key: Key) {
        self.hold[usize::from(key)] = 0;
    }

    /// forget a hold so it cannot trigger a hold action
    pub fn consume(&mut self, key: Key) {
        self.hold[usize::from(key)] = 0;
    }

    /// step one tenth second
    pub fn tick(&mut self) {
        for t in self.hold.iter_mut() {
            if *t != 0 {
                // saturate, a wrap would fire hold actions again
                *t = t.saturating_add(1);
            }
        }
    }

    pub fn held(&self, key: Key) -> u8 {
        self.hold[usize::from(key)]
    }

    /// true only on the tick the hold time equals the threshold
    pub fn held_exactly(&self, key: Key, ticks: u8) -> bool {
        self.held(key) == ticks
    }
}

//==========================================================
