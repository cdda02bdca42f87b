//! project configuration items
//!
//! Times are in tenths of a second unless the name says otherwise.

//==========================================================

/// hold time of the hours reset key before the counter is cleared
pub const RESET_HOLD: u8 = 20;

/// blink rate while the hours reset key is held, 1/100 second
pub const RESET_BLINK: u8 = 25;

/// blink rate while a cycle time is selected for editing, 1/100 second
pub const EDIT_BLINK: u8 = 50;

/// length of a timed test run started from the percent display
pub const COUNTDOWN: u16 = 600;

/// hour counter auto-save interval, 5 minutes.
/// The EEPROM is rated for 100,000 writes per cell. The low byte of the
/// count changes on every save, so running around the clock it wears out
/// after roughly a year (105,120 saves). Key press saves come on top.
pub const HOUR_SAVE: u16 = 3000;

/// tenths of a second per thousandth of an hour
pub const TICKS_PER_UNIT: u8 = 36;

/// largest value of a cycle time, 9.9 seconds
pub const CYCLE_MAX: u8 = 99;

/// highest pump speed
pub const PERCENT_MAX: u8 = 100;

//==========================================================

/// hardware duty units per percent, timer TOP is PERCENT_MAX * PWM_SCALE
pub const PWM_SCALE: u8 = 2;

/// top of the pwm timer
pub const PWM_TOP: u8 = PERCENT_MAX * PWM_SCALE;

/// LED bar bucketing, led = (duty - offset) / step
pub const LED_OFFSET: u8 = 6;
pub const LED_STEP: u8 = 12;
pub const LED_COUNT: u8 = 8;

//==========================================================
// millisecond side

/// key press beep length, milliseconds
pub const BEEP_MS: u8 = 30;

/// keypad sample period, milliseconds
pub const SCAN_PERIOD_MS: u8 = 10;

/// milliseconds per logic tick
pub const MS_PER_TICK: u8 = 100;

//==========================================================
// EEPROM

/// address of the persisted record in bank 0
pub const RECORD_ADDRESS: u16 = 0;

/// distance between the redundant copies of the record
pub const BANK_STRIDE: u16 = 256;

/// number of redundant copies
pub const BANKS: u16 = 3;

//==========================================================

/// which displays the change display key steps through
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum DisplayCycle {
    /// percent and hours only
    PercentHours,
    /// percent, hours and cycle times
    PercentHoursCycle,
}

/// runtime tunables, defaults come from the constants above
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Config {
    pub display_cycle: DisplayCycle,
    pub reset_hold: u8,
    pub reset_blink: u8,
    pub edit_blink: u8,
    pub countdown: u16,
    pub hour_save: u16,
}

impl Config {
    pub const fn new(display_cycle: DisplayCycle) -> Config {
        Config {
            display_cycle,
            reset_hold: RESET_HOLD,
            reset_blink: RESET_BLINK,
            edit_blink: EDIT_BLINK,
            countdown: COUNTDOWN,
            hour_save: HOUR_SAVE,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config::new(DisplayCycle::PercentHoursCycle)
    }
}
