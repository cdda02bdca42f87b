//! run time counter in thousandths of an hour

use crate::config::TICKS_PER_UNIT;

/// the record stores the count as an i32
pub const HOUR_FRAC_MAX: u32 = i32::MAX as u32;

//==========================================================

#[derive(Debug)]
pub struct HourAccumulator {
    hour_frac: u32,
    /// ticks left before the next thousandth
    divider: u8,
    /// ticks left before the next auto-save
    save_count: u16,
    save_interval: u16,
}

impl HourAccumulator {
    pub fn new(hour_frac: u32, save_interval: u16) -> HourAccumulator {
        let save_interval = save_interval.max(1);
        HourAccumulator {
            hour_frac,
            divider: TICKS_PER_UNIT,
            save_count: save_interval,
            save_interval,
        }
    }

    pub fn hour_frac(&self) -> u32 {
        self.hour_frac
    }

    /// clear the count, any partial thousandth is dropped too
    pub fn reset(&mut self) {
        self.hour_frac = 0;
        self.divider = TICKS_PER_UNIT;
    }

    /// call once per tick, `running` when the pump is on and the gate is
    /// open. Returns true when the count is due to be saved.
    pub fn tick(&mut self, running: bool) -> bool {
        if running {
            self.divider -= 1;
            if self.divider == 0 {
                self.divider = TICKS_PER_UNIT;
                if self.hour_frac < HOUR_FRAC_MAX {
                    self.hour_frac += 1;
                }
            }
        }
        self.save_count -= 1;
        if self.save_count == 0 {
            self.save_count = self.save_interval;
            true
        } else {
            false
        }
    }
}

//==========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HOUR_SAVE;

    #[test]
    fn one_unit_per_36_ticks() {
        let mut hours = HourAccumulator::new(0, HOUR_SAVE);
        for _ in 0..35 {
            hours.tick(true);
        }
        assert_eq!(hours.hour_frac(), 0);
        hours.tick(true);
        assert_eq!(hours.hour_frac(), 1);
    }

    #[test]
    fn no_drift_over_many_units() {
        let mut hours = HourAccumulator::new(5, HOUR_SAVE);
        for _ in 0..360 {
            hours.tick(true);
        }
        assert_eq!(hours.hour_frac(), 15);
    }

    #[test]
    fn remainder_carries_over_stopped_time() {
        let mut hours = HourAccumulator::new(0, HOUR_SAVE);
        for _ in 0..20 {
            hours.tick(true);
        }
        for _ in 0..100 {
            hours.tick(false);
        }
        for _ in 0..16 {
            hours.tick(true);
        }
        assert_eq!(hours.hour_frac(), 1);
    }

    #[test]
    fn count_stops_at_record_limit() {
        let mut hours = HourAccumulator::new(HOUR_FRAC_MAX - 1, HOUR_SAVE);
        for _ in 0..(3 * TICKS_PER_UNIT as usize) {
            hours.tick(true);
        }
        assert_eq!(hours.hour_frac(), HOUR_FRAC_MAX);

        let rec = crate::store::PersistedConfig {
            hour_frac: hours.hour_frac(),
            cycle: Default::default(),
        };
        let reloaded = crate::store::PersistedConfig::from_bytes(rec.to_bytes());
        assert_eq!(reloaded.hour_frac, HOUR_FRAC_MAX);
    }

    #[test]
    fn save_due_every_interval() {
        let mut hours = HourAccumulator::new(0, 50);
        let due: usize = (0..200).filter(|_| hours.tick(false)).count();
        assert_eq!(due, 4);
    }
}
