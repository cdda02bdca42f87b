//! the persisted record: hour count and cycle times
//!
//! Layout, 6 bytes: `hour_frac` (i32 range, little endian, thousandths of
//! an hour), `cycle_on`, `cycle_off` (tenths of a second, 0-99). The record
//! is kept in three banks so a write cut off by power loss leaves a complete
//! copy behind.

use crate::config::{BANKS, BANK_STRIDE, CYCLE_MAX};
use ufmt::derive::uDebug;

//==========================================================

/// non-volatile memory, byte addressed. Writes are only accepted between
/// `unlock` and `lock`.
pub trait Eeprom {
    fn unlock(&mut self);
    fn lock(&mut self);
    fn read(&self, address: u16) -> u8;
    fn write(&mut self, address: u16, val: u8);
}

//==========================================================

/// secondary on/off timer settings, both in tenths of a second
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, uDebug)]
pub struct CycleConfig {
    pub on_time: u8,
    pub off_time: u8,
}

impl CycleConfig {
    /// the gate only runs when both times are set
    pub fn is_active(&self) -> bool {
        self.on_time != 0 && self.off_time != 0
    }
}

/// everything that survives a power cycle
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct PersistedConfig {
    pub hour_frac: u32,
    pub cycle: CycleConfig,
}

pub const RECORD_LEN: usize = 6;

impl PersistedConfig {
    pub fn to_bytes(&self) -> [u8; RECORD_LEN] {
        let h = self.hour_frac.to_le_bytes();
        [h[0], h[1], h[2], h[3], self.cycle.on_time, self.cycle.off_time]
    }

    /// decode a record, out of range fields fall back to their defaults
    /// (erased memory reads as 0xFF)
    pub fn from_bytes(bytes: [u8; RECORD_LEN]) -> PersistedConfig {
        let hour_frac = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let hour_frac = if hour_frac > i32::MAX as u32 {
            0
        } else {
            hour_frac
        };
        let time = |v: u8| if v > CYCLE_MAX { 0 } else { v };
        PersistedConfig {
            hour_frac,
            cycle: CycleConfig {
                on_time: time(bytes[4]),
                off_time: time(bytes[5]),
            },
        }
    }
}

//==========================================================

/// owns the EEPROM, reads and writes the whole record
pub struct PersistentStore<E> {
    eeprom: E,
    address: u16,
}

impl<E: Eeprom> PersistentStore<E> {
    pub fn new(eeprom: E, address: u16) -> PersistentStore<E> {
        PersistentStore { eeprom, address }
    }

    fn read_bank(&self, bank: u16) -> [u8; RECORD_LEN] {
        let mut rec = [0; RECORD_LEN];
        let base = self.address + bank * BANK_STRIDE;
        for (i, b) in rec.iter_mut().enumerate() {
            *b = self.eeprom.read(base + i as u16);
        }
        rec
    }

    /// read the three banks, bank 1 if it agrees with bank 2 else bank 0
    pub fn load(&self) -> PersistedConfig {
        let b0 = self.read_bank(0);
        let b1 = self.read_bank(1);
        let b2 = self.read_bank(2);
        if b1 == b2 {
            PersistedConfig::from_bytes(b2)
        } else {
            PersistedConfig::from_bytes(b0)
        }
    }

    /// write the whole record to every bank inside one unlock/lock bracket.
    /// Banks are written one after the other so at most one is ever partly
    /// written. Bytes that already hold the value are skipped.
    ///
    /// The EEPROM gives no failure signal, a failed write goes unnoticed
    /// until the next load.
    pub fn save(&mut self, value: &PersistedConfig) {
        let rec = value.to_bytes();
        self.eeprom.unlock();
        for bank in 0..BANKS {
            let base = self.address + bank * BANK_STRIDE;
            for (i, b) in rec.iter().enumerate() {
                let addr = base + i as u16;
                if self.eeprom.read(addr) != *b {
                    self.eeprom.write(addr, *b);
                }
            }
        }
        self.eeprom.lock();
    }

    pub fn eeprom(&self) -> &E {
        &self.eeprom
    }

    pub fn eeprom_mut(&mut self) -> &mut E {
        &mut self.eeprom
    }
}

//==========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MemEeprom;
    use pretty_assertions::assert_eq;

    fn sample() -> PersistedConfig {
        PersistedConfig {
            hour_frac: 123_456,
            cycle: CycleConfig {
                on_time: 15,
                off_time: 30,
            },
        }
    }

    #[test]
    fn save_then_load() {
        let mut store = PersistentStore::new(MemEeprom::new(), 0);
        store.save(&sample());
        assert_eq!(store.load(), sample());
        assert!(!store.eeprom().is_unlocked());
    }

    #[test]
    fn save_then_load_at_the_limits() {
        let mut store = PersistentStore::new(MemEeprom::new(), 0);
        for &hour_frac in [0, 1, 0xFF, 0x100, i32::MAX as u32].iter() {
            let times = [(0, 0), (0, CYCLE_MAX), (CYCLE_MAX, 0), (CYCLE_MAX, CYCLE_MAX)];
            for &(on_time, off_time) in times.iter() {
                let rec = PersistedConfig {
                    hour_frac,
                    cycle: CycleConfig { on_time, off_time },
                };
                store.save(&rec);
                assert_eq!(store.load(), rec);
            }
        }
        // one past the limits falls back to the defaults
        let rec = PersistedConfig {
            hour_frac: i32::MAX as u32 + 1,
            cycle: CycleConfig {
                on_time: CYCLE_MAX + 1,
                off_time: CYCLE_MAX,
            },
        };
        store.save(&rec);
        assert_eq!(
            store.load(),
            PersistedConfig {
                hour_frac: 0,
                cycle: CycleConfig {
                    on_time: 0,
                    off_time: CYCLE_MAX
                },
            }
        );
    }

    #[test]
    fn save_of_load_writes_nothing() {
        let mut store = PersistentStore::new(MemEeprom::new(), 0);
        store.save(&sample());
        let writes = store.eeprom().writes;

        let loaded = store.load();
        store.save(&loaded);
        assert_eq!(store.eeprom().writes, writes);
        assert_eq!(store.load(), sample());
    }

    #[test]
    fn erased_memory_loads_defaults() {
        let store = PersistentStore::new(MemEeprom::new(), 0);
        assert_eq!(store.load(), PersistedConfig::default());
    }

    #[test]
    fn out_of_range_cycle_time_is_cleared() {
        let rec = PersistedConfig::from_bytes([10, 0, 0, 0, 120, 30]);
        assert_eq!(rec.hour_frac, 10);
        assert_eq!(
            rec.cycle,
            CycleConfig {
                on_time: 0,
                off_time: 30
            }
        );
    }

    #[test]
    fn record_is_little_endian() {
        let rec = PersistedConfig {
            hour_frac: 0x0102_0304,
            cycle: CycleConfig {
                on_time: 5,
                off_time: 6,
            },
        };
        assert_eq!(rec.to_bytes(), [4, 3, 2, 1, 5, 6]);
    }

    #[test]
    fn torn_write_keeps_a_whole_record() {
        let old = sample();
        let new = PersistedConfig {
            hour_frac: 999,
            cycle: CycleConfig {
                on_time: 1,
                off_time: 2,
            },
        };

        // power lost half way through each bank in turn
        for torn_bank in 0..BANKS {
            let mut store = PersistentStore::new(MemEeprom::new(), 0);
            store.save(&old);
            let bytes = new.to_bytes();
            let mem = store.eeprom_mut();
            mem.unlock();
            for bank in 0..torn_bank {
                for (i, b) in bytes.iter().enumerate() {
                    mem.write(bank * BANK_STRIDE + i as u16, *b);
                }
            }
            for (i, b) in bytes.iter().enumerate().take(3) {
                mem.write(torn_bank * BANK_STRIDE + i as u16, *b);
            }
            mem.lock();

            let loaded = store.load();
            if torn_bank == 0 {
                assert_eq!(loaded, old);
            } else {
                assert_eq!(loaded, new);
            }
        }
    }

    #[test]
    fn single_bad_bank_is_outvoted() {
        let mut store = PersistentStore::new(MemEeprom::new(), 0);
        store.save(&sample());
        let mem = store.eeprom_mut();
        mem.unlock();
        mem.write(4, 77);
        mem.lock();
        assert_eq!(store.load(), sample());
    }
}
