//! Control logic for a PWM pump speed controller.
//!
//! A keypad/display panel sets the pump speed in percent, an optional
//! on/off duty-cycle gate handles flows below what the PWM can do, and the
//! run time is counted in thousandths of an hour in EEPROM.
//!
//! Everything here is hardware independent. The firmware supplies the
//! [`hw::Panel`], [`hw::Beeper`], [`store::Eeprom`] and an
//! `embedded_hal::PwmPin`, calls [`controller::Controller::tick`] once per
//! tenth second and steps the millisecond helpers in [`pacing`] and
//! [`keypad::KeyScanner`] from its timer interrupt.
//!
//! ```no_run
//! # use pwm_pump_core::{config::Config, controller::{Board, Controller}, tick::{TickCounter, Ticker}};
//! # fn run<P, W, B, E>(mut board: Board<P, W, B, E>, ticks: &TickCounter) -> !
//! # where P: pwm_pump_core::hw::Panel, W: embedded_hal::PwmPin<Duty = u8>,
//! #       B: pwm_pump_core::hw::Beeper, E: pwm_pump_core::store::Eeprom {
//! let mut controller = Controller::new(Config::default(), board.store.load());
//! controller.start(&mut board);
//! let mut ticker = Ticker::new(ticks);
//! loop {
//!     while ticker.poll(ticks) {
//!         controller.tick(&mut board);
//!     }
//! }
//! # }
//! ```

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod controller;
pub mod display;
pub mod gate;
pub mod hours;
pub mod hw;
pub mod keypad;
pub mod mode;
pub mod output;
pub mod pacing;
pub mod store;
pub mod tick;

#[cfg(test)]
mod mock;

pub use crate::config::{Config, DisplayCycle};
pub use crate::controller::{Board, Controller, Event, Events};
pub use crate::store::{CycleConfig, PersistedConfig, PersistentStore};
