//! the tenth-second control loop
//!
//! One [`Controller`] owns all volatile state. Each tick runs, in order:
//! hour counting (with the duty-cycle gate), key hold timers, the hours
//! reset hold check, the countdown, one key event, the deferred outputs and
//! finally the display. Outputs are applied once at the end of the tick so
//! the pump never sees an intermediate duty.

use crate::config::{Config, CYCLE_MAX, PERCENT_MAX};
use crate::display::{cycle_line, hours_line, percent_line, Screen};
use crate::gate::{DutyCycleGate, GatePhase};
use crate::hours::HourAccumulator;
use crate::hw::{Beeper, Panel};
use crate::keypad::{Key, KeyEvent, KeyTracker};
use crate::mode::{CycleEditTarget, DisplayMode, RunMode};
use crate::output::PwmOutput;
use crate::store::{CycleConfig, Eeprom, PersistedConfig, PersistentStore};
use bitflags::bitflags;
use embedded_hal::PwmPin;
use heapless::Vec;
use ufmt::derive::uDebug;

//==========================================================

bitflags! {
    /// side effects collected during a tick
    struct Pending: u8 {
    const OUTPUT = 0b0000_0001;
    const SAVE = 0b0000_0010;
    const BEEP = 0b0000_0100;
    }
}

//==========================================================

/// what happened during a tick, for the debug trace
#[derive(Debug, Copy, Clone, PartialEq, Eq, uDebug)]
pub enum Event {
    Key(KeyEvent),
    Mode(RunMode),
    Display(DisplayMode),
    Percent(u8),
    CountdownStarted(u16),
    CountdownExpired,
    ResetArmed,
    ResetCancelled,
    HoursReset,
    Target(CycleEditTarget),
    Cycle(CycleConfig),
    Gate(GatePhase),
    Saved(u32),
}

pub type Events = Vec<Event, 16>;

//==========================================================

/// what a key press does in a display mode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Action {
    Stop,
    Run,
    NextDisplay,
    AdjustPercent(i8),
    StartCountdown,
    ArmHoursReset,
    Select(CycleEditTarget),
    AdjustCycle(i8),
    /// +1.0 second, wraps past 9.9
    CoarseCycle,
    Ignore,
}

/// the key binding table
pub fn binding(display: DisplayMode, key: Key) -> Action {
    match (display, key) {
        // every display
        (_, Key::Off) => Action::Stop,
        (_, Key::Run) => Action::Run,
        (_, Key::Display) => Action::NextDisplay,

        (DisplayMode::Percent, Key::Down10) => Action::AdjustPercent(-10),
        (DisplayMode::Percent, Key::Up10) => Action::AdjustPercent(10),
        (DisplayMode::Percent, Key::Down1) => Action::AdjustPercent(-1),
        (DisplayMode::Percent, Key::Up1) => Action::AdjustPercent(1),
        (DisplayMode::Percent, Key::Reset) => Action::StartCountdown,

        (DisplayMode::Hours, Key::Reset) => Action::ArmHoursReset,
        (DisplayMode::Hours, Key::Down10)
        | (DisplayMode::Hours, Key::Up10)
        | (DisplayMode::Hours, Key::Down1)
        | (DisplayMode::Hours, Key::Up1) => Action::Ignore,

        (DisplayMode::Cycle, Key::Down10) => Action::Select(CycleEditTarget::OnTime),
        (DisplayMode::Cycle, Key::Up10) => Action::Select(CycleEditTarget::OffTime),
        (DisplayMode::Cycle, Key::Down1) => Action::AdjustCycle(-1),
        (DisplayMode::Cycle, Key::Up1) => Action::AdjustCycle(1),
        (DisplayMode::Cycle, Key::Reset) => Action::CoarseCycle,
    }
}

//==========================================================

/// the hardware a tick works on
pub struct Board<P, W, B, E> {
    pub panel: P,
    pub pwm: W,
    pub beeper: B,
    pub store: PersistentStore<E>,
}

//==========================================================

pub struct Controller {
    config: Config,
    run_mode: RunMode,
    display: DisplayMode,
    percent: u8,
    cycle: CycleConfig,
    target: CycleEditTarget,
    /// tenths of a second left in a timed run, 0 when none
    countdown: u16,
    reset_armed: bool,
    keys: KeyTracker,
    hours: HourAccumulator,
    gate: DutyCycleGate,
    gate_phase: GatePhase,
    output: PwmOutput,
    screen: Screen,
    pending: Pending,
    events: Events,
}

impl Controller {
    /// power up state, counters come from the persisted record
    pub fn new(config: Config, persisted: PersistedConfig) -> Controller {
        Controller {
            config,
            run_mode: RunMode::Off,
            display: DisplayMode::Percent,
            percent: 0,
            cycle: persisted.cycle,
            target: CycleEditTarget::None,
            countdown: 0,
            reset_armed: false,
            keys: KeyTracker::new(),
            hours: HourAccumulator::new(persisted.hour_frac, config.hour_save),
            gate: DutyCycleGate::new(),
            gate_phase: GatePhase::Open,
            output: PwmOutput::new(),
            screen: Screen::new(),
            pending: Pending::empty(),
            events: Events::new(),
        }
    }

    /// put the hardware in the power up state
    pub fn start<P, W, B, E>(&mut self, board: &mut Board<P, W, B, E>)
    where
        P: Panel,
        W: PwmPin<Duty = u8>,
        B: Beeper,
        E: Eeprom,
    {
        board.pwm.set_duty(0);
        board.pwm.enable();
        self.screen.clear(&mut board.panel);
        self.output.apply(
            self.run_mode,
            self.percent,
            self.gate_phase,
            &mut board.pwm,
            &mut board.panel,
        );
        self.render(&mut board.panel);
    }

    /// run one tenth second of logic
    pub fn tick<P, W, B, E>(&mut self, board: &mut Board<P, W, B, E>) -> Events
    where
        P: Panel,
        W: PwmPin<Duty = u8>,
        B: Beeper,
        E: Eeprom,
    {
        self.pending = Pending::empty();

        self.update_hours();
        self.keys.tick();
        self.check_reset_hold();
        self.update_countdown();
        if let Some(raw) = board.panel.poll() {
            self.handle_key(KeyEvent::from(raw));
        }
        self.flush(board);
        self.render(&mut board.panel);

        core::mem::take(&mut self.events)
    }

    //------------------------------------------------------

    pub fn run_mode(&self) -> RunMode {
        self.run_mode
    }

    pub fn display(&self) -> DisplayMode {
        self.display
    }

    pub fn percent(&self) -> u8 {
        self.percent
    }

    pub fn countdown(&self) -> u16 {
        self.countdown
    }

    pub fn hour_frac(&self) -> u32 {
        self.hours.hour_frac()
    }

    pub fn cycle(&self) -> CycleConfig {
        self.cycle
    }

    pub fn target(&self) -> CycleEditTarget {
        self.target
    }

    pub fn gate_phase(&self) -> GatePhase {
        self.gate_phase
    }

    /// effective duty last sent to the pwm, percent
    pub fn duty(&self) -> u8 {
        self.output.duty()
    }

    pub fn held(&self, key: Key) -> u8 {
        self.keys.held(key)
    }

    pub fn persisted(&self) -> PersistedConfig {
        PersistedConfig {
            hour_frac: self.hours.hour_frac(),
            cycle: self.cycle,
        }
    }

    //------------------------------------------------------

    fn note(&mut self, event: Event) {
        // a full trace only loses trace lines
        self.events.push(event).ok();
    }

    fn set_run_mode(&mut self, mode: RunMode) {
        if mode == self.run_mode {
            return;
        }
        self.run_mode = mode;
        if mode == RunMode::Off {
            self.gate.reset();
            self.gate_phase = GatePhase::Open;
        }
        self.pending |= Pending::OUTPUT;
        self.note(Event::Mode(mode));
    }

    /// step the gate and count run time while the pump is really on
    fn update_hours(&mut self) {
        let phase = match self.run_mode {
            RunMode::Run => self.gate.tick(&self.cycle),
            RunMode::Off => GatePhase::Open,
        };
        if phase != self.gate_phase {
            self.gate_phase = phase;
            self.pending |= Pending::OUTPUT;
            self.note(Event::Gate(phase));
        }
        let running = self.run_mode == RunMode::Run && phase == GatePhase::Open;
        if self.hours.tick(running) {
            self.pending |= Pending::SAVE;
        }
    }

    fn check_reset_hold(&mut self) {
        if self.reset_armed
            && self.display == DisplayMode::Hours
            && self.keys.held_exactly(Key::Reset, self.config.reset_hold)
        {
            self.hours.reset();
            self.reset_armed = false;
            self.keys.consume(Key::Reset);
            self.pending |= Pending::SAVE;
            self.note(Event::HoursReset);
        }
    }

    fn update_countdown(&mut self) {
        if self.countdown == 0 {
            return;
        }
        self.countdown -= 1;
        if self.countdown == 0 {
            self.note(Event::CountdownExpired);
            self.set_run_mode(RunMode::Off);
        }
    }

    fn handle_key(&mut self, event: KeyEvent) {
        self.note(Event::Key(event));
        if event.released {
            self.keys.release(event.key);
            if event.key == Key::Reset && self.reset_armed {
                self.reset_armed = false;
                self.note(Event::ResetCancelled);
            }
            return;
        }
        self.keys.press(event.key);
        self.perform(binding(self.display, event.key));
        // every press beeps, refreshes the output and saves the counters
        self.pending |= Pending::OUTPUT | Pending::SAVE | Pending::BEEP;
    }

    fn perform(&mut self, action: Action) {
        match action {
            Action::Stop => {
                self.countdown = 0;
                self.set_run_mode(RunMode::Off);
            }
            Action::Run => self.set_run_mode(RunMode::Run),
            Action::NextDisplay => {
                let next = self.display.next(self.config.display_cycle);
                if self.display == DisplayMode::Cycle || next == DisplayMode::Cycle {
                    self.target = CycleEditTarget::None;
                }
                if self.reset_armed {
                    self.reset_armed = false;
                    self.note(Event::ResetCancelled);
                }
                self.display = next;
                self.note(Event::Display(next));
            }
            Action::AdjustPercent(step) => {
                let p = (self.percent as i16 + step as i16).max(0).min(PERCENT_MAX as i16) as u8;
                if p != self.percent {
                    self.percent = p;
                    self.note(Event::Percent(p));
                }
            }
            Action::StartCountdown => {
                // this key is not a hold key here
                self.keys.consume(Key::Reset);
                self.countdown = self.config.countdown;
                self.note(Event::CountdownStarted(self.countdown));
                self.set_run_mode(RunMode::Run);
            }
            Action::ArmHoursReset => {
                self.reset_armed = true;
                self.note(Event::ResetArmed);
            }
            Action::Select(pick) => {
                self.target = self.target.toggle(pick);
                self.note(Event::Target(self.target));
            }
            Action::AdjustCycle(step) => {
                self.edit_cycle(|v| {
                    let n = v as i16 + step as i16;
                    if n < 0 || n > CYCLE_MAX as i16 {
                        v
                    } else {
                        n as u8
                    }
                });
            }
            Action::CoarseCycle => self.edit_cycle(|v| (v + 10) % (CYCLE_MAX + 1)),
            Action::Ignore => {}
        }
    }

    /// change the selected cycle time, nothing when none is selected
    fn edit_cycle<F: Fn(u8) -> u8>(&mut self, f: F) {
        let time = match self.target {
            CycleEditTarget::OnTime => &mut self.cycle.on_time,
            CycleEditTarget::OffTime => &mut self.cycle.off_time,
            CycleEditTarget::None => return,
        };
        let new = f(*time);
        if new != *time {
            *time = new;
            self.note(Event::Cycle(self.cycle));
        }
    }

    fn flush<P, W, B, E>(&mut self, board: &mut Board<P, W, B, E>)
    where
        P: Panel,
        W: PwmPin<Duty = u8>,
        B: Beeper,
        E: Eeprom,
    {
        if self.pending.contains(Pending::BEEP) {
            board.beeper.pulse();
        }
        if self.pending.contains(Pending::OUTPUT) {
            self.output.apply(
                self.run_mode,
                self.percent,
                self.gate_phase,
                &mut board.pwm,
                &mut board.panel,
            );
        }
        if self.pending.contains(Pending::SAVE) {
            board.store.save(&self.persisted());
            self.note(Event::Saved(self.hours.hour_frac()));
        }
    }

    fn render<P: Panel>(&mut self, panel: &mut P) {
        let text = match self.display {
            DisplayMode::Percent => percent_line(self.run_mode, self.percent, self.countdown),
            DisplayMode::Hours => hours_line(self.hours.hour_frac()),
            DisplayMode::Cycle => cycle_line(&self.cycle, self.target),
        };
        let blink = if self.reset_armed {
            self.config.reset_blink
        } else if self.display == DisplayMode::Cycle && self.target != CycleEditTarget::None {
            self.config.edit_blink
        } else {
            0
        };
        self.screen.show(panel, text, blink);
    }
}

//==========================================================
