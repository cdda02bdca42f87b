//! display text for each display mode
//!
//! The panel has 8 digits. A '.' does not take a digit of its own, it lights
//! the decimal point of the digit before it.

use crate::hw::Panel;
use crate::mode::{CycleEditTarget, RunMode};
use crate::store::CycleConfig;
use heapless::String;

//==========================================================

pub type Line = String<16>;

/// append `value` right aligned in `width` digits, blank filled
fn push_padded(line: &mut Line, value: u32, width: u8) {
    let mut digits = 1;
    let mut v = value / 10;
    while v > 0 {
        digits += 1;
        v /= 10;
    }
    for _ in digits..width {
        line.push(' ').ok();
    }
    ufmt::uwrite!(line, "{}", value).ok();
}

/// append `value` as exactly three digits, zero filled
fn push_thousandths(line: &mut Line, value: u32) {
    line.push((b'0' + (value / 100 % 10) as u8) as char).ok();
    line.push((b'0' + (value / 10 % 10) as u8) as char).ok();
    line.push((b'0' + (value % 10) as u8) as char).ok();
}

/// tenths of a second as seconds with one decimal
fn push_tenths(line: &mut Line, tenths: u32, width: u8) {
    push_padded(line, tenths / 10, width);
    ufmt::uwrite!(line, ".{}", tenths % 10).ok();
}

//==========================================================

/// mode and speed, or time left and speed while a countdown runs
pub fn percent_line(mode: RunMode, percent: u8, countdown: u16) -> Line {
    let mut line = Line::new();
    if countdown != 0 {
        push_tenths(&mut line, countdown as u32, 2);
        line.push_str("  ").ok();
    } else {
        let label = match mode {
            RunMode::Off => "OFF  ",
            RunMode::Run => "RUN  ",
        };
        line.push_str(label).ok();
    }
    push_padded(&mut line, percent as u32, 3);
    line
}

/// run time, hours with three decimals
pub fn hours_line(hour_frac: u32) -> Line {
    let mut line = Line::new();
    line.push('H').ok();
    push_padded(&mut line, hour_frac / 1000 % 10_000, 4);
    line.push('.').ok();
    push_thousandths(&mut line, hour_frac % 1000);
    line
}

/// cycle times, the first digit shows which one the adjust keys change
pub fn cycle_line(cycle: &CycleConfig, target: CycleEditTarget) -> Line {
    let mut line = Line::new();
    let marker = match target {
        CycleEditTarget::None => 'C',
        CycleEditTarget::OnTime => 'o',
        CycleEditTarget::OffTime => 'F',
    };
    line.push(marker).ok();
    line.push(' ').ok();
    push_tenths(&mut line, cycle.on_time as u32, 1);
    line.push(' ').ok();
    push_tenths(&mut line, cycle.off_time as u32, 1);
    line
}

//==========================================================

/// last frame sent to the panel, nothing is resent unless it changed
#[derive(Debug)]
pub struct Screen {
    text: Line,
    blink: u8,
}

impl Screen {
    pub fn new() -> Screen {
        Screen {
            text: Line::new(),
            blink: 0,
        }
    }

    /// clear the panel and forget the last frame
    pub fn clear<P: Panel>(&mut self, panel: &mut P) {
        panel.clear();
        panel.blink(0);
        self.text.clear();
        self.blink = 0;
    }

    pub fn show<P: Panel>(&mut self, panel: &mut P, text: Line, blink: u8) {
        if text != self.text {
            panel.clear();
            panel.write_at(0, &text);
            self.text = text;
        }
        if blink != self.blink {
            panel.blink(blink);
            self.blink = blink;
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for Screen {
    fn default() -> Self {
        Screen::new()
    }
}

//==========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockPanel;
    use pretty_assertions::assert_eq;

    #[test]
    fn percent_text() {
        assert_eq!(percent_line(RunMode::Off, 0, 0).as_str(), "OFF    0");
        assert_eq!(percent_line(RunMode::Run, 50, 0).as_str(), "RUN   50");
        assert_eq!(percent_line(RunMode::Run, 100, 0).as_str(), "RUN  100");
    }

    #[test]
    fn countdown_text() {
        assert_eq!(percent_line(RunMode::Run, 50, 600).as_str(), "60.0   50");
        assert_eq!(percent_line(RunMode::Run, 7, 95).as_str(), " 9.5    7");
        assert_eq!(percent_line(RunMode::Run, 7, 3).as_str(), " 0.3    7");
    }

    #[test]
    fn hours_text() {
        assert_eq!(hours_line(0).as_str(), "H   0.000");
        assert_eq!(hours_line(1234).as_str(), "H   1.234");
        assert_eq!(hours_line(12_345_067).as_str(), "H2345.067");
    }

    #[test]
    fn cycle_text() {
        let cfg = CycleConfig {
            on_time: 15,
            off_time: 30,
        };
        assert_eq!(cycle_line(&cfg, CycleEditTarget::None).as_str(), "C 1.5 3.0");
        assert_eq!(cycle_line(&cfg, CycleEditTarget::OnTime).as_str(), "o 1.5 3.0");
        let cfg = CycleConfig {
            on_time: 0,
            off_time: 99,
        };
        assert_eq!(cycle_line(&cfg, CycleEditTarget::OffTime).as_str(), "F 0.0 9.9");
    }

    #[test]
    fn screen_sends_only_changes() {
        let mut panel = MockPanel::default();
        let mut screen = Screen::new();
        screen.show(&mut panel, hours_line(1), 0);
        screen.show(&mut panel, hours_line(1), 0);
        assert_eq!(panel.writes, 1);
        assert_eq!(panel.text.as_str(), "H   0.001");
        assert_eq!(screen.text(), "H   0.001");

        screen.show(&mut panel, hours_line(1), 25);
        assert_eq!(panel.writes, 1);
        assert_eq!(panel.blink, 25);
    }
}
