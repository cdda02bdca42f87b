//! operating and display modes

use crate::config::DisplayCycle;
use ufmt::derive::uDebug;

//==========================================================

/// is the pump allowed to turn
#[derive(Debug, Copy, Clone, PartialEq, Eq, uDebug)]
pub enum RunMode {
    Off,
    Run,
}

//==========================================================

/// what the display shows, each one has its own key bindings
#[derive(Debug, Copy, Clone, PartialEq, Eq, uDebug)]
pub enum DisplayMode {
    Percent,
    Hours,
    Cycle,
}

impl DisplayMode {
    /// the display after this one for the change display key
    pub fn next(self, cycle: DisplayCycle) -> DisplayMode {
        match (self, cycle) {
            (DisplayMode::Percent, _) => DisplayMode::Hours,
            (DisplayMode::Hours, DisplayCycle::PercentHoursCycle) => DisplayMode::Cycle,
            (DisplayMode::Hours, DisplayCycle::PercentHours) => DisplayMode::Percent,
            (DisplayMode::Cycle, _) => DisplayMode::Percent,
        }
    }
}

//==========================================================

/// cycle time picked for adjustment on the cycle display
#[derive(Debug, Copy, Clone, PartialEq, Eq, uDebug)]
pub enum CycleEditTarget {
    None,
    OnTime,
    OffTime,
}

impl CycleEditTarget {
    /// selecting the current target again deselects it
    pub fn toggle(self, pick: CycleEditTarget) -> CycleEditTarget {
        if self == pick {
            CycleEditTarget::None
        } else {
            pick
        }
    }
}

//==========================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn three_way_cycle() {
        let c = DisplayCycle::PercentHoursCycle;
        let d = DisplayMode::Percent.next(c);
        assert_eq!(d, DisplayMode::Hours);
        let d = d.next(c);
        assert_eq!(d, DisplayMode::Cycle);
        assert_eq!(d.next(c), DisplayMode::Percent);
    }

    #[test]
    fn two_way_cycle() {
        let c = DisplayCycle::PercentHours;
        let d = DisplayMode::Percent.next(c);
        assert_eq!(d, DisplayMode::Hours);
        assert_eq!(d.next(c), DisplayMode::Percent);
    }

    #[test]
    fn target_toggles() {
        let t = CycleEditTarget::None.toggle(CycleEditTarget::OnTime);
        assert_eq!(t, CycleEditTarget::OnTime);
        assert_eq!(t.toggle(CycleEditTarget::OffTime), CycleEditTarget::OffTime);
        assert_eq!(t.toggle(CycleEditTarget::OnTime), CycleEditTarget::None);
    }
}
