//! Once-per-day triggers keyed to the wall clock.

use crate::clock::LocalTime;

/// Day-of-month marker remembering when something last happened
///
/// Unset means "never": every day reads as new until the first `mark`.
/// Survives nothing; a power cycle resets it, which is what re-fires the
/// first-boot refresh.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DayMark {
    last_day: Option<u8>,
}

impl DayMark {
    pub const fn new() -> Self {
        Self { last_day: None }
    }

    pub fn is_set(&self) -> bool {
        self.last_day.is_some()
    }

    /// True when `day` differs from the recorded day (or nothing is recorded)
    pub fn is_new_day(&self, day: u8) -> bool {
        self.last_day != Some(day)
    }

    pub fn mark(&mut self, day: u8) {
        self.last_day = Some(day);
    }
}

/// Calendar-edge trigger: fires once per day at a fixed wall-clock minute,
/// and unconditionally while it has never fired
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalendarEdge {
    hour: u8,
    minute: u8,
    mark: DayMark,
}

impl CalendarEdge {
    pub const fn at(hour: u8, minute: u8) -> Self {
        Self {
            hour,
            minute,
            mark: DayMark::new(),
        }
    }

    /// Side-effect-free due check
    pub fn due(&self, time: &LocalTime) -> bool {
        !self.mark.is_set()
            || (time.hour == self.hour
                && time.minute == self.minute
                && self.mark.is_new_day(time.day))
    }

    /// Record a successful refresh
    ///
    /// Failures are deliberately not recorded: the trigger stays armed and
    /// retries on every later tick that satisfies the edge condition.
    pub fn mark_refreshed(&mut self, day: u8) {
        self.mark.mark(day);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(hour: u8, minute: u8, day: u8) -> LocalTime {
        LocalTime {
            year: 2026,
            month: 8,
            day,
            weekday: 4,
            hour,
            minute,
            second: 0,
        }
    }

    #[test]
    fn never_fired_is_due_at_any_time() {
        let edge = CalendarEdge::at(0, 1);
        assert!(edge.due(&at(15, 42, 6)));
        assert!(edge.due(&at(0, 0, 6)));
    }

    #[test]
    fn same_day_edge_does_not_refire() {
        let mut edge = CalendarEdge::at(0, 1);
        edge.mark_refreshed(5);
        // 00:01 on the already-marked day: no day rollover yet
        assert!(!edge.due(&at(0, 1, 5)));
    }

    #[test]
    fn next_day_edge_fires_exactly_once() {
        let mut edge = CalendarEdge::at(0, 1);
        edge.mark_refreshed(5);

        let rollover = at(0, 1, 6);
        assert!(edge.due(&rollover));
        edge.mark_refreshed(rollover.day);
        // Second tick at the identical (hour, minute, day)
        assert!(!edge.due(&rollover));
    }

    #[test]
    fn edge_requires_the_exact_minute_once_marked() {
        let mut edge = CalendarEdge::at(0, 1);
        edge.mark_refreshed(5);
        assert!(!edge.due(&at(0, 0, 6)));
        assert!(!edge.due(&at(0, 2, 6)));
        assert!(!edge.due(&at(12, 1, 6)));
    }

    #[test]
    fn failure_leaves_the_trigger_armed() {
        let mut edge = CalendarEdge::at(0, 1);
        edge.mark_refreshed(5);

        // A failed attempt records nothing, so the same window stays due
        let window = at(0, 1, 6);
        assert!(edge.due(&window));
        assert!(edge.due(&window));
        edge.mark_refreshed(window.day);
        assert!(!edge.due(&window));
    }
}
