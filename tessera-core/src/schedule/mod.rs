//! Refresh triggers.
//!
//! Two trigger families drive the module variants: the calendar edge (fire
//! once per day at a fixed wall-clock minute) and the elapsed interval.
//! Both are side-effect-free to query; firing is recorded explicitly, and
//! only on success, so failures stay armed.

pub mod daily;
pub mod interval;

pub use daily::{CalendarEdge, DayMark};
pub use interval::IntervalTrigger;
