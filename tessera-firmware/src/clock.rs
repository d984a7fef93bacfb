//! Wall-clock bookkeeping.
//!
//! The SNTP task records a sync point (Unix seconds at a known uptime); the
//! orchestrator's [`SystemClock`] projects the current local time from it.
//! Until the first sync, `local_time` is `None` and the calendar modules
//! hold off.

use core::cell::Cell;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embassy_time::Instant;

use tessera_core::clock::{Clock, LocalTime};

#[derive(Debug, Clone, Copy)]
struct SyncPoint {
    unix: i64,
    uptime_ms: u64,
    offset_secs: i32,
}

static SYNC: Mutex<CriticalSectionRawMutex, Cell<Option<SyncPoint>>> =
    Mutex::new(Cell::new(None));

/// Record a time sync: Unix seconds as of now, plus the local UTC offset
pub fn set_sync(unix: i64, offset_secs: i32) {
    let point = SyncPoint {
        unix,
        uptime_ms: Instant::now().as_millis(),
        offset_secs,
    };
    SYNC.lock(|cell| cell.set(Some(point)));
}

/// Clock implementation backed by uptime and the last sync point
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }

    fn local_time(&self) -> Option<LocalTime> {
        let point = SYNC.lock(|cell| cell.get())?;
        let elapsed_s = Instant::now()
            .as_millis()
            .saturating_sub(point.uptime_ms)
            / 1_000;
        Some(LocalTime::from_unix(
            point.unix + elapsed_s as i64,
            point.offset_secs,
        ))
    }
}
