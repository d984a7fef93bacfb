//! Information modules and their orchestration.
//!
//! A module owns one data feed and its refresh policy. The manager binds
//! modules to screens once at startup and fans out one `update` call per
//! external tick; everything else (when to fetch, full vs. partial refresh,
//! failure handling) is the module's own business, so one module's outage
//! never blocks its siblings.

mod ephemeris;
mod events;
mod manager;
mod sensors;

pub use ephemeris::EphemerisModule;
pub use events::EventsModule;
pub use manager::{ModuleManager, MAX_MODULES};
pub use sensors::SensorModule;

use crate::clock::{Clock, LocalTime};
use crate::config;
use crate::feed::DailyFeed;
use crate::screen::{ScreenHandle, ScreenKind, ScreenPool};
use crate::traits::{ConfigStore, ConfigStoreExt, Fetch, FetchError};
use crate::url::fill_date_placeholders;

/// Collaborators injected into every lifecycle call
///
/// Modules receive their dependencies per call instead of storing them, so
/// no module outlives or owns a collaborator.
pub struct Context<'a> {
    pub screens: &'a mut dyn ScreenPool,
    pub store: &'a mut dyn ConfigStore,
    pub clock: &'a dyn Clock,
    pub fetch: &'a mut dyn Fetch,
}

/// What one `update` pass did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum UpdateOutcome {
    /// Not due; nothing happened
    Idle,
    /// No screen bound; guaranteed no-op
    Unbound,
    /// Wall clock unavailable; due check skipped for this tick
    NoClock,
    /// Fetched and rendered fresh data
    Rendered { full: bool },
    /// Fetch failed; error banner rendered instead of stale data
    RenderedError,
}

/// Capability contract shared by all module variants
pub trait Module {
    /// Stable name, used as the matching key in configured mappings
    fn name(&self) -> &str;

    /// Number of screens this module wants
    fn required_screens(&self) -> usize {
        0
    }

    /// Required capability for one requirement slot
    fn required_screen_kind(&self, slot: usize) -> ScreenKind {
        let _ = slot;
        ScreenKind::Monochrome
    }

    /// Inject one screen binding
    ///
    /// A module never holds more bindings than `required_screens()`.
    fn assign_screen(&mut self, slot: usize, screen: ScreenHandle) {
        let _ = (slot, screen);
    }

    /// One-time start, after assignment
    fn begin(&mut self, ctx: &mut Context<'_>) {
        let _ = ctx;
    }

    /// Per-tick pass: check the trigger, fetch, render
    fn update(&mut self, ctx: &mut Context<'_>) -> UpdateOutcome;

    /// Re-arm the interval trigger so the next update fires immediately
    ///
    /// Never touches full-refresh day markers, so it cannot fake a day
    /// rollover.
    fn force_update(&mut self) {}
}

/// Read the feed URL, substitute the date, fetch.
///
/// Both calendar modules read sections of one shared feed document.
fn fetch_daily_feed(ctx: &mut Context<'_>, time: &LocalTime) -> Result<DailyFeed, FetchError> {
    let raw = ctx.store.get_or(config::KEY_FEED_URL, "");
    if raw.is_empty() {
        return Err(FetchError::MissingSource);
    }
    let url = fill_date_placeholders(raw, Some(time));
    ctx.fetch.fetch_feed(&url)
}
