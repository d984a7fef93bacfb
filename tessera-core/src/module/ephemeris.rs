//! Ephemeris module: the daily calendar / sun / season tile.
//!
//! Fires on the 00:01 calendar edge (or immediately after a power cycle)
//! and always performs a full refresh; the color panel has no usable
//! partial mode.

use tessera_protocol::panel::{clipped, DateCard, EphemerisFrame, PanelFrame, SeasonCard, SunCard};

use crate::clock::LocalTime;
use crate::config::KEY_LANGUAGE;
use crate::feed::{SeasonInfo, SunInfo};
use crate::lang::Language;
use crate::schedule::CalendarEdge;
use crate::screen::{ScreenHandle, ScreenKind};
use crate::traits::ConfigStoreExt;

use super::{fetch_daily_feed, Context, Module, UpdateOutcome};

pub struct EphemerisModule {
    screen: Option<ScreenHandle>,
    edge: CalendarEdge,
    clock_outage_logged: bool,
}

impl EphemerisModule {
    pub const NAME: &'static str = "Ephemeris";

    pub fn new() -> Self {
        Self {
            screen: None,
            edge: CalendarEdge::at(0, 1),
            clock_outage_logged: false,
        }
    }
}

impl Default for EphemerisModule {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for EphemerisModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_screens(&self) -> usize {
        1
    }

    fn required_screen_kind(&self, _slot: usize) -> ScreenKind {
        ScreenKind::Color
    }

    fn assign_screen(&mut self, slot: usize, screen: ScreenHandle) {
        if slot == 0 {
            self.screen = Some(screen);
        }
    }

    fn begin(&mut self, ctx: &mut Context<'_>) {
        if let Some(handle) = self.screen {
            if let Some(renderer) = ctx.screens.renderer(handle) {
                if let Err(e) = renderer.init() {
                    warn!("ephemeris: panel init failed: {:?}", e);
                }
            }
        }
        // First fill at boot rather than on the first tick
        let _ = self.update(ctx);
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> UpdateOutcome {
        let Some(handle) = self.screen else {
            return UpdateOutcome::Unbound;
        };

        let Some(time) = ctx.clock.local_time() else {
            if !self.clock_outage_logged {
                warn!("ephemeris: wall clock unavailable, skipping due check");
                self.clock_outage_logged = true;
            }
            return UpdateOutcome::NoClock;
        };
        self.clock_outage_logged = false;

        if !self.edge.due(&time) {
            return UpdateOutcome::Idle;
        }

        info!("ephemeris: daily refresh");
        let language = Language::from_code(ctx.store.get_or(KEY_LANGUAGE, "en"));

        match fetch_daily_feed(ctx, &time) {
            Ok(feed) => {
                let frame = build_frame(&time, language, &feed.sun, &feed.season);
                let Some(renderer) = ctx.screens.renderer(handle) else {
                    return UpdateOutcome::Unbound;
                };
                renderer.set_frame(&PanelFrame::Ephemeris(frame));
                if let Err(e) = renderer.refresh(true) {
                    warn!("ephemeris: refresh failed: {:?}", e);
                }
                self.edge.mark_refreshed(time.day);
                UpdateOutcome::Rendered { full: true }
            }
            Err(e) => {
                // The edge stays armed: the next satisfying tick retries
                warn!("ephemeris: fetch failed: {:?}", e);
                if let Some(renderer) = ctx.screens.renderer(handle) {
                    let _ = renderer.draw_error("Fetch failed");
                }
                UpdateOutcome::RenderedError
            }
        }
    }
}

fn build_frame(
    time: &LocalTime,
    language: Language,
    sun: &SunInfo,
    season: &SeasonInfo,
) -> EphemerisFrame {
    EphemerisFrame {
        date: DateCard {
            day_name: clipped(language.day_name(time.weekday)),
            day: time.day,
            month_name: clipped(language.month_name(time.month)),
            year: time.year,
            day_of_year: time.day_of_year(),
            days_in_year: time.days_in_year(),
            week: time.week(),
        },
        sun: SunCard {
            sunrise: sun.sunrise.clone(),
            sunset: sun.sunset.clone(),
            daily_change: sun.daily_change.clone(),
        },
        season: SeasonCard {
            name: season.name.clone(),
            progress_pct: season.progress,
            days_until_spring: season.days_until_spring,
            days_until_summer: season.days_until_summer,
            days_until_fall: season.days_until_fall,
            days_until_winter: season.days_until_winter,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ctx_parts, local_time};
    use crate::traits::FetchError;

    fn bound_module() -> EphemerisModule {
        let mut module = EphemerisModule::new();
        module.assign_screen(0, ScreenHandle::new(0));
        module
    }

    #[test]
    fn first_update_fires_regardless_of_time_of_day() {
        let (mut pool, mut store, mut clock, mut fetch) = ctx_parts();
        store.put("feed_url", "http://feed/today");
        clock.time = Some(local_time(2026, 8, 6, 4, 15, 42));

        let mut module = bound_module();
        let outcome = module.update(&mut Context {
            screens: &mut pool,
            store: &mut store,
            clock: &clock,
            fetch: &mut fetch,
        });

        assert_eq!(outcome, UpdateOutcome::Rendered { full: true });
        assert_eq!(pool.renderers[0].refreshes.as_slice(), &[true]);
        let PanelFrame::Ephemeris(frame) = &pool.renderers[0].frames[0] else {
            panic!("expected an ephemeris frame");
        };
        assert_eq!(frame.date.day_name.as_str(), "Thursday");
        assert_eq!(frame.date.day_of_year, 218);
        assert_eq!(frame.date.week, 32);
    }

    #[test]
    fn second_tick_same_day_is_idle() {
        let (mut pool, mut store, mut clock, mut fetch) = ctx_parts();
        store.put("feed_url", "http://feed/today");
        clock.time = Some(local_time(2026, 8, 6, 4, 15, 42));

        let mut module = bound_module();
        let mut ctx = Context {
            screens: &mut pool,
            store: &mut store,
            clock: &clock,
            fetch: &mut fetch,
        };
        assert_eq!(module.update(&mut ctx), UpdateOutcome::Rendered { full: true });
        assert_eq!(module.update(&mut ctx), UpdateOutcome::Idle);
    }

    #[test]
    fn fetch_failure_draws_error_and_stays_armed() {
        let (mut pool, mut store, mut clock, mut fetch) = ctx_parts();
        store.put("feed_url", "http://feed/today");
        clock.time = Some(local_time(2026, 8, 6, 4, 0, 1));
        fetch.feed = Err(FetchError::Network);

        let mut module = bound_module();
        let mut ctx = Context {
            screens: &mut pool,
            store: &mut store,
            clock: &clock,
            fetch: &mut fetch,
        };
        assert_eq!(module.update(&mut ctx), UpdateOutcome::RenderedError);
        // Still armed: the trigger retries while the window holds
        assert_eq!(module.update(&mut ctx), UpdateOutcome::RenderedError);

        assert_eq!(pool.renderers[0].errors.len(), 2);
        assert_eq!(pool.renderers[0].errors[0].as_str(), "Fetch failed");
        assert!(pool.renderers[0].frames.is_empty());
    }

    #[test]
    fn missing_url_is_a_fetch_failure() {
        let (mut pool, mut store, mut clock, mut fetch) = ctx_parts();
        clock.time = Some(local_time(2026, 8, 6, 4, 12, 0));

        let mut module = bound_module();
        let outcome = module.update(&mut Context {
            screens: &mut pool,
            store: &mut store,
            clock: &clock,
            fetch: &mut fetch,
        });
        assert_eq!(outcome, UpdateOutcome::RenderedError);
        assert!(fetch.feed_calls.is_empty());
    }

    #[test]
    fn no_wall_clock_skips_the_tick_entirely() {
        let (mut pool, mut store, mut clock, mut fetch) = ctx_parts();
        store.put("feed_url", "http://feed/today");
        clock.time = None;

        let mut module = bound_module();
        let mut ctx = Context {
            screens: &mut pool,
            store: &mut store,
            clock: &clock,
            fetch: &mut fetch,
        };
        assert_eq!(module.update(&mut ctx), UpdateOutcome::NoClock);
        assert_eq!(module.update(&mut ctx), UpdateOutcome::NoClock);
        assert!(fetch.feed_calls.is_empty());
        assert!(pool.renderers[0].errors.is_empty());
    }

    #[test]
    fn unbound_module_is_a_no_op() {
        let (mut pool, mut store, mut clock, mut fetch) = ctx_parts();
        store.put("feed_url", "http://feed/today");
        clock.time = Some(local_time(2026, 8, 6, 4, 0, 1));

        let mut module = EphemerisModule::new();
        let outcome = module.update(&mut Context {
            screens: &mut pool,
            store: &mut store,
            clock: &clock,
            fetch: &mut fetch,
        });
        assert_eq!(outcome, UpdateOutcome::Unbound);
        assert!(fetch.feed_calls.is_empty());
    }

    #[test]
    fn date_placeholders_reach_the_fetcher() {
        let (mut pool, mut store, mut clock, mut fetch) = ctx_parts();
        store.put("feed_url", "http://feed/{YYYY}/{MM}/{DD}");
        clock.time = Some(local_time(2026, 8, 6, 4, 9, 30));

        let mut module = bound_module();
        module.update(&mut Context {
            screens: &mut pool,
            store: &mut store,
            clock: &clock,
            fetch: &mut fetch,
        });
        assert_eq!(fetch.feed_calls[0].as_str(), "http://feed/2026/08/06");
    }

    #[test]
    fn french_names_follow_the_language_key() {
        let (mut pool, mut store, mut clock, mut fetch) = ctx_parts();
        store.put("feed_url", "http://feed/today");
        store.put("language", "fr");
        clock.time = Some(local_time(2026, 8, 6, 4, 10, 0));

        let mut module = bound_module();
        module.update(&mut Context {
            screens: &mut pool,
            store: &mut store,
            clock: &clock,
            fetch: &mut fetch,
        });
        let PanelFrame::Ephemeris(frame) = &pool.renderers[0].frames[0] else {
            panic!("expected an ephemeris frame");
        };
        assert_eq!(frame.date.day_name.as_str(), "Jeudi");
        assert_eq!(frame.date.month_name.as_str(), "Août");
    }
}
