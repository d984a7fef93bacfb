//! Events module: the daily trash-collection and birthdays tile.
//!
//! Same calendar-edge cadence as the ephemeris tile, reading its own
//! sections of the shared daily feed. Full refresh on every fire to keep
//! the monochrome panel free of ghosting from day to day.

use tessera_protocol::panel::{BinCard, BirthdayCard, EventsFrame, PanelFrame, TrashCard};

use crate::clock::LocalTime;
use crate::feed::{BirthdayFeed, TrashInfo};
use crate::schedule::CalendarEdge;
use crate::screen::{ScreenHandle, ScreenKind};

use super::{fetch_daily_feed, Context, Module, UpdateOutcome};

pub struct EventsModule {
    screen: Option<ScreenHandle>,
    edge: CalendarEdge,
    clock_outage_logged: bool,
}

impl EventsModule {
    pub const NAME: &'static str = "Events";

    pub fn new() -> Self {
        Self {
            screen: None,
            edge: CalendarEdge::at(0, 1),
            clock_outage_logged: false,
        }
    }
}

impl Default for EventsModule {
    fn default() -> Self {
        Self::new()
    }
}

impl Module for EventsModule {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn required_screens(&self) -> usize {
        1
    }

    fn required_screen_kind(&self, _slot: usize) -> ScreenKind {
        ScreenKind::Monochrome
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
                    warn!("events: panel init failed: {:?}", e);
                }
            }
        }
        let _ = self.update(ctx);
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> UpdateOutcome {
        let Some(handle) = self.screen else {
            return UpdateOutcome::Unbound;
        };

        let Some(time) = ctx.clock.local_time() else {
            if !self.clock_outage_logged {
                warn!("events: wall clock unavailable, skipping due check");
                self.clock_outage_logged = true;
            }
            return UpdateOutcome::NoClock;
        };
        self.clock_outage_logged = false;

        if !self.edge.due(&time) {
            return UpdateOutcome::Idle;
        }

        info!("events: daily refresh");
        match fetch_daily_feed(ctx, &time) {
            Ok(feed) => {
                let frame = build_frame(&time, &feed.trash, &feed.birthdays);
                let Some(renderer) = ctx.screens.renderer(handle) else {
                    return UpdateOutcome::Unbound;
                };
                renderer.set_frame(&PanelFrame::Events(frame));
                if let Err(e) = renderer.refresh(true) {
                    warn!("events: refresh failed: {:?}", e);
                }
                self.edge.mark_refreshed(time.day);
                UpdateOutcome::Rendered { full: true }
            }
            Err(e) => {
                warn!("events: fetch failed: {:?}", e);
                if let Some(renderer) = ctx.screens.renderer(handle) {
                    let _ = renderer.draw_error("Fetch failed");
                }
                UpdateOutcome::RenderedError
            }
        }
    }
}

fn build_frame(time: &LocalTime, trash: &TrashInfo, birthdays: &BirthdayFeed) -> EventsFrame {
    let mut frame = EventsFrame {
        trash: TrashCard {
            black: BinCard {
                today: trash.black.today,
                next_in_days: trash.black.next_in_days,
            },
            yellow: BinCard {
                today: trash.yellow.today,
                next_in_days: trash.yellow.next_in_days,
            },
        },
        birthdays: heapless::Vec::new(),
        today: time.day,
    };

    for birthday in &birthdays.this_month {
        let card = BirthdayCard {
            name: birthday.name.clone(),
            day: birthday.day,
            days_until: birthday.days_until,
            is_today: birthday.is_today,
        };
        if frame.birthdays.push(card).is_err() {
            break;
        }
    }

    frame
}
