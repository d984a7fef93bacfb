//! Sensor module: an eight-cell metric dashboard on one monochrome tile.
//!
//! Two instances usually run side by side, sharing the declared name
//! "Sensors" and covering persisted slots 0-7 and 8-15. Slot records are
//! re-read from the store on every pass, so a `save_config` between ticks
//! takes effect on the next fire without a restart.

use heapless::String;
use tessera_protocol::config::{SourceKind, MAX_LABEL, MAX_UNIT};
use tessera_protocol::panel::{PanelFrame, SensorCell, SensorFrame, SENSOR_CELLS};

use crate::clock::LocalTime;
use crate::config::{
    self, KEY_SENSOR_INTERVAL, KEY_SENSOR_STYLE, DEFAULT_SENSOR_INTERVAL_SECS,
    MIN_SENSOR_INTERVAL_SECS,
};
use crate::schedule::{DayMark, IntervalTrigger};
use crate::screen::{ScreenHandle, ScreenKind};
use crate::traits::{ConfigStoreExt, MetricValue};
use crate::url::fill_date_placeholders;

use super::{Context, Module, UpdateOutcome};

/// Hour of the daily ghosting purge
const FULL_REFRESH_HOUR: u8 = 3;

/// Shown for cells that have never produced data
const PLACEHOLDER: &str = "--";

/// Last-known state of one cell
#[derive(Debug, Clone, Default)]
struct SlotState {
    label: String<MAX_LABEL>,
    value: MetricValue,
    unit: String<MAX_UNIT>,
    has_data: bool,
}

impl SlotState {
    fn clear(&mut self) {
        *self = Self::default();
    }

    fn record(&mut self, label: &String<MAX_LABEL>, value: MetricValue, unit: &String<MAX_UNIT>) {
        self.label = label.clone();
        self.value = value;
        self.unit = unit.clone();
        self.has_data = true;
    }

    fn cell(&self) -> SensorCell {
        SensorCell {
            label: self.label.clone(),
            value: if self.has_data {
                self.value.clone()
            } else {
                String::try_from(PLACEHOLDER).unwrap_or_default()
            },
            unit: self.unit.clone(),
        }
    }
}

pub struct SensorModule {
    name: &'static str,
    start_slot: usize,
    screen: Option<ScreenHandle>,
    interval: IntervalTrigger,
    full_refresh: DayMark,
    slots: [SlotState; SENSOR_CELLS],
}

impl SensorModule {
    pub fn new(name: &'static str, start_slot: usize) -> Self {
        Self {
            name,
            start_slot,
            screen: None,
            interval: IntervalTrigger::default(),
            full_refresh: DayMark::new(),
            slots: core::array::from_fn(|_| SlotState::default()),
        }
    }

    /// Override the refresh cadence (milliseconds)
    pub fn set_refresh_interval(&mut self, interval_ms: u64) {
        self.interval.set_interval_ms(interval_ms);
    }

    /// Re-read one slot's record and attempt its fetch
    ///
    /// Failures keep the previous reading; the snapshot renders it (or the
    /// placeholder) either way.
    fn refresh_slot(&mut self, ctx: &mut Context<'_>, slot: usize, time: Option<&LocalTime>) {
        let record = config::load_sensor(&*ctx.store, self.start_slot + slot);
        if !record.enabled || record.url.is_empty() {
            self.slots[slot].clear();
            return;
        }

        let url = fill_date_placeholders(&record.url, time);
        let decimals = record.decimals.min(2);
        let fetched = match record.kind {
            SourceKind::Prometheus => ctx.fetch.fetch_prometheus(&url, record.divisor, decimals),
            SourceKind::Json => {
                ctx.fetch
                    .fetch_json(&url, &record.json_path, record.divisor, decimals)
            }
        };

        match fetched {
            Ok(value) => self.slots[slot].record(&record.label, value, &record.unit),
            Err(e) => warn!(
                "sensor slot {}: fetch failed: {:?}",
                self.start_slot + slot,
                e
            ),
        }
    }
}

impl Module for SensorModule {
    fn name(&self) -> &str {
        self.name
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
        let seconds = ctx
            .store
            .get_u32(KEY_SENSOR_INTERVAL, DEFAULT_SENSOR_INTERVAL_SECS)
            .max(MIN_SENSOR_INTERVAL_SECS);
        self.interval.set_interval_ms(u64::from(seconds) * 1_000);

        if let Some(handle) = self.screen {
            if let Some(renderer) = ctx.screens.renderer(handle) {
                if let Err(e) = renderer.init() {
                    warn!("sensors: panel init failed: {:?}", e);
                }
            }
        }
    }

    fn update(&mut self, ctx: &mut Context<'_>) -> UpdateOutcome {
        let Some(handle) = self.screen else {
            return UpdateOutcome::Unbound;
        };

        let now = ctx.clock.now_ms();
        if !self.interval.due(now) {
            return UpdateOutcome::Idle;
        }
        // Stamp first: a failed pass retries on the next interval, not on
        // every tick until something succeeds
        self.interval.stamp(now);

        debug!("sensors: refreshing slots {}..{}", self.start_slot, self.start_slot + SENSOR_CELLS);
        let time = ctx.clock.local_time();
        for slot in 0..SENSOR_CELLS {
            self.refresh_slot(ctx, slot, time.as_ref());
        }

        // Ghosting purge: escalate to a full refresh once per day during
        // the quiet hour. Independent of the interval cadence.
        let mut full = false;
        let mut updated_at: String<5> = String::new();
        if let Some(t) = &time {
            if t.hour == FULL_REFRESH_HOUR && self.full_refresh.is_new_day(t.day) {
                self.full_refresh.mark(t.day);
                full = true;
            }
            updated_at = t.hhmm();
        }

        let frame = SensorFrame {
            cells: core::array::from_fn(|i| self.slots[i].cell()),
            updated_at,
            style: ctx.store.get_u8(KEY_SENSOR_STYLE, 0),
        };

        let Some(renderer) = ctx.screens.renderer(handle) else {
            return UpdateOutcome::Unbound;
        };
        renderer.set_frame(&PanelFrame::Sensors(frame));
        if let Err(e) = renderer.refresh(full) {
            warn!("sensors: refresh failed: {:?}", e);
        }
        UpdateOutcome::Rendered { full }
    }

    fn force_update(&mut self) {
        self.interval.force();
    }
}
