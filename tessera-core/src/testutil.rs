//! Shared test doubles for the collaborator traits.

use heapless::{String, Vec};
use tessera_protocol::panel::{clipped, PanelFrame};

use crate::clock::{Clock, LocalTime};
use crate::feed::DailyFeed;
use crate::module::{Context, Module, UpdateOutcome};
use crate::screen::{ScreenHandle, ScreenKind, ScreenPool, SCREEN_COUNT};
use crate::traits::{
    ConfigStore, Fetch, FetchError, MetricValue, RenderError, Renderer, StoreError,
};

/// Build a LocalTime without the noise fields
pub(crate) fn local_time(
    year: u16,
    month: u8,
    day: u8,
    weekday: u8,
    hour: u8,
    minute: u8,
) -> LocalTime {
    LocalTime {
        year,
        month,
        day,
        weekday,
        hour,
        minute,
        second: 0,
    }
}

/// One fresh set of collaborator doubles
pub(crate) fn ctx_parts() -> (TestPool, MemStore, TestClock, ScriptedFetch) {
    (
        TestPool::new(),
        MemStore::new(),
        TestClock::new(),
        ScriptedFetch::new(),
    )
}

/// In-memory config store
pub(crate) struct MemStore {
    entries: Vec<(String<16>, String<512>), 32>,
}

impl MemStore {
    pub(crate) fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Infallible insert for test setup
    pub(crate) fn put(&mut self, key: &str, value: &str) {
        self.set(key, value).unwrap();
    }
}

impl ConfigStore for MemStore {
    fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.as_str() == key)
            .map(|(_, v)| v.as_str())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let value: String<512> = String::try_from(value).map_err(|_| StoreError::Capacity)?;
        if let Some(entry) = self.entries.iter_mut().find(|(k, _)| k.as_str() == key) {
            entry.1 = value;
            return Ok(());
        }
        let key: String<16> = String::try_from(key).map_err(|_| StoreError::Capacity)?;
        self.entries
            .push((key, value))
            .map_err(|_| StoreError::Capacity)
    }
}

/// Renderer that records everything it is asked to do
#[derive(Default)]
pub(crate) struct TestRenderer {
    pub(crate) inits: usize,
    pub(crate) clears: usize,
    pub(crate) frames: std::vec::Vec<PanelFrame>,
    pub(crate) refreshes: std::vec::Vec<bool>,
    pub(crate) errors: std::vec::Vec<String<48>>,
}

impl Renderer for TestRenderer {
    fn init(&mut self) -> Result<(), RenderError> {
        self.inits += 1;
        Ok(())
    }

    fn clear(&mut self) -> Result<(), RenderError> {
        self.clears += 1;
        Ok(())
    }

    fn set_frame(&mut self, frame: &PanelFrame) {
        self.frames.push(frame.clone());
    }

    fn refresh(&mut self, full: bool) -> Result<(), RenderError> {
        self.refreshes.push(full);
        Ok(())
    }

    fn draw_error(&mut self, message: &str) -> Result<(), RenderError> {
        self.errors.push(clipped(message));
        Ok(())
    }
}

/// Four-slot pool with the hardware layout: color at 0, monochrome at 1-3
pub(crate) struct TestPool {
    pub(crate) renderers: [TestRenderer; SCREEN_COUNT],
}

impl TestPool {
    pub(crate) fn new() -> Self {
        Self {
            renderers: core::array::from_fn(|_| TestRenderer::default()),
        }
    }
}

impl ScreenPool for TestPool {
    fn len(&self) -> usize {
        SCREEN_COUNT
    }

    fn kind(&self, index: usize) -> Option<ScreenKind> {
        match index {
            0 => Some(ScreenKind::Color),
            1..=3 => Some(ScreenKind::Monochrome),
            _ => None,
        }
    }

    fn renderer(&mut self, handle: ScreenHandle) -> Option<&mut dyn Renderer> {
        self.renderers
            .get_mut(handle.index())
            .map(|r| r as &mut dyn Renderer)
    }
}

/// Clock with scripted monotonic and wall-clock time
pub(crate) struct TestClock {
    pub(crate) now_ms: u64,
    pub(crate) time: Option<LocalTime>,
}

impl TestClock {
    pub(crate) fn new() -> Self {
        Self {
            now_ms: 0,
            time: None,
        }
    }
}

impl Clock for TestClock {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn local_time(&self) -> Option<LocalTime> {
        self.time
    }
}

/// Fetch collaborator with scripted results
///
/// Metric fetches return `metric_value` unless the URL contains one of the
/// `fail_if_contains` fragments. Every call is recorded.
pub(crate) struct ScriptedFetch {
    pub(crate) feed: Result<DailyFeed, FetchError>,
    pub(crate) feed_calls: std::vec::Vec<String<192>>,
    pub(crate) metric_value: &'static str,
    pub(crate) fail_if_contains: Vec<&'static str, 8>,
    pub(crate) metric_calls: std::vec::Vec<String<192>>,
}

impl ScriptedFetch {
    pub(crate) fn new() -> Self {
        Self {
            feed: Ok(DailyFeed::default()),
            feed_calls: std::vec::Vec::new(),
            metric_value: "42.0",
            fail_if_contains: Vec::new(),
            metric_calls: std::vec::Vec::new(),
        }
    }

    fn metric(&mut self, url: &str) -> Result<MetricValue, FetchError> {
        self.metric_calls.push(clipped(url));
        if self.fail_if_contains.iter().any(|frag| url.contains(frag)) {
            Err(FetchError::Network)
        } else {
            Ok(clipped(self.metric_value))
        }
    }
}

impl Fetch for ScriptedFetch {
    fn fetch_feed(&mut self, url: &str) -> Result<DailyFeed, FetchError> {
        self.feed_calls.push(clipped(url));
        self.feed.clone()
    }

    fn fetch_prometheus(
        &mut self,
        url: &str,
        _divisor: f32,
        _decimals: u8,
    ) -> Result<MetricValue, FetchError> {
        self.metric(url)
    }

    fn fetch_json(
        &mut self,
        url: &str,
        _path: &str,
        _divisor: f32,
        _decimals: u8,
    ) -> Result<MetricValue, FetchError> {
        self.metric(url)
    }
}

/// Minimal module for manager tests
pub(crate) struct TestModule {
    pub(crate) module_name: &'static str,
    pub(crate) required: usize,
    pub(crate) kind: ScreenKind,
    pub(crate) assigned: std::vec::Vec<(usize, ScreenHandle)>,
    pub(crate) begun: usize,
    pub(crate) updates: usize,
    pub(crate) forced: usize,
    pub(crate) last_outcome: Option<UpdateOutcome>,
}

impl TestModule {
    pub(crate) fn new(name: &'static str, required: usize, kind: ScreenKind) -> Self {
        Self {
            module_name: name,
            required,
            kind,
            assigned: std::vec::Vec::new(),
            begun: 0,
            updates: 0,
            forced: 0,
            last_outcome: None,
        }
    }
}

impl Module for TestModule {
    fn name(&self) -> &str {
        self.module_name
    }

    fn required_screens(&self) -> usize {
        self.required
    }

    fn required_screen_kind(&self, _slot: usize) -> ScreenKind {
        self.kind
    }

    fn assign_screen(&mut self, slot: usize, screen: ScreenHandle) {
        self.assigned.push((slot, screen));
    }

    fn begin(&mut self, _ctx: &mut Context<'_>) {
        self.begun += 1;
    }

    fn update(&mut self, _ctx: &mut Context<'_>) -> UpdateOutcome {
        self.updates += 1;
        self.last_outcome = Some(UpdateOutcome::Idle);
        UpdateOutcome::Idle
    }

    fn force_update(&mut self) {
        self.forced += 1;
    }
}
