//! Orchestrator task: owns the modules and drives the tick loop.
//!
//! Runs on core 1. Module updates are strictly sequential and a fetch
//! blocks this executor until it completes or times out; the network stack
//! keeps running on core 0, which is what makes the blocking sound.

use defmt::*;
use embassy_net::Stack;

use tessera_core::module::{Context, EphemerisModule, EventsModule, ModuleManager, SensorModule};

use crate::channels::{CONFIG, UPDATE_REQUESTED};
use crate::clock::SystemClock;
use crate::net::HttpFetcher;
use crate::panels::PanelBank;
use crate::tasks::tick::TICK_SIGNAL;

/// Orchestrator task - assignment once, then the per-tick update pass
#[embassy_executor::task]
pub async fn orchestrator_task(stack: Stack<'static>) {
    info!("orchestrator task started");

    let mut ephemeris = EphemerisModule::new();
    let mut sensors_low = SensorModule::new("Sensors", 0);
    let mut events = EventsModule::new();
    let mut sensors_high = SensorModule::new("Sensors", 8);

    // Registration order is load-bearing: default assignment and update
    // order both follow it
    let mut manager = ModuleManager::new();
    manager.register(&mut ephemeris);
    manager.register(&mut sensors_low);
    manager.register(&mut events);
    manager.register(&mut sensors_high);

    let mut panels = PanelBank::new();
    let clock = SystemClock;
    let mut fetcher = HttpFetcher::new(stack);

    {
        let mut bank = CONFIG.lock().await;
        let mut ctx = Context {
            screens: &mut panels,
            store: &mut *bank,
            clock: &clock,
            fetch: &mut fetcher,
        };
        manager.begin(&mut ctx);
    }
    info!("modules started");

    loop {
        let _now = TICK_SIGNAL.wait().await;

        // Consume the config-changed signal exactly once per tick
        if UPDATE_REQUESTED.try_take().is_some() {
            info!("configuration changed, forcing updates");
            manager.force_update();
        }

        let mut bank = CONFIG.lock().await;
        let mut ctx = Context {
            screens: &mut panels,
            store: &mut *bank,
            clock: &clock,
            fetch: &mut fetcher,
        };
        manager.update(&mut ctx);
    }
}
