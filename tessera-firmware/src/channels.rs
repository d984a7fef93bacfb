//! Inter-task communication channels
//!
//! Defines the static channels and signals used between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::mutex::Mutex;
use embassy_sync::signal::Signal;

use tessera_protocol::panel::PanelMessage;

use crate::store::ConfigBank;

/// Panel-link outbound queue depth
const PANEL_QUEUE: usize = 8;

/// Raised by the config link after a `save_config`; consumed exactly once
/// per tick by the orchestrator, which turns it into a force-update
/// broadcast. Single-slot by design: coalescing repeated saves is fine.
pub static UPDATE_REQUESTED: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// Messages queued for the panel co-processor
pub static PANEL_LINK: Channel<CriticalSectionRawMutex, PanelMessage, PANEL_QUEUE> = Channel::new();

/// Raised on every config write; the store task debounces and persists
pub static STORE_DIRTY: Signal<CriticalSectionRawMutex, ()> = Signal::new();

/// The shared config store. Two writers exist (the tick loop's context and
/// the config link), so access goes through an async mutex; the tick loop
/// holds it for the whole update pass.
pub static CONFIG: Mutex<CriticalSectionRawMutex, ConfigBank> = Mutex::new(ConfigBank::new());
