//! Serial link protocol for the Tessera controller
//!
//! The controller board talks to two peers over framed serial links:
//!
//! - the **config link**, carrying JSON commands from the companion
//!   configuration tool (`get_config`, `save_config`) and JSON replies;
//! - the **panel link**, carrying postcard-encoded render payloads to the
//!   panel co-processor that owns the four e-paper tiles.
//!
//! Both links share one frame format:
//!
//! ```text
//! ┌───────┬────────┬──────┬──────────────┬──────────┐
//! │ START │ LENGTH │ KIND │ PAYLOAD      │ CHECKSUM │
//! │ 1B    │ 2B LE  │ 1B   │ 0–4096B      │ 1B       │
//! └───────┴────────┴──────┴──────────────┴──────────┘
//! ```
//!
//! The panel co-processor is a dumb terminal: it renders the typed cards it
//! receives and never makes scheduling decisions. All orchestration stays on
//! the controller.

#![no_std]
#![deny(unsafe_code)]

pub mod config;
pub mod frame;
pub mod link;
pub mod panel;

pub use config::{SensorConfig, SourceKind, SENSOR_SLOTS};
pub use frame::{Decoder, Frame, FrameError, FRAME_START, MAX_PAYLOAD};
pub use link::{Command, ConfigData, ConfigPatch, LinkError};
pub use panel::{PanelFrame, PanelMessage};
