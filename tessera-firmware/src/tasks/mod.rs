//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod link;
pub mod orchestrator;
pub mod panel_tx;
pub mod radio;
pub mod tick;

pub use link::link_task;
pub use orchestrator::orchestrator_task;
pub use panel_tx::panel_tx_task;
pub use radio::{cyw43_task, net_task};
pub use tick::tick_task;
