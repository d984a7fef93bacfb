//! External collaborator contracts.
//!
//! These traits define the seams between the scheduling core and the
//! firmware-provided implementations: rendering, persistence and data
//! fetching. The core never reaches past them.

pub mod fetch;
pub mod renderer;
pub mod store;

pub use fetch::{format_scaled, Fetch, FetchError, MetricValue};
pub use renderer::{RenderError, Renderer};
pub use store::{ConfigStore, ConfigStoreExt, StoreError};
