//! Data-fetch collaborator contract.
//!
//! One boundary object serves all three fetch shapes. Implementations own
//! their timeouts; a call returns when the data is in or the attempt has
//! conclusively failed, never hangs.

use core::fmt::Write;

use heapless::String;
use tessera_protocol::panel::MAX_VALUE;

use crate::feed::DailyFeed;

/// A formatted, already-scaled metric value
pub type MetricValue = String<MAX_VALUE>;

/// Errors from fetch attempts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FetchError {
    /// No URL configured for this source
    MissingSource,
    /// Connection, DNS or timeout failure
    Network,
    /// Response was not the expected shape
    InvalidResponse,
    /// JSON path matched nothing in the document
    PathMissing,
}

/// Fetch collaborator consumed by the modules
///
/// Metric fetches receive the divisor and decimal hint and return the value
/// already scaled and rounded, so the core never formats numbers itself.
pub trait Fetch {
    /// Fetch and decode the daily feed document
    fn fetch_feed(&mut self, url: &str) -> Result<DailyFeed, FetchError>;

    /// Fetch a Prometheus instant-query scalar
    fn fetch_prometheus(
        &mut self,
        url: &str,
        divisor: f32,
        decimals: u8,
    ) -> Result<MetricValue, FetchError>;

    /// Fetch a JSON document and pick a numeric value by path expression
    fn fetch_json(
        &mut self,
        url: &str,
        path: &str,
        divisor: f32,
        decimals: u8,
    ) -> Result<MetricValue, FetchError>;
}

/// Scale and round a raw reading the way collaborators are expected to
pub fn format_scaled(raw: f32, divisor: f32, decimals: u8) -> MetricValue {
    let divisor = if divisor == 0.0 { 1.0 } else { divisor };
    let mut out = MetricValue::new();
    let _ = write!(out, "{:.*}", usize::from(decimals.min(2)), raw / divisor);
    out
}
