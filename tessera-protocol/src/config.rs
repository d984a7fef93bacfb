//! Persisted configuration records.
//!
//! A sensor slot's record is stored in the key-value config store as a JSON
//! object and travels unchanged inside `save_config` / `config_data`
//! payloads, so the same type serves both the store and the link.

use heapless::String;
use serde::{Deserialize, Serialize};

/// Maximum sensor label length
pub const MAX_LABEL: usize = 24;

/// Maximum unit string length
pub const MAX_UNIT: usize = 8;

/// Maximum source URL length
pub const MAX_URL: usize = 192;

/// Maximum JSON path expression length
pub const MAX_JSON_PATH: usize = 64;

/// Total persisted sensor slots (two panels of eight)
pub const SENSOR_SLOTS: usize = 16;

/// Where a sensor slot's value comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Prometheus instant-query endpoint returning a scalar
    #[default]
    Prometheus,
    /// Arbitrary JSON document, value picked by a path expression
    Json,
}

/// One sensor slot's persisted record
///
/// Every field is optional on the wire; absent or malformed fields fall back
/// to the defaults below, so a partially-written record still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[serde(default)]
pub struct SensorConfig {
    /// Label displayed above the value
    pub label: String<MAX_LABEL>,
    /// Source URL (Prometheus query or JSON API endpoint)
    pub url: String<MAX_URL>,
    /// Unit of measurement (e.g. "kWh", "°C", "W")
    pub unit: String<MAX_UNIT>,
    /// Conversion divisor (e.g. 1000 for Wh → kWh)
    pub divisor: f32,
    /// Decimals to display (0-2)
    pub decimals: u8,
    /// Whether this slot is active
    pub enabled: bool,
    /// Source protocol
    #[serde(rename = "type")]
    pub kind: SourceKind,
    /// Dot/bracket path into the fetched document (e.g. `data.values[0]`)
    #[serde(rename = "jsonPath")]
    pub json_path: String<MAX_JSON_PATH>,
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            url: String::new(),
            unit: String::new(),
            divisor: 1.0,
            decimals: 1,
            enabled: false,
            kind: SourceKind::Prometheus,
            json_path: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record_roundtrips() {
        let json = br#"{"label":"Grid power","url":"http://prom/api/v1/query?query=power","unit":"W","divisor":1.0,"decimals":0,"enabled":true,"type":"prometheus","jsonPath":""}"#;
        let (config, _) = serde_json_core::de::from_slice::<SensorConfig>(json).unwrap();
        assert_eq!(config.label.as_str(), "Grid power");
        assert_eq!(config.kind, SourceKind::Prometheus);
        assert!(config.enabled);
        assert_eq!(config.decimals, 0);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let (config, _) =
            serde_json_core::de::from_slice::<SensorConfig>(br#"{"label":"Rain"}"#).unwrap();
        assert_eq!(config.label.as_str(), "Rain");
        assert_eq!(config.divisor, 1.0);
        assert_eq!(config.decimals, 1);
        assert!(!config.enabled);
        assert!(config.url.is_empty());
    }

    #[test]
    fn json_source_fields_use_wire_names() {
        let json = br#"{"enabled":true,"type":"json","jsonPath":"data.values[0]","url":"http://api/today"}"#;
        let (config, _) = serde_json_core::de::from_slice::<SensorConfig>(json).unwrap();
        assert_eq!(config.kind, SourceKind::Json);
        assert_eq!(config.json_path.as_str(), "data.values[0]");
    }
}
