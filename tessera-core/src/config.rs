//! Config-store keys and record parsing.
//!
//! Sensor records and the screen mapping live in the store as JSON text,
//! exactly as the config link delivered them. Parsing is lenient for sensor
//! records (absent fields default) and strict for the mapping (anything but
//! a four-entry array invalidates it and the default assignment runs).

use core::fmt::Write;

use heapless::{String, Vec};

use crate::screen::SCREEN_COUNT;
use crate::traits::ConfigStore;

pub use tessera_protocol::config::{SensorConfig, SourceKind, SENSOR_SLOTS};

pub const KEY_MODULE_MAP: &str = "module_map";
pub const KEY_SENSOR_INTERVAL: &str = "sensorInterval";
pub const KEY_SENSOR_STYLE: &str = "sens_style";
pub const KEY_FEED_URL: &str = "feed_url";
pub const KEY_LANGUAGE: &str = "language";

/// Floor for the configured sensor interval
pub const MIN_SENSOR_INTERVAL_SECS: u32 = 10;

/// Interval used when nothing is configured
pub const DEFAULT_SENSOR_INTERVAL_SECS: u32 = 60;

/// Longest accepted module name in a mapping entry
pub const MAX_MODULE_NAME: usize = 16;

/// A validated screen mapping: one entry per screen slot
pub type ModuleMap = Vec<String<MAX_MODULE_NAME>, SCREEN_COUNT>;

/// Mapping entries that leave a screen unassigned
pub fn is_unassigned(entry: &str) -> bool {
    entry == "None" || entry == "Empty"
}

/// Store key for one sensor slot
pub fn sensor_key(slot: usize) -> String<10> {
    let mut key = String::new();
    let _ = write!(key, "sensor_{}", slot);
    key
}

/// Parse a `module_map` value
///
/// Valid only as a JSON array of exactly one entry per screen; any other
/// length, or malformed JSON, invalidates the whole mapping.
pub fn parse_module_map(raw: &str) -> Option<ModuleMap> {
    let (map, _) = serde_json_core::de::from_str::<ModuleMap>(raw).ok()?;
    (map.len() == SCREEN_COUNT).then_some(map)
}

/// Read and validate the stored mapping
pub fn load_module_map(store: &dyn ConfigStore) -> Option<ModuleMap> {
    parse_module_map(store.get(KEY_MODULE_MAP)?)
}

/// Read one sensor slot's record, defaulting absent or malformed records
pub fn load_sensor(store: &dyn ConfigStore, slot: usize) -> SensorConfig {
    store
        .get(sensor_key(slot).as_str())
        .and_then(|raw| serde_json_core::de::from_str::<SensorConfig>(raw).ok())
        .map(|(config, _)| config)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::MemStore;

    #[test]
    fn sensor_keys() {
        assert_eq!(sensor_key(0).as_str(), "sensor_0");
        assert_eq!(sensor_key(15).as_str(), "sensor_15");
    }

    #[test]
    fn four_entry_mapping_parses() {
        let map = parse_module_map(r#"["Ephemeris","Sensors","Events","Sensors"]"#).unwrap();
        assert_eq!(map.len(), 4);
        assert_eq!(map[0].as_str(), "Ephemeris");
        assert_eq!(map[3].as_str(), "Sensors");
    }

    #[test]
    fn wrong_length_mappings_are_invalid() {
        assert!(parse_module_map(r#"["Ephemeris","Sensors","Events"]"#).is_none());
        assert!(parse_module_map(r#"["A","B","C","D","E"]"#).is_none());
        assert!(parse_module_map("[]").is_none());
    }

    #[test]
    fn malformed_mappings_are_invalid() {
        assert!(parse_module_map("").is_none());
        assert!(parse_module_map("not json").is_none());
        assert!(parse_module_map(r#"{"0":"Ephemeris"}"#).is_none());
    }

    #[test]
    fn sentinels_are_recognized() {
        assert!(is_unassigned("None"));
        assert!(is_unassigned("Empty"));
        assert!(!is_unassigned("none"));
        assert!(!is_unassigned("Sensors"));
    }

    #[test]
    fn sensor_record_loads_with_defaults() {
        let mut store = MemStore::new();
        store.put("sensor_3", r#"{"label":"Grid","enabled":true}"#);

        let config = load_sensor(&store, 3);
        assert_eq!(config.label.as_str(), "Grid");
        assert!(config.enabled);
        assert_eq!(config.decimals, 1);

        // Absent and malformed records both fall back to the default
        assert_eq!(load_sensor(&store, 4), SensorConfig::default());
        store.put("sensor_5", "{broken");
        assert_eq!(load_sensor(&store, 5), SensorConfig::default());
    }
}
