//! Config-link message surface.
//!
//! Commands arrive as JSON payloads inside [`crate::frame`] frames of kind
//! [`KIND_COMMAND`]; replies go out under [`KIND_REPLY`]. Two commands exist:
//!
//! - `{"cmd":"get_config"}` → a `config_data` reply with the full settings
//!   surface and all sixteen sensor records;
//! - `{"cmd":"save_config","config":{...}}` → a partial update; only fields
//!   present in the patch are persisted. The firmware answers `save_ok` and
//!   raises its "configuration changed" signal.

use heapless::{String, Vec};
use serde::{Deserialize, Serialize};

use crate::config::{SensorConfig, MAX_URL, SENSOR_SLOTS};

/// Frame kind for inbound JSON commands
pub const KIND_COMMAND: u8 = 0x01;

/// Frame kind for outbound JSON replies
pub const KIND_REPLY: u8 = 0x02;

/// Maximum length of the verbatim `module_map` JSON string
pub const MAX_MAP_JSON: usize = 96;

/// Maximum hostname-ish string length (SSID, NTP server)
pub const MAX_HOST: usize = 48;

/// Maximum Wi-Fi passphrase length
pub const MAX_SECRET: usize = 64;

/// Maximum language code length
pub const MAX_LANG: usize = 8;

/// Canned `save_ok` reply payload
pub const SAVE_OK: &[u8] = br#"{"cmd":"save_ok"}"#;

/// Errors from command decoding / reply encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinkError {
    /// Payload is not the JSON we expect (or exceeds a field capacity)
    Json,
    /// `cmd` names no known command
    UnknownCommand,
    /// `save_config` without a `config` object
    MissingConfig,
}

/// Partial settings update carried by `save_config`
///
/// `None` means "leave the stored value alone". The `module_map` string is
/// persisted verbatim; the firmware never normalizes it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigPatch {
    pub ssid: Option<String<MAX_HOST>>,
    pub password: Option<String<MAX_SECRET>>,
    #[serde(rename = "ntpServer")]
    pub ntp_server: Option<String<MAX_HOST>>,
    pub gmt: Option<i32>,
    pub dst: Option<i32>,
    #[serde(rename = "feedUrl")]
    pub feed_url: Option<String<MAX_URL>>,
    #[serde(rename = "sensorInterval")]
    pub sensor_interval: Option<u32>,
    pub lang: Option<String<MAX_LANG>>,
    pub style: Option<u8>,
    pub module_map: Option<String<MAX_MAP_JSON>>,
    pub sensors: Option<Vec<SensorConfig, SENSOR_SLOTS>>,
}

/// A decoded inbound command
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    GetConfig,
    SaveConfig(ConfigPatch),
}

#[derive(Deserialize)]
struct Envelope {
    cmd: String<16>,
    #[serde(default)]
    config: Option<ConfigPatch>,
}

/// Decode one command payload
///
/// The `module_map` field is a JSON string carrying quoted JSON, so the
/// decoder needs an unescape scratch buffer.
pub fn decode_command(payload: &[u8]) -> Result<Command, LinkError> {
    let mut scratch = [0u8; 256];
    let (envelope, _) =
        serde_json_core::de::from_slice_escaped::<Envelope>(payload, &mut scratch)
            .map_err(|_| LinkError::Json)?;
    match envelope.cmd.as_str() {
        "get_config" => Ok(Command::GetConfig),
        "save_config" => envelope
            .config
            .map(Command::SaveConfig)
            .ok_or(LinkError::MissingConfig),
        _ => Err(LinkError::UnknownCommand),
    }
}

/// The `config_data` reply: full settings surface plus all sensor records
#[derive(Debug, Clone, Serialize)]
pub struct ConfigData {
    pub cmd: &'static str,
    pub ssid: String<MAX_HOST>,
    #[serde(rename = "ntpServer")]
    pub ntp_server: String<MAX_HOST>,
    pub gmt: i32,
    pub dst: i32,
    #[serde(rename = "feedUrl")]
    pub feed_url: String<MAX_URL>,
    #[serde(rename = "sensorInterval")]
    pub sensor_interval: u32,
    pub lang: String<MAX_LANG>,
    pub style: u8,
    pub module_map: String<MAX_MAP_JSON>,
    pub sensors: Vec<SensorConfig, SENSOR_SLOTS>,
}

impl Default for ConfigData {
    fn default() -> Self {
        Self {
            cmd: "config_data",
            ssid: String::new(),
            ntp_server: String::new(),
            gmt: 0,
            dst: 0,
            feed_url: String::new(),
            sensor_interval: 60,
            lang: String::new(),
            style: 0,
            module_map: String::new(),
            sensors: Vec::new(),
        }
    }
}

/// Encode a reply payload into `buf`, returning the written length
pub fn encode_reply<T: Serialize>(reply: &T, buf: &mut [u8]) -> Result<usize, LinkError> {
    serde_json_core::ser::to_slice(reply, buf).map_err(|_| LinkError::Json)
}
