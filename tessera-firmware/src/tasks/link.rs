//! Config-link task: framed JSON commands from the companion tool.
//!
//! Reads frames off the config UART, applies `save_config` patches to the
//! store, answers `get_config`, and raises the update-requested signal so
//! the orchestrator refreshes with the new configuration.

use core::fmt::Write as _;

use defmt::*;
use embassy_rp::uart::BufferedUart;
use embedded_io_async::{Read, Write};
use heapless::String;

use tessera_core::config::{load_sensor, sensor_key};
use tessera_core::traits::{ConfigStore, ConfigStoreExt};
use tessera_protocol::config::SENSOR_SLOTS;
use tessera_protocol::frame::{Decoder, Frame, MAX_FRAME};
use tessera_protocol::link::{
    self, Command, ConfigData, ConfigPatch, KIND_COMMAND, KIND_REPLY,
};
use tessera_protocol::panel::clipped;

use crate::channels::{CONFIG, UPDATE_REQUESTED};
use crate::store::{KEY_NTP_DST, KEY_NTP_GMT, KEY_NTP_SERVER, KEY_PASSWORD, KEY_SSID};

/// Config-link task - read, decode, dispatch, reply
#[embassy_executor::task]
pub async fn link_task(mut uart: BufferedUart<'static>) {
    info!("config link task started");

    let mut decoder = Decoder::new();
    let mut rx = [0u8; 256];

    loop {
        let n = match uart.read(&mut rx).await {
            Ok(0) => continue,
            Ok(n) => n,
            Err(_) => {
                warn!("config link read error");
                continue;
            }
        };

        for &byte in &rx[..n] {
            match decoder.push(byte) {
                Ok(Some(frame)) if frame.kind == KIND_COMMAND => {
                    handle_command(&mut uart, &frame.payload).await;
                }
                Ok(Some(frame)) => {
                    warn!("config link: unexpected frame kind {}", frame.kind);
                }
                Ok(None) => {}
                Err(_) => warn!("config link: framing error, resyncing"),
            }
        }
    }
}

async fn handle_command(uart: &mut BufferedUart<'static>, payload: &[u8]) {
    match link::decode_command(payload) {
        Ok(Command::GetConfig) => {
            let reply = build_config_data().await;
            let mut json = [0u8; 4096];
            match link::encode_reply(&reply, &mut json) {
                Ok(len) => send_reply(uart, &json[..len]).await,
                Err(_) => warn!("config link: reply too large"),
            }
        }
        Ok(Command::SaveConfig(patch)) => {
            apply_patch(&patch).await;
            info!("configuration saved");
            UPDATE_REQUESTED.signal(());
            send_reply(uart, link::SAVE_OK).await;
        }
        Err(_) => warn!("config link: bad command payload"),
    }
}

async fn send_reply(uart: &mut BufferedUart<'static>, payload: &[u8]) {
    let Ok(frame) = Frame::new(KIND_REPLY, payload) else {
        warn!("config link: reply exceeds frame capacity");
        return;
    };
    let mut buf = [0u8; MAX_FRAME];
    let Ok(bytes) = frame.encode(&mut buf) else {
        return;
    };
    if uart.write_all(bytes).await.is_err() {
        warn!("config link: write failed");
    }
}

/// Persist every field present in the patch; absent fields stay untouched
async fn apply_patch(patch: &ConfigPatch) {
    let mut bank = CONFIG.lock().await;

    let mut put = |key: &str, value: &str| {
        if bank.set(key, value).is_err() {
            warn!("config store rejected key {}", key);
        }
    };

    if let Some(v) = &patch.ssid {
        put(KEY_SSID, v);
    }
    if let Some(v) = &patch.password {
        put(KEY_PASSWORD, v);
    }
    if let Some(v) = &patch.ntp_server {
        put(KEY_NTP_SERVER, v);
    }
    if let Some(v) = patch.gmt {
        put(KEY_NTP_GMT, int_str(v).as_str());
    }
    if let Some(v) = patch.dst {
        put(KEY_NTP_DST, int_str(v).as_str());
    }
    if let Some(v) = &patch.feed_url {
        put(tessera_core::config::KEY_FEED_URL, v);
    }
    if let Some(v) = patch.sensor_interval {
        put(
            tessera_core::config::KEY_SENSOR_INTERVAL,
            int_str(v as i32).as_str(),
        );
    }
    if let Some(v) = &patch.lang {
        put(tessera_core::config::KEY_LANGUAGE, v);
    }
    if let Some(v) = patch.style {
        put(
            tessera_core::config::KEY_SENSOR_STYLE,
            int_str(i32::from(v)).as_str(),
        );
    }
    // Persisted verbatim; validation happens where the mapping is consumed
    if let Some(v) = &patch.module_map {
        put(tessera_core::config::KEY_MODULE_MAP, v);
    }

    if let Some(sensors) = &patch.sensors {
        let mut json = [0u8; 512];
        for (slot, record) in sensors.iter().enumerate().take(SENSOR_SLOTS) {
            match serde_json_core::ser::to_slice(record, &mut json) {
                Ok(len) => {
                    if let Ok(text) = core::str::from_utf8(&json[..len]) {
                        put(sensor_key(slot).as_str(), text);
                    }
                }
                Err(_) => warn!("sensor record {} too large, skipped", slot),
            }
        }
    }
}

fn int_str(value: i32) -> String<12> {
    let mut out = String::new();
    let _ = write!(out, "{}", value);
    out
}

async fn build_config_data() -> ConfigData {
    let bank = CONFIG.lock().await;

    let mut data = ConfigData::default();
    data.ssid = clipped(bank.get_or(KEY_SSID, ""));
    data.ntp_server = clipped(bank.get_or(KEY_NTP_SERVER, "pool.ntp.org"));
    data.gmt = bank.get_i32(KEY_NTP_GMT, 3_600);
    data.dst = bank.get_i32(KEY_NTP_DST, 3_600);
    data.feed_url = clipped(bank.get_or(tessera_core::config::KEY_FEED_URL, ""));
    data.sensor_interval = bank.get_u32(tessera_core::config::KEY_SENSOR_INTERVAL, 60);
    data.lang = clipped(bank.get_or(tessera_core::config::KEY_LANGUAGE, "en"));
    data.style = bank.get_u8(tessera_core::config::KEY_SENSOR_STYLE, 0);
    data.module_map = clipped(bank.get_or(tessera_core::config::KEY_MODULE_MAP, ""));

    for slot in 0..SENSOR_SLOTS {
        let record = load_sensor(&*bank, slot);
        if data.sensors.push(record).is_err() {
            break;
        }
    }

    data
}
