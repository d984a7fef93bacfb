//! RAM-cached key-value config store with debounced flash persistence.
//!
//! The whole store rides in RAM as one heapless map; every write raises
//! [`STORE_DIRTY`](crate::channels::STORE_DIRTY) and the store task persists
//! a postcard snapshot into the reserved flash range after a short debounce.

use defmt::*;
use embassy_rp::flash::{Async, Flash};
use embassy_rp::peripherals::FLASH;
use embassy_time::{Duration, Timer};
use heapless::{FnvIndexMap, String};
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use tessera_core::traits::{ConfigStore, StoreError};

use crate::channels::{CONFIG, STORE_DIRTY};

/// Total flash size of the Pico W
pub const FLASH_SIZE: usize = 2 * 1024 * 1024;

/// Flash range reserved for the config snapshot (last 64 KiB)
const STORE_RANGE: core::ops::Range<u32> = 0x1F_0000..0x20_0000;

/// Map key of the single snapshot item
const SNAPSHOT_KEY: u8 = 0;

/// Debounce between the last write and the flash persist
const PERSIST_DEBOUNCE: Duration = Duration::from_secs(2);

pub const MAX_KEYS: usize = 32;
pub const MAX_KEY: usize = 16;
pub const MAX_VALUE: usize = 512;

/// Snapshot buffer bound: worst-case map plus postcard overhead
const SNAPSHOT_BUF: usize = 16 * 1024;

// Firmware-only keys (the scheduling core defines its own in
// tessera_core::config)
pub const KEY_SSID: &str = "ssid";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_NTP_SERVER: &str = "ntp_srv";
pub const KEY_NTP_GMT: &str = "ntp_gmt";
pub const KEY_NTP_DST: &str = "ntp_dst";

pub type ConfigFlash = Flash<'static, FLASH, Async, FLASH_SIZE>;

type Map = FnvIndexMap<String<MAX_KEY>, String<MAX_VALUE>, MAX_KEYS>;

/// The RAM store
pub struct ConfigBank {
    map: Map,
}

impl ConfigBank {
    pub const fn new() -> Self {
        Self {
            map: FnvIndexMap::new(),
        }
    }

    /// Replace contents from a flash snapshot
    pub fn restore(&mut self, blob: &[u8]) -> bool {
        match postcard::from_bytes::<Map>(blob) {
            Ok(map) => {
                self.map = map;
                true
            }
            Err(_) => false,
        }
    }

    /// Serialize contents for a flash snapshot
    pub fn snapshot<'b>(&self, buf: &'b mut [u8]) -> Option<&'b [u8]> {
        postcard::to_slice(&self.map, buf).ok().map(|s| &*s)
    }
}

impl ConfigStore for ConfigBank {
    fn get(&self, key: &str) -> Option<&str> {
        self.map.get(key).map(|v| v.as_str())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let key: String<MAX_KEY> = String::try_from(key).map_err(|_| StoreError::Capacity)?;
        let value: String<MAX_VALUE> = String::try_from(value).map_err(|_| StoreError::Capacity)?;
        self.map
            .insert(key, value)
            .map_err(|_| StoreError::Capacity)?;
        STORE_DIRTY.signal(());
        Ok(())
    }
}

/// Load the persisted snapshot into the shared store (boot time)
pub async fn restore_from_flash(flash: &mut ConfigFlash) {
    let mut cache = NoCache::new();
    let mut buf = [0u8; SNAPSHOT_BUF];

    match fetch_item::<u8, &[u8], _>(flash, STORE_RANGE, &mut cache, &mut buf, &SNAPSHOT_KEY).await
    {
        Ok(Some(blob)) => {
            let restored = CONFIG.lock().await.restore(blob);
            if restored {
                info!("config restored from flash");
            } else {
                warn!("config snapshot in flash is unreadable, starting empty");
            }
        }
        Ok(None) => info!("no config in flash, starting empty"),
        Err(_) => warn!("config flash read failed, starting empty"),
    }
}

/// Wi-Fi credentials from the store
pub async fn wifi_credentials() -> (String<48>, String<64>) {
    let bank = CONFIG.lock().await;
    let ssid = String::try_from(bank.get(KEY_SSID).unwrap_or("")).unwrap_or_default();
    let password = String::try_from(bank.get(KEY_PASSWORD).unwrap_or("")).unwrap_or_default();
    (ssid, password)
}

/// Store task: persists the RAM map to flash after writes settle
#[embassy_executor::task]
pub async fn store_task(mut flash: ConfigFlash) {
    info!("store task started");
    let mut cache = NoCache::new();

    loop {
        STORE_DIRTY.wait().await;
        // Coalesce bursts (a save_config touches many keys)
        Timer::after(PERSIST_DEBOUNCE).await;
        STORE_DIRTY.reset();

        let mut snapshot_buf = [0u8; SNAPSHOT_BUF];
        let blob = {
            let bank = CONFIG.lock().await;
            match bank.snapshot(&mut snapshot_buf) {
                Some(blob) => blob.len(),
                None => {
                    warn!("config snapshot failed, skipping persist");
                    continue;
                }
            }
        };

        let mut io_buf = [0u8; SNAPSHOT_BUF];
        let result = store_item::<u8, &[u8], _>(
            &mut flash,
            STORE_RANGE,
            &mut cache,
            &mut io_buf,
            &SNAPSHOT_KEY,
            &&snapshot_buf[..blob],
        )
        .await;

        match result {
            Ok(()) => debug!("config persisted ({} bytes)", blob),
            Err(_) => warn!("config flash write failed"),
        }
    }
}
