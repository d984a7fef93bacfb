//! Persistent key-value config store contract.

/// Errors from store writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Key or value does not fit the store's capacity
    Capacity,
    /// Backing storage failed
    Io,
}

/// Key-value configuration store
///
/// Values are strings; structured values (sensor records, the screen
/// mapping) are stored as the JSON text they arrived with.
pub trait ConfigStore {
    fn get(&self, key: &str) -> Option<&str>;

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Typed read helpers with defaults
pub trait ConfigStoreExt: ConfigStore {
    fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    fn get_u32(&self, key: &str, default: u32) -> u32 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_i32(&self, key: &str, default: i32) -> i32 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    fn get_u8(&self, key: &str, default: u8) -> u8 {
        self.get(key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }
}

// Blanket implementation for all stores, including trait objects
impl<T: ConfigStore + ?Sized> ConfigStoreExt for T {}
