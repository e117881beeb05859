//! Key/value storage backends.
//!
//! The adapter only needs synchronous get/set/remove by string key, the same
//! surface the browser's origin storage offers.
//!
//! - `MemoryStore` - in-process map, for tests and ephemeral sessions
//! - `FileStore` - one JSON file per key under a directory

mod file;
mod memory;

use std::sync::Arc;

use crate::error::Result;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Synchronous string key/value storage.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` when absent.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing anything already there.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key succeeds.
    fn remove(&self, key: &str) -> Result<()>;

    /// Every key currently stored, sorted.
    fn keys(&self) -> Result<Vec<String>>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> Result<Vec<String>> {
        (**self).keys()
    }
}
