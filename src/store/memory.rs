//! # In-process store for tests and demos.
//!
//! [`MemoryStore`] keeps everything in a `Mutex<HashMap>`. It is "durable"
//! only for as long as the `Arc` lives, which is exactly what restart
//! simulations need: build a monitor over a store, drop the monitor, build a
//! second monitor over the same store, and the second one sees what the
//! first persisted.
//!
//! Not intended for production use — implement [`Store`] over a real engine
//! with crash-safe commit semantics.

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::StoreError;

use super::Store;

/// Shared-map [`Store`] implementation.
#[derive(Default)]
pub struct MemoryStore {
    map: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live keys. Test helper.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// True if no keys are stored. Test helper.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        // A panic while holding this lock poisons it; the data is still
        // coherent (single map insert/remove), so recover the guard.
        self.map.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl Store for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn set_durable(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.set(key, value)
    }

    fn remove_batch(&self, keys: &[&str]) -> Result<(), StoreError> {
        let mut map = self.lock();
        for key in keys {
            map.remove(*key);
        }
        Ok(())
    }
}
