use crate::domain::{CacheEntry, FileDescriptor};
use crate::ports::{Clock, KvStore};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::TtlMs;
use std::fmt::{self, Debug, Display};
use std::sync::Arc;

const KEY_SEPARATOR: &str = "_";

/// Prefix-namespaced cache with expiry checked on read
///
/// Every operation is fail-soft: storage and serialization errors are logged
/// and turned into a miss or a no-op. A cache built without a store behaves as
/// permanently empty.
#[derive(Clone)]
pub struct TtlCache {
    prefix: String,
    ttl: TtlMs,
    store: Option<Arc<dyn KvStore>>,
    clock: Arc<dyn Clock>,
}

impl TtlCache {
    pub fn new(
        prefix: impl Into<String>,
        ttl: TtlMs,
        store: Option<Arc<dyn KvStore>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            ttl,
            store,
            clock,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn ttl(&self) -> TtlMs {
        self.ttl
    }

    fn storage_key(&self, key: &str) -> String {
        format!("{}{}{}", self.prefix, KEY_SEPARATOR, key)
    }

    /// Fetch a live value, deleting it if it has expired
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let store = self.store.as_ref()?;
        let storage_key = self.storage_key(key);

        let raw = match store.get(&storage_key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!("Cache read failed for '{}': {}", storage_key, e);
                return None;
            }
        };

        let entry: CacheEntry<T> = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::warn!("Cache entry '{}' could not be parsed: {}", storage_key, e);
                return None;
            }
        };

        if entry.is_expired(self.clock.now_ms(), self.ttl) {
            tracing::debug!("Cache entry '{}' expired, removing", storage_key);
            if let Err(e) = store.remove(&storage_key) {
                tracing::warn!("Failed to remove expired entry '{}': {}", storage_key, e);
            }
            return None;
        }

        Some(entry.data)
    }

    pub fn set<T: Serialize>(&self, key: &str, value: &T) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let storage_key = self.storage_key(key);
        let entry = CacheEntry::new(value, self.clock.now_ms());

        let raw = match serde_json::to_string(&entry) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to serialize cache entry '{}': {}", storage_key, e);
                return;
            }
        };

        if let Err(e) = store.set(&storage_key, &raw) {
            tracing::warn!("Cache write failed for '{}': {}", storage_key, e);
        }
    }

    pub fn remove(&self, key: &str) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let storage_key = self.storage_key(key);
        if let Err(e) = store.remove(&storage_key) {
            tracing::warn!("Cache remove failed for '{}': {}", storage_key, e);
        }
    }

    /// Remove every entry under this cache's prefix
    pub fn clear(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };
        let namespace = format!("{}{}", self.prefix, KEY_SEPARATOR);

        let keys = match store.keys() {
            Ok(keys) => keys,
            Err(e) => {
                tracing::warn!("Failed to list keys while clearing '{}': {}", self.prefix, e);
                return;
            }
        };

        let mut removed = 0usize;
        for key in keys.iter().filter(|k| k.starts_with(&namespace)) {
            match store.remove(key) {
                Ok(()) => removed += 1,
                Err(e) => tracing::warn!("Failed to remove '{}' while clearing: {}", key, e),
            }
        }

        tracing::debug!("Cleared {} entries from cache '{}'", removed, self.prefix);
    }

    /// Key for an uploaded file: `name_size_lastModified`
    pub fn generate_file_key(file: &FileDescriptor) -> String {
        Self::generate_key(&[&file.name, &file.size, &file.last_modified])
    }

    /// Join the display form of each part with the key separator
    pub fn generate_key(parts: &[&dyn Display]) -> String {
        parts
            .iter()
            .map(|part| part.to_string())
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }
}

impl Debug for TtlCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TtlCache")
            .field("prefix", &self.prefix)
            .field("ttl", &self.ttl)
            .field("store", &self.store.as_ref().map(|_| "<dyn KvStore>"))
            .finish()
    }
}
