use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use onpoint::ports::KvStore;
use shared::{Error, Result};
use std::fmt::{self, Debug};
use std::sync::atomic::{AtomicU64, Ordering};

/// Concurrent in-memory key-value store with an optional byte quota
///
/// Usage is counted as key bytes plus value bytes, the way browsers charge
/// `localStorage`. A write that would exceed the quota fails and leaves the
/// previous value in place.
pub struct MemoryKvStore {
    entries: DashMap<String, String>,
    used_bytes: AtomicU64,
    quota_bytes: Option<u64>,
}

impl MemoryKvStore {
    /// Create an unbounded store
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            used_bytes: AtomicU64::new(0),
            quota_bytes: None,
        }
    }

    /// Create a store that refuses writes beyond `quota_bytes`
    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    pub fn used_bytes(&self) -> u64 {
        self.used_bytes.load(Ordering::SeqCst)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for MemoryKvStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KvStore for MemoryKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).map(|v| v.value().clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let new_size = (key.len() + value.len()) as u64;

        // The entry guard holds the shard lock until the value is written
        let entry = self.entries.entry(key.to_string());
        let old_size = match &entry {
            Entry::Occupied(occupied) => (key.len() + occupied.get().len()) as u64,
            Entry::Vacant(_) => 0,
        };

        let quota = self.quota_bytes;
        self.used_bytes
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |used| {
                let next = used.saturating_sub(old_size) + new_size;
                match quota {
                    Some(limit) if next > limit => None,
                    _ => Some(next),
                }
            })
            .map_err(|_| Error::QuotaExceeded {
                requested: new_size,
                limit: quota.unwrap_or(u64::MAX),
            })?;

        entry.insert(value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        if let Some((k, v)) = self.entries.remove(key) {
            self.used_bytes
                .fetch_sub((k.len() + v.len()) as u64, Ordering::SeqCst);
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.iter().map(|e| e.key().clone()).collect())
    }
}

impl Debug for MemoryKvStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryKvStore")
            .field("entries", &self.entries.len())
            .field("used_bytes", &self.used_bytes())
            .field("quota_bytes", &self.quota_bytes)
            .finish()
    }
}
