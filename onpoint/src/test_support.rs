use crate::ports::KvStore;
use shared::{Error, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Map-backed store whose writes can be switched off to mimic a full quota
#[derive(Default)]
pub struct MapStore {
    entries: Mutex<BTreeMap<String, String>>,
    reject_writes: AtomicBool,
}

impl MapStore {
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

impl KvStore for MapStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.reject_writes.load(Ordering::SeqCst) {
            return Err(Error::QuotaExceeded {
                requested: value.len() as u64,
                limit: 0,
            });
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.entries.lock().unwrap().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.entries.lock().unwrap().keys().cloned().collect())
    }
}

/// Store where every call fails
pub struct BrokenStore;

impl KvStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Storage("backend offline".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Storage("backend offline".into()))
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Err(Error::Storage("backend offline".into()))
    }

    fn keys(&self) -> Result<Vec<String>> {
        Err(Error::Storage("backend offline".into()))
    }
}
