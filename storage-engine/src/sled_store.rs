use onpoint::ports::KvStore;
use shared::{Error, Result};
use std::path::Path;

/// Sled-backed persistent key-value store
pub struct SledKvStore {
    db: sled::Db,
}

impl SledKvStore {
    /// Open (or create) a store at `path`
    /// Creates the parent directory if it doesn't exist
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| Error::Storage(format!("Failed to create directory: {}", e)))?;
        }

        let db = sled::open(path)
            .map_err(|e| Error::Storage(format!("Failed to open Sled database: {}", e)))?;

        Ok(Self { db })
    }

    fn flush(&self) -> Result<()> {
        self.db
            .flush()
            .map_err(|e| Error::Storage(format!("Failed to flush database: {}", e)))?;
        Ok(())
    }
}

impl KvStore for SledKvStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .db
            .get(key.as_bytes())
            .map_err(|e| Error::Storage(format!("Failed to read '{}': {}", key, e)))?;

        match value {
            Some(bytes) => {
                let text = String::from_utf8(bytes.to_vec()).map_err(|e| {
                    Error::Serialization(format!("Value for '{}' is not UTF-8: {}", key, e))
                })?;
                Ok(Some(text))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db
            .insert(key.as_bytes(), value.as_bytes())
            .map_err(|e| Error::Storage(format!("Failed to write '{}': {}", key, e)))?;

        self.flush()
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| Error::Storage(format!("Failed to remove '{}': {}", key, e)))?;

        self.flush()
    }

    fn keys(&self) -> Result<Vec<String>> {
        let mut keys = Vec::new();

        for result in self.db.iter().keys() {
            let key = result
                .map_err(|e| Error::Storage(format!("Failed to iterate database: {}", e)))?;

            match String::from_utf8(key.to_vec()) {
                Ok(key) => keys.push(key),
                Err(_) => tracing::warn!("Skipping non UTF-8 key in sled store"),
            }
        }

        Ok(keys)
    }
}
