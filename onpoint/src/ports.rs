#![deny(clippy::all)]

use shared::Result;

// Ports are the pluggable extension points for the persistent store and time source

/// Port for a string key-value store (the localStorage analogue)
/// Values are UTF-8 JSON documents; every call is synchronous and may fail
pub trait KvStore: Send + Sync + 'static {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    /// All keys currently held, in no particular order
    fn keys(&self) -> Result<Vec<String>>;
}

/// Port for the wall clock, in milliseconds since the Unix epoch
pub trait Clock: Send + Sync + 'static {
    fn now_ms(&self) -> i64;
}
