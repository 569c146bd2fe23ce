use std::path::PathBuf;
use tracing::warn;

pub enum StorageBackend {
    Sled(PathBuf),       // db path
    Memory(Option<u64>), // quota in bytes
    None,                // no persistent store available
}

pub struct Config {
    pub data_dir: String,
    pub storage: StorageBackend,
    pub log_filter: String,
}

impl Config {
    const DEFAULT_DATA_DIR: &str = "./data";
    const DEFAULT_STORAGE: &str = "sled";
    const DEFAULT_LOG_FILTER: &str = "info";
    const SLED_DB_NAME: &str = "onpoint.sled";

    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from any variable source
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir =
            lookup("ONPOINT_DATA_DIR").unwrap_or_else(|| Self::DEFAULT_DATA_DIR.to_string());

        let quota = lookup("ONPOINT_STORAGE_QUOTA_BYTES").and_then(|raw| {
            raw.parse::<u64>()
                .inspect_err(|_| warn!("ONPOINT_STORAGE_QUOTA_BYTES '{}' is not a number, ignoring", raw))
                .ok()
        });

        let storage_kind =
            lookup("ONPOINT_STORAGE").unwrap_or_else(|| Self::DEFAULT_STORAGE.to_string());

        let storage = match storage_kind.trim().to_ascii_lowercase().as_str() {
            "sled" => StorageBackend::Sled(PathBuf::from(&data_dir).join(Self::SLED_DB_NAME)),
            "memory" => StorageBackend::Memory(quota),
            "none" => StorageBackend::None,
            other => {
                warn!("Unknown ONPOINT_STORAGE '{}', falling back to sled", other);
                StorageBackend::Sled(PathBuf::from(&data_dir).join(Self::SLED_DB_NAME))
            }
        };

        Self {
            data_dir,
            storage,
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| Self::DEFAULT_LOG_FILTER.to_string()),
        }
    }
}

impl StorageBackend {
    pub fn name(&self) -> &str {
        match self {
            StorageBackend::Sled(..) => "sled",
            StorageBackend::Memory(..) => "memory",
            StorageBackend::None => "none",
        }
    }
}
