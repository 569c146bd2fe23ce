pub mod memory_store;
pub mod sled_store;

pub use memory_store::MemoryKvStore;
pub use sled_store::SledKvStore;

use onpoint::ports::KvStore;
use shared::Result;
use shared::config::StorageBackend;
use std::sync::Arc;

/// Open the key-value store selected by configuration
///
/// `StorageBackend::None` yields `Ok(None)`: callers run with no persistent
/// store and every cache read misses.
pub fn open_store(backend: &StorageBackend) -> Result<Option<Arc<dyn KvStore>>> {
    let store: Arc<dyn KvStore> = match backend {
        StorageBackend::Sled(path) => {
            tracing::info!("Opening sled store at {}", path.display());
            Arc::new(SledKvStore::open(path)?)
        }
        StorageBackend::Memory(Some(quota)) => {
            tracing::info!("Using in-memory store with a {} byte quota", quota);
            Arc::new(MemoryKvStore::with_quota(*quota))
        }
        StorageBackend::Memory(None) => {
            tracing::info!("Using unbounded in-memory store");
            Arc::new(MemoryKvStore::new())
        }
        StorageBackend::None => {
            tracing::info!("No persistent store configured");
            return Ok(None);
        }
    };

    Ok(Some(store))
}

#[cfg(test)]
mod tests {
    use super::*;
    use onpoint::{EngagementMetrics, FeatureArea, FeatureCaches, ManualClock, TtlCache};
    use shared::TtlMs;

    #[test]
    fn test_open_store_none_backend() {
        assert!(open_store(&StorageBackend::None).unwrap().is_none());
    }

    #[test]
    fn test_open_store_memory_backend() {
        let store = open_store(&StorageBackend::Memory(Some(1024))).unwrap().unwrap();
        store.set("k", "\"v\"").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("\"v\""));
    }

    #[test]
    fn test_metrics_survive_sled_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let backend = StorageBackend::Sled(temp_dir.path().join("onpoint.sled"));
        let clock = Arc::new(ManualClock::new(1_700_000_000_000));

        {
            let store = open_store(&backend).unwrap();
            let mut metrics = EngagementMetrics::load(store, clock.clone());
            metrics.increment_like("shirt-1");
            metrics.increment_try_on("shirt-1");
            metrics.increment_share("jeans-2");
        }

        let store = open_store(&backend).unwrap();
        let metrics = EngagementMetrics::load(store, clock);
        assert_eq!(metrics.get_metrics("shirt-1").likes, 1);
        assert_eq!(metrics.get_metrics("shirt-1").tries, 1);
        assert_eq!(metrics.get_metrics("jeans-2").shares, 1);
        assert!(metrics.has_liked("shirt-1"));
    }

    #[test]
    fn test_cache_over_sled_expires_lazily() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = open_store(&StorageBackend::Sled(temp_dir.path().join("onpoint.sled")))
            .unwrap()
            .unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let cache = TtlCache::new("scenario", TtlMs(1_000), Some(store.clone()), clock.clone());

        cache.set("a", &serde_json::json!({"x": 1}));
        clock.set(500);
        assert_eq!(
            cache.get::<serde_json::Value>("a"),
            Some(serde_json::json!({"x": 1}))
        );

        // Still on disk until somebody reads it past its ttl
        clock.set(1_500);
        assert!(store.get("scenario_a").unwrap().is_some());
        assert_eq!(cache.get::<serde_json::Value>("a"), None);
        assert!(store.get("scenario_a").unwrap().is_none());
    }

    #[test]
    fn test_quota_full_store_keeps_app_running() {
        let store = open_store(&StorageBackend::Memory(Some(64))).unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let caches = FeatureCaches::new(store.clone(), clock.clone());

        let render = "x".repeat(256);
        caches.get(FeatureArea::VirtualTryOn).set("selfie", &render);
        assert_eq!(caches.virtual_try_on().get::<String>("selfie"), None);

        caches.critique().set("look", &"ok");
        assert_eq!(caches.critique().get::<String>("look").as_deref(), Some("ok"));

        let mut metrics = EngagementMetrics::load(store, clock);
        metrics.increment_like("hat");
        assert_eq!(metrics.get_metrics("hat").likes, 1);
    }

    #[test]
    fn test_iso_timestamp_written_by_chrono() {
        let store = open_store(&StorageBackend::Memory(None)).unwrap();
        let clock = Arc::new(ManualClock::new(0));
        let mut metrics = EngagementMetrics::load(store.clone(), clock);
        metrics.increment_share("bag");

        let raw = store
            .unwrap()
            .get(EngagementMetrics::STORAGE_KEY)
            .unwrap()
            .unwrap();
        let blob: serde_json::Value = serde_json::from_str(&raw).unwrap();
        let parsed = chrono::DateTime::parse_from_rfc3339(blob["timestamp"].as_str().unwrap());
        assert_eq!(parsed.unwrap().timestamp_millis(), 0);
    }
}
