use crate::clock::format_iso_millis;
use crate::domain::{AggregateMetrics, ItemMetrics};
use crate::ports::{Clock, KvStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{self, Debug};
use std::sync::Arc;

type MetricsMap = BTreeMap<String, ItemMetrics>;

/// Blob persisted under [`EngagementMetrics::STORAGE_KEY`]
#[derive(Serialize)]
struct MetricsBlob<'a> {
    version: u32,
    data: &'a MetricsMap,
    timestamp: String,
}

/// Loose view of a stored blob; `data` is only interpreted once the version is known
#[derive(Deserialize)]
struct StoredBlob {
    version: u32,
    #[serde(default)]
    data: serde_json::Value,
}

/// Per-item like/try-on/share counters, kept in memory and rewritten as one blob
pub struct EngagementMetrics {
    items: MetricsMap,
    store: Option<Arc<dyn KvStore>>,
    clock: Arc<dyn Clock>,
}

impl EngagementMetrics {
    pub const STORAGE_KEY: &str = "onpoint-engagement-metrics";
    pub const SCHEMA_VERSION: u32 = 1;

    /// Load the persisted counters, starting empty if nothing usable is stored
    pub fn load(store: Option<Arc<dyn KvStore>>, clock: Arc<dyn Clock>) -> Self {
        let items = store
            .as_ref()
            .and_then(Self::read_persisted)
            .unwrap_or_default();

        Self {
            items,
            store,
            clock,
        }
    }

    fn read_persisted(store: &Arc<dyn KvStore>) -> Option<MetricsMap> {
        let raw = match store.get(Self::STORAGE_KEY) {
            Ok(raw) => raw?,
            Err(e) => {
                tracing::warn!("Failed to read engagement metrics: {}", e);
                return None;
            }
        };

        let stored: StoredBlob = match serde_json::from_str(&raw) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!("Stored engagement metrics are unreadable: {}", e);
                return None;
            }
        };

        upgrade(stored)
    }

    pub fn get_metrics(&self, item_id: &str) -> ItemMetrics {
        self.items.get(item_id).cloned().unwrap_or_default()
    }

    pub fn increment_like(&mut self, item_id: &str) {
        let now = self.clock.now_ms();
        self.update(item_id, |m| {
            m.likes = m.likes.saturating_add(1);
            m.last_liked = Some(now);
        });
    }

    pub fn increment_try_on(&mut self, item_id: &str) {
        self.update(item_id, |m| m.tries = m.tries.saturating_add(1));
    }

    pub fn increment_share(&mut self, item_id: &str) {
        self.update(item_id, |m| m.shares = m.shares.saturating_add(1));
    }

    /// Undo a like; never goes below zero and never creates a record
    pub fn decrement_like(&mut self, item_id: &str) {
        let Some(metrics) = self.items.get_mut(item_id) else {
            tracing::debug!("Ignoring unlike for untracked item '{}'", item_id);
            return;
        };
        metrics.likes = metrics.likes.saturating_sub(1);
        metrics.last_liked = None;
        self.persist();
    }

    pub fn has_liked(&self, item_id: &str) -> bool {
        self.items
            .get(item_id)
            .and_then(|m| m.last_liked)
            .is_some_and(|ts| ts > 0)
    }

    pub fn get_aggregate_metrics(&self) -> AggregateMetrics {
        self.items
            .values()
            .fold(AggregateMetrics::default(), AggregateMetrics::add)
    }

    pub fn snapshot(&self) -> impl Iterator<Item = (&str, &ItemMetrics)> {
        self.items.iter().map(|(id, m)| (id.as_str(), m))
    }

    pub fn clear_metrics(&mut self) {
        self.items.clear();
        if let Some(store) = self.store.as_ref() {
            if let Err(e) = store.remove(Self::STORAGE_KEY) {
                tracing::warn!("Failed to delete engagement metrics: {}", e);
            }
        }
    }

    fn update<F>(&mut self, item_id: &str, apply: F)
    where
        F: FnOnce(&mut ItemMetrics),
    {
        apply(self.items.entry(item_id.to_string()).or_default());
        self.persist();
    }

    fn persist(&self) {
        let Some(store) = self.store.as_ref() else {
            return;
        };

        let blob = MetricsBlob {
            version: Self::SCHEMA_VERSION,
            data: &self.items,
            timestamp: format_iso_millis(self.clock.now_ms()),
        };

        let raw = match serde_json::to_string(&blob) {
            Ok(raw) => raw,
            Err(e) => {
                tracing::warn!("Failed to serialize engagement metrics: {}", e);
                return;
            }
        };

        if let Err(e) = store.set(Self::STORAGE_KEY, &raw) {
            tracing::warn!("Failed to save engagement metrics: {}", e);
        }
    }
}

/// Bring a stored blob up to the current schema
/// Versions without a migration are dropped
fn upgrade(stored: StoredBlob) -> Option<MetricsMap> {
    match stored.version {
        EngagementMetrics::SCHEMA_VERSION => match serde_json::from_value(stored.data) {
            Ok(items) => Some(items),
            Err(e) => {
                tracing::warn!("Engagement metrics payload is malformed: {}", e);
                None
            }
        },
        other => {
            tracing::warn!(
                "Discarding engagement metrics with schema version {} (current is {})",
                other,
                EngagementMetrics::SCHEMA_VERSION
            );
            None
        }
    }
}

impl Debug for EngagementMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngagementMetrics")
            .field("items", &self.items.len())
            .field("persistent", &self.store.is_some())
            .finish()
    }
}
