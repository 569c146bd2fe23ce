use crate::cli::{CacheCommand, Command, MetricsCommand};
use onpoint::{EngagementMetrics, FeatureCaches};
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::io::{self, Write};

/// Run one command against the caches and metrics store, writing JSON to `out`
pub fn execute<W: Write>(
    command: Command,
    caches: &FeatureCaches,
    metrics: &mut EngagementMetrics,
    out: &mut W,
) -> io::Result<()> {
    let response = match command {
        Command::Cache(cmd) => run_cache(cmd, caches),
        Command::Metrics(cmd) => run_metrics(cmd, metrics),
    };

    serde_json::to_writer_pretty(&mut *out, &response)?;
    writeln!(out)
}

fn run_cache(command: CacheCommand, caches: &FeatureCaches) -> Value {
    match command {
        CacheCommand::Get { area, key } => caches
            .get(area)
            .get::<Value>(&key)
            .unwrap_or(Value::Null),
        CacheCommand::Set { area, key, value } => {
            let value: Value = serde_json::from_str(&value).unwrap_or(Value::String(value));
            let cache = caches.get(area);
            cache.set(&key, &value);

            // set never reports failure, so read it back
            let stored = cache.get::<Value>(&key).is_some();
            if !stored {
                tracing::warn!("Value for '{}' in {} was not stored", key, area);
            }
            json!({ "area": area.name(), "key": key, "stored": stored })
        }
        CacheCommand::Remove { area, key } => {
            let cache = caches.get(area);
            let existed = cache.get::<Value>(&key).is_some();
            cache.remove(&key);

            // remove never reports failure either
            let removed = existed && cache.get::<Value>(&key).is_none();
            if existed && !removed {
                tracing::warn!("Value for '{}' in {} was not removed", key, area);
            }
            json!({ "area": area.name(), "key": key, "removed": removed })
        }
        CacheCommand::Clear { area: Some(area) } => {
            caches.get(area).clear();
            json!({ "cleared": [area.name()] })
        }
        CacheCommand::Clear { area: None } => {
            caches.clear_all();
            let names: Vec<&str> = caches.iter().map(|(area, _)| area.name()).collect();
            json!({ "cleared": names })
        }
    }
}

fn run_metrics(command: MetricsCommand, metrics: &mut EngagementMetrics) -> Value {
    match command {
        MetricsCommand::Show { item } => item_report(metrics, &item),
        MetricsCommand::Like { item } => {
            metrics.increment_like(&item);
            item_report(metrics, &item)
        }
        MetricsCommand::Unlike { item } => {
            metrics.decrement_like(&item);
            item_report(metrics, &item)
        }
        MetricsCommand::TryOn { item } => {
            metrics.increment_try_on(&item);
            item_report(metrics, &item)
        }
        MetricsCommand::Share { item } => {
            metrics.increment_share(&item);
            item_report(metrics, &item)
        }
        MetricsCommand::Aggregate => json!(metrics.get_aggregate_metrics()),
        MetricsCommand::List => {
            let items: BTreeMap<&str, _> = metrics.snapshot().collect();
            json!(items)
        }
        MetricsCommand::Clear => {
            metrics.clear_metrics();
            json!({ "cleared": true })
        }
    }
}

fn item_report(metrics: &EngagementMetrics, item: &str) -> Value {
    json!({
        "itemId": item,
        "metrics": metrics.get_metrics(item),
        "hasLiked": metrics.has_liked(item),
    })
}
