pub mod engagement;
pub mod ttl_cache;

pub use engagement::EngagementMetrics;
pub use ttl_cache::TtlCache;
