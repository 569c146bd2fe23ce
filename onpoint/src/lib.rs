pub mod clock;
pub mod domain;
pub mod planes;
pub mod ports;

#[cfg(test)]
pub(crate) mod test_support;

pub use clock::{ManualClock, SystemClock};
pub use domain::{AggregateMetrics, CacheEntry, FeatureArea, FileDescriptor, ItemMetrics};
pub use planes::control::FeatureCaches;
pub use planes::data::{EngagementMetrics, TtlCache};
pub use ports::{Clock, KvStore};
