pub mod feature_caches;

pub use feature_caches::FeatureCaches;
