use crate::domain::FeatureArea;
use crate::planes::data::TtlCache;
use crate::ports::{Clock, KvStore};
use std::sync::Arc;

/// One preconfigured [`TtlCache`] per feature area, sharing a store and clock
///
/// Built once at startup and handed to whatever needs it.
#[derive(Clone, Debug)]
pub struct FeatureCaches {
    caches: [TtlCache; 5],
}

impl FeatureCaches {
    pub fn new(store: Option<Arc<dyn KvStore>>, clock: Arc<dyn Clock>) -> Self {
        let caches = FeatureArea::ALL
            .map(|area| TtlCache::new(area.prefix(), area.ttl(), store.clone(), clock.clone()));
        Self { caches }
    }

    pub fn get(&self, area: FeatureArea) -> &TtlCache {
        &self.caches[Self::slot(area)]
    }

    pub fn virtual_try_on(&self) -> &TtlCache {
        self.get(FeatureArea::VirtualTryOn)
    }

    pub fn critique(&self) -> &TtlCache {
        self.get(FeatureArea::Critique)
    }

    pub fn style_analysis(&self) -> &TtlCache {
        self.get(FeatureArea::StyleAnalysis)
    }

    pub fn outfit_recommendations(&self) -> &TtlCache {
        self.get(FeatureArea::OutfitRecommendations)
    }

    pub fn design_generation(&self) -> &TtlCache {
        self.get(FeatureArea::DesignGeneration)
    }

    pub fn iter(&self) -> impl Iterator<Item = (FeatureArea, &TtlCache)> {
        FeatureArea::ALL.into_iter().zip(self.caches.iter())
    }

    /// Drop every cached result across all areas
    pub fn clear_all(&self) {
        for cache in &self.caches {
            cache.clear();
        }
    }

    fn slot(area: FeatureArea) -> usize {
        match area {
            FeatureArea::VirtualTryOn => 0,
            FeatureArea::Critique => 1,
            FeatureArea::StyleAnalysis => 2,
            FeatureArea::OutfitRecommendations => 3,
            FeatureArea::DesignGeneration => 4,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::test_support::MapStore;
    use shared::TtlMs;

    #[test]
    fn test_registry_has_five_areas_with_expected_ttls() {
        let caches = FeatureCaches::new(None, Arc::new(ManualClock::new(0)));
        let ttls: Vec<(FeatureArea, TtlMs)> = caches.iter().map(|(a, c)| (a, c.ttl())).collect();

        assert_eq!(
            ttls,
            vec![
                (FeatureArea::VirtualTryOn, TtlMs::from_hours(24)),
                (FeatureArea::Critique, TtlMs::from_hours(12)),
                (FeatureArea::StyleAnalysis, TtlMs::from_hours(6)),
                (FeatureArea::OutfitRecommendations, TtlMs::from_hours(4)),
                (FeatureArea::DesignGeneration, TtlMs::from_hours(24)),
            ]
        );
    }

    #[test]
    fn test_lookup_matches_area_prefix() {
        let caches = FeatureCaches::new(None, Arc::new(ManualClock::new(0)));
        for area in FeatureArea::ALL {
            assert_eq!(caches.get(area).prefix(), area.prefix());
        }
        assert_eq!(caches.critique().prefix(), "onpoint_critique");
    }

    #[test]
    fn test_areas_are_isolated_in_shared_store() {
        let store = Arc::new(MapStore::default());
        let clock = Arc::new(ManualClock::new(0));
        let caches = FeatureCaches::new(Some(store.clone()), clock.clone());

        caches.virtual_try_on().set("look", &"render-url");
        caches.critique().set("look", &"nice");

        // Outfit recommendations expire first
        caches.outfit_recommendations().set("look", &"recs");
        clock.advance(TtlMs::from_hours(5).0 as i64);

        assert_eq!(caches.outfit_recommendations().get::<String>("look"), None);
        assert_eq!(
            caches.virtual_try_on().get::<String>("look").as_deref(),
            Some("render-url")
        );

        caches.critique().clear();
        assert_eq!(caches.critique().get::<String>("look"), None);
        assert!(caches.virtual_try_on().get::<String>("look").is_some());
    }

    #[test]
    fn test_clear_all_empties_every_area() {
        let store = Arc::new(MapStore::default());
        let caches = FeatureCaches::new(Some(store.clone()), Arc::new(ManualClock::new(0)));
        store.insert_raw("wallet-session", "{}");

        for area in FeatureArea::ALL {
            caches.get(area).set("k", &1u8);
        }
        assert_eq!(store.len(), 6);

        caches.clear_all();
        assert_eq!(store.len(), 1);
    }
}
