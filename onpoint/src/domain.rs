use serde::{Deserialize, Serialize};
use shared::TtlMs;
use std::fmt;
use std::str::FromStr;

/// Envelope written for every cached value
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CacheEntry<T> {
    pub data: T,
    pub timestamp: i64, // ms since epoch at write time
}

impl<T> CacheEntry<T> {
    pub fn new(data: T, timestamp: i64) -> Self {
        Self { data, timestamp }
    }

    /// An entry is stale once strictly more than `ttl` has passed since it was written
    pub fn is_expired(&self, now_ms: i64, ttl: TtlMs) -> bool {
        // a ttl beyond i64::MAX ms never elapses
        i64::try_from(ttl.0).is_ok_and(|ttl| now_ms.saturating_sub(self.timestamp) > ttl)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemMetrics {
    pub likes: u64,
    pub tries: u64,
    pub shares: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_liked: Option<i64>,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateMetrics {
    pub total_likes: u64,
    pub total_tries: u64,
    pub total_shares: u64,
}

impl AggregateMetrics {
    pub fn add(mut self, item: &ItemMetrics) -> Self {
        self.total_likes = self.total_likes.saturating_add(item.likes);
        self.total_tries = self.total_tries.saturating_add(item.tries);
        self.total_shares = self.total_shares.saturating_add(item.shares);
        self
    }
}

/// Metadata of an uploaded file, enough to derive a stable cache key
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub size: u64,
    pub last_modified: i64,
}

impl FileDescriptor {
    pub fn new(name: impl Into<String>, size: u64, last_modified: i64) -> Self {
        Self {
            name: name.into(),
            size,
            last_modified,
        }
    }
}

/// Feature partitions of the result cache
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FeatureArea {
    VirtualTryOn,
    Critique,
    StyleAnalysis,
    OutfitRecommendations,
    DesignGeneration,
}

impl FeatureArea {
    pub const ALL: [FeatureArea; 5] = [
        FeatureArea::VirtualTryOn,
        FeatureArea::Critique,
        FeatureArea::StyleAnalysis,
        FeatureArea::OutfitRecommendations,
        FeatureArea::DesignGeneration,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            FeatureArea::VirtualTryOn => "onpoint_virtual_tryon",
            FeatureArea::Critique => "onpoint_critique",
            FeatureArea::StyleAnalysis => "onpoint_style_analysis",
            FeatureArea::OutfitRecommendations => "onpoint_outfit_recs",
            FeatureArea::DesignGeneration => "onpoint_design_generation",
        }
    }

    pub fn ttl(&self) -> TtlMs {
        match self {
            FeatureArea::VirtualTryOn => TtlMs::from_hours(24),
            FeatureArea::Critique => TtlMs::from_hours(12),
            FeatureArea::StyleAnalysis => TtlMs::from_hours(6),
            FeatureArea::OutfitRecommendations => TtlMs::from_hours(4),
            FeatureArea::DesignGeneration => TtlMs::from_hours(24),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FeatureArea::VirtualTryOn => "virtual-try-on",
            FeatureArea::Critique => "critique",
            FeatureArea::StyleAnalysis => "style-analysis",
            FeatureArea::OutfitRecommendations => "outfit-recommendations",
            FeatureArea::DesignGeneration => "design-generation",
        }
    }
}

impl fmt::Display for FeatureArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FeatureArea {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FeatureArea::ALL
            .into_iter()
            .find(|area| area.name() == s)
            .ok_or_else(|| {
                let names: Vec<&str> = FeatureArea::ALL.iter().map(|a| a.name()).collect();
                format!("unknown feature area '{}', expected one of: {}", s, names.join(", "))
            })
    }
}
