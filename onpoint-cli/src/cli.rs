use clap::{Parser, Subcommand};
use onpoint::FeatureArea;

#[derive(Parser, Debug)]
#[command(
    name = "onpoint",
    version,
    about = "Inspect and drive OnPoint's persisted result caches and engagement metrics"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Feature result caches
    #[command(subcommand)]
    Cache(CacheCommand),
    /// Per-item engagement counters
    #[command(subcommand)]
    Metrics(MetricsCommand),
}

#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// Print a live cached value, or null
    Get { area: FeatureArea, key: String },
    /// Store a JSON value (anything that isn't JSON is stored as a string)
    Set {
        area: FeatureArea,
        key: String,
        value: String,
    },
    Remove { area: FeatureArea, key: String },
    /// Clear one area, or every area when none is given
    Clear { area: Option<FeatureArea> },
}

#[derive(Subcommand, Debug)]
pub enum MetricsCommand {
    Show { item: String },
    Like { item: String },
    Unlike { item: String },
    TryOn { item: String },
    Share { item: String },
    /// Totals across all items
    Aggregate,
    /// Every tracked item
    List,
    Clear,
}
