mod cli;
mod commands;

use clap::Parser;
use cli::Cli;
use onpoint::{EngagementMetrics, FeatureCaches, SystemClock};
use shared::config::Config;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load environment variables before reading configuration
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let config = Config::from_env();

    // Logs go to stderr so stdout stays pure JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .with_writer(std::io::stderr)
        .init();

    if dotenv_loaded {
        info!("Loaded environment variables from .env file");
    } else {
        info!("No .env file found, using system environment variables");
    }

    let store = match storage_engine::open_store(&config.storage) {
        Ok(store) => store,
        Err(e) => {
            warn!(
                "Failed to open {} store: {}. Running without persistence.",
                config.storage.name(),
                e
            );
            None
        }
    };

    let clock = Arc::new(SystemClock);
    let caches = FeatureCaches::new(store.clone(), clock.clone());
    let mut metrics = EngagementMetrics::load(store, clock);

    let stdout = std::io::stdout();
    commands::execute(cli.command, &caches, &mut metrics, &mut stdout.lock())?;

    Ok(())
}
