//! domain-scout - trend collection and domain value estimation
//!
//! Collects trending keywords from the configured sources, trains the price
//! model on the historical sales file and logs estimates for the given names.
//!
//! # Usage
//! ```sh
//! cargo run --bin scout -- --tld com --tld ai newbrand quantumleaf
//! ```
//!
//! # Environment Variables
//! - `TREND_SOURCES` - Comma-separated sources (default: all)
//! - `PRODUCT_HUNT_API_KEY` - Enables the Product Hunt source
//! - `SALES_CSV_PATH` - Historical sales CSV (default: market-activity.csv)

use anyhow::Result;
use clap::Parser;
use domain_scout::application::trends::TrendAggregator;
use domain_scout::application::valuation::DomainValueEstimator;
use domain_scout::config::Config;
use domain_scout::domain::errors::ValuationError;
use domain_scout::domain::ports::{TrendSourceAdapter, ValuePredictor};
use domain_scout::infrastructure::trends::{StaticTrendSource, TrendSourceFactory};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{Level, info, warn};
use tracing_subscriber::prelude::*;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Candidate names to estimate (without TLD)
    names: Vec<String>,

    /// TLDs to estimate each name under
    #[arg(long = "tld", default_values_t = vec!["com".to_string(), "ai".to_string(), "io".to_string()])]
    tlds: Vec<String>,

    /// Override SALES_CSV_PATH
    #[arg(long)]
    sales: Option<PathBuf>,

    /// Number of trending keywords to log
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Skip live trend sources
    #[arg(long)]
    offline: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let stdout_layer = tracing_subscriber::fmt::layer().with_target(false).pretty();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .with(stdout_layer)
        .init();

    let args = Args::parse();
    info!("domain-scout {} starting...", env!("CARGO_PKG_VERSION"));

    let mut config = Config::from_env()?;
    if let Some(path) = args.sales {
        config.valuation.sales_csv_path = path;
    }

    // Phase 1: trends
    let sources = if args.offline {
        Vec::new()
    } else {
        TrendSourceFactory::create_sources(&config.trends)
    };
    let aggregator = TrendAggregator::from_config(sources, &config.trends);
    let names: Vec<String> = aggregator.sources().iter().map(|s| s.to_string()).collect();
    info!("Trend sources: [{}]", names.join(", "));
    let mut snapshot = aggregator.collect().await;

    if snapshot.is_empty() {
        warn!("No trending keywords found from sources. Using fallback keywords.");
        let fallback: Vec<Arc<dyn TrendSourceAdapter>> = vec![Arc::new(StaticTrendSource::fallback())];
        snapshot = TrendAggregator::from_config(fallback, &config.trends)
            .collect()
            .await;
    }

    info!("Found {} trending keywords.", snapshot.keywords.len());
    for obs in snapshot.ranked().into_iter().take(args.top) {
        info!(
            "Keyword: {}, Source: {}, Velocity: {:.2}, Score: {:.2}",
            obs.keyword, obs.source, obs.velocity, obs.score
        );
    }

    // Phase 2: value model
    let mut estimator = DomainValueEstimator::new(config.valuation.clone());
    match estimator.load_configured_data() {
        Ok(sales) => {
            let features = estimator.extract_features(&sales);
            if let Err(e) = estimator.train_model(&features) {
                warn!("Could not train value model: {}. Value estimation will be skipped.", e);
            }
        }
        Err(e @ ValuationError::DataUnavailable { .. }) => {
            warn!("{}. Value estimation will be skipped.", e);
        }
        Err(e) => return Err(e.into()),
    }

    // Phase 3: estimates
    if !estimator.is_trained() {
        return Ok(());
    }
    info!("Estimating with {}", estimator.name());
    for name in &args.names {
        for tld in &args.tlds {
            match estimator.estimate_value(name, tld) {
                Ok(value) => info!("{}.{}: estimated ${:.2}", name, tld.trim_start_matches('.'), value),
                Err(e) => warn!("Could not estimate resale value for {}.{}: {}", name, tld, e),
            }
        }
    }

    Ok(())
}
