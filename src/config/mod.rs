//! Configuration module for domain-scout.
//!
//! This module provides structured configuration loading from environment variables,
//! organized by component: Trends and Valuation. Components never read the
//! environment themselves; they receive these structs at construction.

mod trend_config;
mod valuation_config;

pub use trend_config::{
    DEFAULT_SEED_KEYWORDS, ExplodingTopicsConfig, GoogleTrendsConfig, ProductHuntConfig,
    TrendEnvConfig, TrendSourceKind,
};
pub use valuation_config::ValuationEnvConfig;

use anyhow::{Context, Result};

/// Main application configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub trends: TrendEnvConfig,
    pub valuation: ValuationEnvConfig,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        let trends = TrendEnvConfig::from_env().context("Failed to load trend config")?;
        let valuation =
            ValuationEnvConfig::from_env().context("Failed to load valuation config")?;

        Ok(Self { trends, valuation })
    }
}
