//! Value estimation configuration parsing from environment variables.
//!
//! This module handles the sales history location and the random forest parameters.

use anyhow::{Context, Result};
use std::env;
use std::path::PathBuf;

/// Valuation environment configuration
#[derive(Debug, Clone)]
pub struct ValuationEnvConfig {
    pub sales_csv_path: PathBuf,
    pub n_trees: usize,
    pub max_depth: u16,
    pub min_split: usize,
    pub seed: u64,
}

impl Default for ValuationEnvConfig {
    fn default() -> Self {
        Self {
            sales_csv_path: PathBuf::from("market-activity.csv"),
            n_trees: 100,
            max_depth: 10,
            min_split: 2,
            seed: 42,
        }
    }
}

impl ValuationEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        Ok(Self {
            sales_csv_path: env::var("SALES_CSV_PATH")
                .map(PathBuf::from)
                .unwrap_or(defaults.sales_csv_path),
            n_trees: Self::parse_usize("VALUATION_N_TREES", defaults.n_trees)?,
            max_depth: env::var("VALUATION_MAX_DEPTH")
                .unwrap_or_else(|_| defaults.max_depth.to_string())
                .parse::<u16>()
                .context("Failed to parse VALUATION_MAX_DEPTH")?,
            min_split: Self::parse_usize("VALUATION_MIN_SPLIT", defaults.min_split)?,
            seed: env::var("VALUATION_SEED")
                .unwrap_or_else(|_| defaults.seed.to_string())
                .parse::<u64>()
                .context("Failed to parse VALUATION_SEED")?,
        })
    }

    fn parse_usize(key: &str, default: usize) -> Result<usize> {
        env::var(key)
            .unwrap_or_else(|_| default.to_string())
            .parse::<usize>()
            .context(format!("Failed to parse {}", key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valuation_config_defaults() {
        let config = ValuationEnvConfig::default();
        assert_eq!(config.sales_csv_path, PathBuf::from("market-activity.csv"));
        assert_eq!(config.n_trees, 100);
        assert_eq!(config.seed, 42);
    }
}
