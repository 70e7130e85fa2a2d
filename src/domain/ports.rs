use crate::domain::errors::{TrendSourceError, ValuationError};
use crate::domain::trends::{SourceOutcome, TrendObservation, TrendSource};
use async_trait::async_trait;
use std::collections::HashMap;

/// One external trend provider.
#[async_trait]
pub trait TrendSourceAdapter: Send + Sync {
    fn source(&self) -> TrendSource;

    /// Upper bound of the native score scale, used for normalization.
    fn score_ceiling(&self) -> f64 {
        100.0
    }

    /// Adapter-specific fetch. Errors are turned into `SourceOutcome::Failed` by `fetch`.
    async fn fetch_observations(&self) -> Result<Vec<TrendObservation>, TrendSourceError>;

    /// Reasons the adapter cannot run at all (e.g. no API key).
    fn disabled_reason(&self) -> Option<String> {
        None
    }

    async fn fetch(&self) -> SourceOutcome {
        if let Some(reason) = self.disabled_reason() {
            return SourceOutcome::Disabled { reason };
        }
        match self.fetch_observations().await {
            Ok(observations) => SourceOutcome::from_observations(observations),
            Err(e) => SourceOutcome::Failed(e),
        }
    }
}

/// Entry point used by name generation and scoring
#[async_trait]
pub trait TrendProvider: Send + Sync {
    async fn get_trending_keywords(&self) -> HashMap<String, TrendObservation>;
}

/// Price prediction for hypothetical domains
pub trait ValuePredictor: Send + Sync {
    fn estimate_value(&self, name: &str, tld: &str) -> Result<f64, ValuationError>;

    fn name(&self) -> &str;
}
