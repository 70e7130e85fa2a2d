use crate::domain::errors::TrendSourceError;
use crate::domain::ports::TrendSourceAdapter;
use crate::domain::trends::{TrendObservation, TrendSource};
use async_trait::async_trait;

/// In-memory source returning a fixed keyword list.
///
/// Used as the fallback when every live source comes back empty, and in tests.
pub struct StaticTrendSource {
    name: String,
    entries: Vec<(String, f64, f64)>,
}

impl StaticTrendSource {
    pub fn new(name: &str, entries: &[(&str, f64, f64)]) -> Self {
        Self {
            name: name.to_string(),
            entries: entries
                .iter()
                .map(|(kw, velocity, score)| (kw.to_string(), *velocity, *score))
                .collect(),
        }
    }

    /// Generic keywords used when no live trend data is available.
    pub fn fallback() -> Self {
        Self::new(
            "Fallback",
            &[
                ("tech", 0.5, 80.0),
                ("innovation", 0.4, 75.0),
                ("future", 0.6, 85.0),
            ],
        )
    }
}

#[async_trait]
impl TrendSourceAdapter for StaticTrendSource {
    fn source(&self) -> TrendSource {
        TrendSource::Static(self.name.clone())
    }

    async fn fetch_observations(&self) -> Result<Vec<TrendObservation>, TrendSourceError> {
        Ok(self
            .entries
            .iter()
            .map(|(kw, velocity, score)| {
                TrendObservation::new(kw.clone(), self.source(), *velocity, *score)
            })
            .collect())
    }
}
