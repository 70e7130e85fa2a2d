use crate::application::trends::normalization::ScoreNormalization;
use crate::config::TrendEnvConfig;
use crate::domain::errors::TrendSourceError;
use crate::domain::ports::{TrendProvider, TrendSourceAdapter};
use crate::domain::trends::{
    SourceOutcome, SourceReport, TrendObservation, TrendSnapshot, TrendSource,
};
use anyhow::Result;
use async_trait::async_trait;
use futures::future::BoxFuture;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Resolution rule when several sources report the same keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MergePolicy {
    /// The adapter registered last wins
    #[default]
    LastWriterWins,
    /// Highest normalized score wins; ties go to the later adapter
    HighestScore,
}

impl FromStr for MergePolicy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "last_writer_wins" | "last" => Ok(Self::LastWriterWins),
            "highest_score" => Ok(Self::HighestScore),
            _ => anyhow::bail!(
                "Invalid merge policy: {}. Must be 'last_writer_wins' or 'highest_score'",
                s
            ),
        }
    }
}

impl MergePolicy {
    fn replaces(&self, existing: &TrendObservation, candidate: &TrendObservation) -> bool {
        match self {
            Self::LastWriterWins => true,
            Self::HighestScore => candidate.score >= existing.score,
        }
    }
}

/// Merges the output of every registered trend source into one keyword map.
///
/// Sources are fetched concurrently (bounded by `max_concurrency`) but merged in
/// registration order, so the result never depends on which source answered first.
/// A failing, disabled or slow source only loses its own contribution.
pub struct TrendAggregator {
    adapters: Vec<Arc<dyn TrendSourceAdapter>>,
    merge_policy: MergePolicy,
    normalization: ScoreNormalization,
    source_timeout: Duration,
    max_concurrency: usize,
}

impl TrendAggregator {
    pub fn new(adapters: Vec<Arc<dyn TrendSourceAdapter>>) -> Self {
        Self {
            adapters,
            merge_policy: MergePolicy::default(),
            normalization: ScoreNormalization::default(),
            source_timeout: Duration::from_secs(20),
            max_concurrency: 3,
        }
    }

    pub fn from_config(adapters: Vec<Arc<dyn TrendSourceAdapter>>, config: &TrendEnvConfig) -> Self {
        Self::new(adapters)
            .with_merge_policy(config.merge_policy)
            .with_normalization(config.score_normalization)
            .with_source_timeout(config.source_timeout)
            .with_max_concurrency(config.max_concurrency)
    }

    pub fn with_merge_policy(mut self, policy: MergePolicy) -> Self {
        self.merge_policy = policy;
        self
    }

    pub fn with_normalization(mut self, normalization: ScoreNormalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn with_source_timeout(mut self, timeout: Duration) -> Self {
        self.source_timeout = timeout;
        self
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency.max(1);
        self
    }

    pub fn sources(&self) -> Vec<TrendSource> {
        self.adapters.iter().map(|a| a.source()).collect()
    }

    /// Run every source once and merge the results.
    pub async fn collect(&self) -> TrendSnapshot {
        let runs: Vec<_> = self
            .adapters
            .iter()
            .map(|adapter| run_source(Arc::clone(adapter), self.source_timeout))
            .collect();

        // `buffered` yields in input order regardless of completion order
        let results: Vec<SourceRun> = stream::iter(runs)
            .buffered(self.max_concurrency)
            .collect()
            .await;

        let mut snapshot = TrendSnapshot::default();
        for (adapter, outcome, elapsed) in results {
            let source = adapter.source();
            let kind = outcome.kind();
            let mut detail = None;
            let mut count = 0;

            match outcome {
                SourceOutcome::Observations(observations) => {
                    let mut observations = clean_keywords(observations);
                    count = observations.len();
                    self.normalization
                        .apply(&mut observations, adapter.score_ceiling());
                    info!("{}: {} trending keywords ({:?})", source, count, elapsed);
                    self.merge(&mut snapshot, observations);
                }
                SourceOutcome::Empty => {
                    info!("{}: no trending keywords today", source);
                }
                SourceOutcome::Disabled { reason } => {
                    warn!("{}: skipped ({})", source, reason);
                    detail = Some(reason);
                }
                SourceOutcome::Failed(err) => {
                    warn!("{}: source unavailable: {}", source, err);
                    detail = Some(err.to_string());
                }
            }

            snapshot.reports.push(SourceReport {
                source,
                kind,
                observations: count,
                elapsed,
                detail,
            });
        }

        debug!(
            "Aggregated {} keywords from {} sources",
            snapshot.keywords.len(),
            snapshot.reports.len()
        );
        snapshot
    }

    fn merge(&self, snapshot: &mut TrendSnapshot, observations: Vec<TrendObservation>) {
        for obs in observations {
            snapshot
                .provenance
                .entry(obs.keyword.clone())
                .or_default()
                .push(obs.clone());

            match snapshot.keywords.get(&obs.keyword) {
                Some(existing) if !self.merge_policy.replaces(existing, &obs) => {}
                _ => {
                    snapshot.keywords.insert(obs.keyword.clone(), obs);
                }
            }
        }
    }
}

type SourceRun = (Arc<dyn TrendSourceAdapter>, SourceOutcome, Duration);

/// One timed fetch. Boxed as `Send + 'static` so `collect` stays spawnable.
fn run_source(adapter: Arc<dyn TrendSourceAdapter>, timeout: Duration) -> BoxFuture<'static, SourceRun> {
    Box::pin(async move {
        let started = Instant::now();
        let outcome = match tokio::time::timeout(timeout, adapter.fetch()).await {
            Ok(outcome) => outcome,
            Err(_) => SourceOutcome::Failed(TrendSourceError::Timeout {
                provider: adapter.source().to_string(),
                timeout_secs: timeout.as_secs(),
            }),
        };
        let elapsed = started.elapsed();
        (adapter, outcome, elapsed)
    })
}

fn clean_keywords(observations: Vec<TrendObservation>) -> Vec<TrendObservation> {
    observations
        .into_iter()
        .filter_map(|mut obs| {
            let trimmed = obs.keyword.trim();
            if trimmed.is_empty() {
                return None;
            }
            if trimmed.len() != obs.keyword.len() {
                obs.keyword = trimmed.to_string();
            }
            Some(obs)
        })
        .collect()
}

#[async_trait]
impl TrendProvider for TrendAggregator {
    async fn get_trending_keywords(&self) -> HashMap<String, TrendObservation> {
        self.collect().await.keywords
    }
}
