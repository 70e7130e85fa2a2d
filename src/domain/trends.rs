use crate::domain::errors::TrendSourceError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// External provider a trend observation came from
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendSource {
    GoogleTrends,
    ProductHunt,
    ExplodingTopics,
    Static(String),
}

impl fmt::Display for TrendSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoogleTrends => write!(f, "Google Trends"),
            Self::ProductHunt => write!(f, "Product Hunt"),
            Self::ExplodingTopics => write!(f, "Exploding Topics"),
            Self::Static(name) => write!(f, "{}", name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendObservation {
    pub keyword: String,
    pub source: TrendSource,
    /// Relative growth between the two most recent windows (0 when no baseline)
    pub velocity: f64,
    /// Popularity magnitude, on the source scale until normalized
    pub score: f64,
}

impl TrendObservation {
    pub fn new(keyword: impl Into<String>, source: TrendSource, velocity: f64, score: f64) -> Self {
        Self {
            keyword: keyword.into(),
            source,
            velocity,
            score,
        }
    }
}

/// Typed result of one adapter call.
#[derive(Debug)]
pub enum SourceOutcome {
    Observations(Vec<TrendObservation>),
    Empty,
    Disabled { reason: String },
    Failed(TrendSourceError),
}

impl SourceOutcome {
    pub fn from_observations(observations: Vec<TrendObservation>) -> Self {
        if observations.is_empty() {
            Self::Empty
        } else {
            Self::Observations(observations)
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Observations(_) => OutcomeKind::Success,
            Self::Empty => OutcomeKind::Empty,
            Self::Disabled { .. } => OutcomeKind::Disabled,
            Self::Failed(_) => OutcomeKind::Failed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutcomeKind {
    Success,
    Empty,
    Disabled,
    Failed,
}

impl fmt::Display for OutcomeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Success => write!(f, "success"),
            Self::Empty => write!(f, "empty"),
            Self::Disabled => write!(f, "disabled"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Per-adapter summary of an aggregation run
#[derive(Debug, Clone)]
pub struct SourceReport {
    pub source: TrendSource,
    pub kind: OutcomeKind,
    pub observations: usize,
    pub elapsed: Duration,
    pub detail: Option<String>,
}

/// Result of one aggregation run.
#[derive(Debug, Clone, Default)]
pub struct TrendSnapshot {
    /// Winning observation per keyword
    pub keywords: HashMap<String, TrendObservation>,
    /// Every observation seen per keyword, in adapter order
    pub provenance: HashMap<String, Vec<TrendObservation>>,
    pub reports: Vec<SourceReport>,
}

impl TrendSnapshot {
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Keywords sorted by descending score, then keyword, for callers needing an order.
    pub fn ranked(&self) -> Vec<&TrendObservation> {
        let mut ranked: Vec<&TrendObservation> = self.keywords.values().collect();
        ranked.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.keyword.cmp(&b.keyword))
        });
        ranked
    }

    pub fn failed_sources(&self) -> Vec<&TrendSource> {
        self.reports
            .iter()
            .filter(|r| r.kind == OutcomeKind::Failed)
            .map(|r| &r.source)
            .collect()
    }
}
