use crate::domain::trends::TrendObservation;
use anyhow::Result;
use std::str::FromStr;

/// Common scale all normalized scores are mapped onto
pub const NORMALIZED_MAX: f64 = 100.0;

/// How source scores are brought onto a shared scale before merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScoreNormalization {
    /// Pass scores through untouched
    Raw,
    /// Divide by the source's declared ceiling, map to 0..=100
    #[default]
    SourceScale,
    /// Min-max rescale each source's batch to 0..=100
    PerSourceMinMax,
}

impl FromStr for ScoreNormalization {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "raw" => Ok(Self::Raw),
            "source_scale" => Ok(Self::SourceScale),
            "per_source_min_max" | "minmax" => Ok(Self::PerSourceMinMax),
            _ => anyhow::bail!(
                "Invalid score normalization: {}. Must be 'raw', 'source_scale' or 'per_source_min_max'",
                s
            ),
        }
    }
}

impl ScoreNormalization {
    /// Rescale one source's observations in place.
    pub fn apply(&self, observations: &mut [TrendObservation], score_ceiling: f64) {
        match self {
            Self::Raw => {}
            Self::SourceScale => {
                let ceiling = if score_ceiling > 0.0 {
                    score_ceiling
                } else {
                    NORMALIZED_MAX
                };
                for obs in observations.iter_mut() {
                    obs.score = clamp_score(obs.score / ceiling * NORMALIZED_MAX);
                }
            }
            Self::PerSourceMinMax => {
                let (min, max) = observations
                    .iter()
                    .filter(|o| o.score.is_finite())
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), o| {
                        (lo.min(o.score), hi.max(o.score))
                    });
                let range = max - min;
                for obs in observations.iter_mut() {
                    obs.score = if range > 0.0 {
                        clamp_score((obs.score - min) / range * NORMALIZED_MAX)
                    } else {
                        // Constant batch carries no spread to rescale
                        clamp_score(obs.score)
                    };
                }
            }
        }
    }
}

fn clamp_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, NORMALIZED_MAX)
    } else {
        0.0
    }
}
