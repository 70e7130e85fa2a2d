//! Velocity and score calculation for interest-over-time series
//!
//! A series is split into two trailing windows of `WINDOW` periods:
//! - velocity = (mean(recent) - mean(previous)) / mean(previous)
//! - score = mean(recent)
//!
//! Series shorter than two windows carry no baseline: velocity is 0 and the
//! score is the mean of the whole series.

use statrs::statistics::{Data, Distribution};

/// Periods per comparison window
pub const WINDOW: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VelocityScore {
    pub velocity: f64,
    pub score: f64,
}

pub fn velocity_and_score(series: &[f64]) -> VelocityScore {
    if series.len() < WINDOW * 2 {
        return VelocityScore {
            velocity: 0.0,
            score: mean(series),
        };
    }

    let n = series.len();
    let current = mean(&series[n - WINDOW..]);
    let previous = mean(&series[n - 2 * WINDOW..n - WINDOW]);

    // Previous window at zero means no baseline
    let velocity = if previous > 0.0 {
        (current - previous) / previous
    } else {
        0.0
    };

    VelocityScore {
        velocity,
        score: current,
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    Data::new(values.to_vec()).mean().unwrap_or(0.0)
}
