pub mod aggregator;
pub mod normalization;
pub mod velocity;

pub use aggregator::{MergePolicy, TrendAggregator};
pub use normalization::ScoreNormalization;
