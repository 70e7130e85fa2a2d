// Trend aggregation, velocity and score normalization
pub mod trends;

// Price model training and estimation
pub mod valuation;
