// Domain-specific error types
pub mod errors;

// Port interfaces
pub mod ports;

// Trend observations and aggregation results
pub mod trends;

// Sales history and feature extraction
pub mod valuation;
