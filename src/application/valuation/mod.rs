pub mod estimator;

pub use estimator::{DomainValueEstimator, TrainedModel, TrainingSummary};
