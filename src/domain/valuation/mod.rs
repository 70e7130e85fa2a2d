pub mod features;
pub mod sales;

pub use features::{FEATURE_NAMES, FeatureTable, FeatureVector, extract_features};
pub use sales::{SaleRecord, SalesTable};
