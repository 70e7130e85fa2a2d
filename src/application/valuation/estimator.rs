use crate::config::ValuationEnvConfig;
use crate::domain::errors::ValuationError;
use crate::domain::ports::ValuePredictor;
use crate::domain::valuation::{FeatureTable, FeatureVector, SalesTable, extract_features};
use crate::infrastructure::sales_csv::load_sales_csv;
use smartcore::ensemble::random_forest_regressor::{
    RandomForestRegressor, RandomForestRegressorParameters,
};
use smartcore::linalg::basic::matrix::DenseMatrix;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

type Forest = RandomForestRegressor<f64, f64, DenseMatrix<f64>, Vec<f64>>;

/// In-sample fit quality, in price units
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingSummary {
    pub samples: usize,
    /// Rows dropped by the CSV loader or feature extraction
    pub skipped: usize,
    pub rmse: f64,
    pub mae: f64,
}

/// Fitted price model. Immutable; share it through `Arc`.
pub struct TrainedModel {
    forest: Forest,
    summary: TrainingSummary,
}

impl TrainedModel {
    pub fn summary(&self) -> &TrainingSummary {
        &self.summary
    }

    /// Predicted price for one feature vector.
    ///
    /// The forest is fit on `ln(1 + price)`; the inverse transform is applied here
    /// and anything below zero is clamped to 0.
    pub fn predict(&self, features: &FeatureVector) -> Result<f64, ValuationError> {
        let predictions = self.predict_log(&[features.to_vec()])?;
        let log_price = predictions
            .first()
            .copied()
            .ok_or_else(|| ValuationError::Training {
                reason: "no prediction returned".to_string(),
            })?;

        let price = log_price.exp_m1();
        if !price.is_finite() {
            return Err(ValuationError::Estimation {
                input: format!("{:?}", features.as_slice()),
                reason: "model produced a non-finite price".to_string(),
            });
        }
        Ok(price.max(0.0))
    }

    fn predict_log(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>, ValuationError> {
        let matrix = DenseMatrix::from_2d_vec(&rows.to_vec()).map_err(|e| {
            ValuationError::Training {
                reason: format!("Matrix creation failed: {}", e),
            }
        })?;
        self.forest
            .predict(&matrix)
            .map_err(|e| ValuationError::Training {
                reason: format!("Prediction failed: {}", e),
            })
    }
}

impl ValuePredictor for TrainedModel {
    fn estimate_value(&self, name: &str, tld: &str) -> Result<f64, ValuationError> {
        let features = FeatureVector::from_name_tld(name, tld)?;
        self.predict(&features)
    }

    fn name(&self) -> &str {
        "SmartCore Random Forest"
    }
}

/// Learns domain prices from historical sales and estimates unseen (name, tld) pairs.
pub struct DomainValueEstimator {
    config: ValuationEnvConfig,
    model: Option<Arc<TrainedModel>>,
}

impl DomainValueEstimator {
    pub fn new(config: ValuationEnvConfig) -> Self {
        Self {
            config,
            model: None,
        }
    }

    pub fn load_data(&self, path: &Path) -> Result<SalesTable, ValuationError> {
        load_sales_csv(path)
    }

    /// Loads the sales file named in the configuration.
    pub fn load_configured_data(&self) -> Result<SalesTable, ValuationError> {
        self.load_data(&self.config.sales_csv_path)
    }

    pub fn extract_features(&self, table: &SalesTable) -> FeatureTable {
        let features = extract_features(table);
        if features.skipped > 0 {
            warn!(
                "Skipped {} sales rows with unusable domain or price",
                features.skipped
            );
        }
        features
    }

    pub fn train_model(
        &mut self,
        table: &FeatureTable,
    ) -> Result<Arc<TrainedModel>, ValuationError> {
        if table.is_empty() {
            return Err(ValuationError::Training {
                reason: "no featurized sales rows".to_string(),
            });
        }

        let x = table.features();
        let prices = table.prices();
        let y: Vec<f64> = prices.iter().map(|p| p.ln_1p()).collect();

        let x_matrix = DenseMatrix::from_2d_vec(&x).map_err(|e| ValuationError::Training {
            reason: format!("Matrix error: {}", e),
        })?;

        let params = RandomForestRegressorParameters::default()
            .with_n_trees(self.config.n_trees)
            .with_max_depth(self.config.max_depth)
            .with_min_samples_split(self.config.min_split)
            .with_seed(self.config.seed);

        info!(
            "Training Random Forest Regressor on {} sales (Trees: {}, Depth: {}, MinSplit: {}, Seed: {})...",
            x.len(),
            self.config.n_trees,
            self.config.max_depth,
            self.config.min_split,
            self.config.seed
        );

        let forest =
            RandomForestRegressor::fit(&x_matrix, &y, params).map_err(|e| ValuationError::Training {
                reason: e.to_string(),
            })?;

        let mut model = TrainedModel {
            forest,
            summary: TrainingSummary {
                samples: x.len(),
                skipped: table.total_skipped(),
                rmse: 0.0,
                mae: 0.0,
            },
        };

        let fitted: Vec<f64> = model
            .predict_log(&x)?
            .into_iter()
            .map(|p| p.exp_m1().max(0.0))
            .collect();
        let n = fitted.len() as f64;
        let sq_err: f64 = fitted
            .iter()
            .zip(prices.iter())
            .map(|(p, t)| (p - t).powi(2))
            .sum();
        let abs_err: f64 = fitted
            .iter()
            .zip(prices.iter())
            .map(|(p, t)| (p - t).abs())
            .sum();
        model.summary.rmse = (sq_err / n).sqrt();
        model.summary.mae = abs_err / n;

        info!(
            "Domain sales model trained: samples={}, skipped={}, RMSE={:.2}, MAE={:.2}",
            model.summary.samples, model.summary.skipped, model.summary.rmse, model.summary.mae
        );

        let model = Arc::new(model);
        self.model = Some(model.clone());
        Ok(model)
    }

    pub fn is_trained(&self) -> bool {
        self.model.is_some()
    }

    pub fn model(&self) -> Option<Arc<TrainedModel>> {
        self.model.clone()
    }

    pub fn estimate_value(&self, name: &str, tld: &str) -> Result<f64, ValuationError> {
        let model = self.model.as_ref().ok_or(ValuationError::NotTrained)?;
        let features = FeatureVector::from_name_tld(name, tld)?;
        model.predict(&features)
    }
}

impl ValuePredictor for DomainValueEstimator {
    fn estimate_value(&self, name: &str, tld: &str) -> Result<f64, ValuationError> {
        DomainValueEstimator::estimate_value(self, name, tld)
    }

    fn name(&self) -> &str {
        "Domain Value Estimator"
    }
}
