use thiserror::Error;

/// Errors raised by a single trend source adapter.
///
/// These never leave the aggregator: they are recorded in the per-source
/// report and the source simply contributes no keywords for the run.
#[derive(Debug, Error)]
pub enum TrendSourceError {
    #[error("{provider}: missing credentials ({setting} not configured)")]
    MissingCredentials { provider: String, setting: String },

    #[error("{provider}: request failed: {reason}")]
    Http { provider: String, reason: String },

    #[error("{provider}: unexpected HTTP status {status}")]
    Status { provider: String, status: u16 },

    #[error("{provider}: could not parse response: {reason}")]
    Parse { provider: String, reason: String },

    #[error("{provider}: no response after {timeout_secs}s")]
    Timeout { provider: String, timeout_secs: u64 },
}

impl TrendSourceError {
    pub fn http(provider: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Http {
            provider: provider.into(),
            reason: err.to_string(),
        }
    }

    pub fn parse(provider: impl Into<String>, err: impl std::fmt::Display) -> Self {
        Self::Parse {
            provider: provider.into(),
            reason: err.to_string(),
        }
    }
}

/// Errors related to historical sales data and price estimation
#[derive(Debug, Error)]
pub enum ValuationError {
    #[error("Sales data unavailable at {path}: {reason}")]
    DataUnavailable { path: String, reason: String },

    #[error("Value estimator queried before a model was trained")]
    NotTrained,

    #[error("Cannot estimate value for '{input}': {reason}")]
    Estimation { input: String, reason: String },

    #[error("Model training failed: {reason}")]
    Training { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_source_error_formatting() {
        let err = TrendSourceError::Timeout {
            provider: "Google Trends".to_string(),
            timeout_secs: 20,
        };

        let msg = err.to_string();
        assert!(msg.contains("Google Trends"));
        assert!(msg.contains("20s"));
    }

    #[test]
    fn test_valuation_error_formatting() {
        let err = ValuationError::Estimation {
            input: "bad_name.com".to_string(),
            reason: "invalid character '_'".to_string(),
        };

        let msg = err.to_string();
        assert!(msg.contains("bad_name.com"));
        assert!(msg.contains("'_'"));
    }
}
