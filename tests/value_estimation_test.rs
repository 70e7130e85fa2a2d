use domain_scout::application::valuation::DomainValueEstimator;
use domain_scout::config::ValuationEnvConfig;
use domain_scout::domain::errors::ValuationError;
use domain_scout::domain::ports::ValuePredictor;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

fn write_csv(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn config() -> ValuationEnvConfig {
    ValuationEnvConfig {
        n_trees: 20,
        ..ValuationEnvConfig::default()
    }
}

fn train(estimator: &mut DomainValueEstimator, path: &Path) {
    let sales = estimator.load_data(path).unwrap();
    let features = estimator.extract_features(&sales);
    estimator.train_model(&features).unwrap();
}

const HISTORY: &str = "Domain,Price,Date
example.com,1000,2023-01-01
test-domain.net,500,2023-01-05
another.org,750,2023-01-10
brand.ai,2000,2023-01-15
innovate.io,1500,2023-01-20
short.com,300,2023-01-25
long-long-long.net,200,2023-01-30
";

#[test]
fn test_end_to_end_two_rows() {
    let file = write_csv("Domain,Price,Date\nexample.com,1000,2023-01-01\nshort.com,300,2023-01-25\n");
    let mut estimator = DomainValueEstimator::new(config());
    train(&mut estimator, file.path());

    let value = estimator.estimate_value("newbrand", "com").unwrap();
    assert!(value.is_finite());
    assert!(value >= 0.0);
}

#[test]
fn test_load_missing_file_is_data_unavailable() {
    let estimator = DomainValueEstimator::new(config());
    let result = estimator.load_data(Path::new("does-not-exist/market-activity.csv"));
    assert!(matches!(result, Err(ValuationError::DataUnavailable { .. })));
}

#[test]
fn test_not_trained_before_training() {
    let estimator = DomainValueEstimator::new(config());
    for (name, tld) in [("newbrand", "com"), ("x", "ai"), ("", "")] {
        assert!(matches!(
            estimator.estimate_value(name, tld),
            Err(ValuationError::NotTrained)
        ));
    }
}

#[test]
fn test_training_is_deterministic() {
    let file = write_csv(HISTORY);

    let mut first = DomainValueEstimator::new(config());
    train(&mut first, file.path());
    let mut second = DomainValueEstimator::new(config());
    train(&mut second, file.path());

    for (name, tld) in [("newbrand", "com"), ("zap", "ai"), ("my-shop-24", "net")] {
        let a = first.estimate_value(name, tld).unwrap();
        let b = second.estimate_value(name, tld).unwrap();
        let again = first.estimate_value(name, tld).unwrap();
        assert_eq!(a.to_bits(), b.to_bits(), "{}.{}", name, tld);
        assert_eq!(a.to_bits(), again.to_bits());
    }

    assert_eq!(
        first.model().unwrap().summary(),
        second.model().unwrap().summary()
    );
}

#[test]
fn test_malformed_rows_are_tolerated() {
    let file = write_csv(
        "Domain,Price,Date\nexample.com,1000,2023-01-01\nnot a domain,10,2023-01-02\nbroken.io,abc,2023-01-03\nshort.com,300,2023-01-25\n",
    );
    let mut estimator = DomainValueEstimator::new(config());
    let sales = estimator.load_data(file.path()).unwrap();
    assert_eq!(sales.skipped_rows, 1);

    let features = estimator.extract_features(&sales);
    assert_eq!(features.len(), 2);
    assert_eq!(features.skipped, 1);
    assert_eq!(features.load_skipped, 1);

    let model = estimator.train_model(&features).unwrap();
    assert_eq!(model.summary().samples, 2);
    // Loader and feature extraction drops both count
    assert_eq!(model.summary().skipped, 2);
}

#[test]
fn test_unrepresentable_input_is_non_fatal() {
    let file = write_csv(HISTORY);
    let mut estimator = DomainValueEstimator::new(config());
    train(&mut estimator, file.path());

    assert!(matches!(
        estimator.estimate_value("bad name!", "com"),
        Err(ValuationError::Estimation { .. })
    ));
    // The estimator keeps working afterwards
    assert!(estimator.estimate_value("goodname", ".com").is_ok());
}

#[test]
fn test_trained_model_shared_across_threads() {
    let file = write_csv(HISTORY);
    let mut estimator = DomainValueEstimator::new(config());
    train(&mut estimator, file.path());

    let model: Arc<dyn ValuePredictor> = estimator.model().unwrap();
    assert_eq!(model.name(), "SmartCore Random Forest");
    let expected = model.estimate_value("threaded", "io").unwrap();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let model = model.clone();
            std::thread::spawn(move || model.estimate_value("threaded", "io").unwrap())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap().to_bits(), expected.to_bits());
    }
}
