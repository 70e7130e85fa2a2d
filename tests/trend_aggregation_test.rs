use async_trait::async_trait;
use domain_scout::application::trends::{MergePolicy, ScoreNormalization, TrendAggregator};
use domain_scout::domain::errors::TrendSourceError;
use domain_scout::domain::ports::{TrendProvider, TrendSourceAdapter};
use domain_scout::domain::trends::{OutcomeKind, TrendObservation, TrendSource};
use domain_scout::infrastructure::trends::StaticTrendSource;
use std::sync::Arc;
use std::time::Duration;

/// Source that always fails, like an unreachable provider
struct BrokenSource;

#[async_trait]
impl TrendSourceAdapter for BrokenSource {
    fn source(&self) -> TrendSource {
        TrendSource::ExplodingTopics
    }

    async fn fetch_observations(&self) -> Result<Vec<TrendObservation>, TrendSourceError> {
        Err(TrendSourceError::Status {
            provider: "Exploding Topics".to_string(),
            status: 503,
        })
    }
}

/// Source that answers after a delay
struct SlowSource {
    name: &'static str,
    delay: Duration,
    entries: Vec<(&'static str, f64, f64)>,
}

#[async_trait]
impl TrendSourceAdapter for SlowSource {
    fn source(&self) -> TrendSource {
        TrendSource::Static(self.name.to_string())
    }

    async fn fetch_observations(&self) -> Result<Vec<TrendObservation>, TrendSourceError> {
        tokio::time::sleep(self.delay).await;
        Ok(self
            .entries
            .iter()
            .map(|(kw, v, s)| TrendObservation::new(*kw, self.source(), *v, *s))
            .collect())
    }
}

fn static_source(name: &str, entries: &[(&str, f64, f64)]) -> Arc<dyn TrendSourceAdapter> {
    Arc::new(StaticTrendSource::new(name, entries))
}

#[tokio::test]
async fn test_empty_sources_yield_empty_mapping() {
    let aggregator = TrendAggregator::new(vec![
        static_source("empty-a", &[]),
        static_source("empty-b", &[]),
    ]);

    let keywords = aggregator.get_trending_keywords().await;
    assert!(keywords.is_empty());
}

#[tokio::test]
async fn test_no_sources_at_all() {
    let aggregator = TrendAggregator::new(Vec::new());
    let snapshot = aggregator.collect().await;
    assert!(snapshot.is_empty());
    assert!(snapshot.reports.is_empty());
}

#[tokio::test]
async fn test_failing_source_does_not_block_others() {
    let aggregator = TrendAggregator::new(vec![
        static_source("healthy", &[("ai", 0.3, 50.0)]),
        Arc::new(BrokenSource),
    ]);

    let snapshot = aggregator.collect().await;
    assert_eq!(snapshot.keywords.len(), 1);
    assert!(snapshot.keywords.contains_key("ai"));

    assert_eq!(snapshot.reports.len(), 2);
    assert_eq!(snapshot.reports[0].kind, OutcomeKind::Success);
    assert_eq!(snapshot.reports[1].kind, OutcomeKind::Failed);
    assert!(snapshot.reports[1].detail.as_deref().unwrap_or("").contains("503"));
    assert_eq!(snapshot.failed_sources(), vec![&TrendSource::ExplodingTopics]);
}

#[tokio::test]
async fn test_second_source_wins_on_collision() {
    let aggregator = TrendAggregator::new(vec![
        static_source("first", &[("ai", 0.1, 70.0)]),
        static_source("second", &[("ai", 0.2, 80.0)]),
    ])
    .with_merge_policy(MergePolicy::LastWriterWins);

    let keywords = aggregator.get_trending_keywords().await;
    let ai = &keywords["ai"];
    assert_eq!(ai.source, TrendSource::Static("second".to_string()));
    assert_eq!(ai.velocity, 0.2);
}

#[tokio::test]
async fn test_merge_order_ignores_completion_order() {
    // The first-registered source finishes last; registration order must still decide.
    let slow_first: Arc<dyn TrendSourceAdapter> = Arc::new(SlowSource {
        name: "slow",
        delay: Duration::from_millis(200),
        entries: vec![("ai", 0.9, 90.0)],
    });
    let fast_second: Arc<dyn TrendSourceAdapter> = Arc::new(SlowSource {
        name: "fast",
        delay: Duration::from_millis(0),
        entries: vec![("ai", 0.1, 10.0)],
    });

    let aggregator = TrendAggregator::new(vec![slow_first, fast_second])
        .with_max_concurrency(2)
        .with_normalization(ScoreNormalization::Raw);

    let keywords = aggregator.get_trending_keywords().await;
    assert_eq!(keywords["ai"].source, TrendSource::Static("fast".to_string()));
    assert_eq!(keywords["ai"].score, 10.0);
}

#[tokio::test]
async fn test_concurrent_and_sequential_runs_agree() {
    let sources = || -> Vec<Arc<dyn TrendSourceAdapter>> {
        vec![
            static_source("a", &[("ai", 0.1, 10.0), ("vr", 0.2, 20.0)]),
            static_source("b", &[("vr", 0.3, 30.0), ("web3", 0.4, 40.0)]),
            static_source("c", &[("ai", 0.5, 50.0)]),
        ]
    };

    let sequential = TrendAggregator::new(sources())
        .with_max_concurrency(1)
        .get_trending_keywords()
        .await;
    let concurrent = TrendAggregator::new(sources())
        .with_max_concurrency(3)
        .get_trending_keywords()
        .await;

    assert_eq!(sequential, concurrent);
}

#[tokio::test]
async fn test_slow_source_times_out() {
    let stuck: Arc<dyn TrendSourceAdapter> = Arc::new(SlowSource {
        name: "stuck",
        delay: Duration::from_secs(30),
        entries: vec![("never", 0.0, 0.0)],
    });

    let aggregator = TrendAggregator::new(vec![stuck, static_source("ok", &[("ai", 0.0, 1.0)])])
        .with_source_timeout(Duration::from_millis(100));

    let started = std::time::Instant::now();
    let snapshot = aggregator.collect().await;

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!snapshot.keywords.contains_key("never"));
    assert!(snapshot.keywords.contains_key("ai"));
    assert_eq!(snapshot.reports[0].kind, OutcomeKind::Failed);
}

#[tokio::test]
async fn test_scores_normalized_per_source_before_merge() {
    let aggregator = TrendAggregator::new(vec![
        static_source("a", &[("low", 0.0, 10.0), ("high", 0.0, 30.0)]),
        static_source("b", &[("steady", 0.0, 80.0)]),
    ])
    .with_normalization(ScoreNormalization::PerSourceMinMax);

    let keywords = aggregator.get_trending_keywords().await;
    assert_eq!(keywords["low"].score, 0.0);
    assert_eq!(keywords["high"].score, 100.0);
    assert_eq!(keywords["steady"].score, 80.0);
}
