//! Trend source adapters, one per external provider.

pub mod exploding_topics;
pub mod google_trends;
pub mod product_hunt;
pub mod static_source;

pub use exploding_topics::ExplodingTopicsSource;
pub use google_trends::GoogleTrendsSource;
pub use product_hunt::ProductHuntSource;
pub use static_source::StaticTrendSource;

use crate::config::{TrendEnvConfig, TrendSourceKind};
use crate::domain::ports::TrendSourceAdapter;
use crate::infrastructure::core::HttpClientFactory;
use std::sync::Arc;
use std::time::Duration;

/// Sequential HTTP calls one source makes within its budget (warm-up, explore, multiline)
const REQUESTS_PER_SOURCE: u32 = 3;

/// Per-request client timeout, so one source's sequential calls fit its budget.
pub fn request_timeout(source_timeout: Duration) -> Duration {
    (source_timeout / REQUESTS_PER_SOURCE).max(Duration::from_secs(1))
}

pub struct TrendSourceFactory;

impl TrendSourceFactory {
    /// Builds the enabled sources in configured order; that order is the merge order.
    pub fn create_sources(config: &TrendEnvConfig) -> Vec<Arc<dyn TrendSourceAdapter>> {
        let client = HttpClientFactory::create_client(request_timeout(config.source_timeout));

        config
            .sources
            .iter()
            .map(|kind| -> Arc<dyn TrendSourceAdapter> {
                match kind {
                    TrendSourceKind::GoogleTrends => Arc::new(GoogleTrendsSource::new(
                        client.clone(),
                        config.google.clone(),
                    )),
                    TrendSourceKind::ProductHunt => Arc::new(ProductHuntSource::new(
                        client.clone(),
                        config.product_hunt.clone(),
                    )),
                    TrendSourceKind::ExplodingTopics => Arc::new(ExplodingTopicsSource::new(
                        client.clone(),
                        config.exploding_topics.clone(),
                    )),
                }
            })
            .collect()
    }
}
