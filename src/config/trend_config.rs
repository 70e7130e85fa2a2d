//! Trend source configuration parsing from environment variables.
//!
//! This module handles loading settings for all supported trend sources:
//! - Google Trends (seed keywords, timeframe, locale)
//! - Product Hunt (GraphQL API token)
//! - Exploding Topics (public page)
//!
//! and the aggregation knobs (timeout, concurrency, merge and normalization).

use crate::application::trends::{MergePolicy, ScoreNormalization};
use anyhow::{Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_SEED_KEYWORDS: &[&str] = &[
    "AI",
    "Machine Learning",
    "Sustainable Energy",
    "Virtual Reality",
    "Blockchain",
];

/// Trend sources that can be enabled through `TREND_SOURCES`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendSourceKind {
    GoogleTrends,
    ProductHunt,
    ExplodingTopics,
}

impl FromStr for TrendSourceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "google_trends" | "google" => Ok(Self::GoogleTrends),
            "product_hunt" | "producthunt" => Ok(Self::ProductHunt),
            "exploding_topics" | "explodingtopics" => Ok(Self::ExplodingTopics),
            _ => anyhow::bail!(
                "Invalid trend source: {}. Must be 'google_trends', 'product_hunt' or 'exploding_topics'",
                s
            ),
        }
    }
}

/// Google Trends configuration
#[derive(Debug, Clone)]
pub struct GoogleTrendsConfig {
    pub base_url: String,
    pub keywords: Vec<String>,
    pub timeframe: String,
    pub host_language: String,
    pub tz_offset: i32,
}

impl Default for GoogleTrendsConfig {
    fn default() -> Self {
        Self {
            base_url: "https://trends.google.com".to_string(),
            keywords: DEFAULT_SEED_KEYWORDS.iter().map(|s| s.to_string()).collect(),
            timeframe: "today 1-m".to_string(),
            host_language: "en-US".to_string(),
            tz_offset: 360,
        }
    }
}

impl GoogleTrendsConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();
        let keywords = match env::var("TREND_SEED_KEYWORDS") {
            Ok(list) => parse_list(&list),
            Err(_) => defaults.keywords,
        };

        Ok(Self {
            base_url: env::var("GOOGLE_TRENDS_BASE_URL").unwrap_or(defaults.base_url),
            keywords,
            timeframe: env::var("TREND_TIMEFRAME").unwrap_or(defaults.timeframe),
            host_language: env::var("TREND_HOST_LANGUAGE").unwrap_or(defaults.host_language),
            tz_offset: env::var("TREND_TZ_OFFSET")
                .unwrap_or_else(|_| defaults.tz_offset.to_string())
                .parse::<i32>()
                .context("Failed to parse TREND_TZ_OFFSET")?,
        })
    }
}

/// Product Hunt API configuration
#[derive(Debug, Clone)]
pub struct ProductHuntConfig {
    pub api_url: String,
    pub api_key: Option<String>,
    pub max_posts: usize,
}

impl Default for ProductHuntConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.producthunt.com/v2/api/graphql".to_string(),
            api_key: None,
            max_posts: 20,
        }
    }
}

impl ProductHuntConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            api_url: env::var("PRODUCT_HUNT_API_URL").unwrap_or(defaults.api_url),
            api_key: env::var("PRODUCT_HUNT_API_KEY")
                .ok()
                .filter(|k| !k.trim().is_empty()),
            max_posts: env::var("PRODUCT_HUNT_MAX_POSTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_posts),
        }
    }
}

/// Exploding Topics configuration
#[derive(Debug, Clone)]
pub struct ExplodingTopicsConfig {
    pub url: String,
}

impl Default for ExplodingTopicsConfig {
    fn default() -> Self {
        Self {
            url: "https://explodingtopics.com/".to_string(),
        }
    }
}

impl ExplodingTopicsConfig {
    pub fn from_env() -> Self {
        Self {
            url: env::var("EXPLODING_TOPICS_URL").unwrap_or_else(|_| Self::default().url),
        }
    }
}

/// Aggregated trend configuration
#[derive(Debug, Clone)]
pub struct TrendEnvConfig {
    pub sources: Vec<TrendSourceKind>,
    pub source_timeout: Duration,
    pub max_concurrency: usize,
    pub merge_policy: MergePolicy,
    pub score_normalization: ScoreNormalization,
    pub google: GoogleTrendsConfig,
    pub product_hunt: ProductHuntConfig,
    pub exploding_topics: ExplodingTopicsConfig,
}

impl Default for TrendEnvConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                TrendSourceKind::GoogleTrends,
                TrendSourceKind::ProductHunt,
                TrendSourceKind::ExplodingTopics,
            ],
            source_timeout: Duration::from_secs(20),
            max_concurrency: 3,
            merge_policy: MergePolicy::default(),
            score_normalization: ScoreNormalization::default(),
            google: GoogleTrendsConfig::default(),
            product_hunt: ProductHuntConfig::default(),
            exploding_topics: ExplodingTopicsConfig::default(),
        }
    }
}

impl TrendEnvConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let sources = match env::var("TREND_SOURCES") {
            Ok(list) => parse_list(&list)
                .iter()
                .map(|s| TrendSourceKind::from_str(s))
                .collect::<Result<Vec<_>>>()?,
            Err(_) => defaults.sources,
        };

        let timeout_secs = env::var("TREND_SOURCE_TIMEOUT_SECS")
            .unwrap_or_else(|_| defaults.source_timeout.as_secs().to_string())
            .parse::<u64>()
            .context("Failed to parse TREND_SOURCE_TIMEOUT_SECS")?;

        let max_concurrency = env::var("TREND_MAX_CONCURRENCY")
            .unwrap_or_else(|_| defaults.max_concurrency.to_string())
            .parse::<usize>()
            .context("Failed to parse TREND_MAX_CONCURRENCY")?;

        let merge_policy = match env::var("TREND_MERGE_POLICY") {
            Ok(s) => MergePolicy::from_str(&s)?,
            Err(_) => defaults.merge_policy,
        };

        let score_normalization = match env::var("TREND_SCORE_NORMALIZATION") {
            Ok(s) => ScoreNormalization::from_str(&s)?,
            Err(_) => defaults.score_normalization,
        };

        Ok(Self {
            sources,
            source_timeout: Duration::from_secs(timeout_secs),
            max_concurrency: max_concurrency.max(1),
            merge_policy,
            score_normalization,
            google: GoogleTrendsConfig::from_env().context("Failed to load Google Trends config")?,
            product_hunt: ProductHuntConfig::from_env(),
            exploding_topics: ExplodingTopicsConfig::from_env(),
        })
    }
}

fn parse_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
