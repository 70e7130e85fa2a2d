//! Google Trends source
//!
//! Uses the same two-step protocol as the Trends web UI:
//! 1. `/trends/api/explore` returns widget descriptors; the `TIMESERIES` widget
//!    carries a token and a request payload.
//! 2. `/trends/api/widgetdata/multiline` returns interest over time for every
//!    compared keyword, one column per keyword.
//!
//! Both responses are JSON behind an anti-XSSI prefix such as `)]}'`.
//!
//! Each comparison is scaled to its own peak (100). When the seeds span several
//! requests, the first seed is repeated in every later request as an anchor and
//! the other series of that request are rescaled so the anchor peak matches the
//! first successful request. A failing request only loses its own keywords.

use crate::application::trends::velocity::velocity_and_score;
use crate::config::GoogleTrendsConfig;
use crate::domain::errors::TrendSourceError;
use crate::domain::ports::TrendSourceAdapter;
use crate::domain::trends::{TrendObservation, TrendSource};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

const PROVIDER: &str = "Google Trends";

/// Keywords the provider accepts in one comparison
const MAX_KEYWORDS_PER_REQUEST: usize = 5;

#[derive(Debug, Deserialize)]
struct ExploreResponse {
    #[serde(default)]
    widgets: Vec<ExploreWidget>,
}

#[derive(Debug, Clone, Deserialize)]
struct ExploreWidget {
    #[serde(default)]
    id: String,
    token: Option<String>,
    request: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct MultilineResponse {
    default: Timeline,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Timeline {
    #[serde(default)]
    timeline_data: Vec<TimelinePoint>,
}

#[derive(Debug, Deserialize)]
struct TimelinePoint {
    #[serde(default)]
    value: Vec<f64>,
}

pub struct GoogleTrendsSource {
    client: Client,
    config: GoogleTrendsConfig,
}

impl GoogleTrendsSource {
    pub fn new(client: Client, config: GoogleTrendsConfig) -> Self {
        Self { client, config }
    }

    /// Picks up the session cookie the API expects.
    async fn warm_up(&self) {
        let url = format!("{}/?geo=US", self.config.base_url);
        if let Err(e) = self.client.get(&url).send().await {
            debug!("Google Trends cookie request failed: {}", e);
        }
    }

    async fn get_json_text(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<String, TrendSourceError> {
        let url = format!("{}{}", self.config.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(params)
            .send()
            .await
            .map_err(|e| TrendSourceError::http(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(TrendSourceError::Status {
                provider: PROVIDER.to_string(),
                status: response.status().as_u16(),
            });
        }

        response
            .text()
            .await
            .map_err(|e| TrendSourceError::http(PROVIDER, e))
    }

    async fn fetch_series(
        &self,
        keywords: &[String],
    ) -> Result<HashMap<String, Vec<f64>>, TrendSourceError> {
        let comparison: Vec<serde_json::Value> = keywords
            .iter()
            .map(|kw| json!({ "keyword": kw, "time": self.config.timeframe, "geo": "" }))
            .collect();
        let explore_req = json!({ "comparisonItem": comparison, "category": 0, "property": "" });

        let hl = self.config.host_language.clone();
        let tz = self.config.tz_offset.to_string();

        let explore_body = self
            .get_json_text(
                "/trends/api/explore",
                &[
                    ("hl", hl.clone()),
                    ("tz", tz.clone()),
                    ("req", explore_req.to_string()),
                ],
            )
            .await?;
        let (token, request) = parse_timeseries_widget(&explore_body)?;

        let multiline_body = self
            .get_json_text(
                "/trends/api/widgetdata/multiline",
                &[
                    ("hl", hl),
                    ("tz", tz),
                    ("req", request.to_string()),
                    ("token", token),
                ],
            )
            .await?;

        parse_timeline(&multiline_body, keywords)
    }
}

#[async_trait]
impl TrendSourceAdapter for GoogleTrendsSource {
    fn source(&self) -> TrendSource {
        TrendSource::GoogleTrends
    }

    fn disabled_reason(&self) -> Option<String> {
        if self.config.keywords.is_empty() {
            Some("no seed keywords configured".to_string())
        } else {
            None
        }
    }

    async fn fetch_observations(&self) -> Result<Vec<TrendObservation>, TrendSourceError> {
        let Some(anchor) = self.config.keywords.first() else {
            return Ok(Vec::new());
        };
        info!(
            "Fetching Google Trends for {} seed keywords ({})",
            self.config.keywords.len(),
            self.config.timeframe
        );
        self.warm_up().await;

        let mut results = Vec::new();
        for chunk in plan_chunks(&self.config.keywords) {
            let series = self.fetch_series(&chunk).await;
            results.push((chunk, series));
        }
        merge_chunks(anchor, results)
    }
}

type ChunkResult = (Vec<String>, Result<HashMap<String, Vec<f64>>, TrendSourceError>);

/// Splits the seeds into comparison requests; every request after the first
/// starts with the anchor (first seed).
fn plan_chunks(keywords: &[String]) -> Vec<Vec<String>> {
    if keywords.len() <= MAX_KEYWORDS_PER_REQUEST {
        return vec![keywords.to_vec()];
    }

    let anchor = &keywords[0];
    let mut chunks = vec![keywords[..MAX_KEYWORDS_PER_REQUEST].to_vec()];
    for rest in keywords[MAX_KEYWORDS_PER_REQUEST..].chunks(MAX_KEYWORDS_PER_REQUEST - 1) {
        let mut chunk = Vec::with_capacity(rest.len() + 1);
        chunk.push(anchor.clone());
        chunk.extend_from_slice(rest);
        chunks.push(chunk);
    }
    chunks
}

fn peak(values: &[f64]) -> f64 {
    values.iter().copied().fold(0.0, f64::max)
}

/// Rescales every chunk onto the anchor scale of the first successful chunk and
/// turns the series into observations. Fails only when every chunk failed.
fn merge_chunks(
    anchor: &str,
    results: Vec<ChunkResult>,
) -> Result<Vec<TrendObservation>, TrendSourceError> {
    let mut reference_peak: Option<f64> = None;
    let mut emitted = HashSet::new();
    let mut observations = Vec::new();
    let mut last_error = None;
    let mut any_ok = false;

    for (chunk, result) in results {
        let mut series = match result {
            Ok(series) => series,
            Err(e) => {
                warn!("Google Trends request for {:?} failed: {}", chunk, e);
                last_error = Some(e);
                continue;
            }
        };
        any_ok = true;

        let anchor_peak = series.get(anchor).map(|v| peak(v)).unwrap_or(0.0);
        match reference_peak {
            None if anchor_peak > 0.0 => reference_peak = Some(anchor_peak),
            Some(reference) if anchor_peak > 0.0 => {
                let factor = reference / anchor_peak;
                for (keyword, values) in series.iter_mut() {
                    if keyword != anchor {
                        values.iter_mut().for_each(|v| *v *= factor);
                    }
                }
            }
            _ => debug!("Google Trends chunk {:?} has no anchor data, kept unscaled", chunk),
        }

        let fresh: Vec<String> = chunk
            .into_iter()
            .filter(|kw| !emitted.contains(kw))
            .collect();
        for obs in observations_from_series(&fresh, &series) {
            emitted.insert(obs.keyword.clone());
            observations.push(obs);
        }
    }

    match last_error {
        Some(e) if !any_ok => Err(e),
        _ => Ok(observations),
    }
}

/// Velocity/score per keyword, in seed order; keywords without data are skipped.
pub fn observations_from_series(
    keywords: &[String],
    series: &HashMap<String, Vec<f64>>,
) -> Vec<TrendObservation> {
    keywords
        .iter()
        .filter_map(|kw| {
            let values = series.get(kw)?;
            let vs = velocity_and_score(values);
            Some(TrendObservation::new(
                kw.clone(),
                TrendSource::GoogleTrends,
                vs.velocity,
                vs.score,
            ))
        })
        .collect()
}

fn strip_xssi_prefix(body: &str) -> &str {
    match body.find('{') {
        Some(idx) => &body[idx..],
        None => body,
    }
}

fn parse_timeseries_widget(body: &str) -> Result<(String, serde_json::Value), TrendSourceError> {
    let explore: ExploreResponse = serde_json::from_str(strip_xssi_prefix(body))
        .map_err(|e| TrendSourceError::parse(PROVIDER, e))?;

    let widget = explore
        .widgets
        .into_iter()
        .find(|w| w.id == "TIMESERIES")
        .ok_or_else(|| TrendSourceError::parse(PROVIDER, "no TIMESERIES widget in explore response"))?;

    match (widget.token, widget.request) {
        (Some(token), Some(request)) => Ok((token, request)),
        _ => Err(TrendSourceError::parse(
            PROVIDER,
            "TIMESERIES widget lacks token or request",
        )),
    }
}

/// Split the multiline timeline into one series per keyword (column i = keyword i).
fn parse_timeline(
    body: &str,
    keywords: &[String],
) -> Result<HashMap<String, Vec<f64>>, TrendSourceError> {
    let response: MultilineResponse = serde_json::from_str(strip_xssi_prefix(body))
        .map_err(|e| TrendSourceError::parse(PROVIDER, e))?;

    let mut series = HashMap::new();
    for (i, keyword) in keywords.iter().enumerate() {
        let values: Vec<f64> = response
            .default
            .timeline_data
            .iter()
            .filter_map(|point| point.value.get(i).copied())
            .collect();
        if !values.is_empty() {
            series.insert(keyword.clone(), values);
        }
    }
    Ok(series)
}
