use crate::config::ExplodingTopicsConfig;
use crate::domain::errors::TrendSourceError;
use crate::domain::ports::TrendSourceAdapter;
use crate::domain::trends::{TrendObservation, TrendSource};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, info};

const PROVIDER: &str = "Exploding Topics";

pub const DEFAULT_VELOCITY: f64 = 0.2;
pub const DEFAULT_SCORE: f64 = 80.0;

const NEXT_DATA_MARKER: &str = "id=\"__NEXT_DATA__\"";

/// Scrapes the public Exploding Topics front page.
///
/// The page is server-rendered by Next.js, so the topic list is available as
/// JSON in the `__NEXT_DATA__` script tag; no HTML selectors are involved.
pub struct ExplodingTopicsSource {
    client: Client,
    config: ExplodingTopicsConfig,
}

impl ExplodingTopicsSource {
    pub fn new(client: Client, config: ExplodingTopicsConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl TrendSourceAdapter for ExplodingTopicsSource {
    fn source(&self) -> TrendSource {
        TrendSource::ExplodingTopics
    }

    async fn fetch_observations(&self) -> Result<Vec<TrendObservation>, TrendSourceError> {
        info!("Scraping Exploding Topics from {}", self.config.url);

        let response = self
            .client
            .get(&self.config.url)
            .send()
            .await
            .map_err(|e| TrendSourceError::http(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(TrendSourceError::Status {
                provider: PROVIDER.to_string(),
                status: response.status().as_u16(),
            });
        }

        let html = response
            .text()
            .await
            .map_err(|e| TrendSourceError::http(PROVIDER, e))?;

        let topics = extract_topics(&html)?;
        Ok(topics
            .into_iter()
            .map(|t| {
                TrendObservation::new(t, TrendSource::ExplodingTopics, DEFAULT_VELOCITY, DEFAULT_SCORE)
            })
            .collect())
    }
}

/// Topic keywords from the embedded page data. A page without the payload yields no topics.
pub fn extract_topics(html: &str) -> Result<Vec<String>, TrendSourceError> {
    let Some(payload) = next_data_payload(html) else {
        debug!("Exploding Topics page has no __NEXT_DATA__ payload");
        return Ok(Vec::new());
    };

    let data: Value =
        serde_json::from_str(payload).map_err(|e| TrendSourceError::parse(PROVIDER, e))?;

    let mut seen = HashSet::new();
    let mut topics = Vec::new();
    collect_keywords(&data, &mut seen, &mut topics);
    Ok(topics)
}

fn next_data_payload(html: &str) -> Option<&str> {
    let marker = html.find(NEXT_DATA_MARKER)?;
    let after_marker = &html[marker..];
    let start = after_marker.find('>')? + 1;
    let end = after_marker[start..].find("</script>")?;
    Some(after_marker[start..start + end].trim())
}

fn collect_keywords(value: &Value, seen: &mut HashSet<String>, out: &mut Vec<String>) {
    match value {
        Value::Object(map) => {
            if let Some(Value::String(keyword)) = map.get("keyword") {
                let keyword = keyword.trim();
                if !keyword.is_empty() && seen.insert(keyword.to_string()) {
                    out.push(keyword.to_string());
                }
            }
            for child in map.values() {
                collect_keywords(child, seen, out);
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_keywords(item, seen, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_topics_from_next_data() {
        let html = r#"<html><head></head><body>
<div id="__next"></div>
<script id="__NEXT_DATA__" type="application/json">
{"props":{"pageProps":{"topics":[
  {"keyword":"ai agents","growth":9900},
  {"keyword":"solid state battery","growth":340},
  {"nested":{"keyword":"ai agents"}}
]}}}
</script></body></html>"#;

        let topics = extract_topics(html).unwrap();
        assert_eq!(topics.len(), 2);
        assert!(topics.contains(&"ai agents".to_string()));
        assert!(topics.contains(&"solid state battery".to_string()));
    }

    #[test]
    fn test_page_without_payload_is_empty() {
        let topics = extract_topics("<html><body>Just a landing page</body></html>").unwrap();
        assert!(topics.is_empty());
    }

    #[test]
    fn test_broken_payload_is_parse_error() {
        let html = r#"<script id="__NEXT_DATA__" type="application/json">{"props":</script>"#;
        assert!(matches!(
            extract_topics(html),
            Err(TrendSourceError::Parse { .. })
        ));
    }
}
