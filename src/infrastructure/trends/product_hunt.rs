use crate::config::ProductHuntConfig;
use crate::domain::errors::TrendSourceError;
use crate::domain::ports::TrendSourceAdapter;
use crate::domain::trends::{TrendObservation, TrendSource};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use tracing::info;

const PROVIDER: &str = "Product Hunt";

/// A single listing has no history, so every topic gets the same prior.
pub const DEFAULT_VELOCITY: f64 = 0.1;
pub const DEFAULT_SCORE: f64 = 70.0;

const TRENDING_POSTS_QUERY: &str = r#"
query TrendingPosts($first: Int!) {
  posts(first: $first, order: RANKING) {
    edges { node { name topics(first: 5) { edges { node { name } } } } }
  }
}"#;

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<PostsData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct PostsData {
    posts: Connection<Post>,
}

#[derive(Debug, Deserialize)]
struct Connection<T> {
    #[serde(default = "Vec::new")]
    edges: Vec<Edge<T>>,
}

#[derive(Debug, Deserialize)]
struct Edge<T> {
    node: T,
}

#[derive(Debug, Deserialize)]
struct Post {
    #[serde(rename = "name")]
    _name: String,
    topics: Option<Connection<Topic>>,
}

#[derive(Debug, Deserialize)]
struct Topic {
    name: String,
}

pub struct ProductHuntSource {
    client: Client,
    config: ProductHuntConfig,
}

impl ProductHuntSource {
    pub fn new(client: Client, config: ProductHuntConfig) -> Self {
        Self { client, config }
    }
}

#[async_trait]
impl TrendSourceAdapter for ProductHuntSource {
    fn source(&self) -> TrendSource {
        TrendSource::ProductHunt
    }

    fn disabled_reason(&self) -> Option<String> {
        if self.config.api_key.is_none() {
            Some("PRODUCT_HUNT_API_KEY not set".to_string())
        } else {
            None
        }
    }

    async fn fetch_observations(&self) -> Result<Vec<TrendObservation>, TrendSourceError> {
        let api_key =
            self.config
                .api_key
                .as_deref()
                .ok_or_else(|| TrendSourceError::MissingCredentials {
                    provider: PROVIDER.to_string(),
                    setting: "PRODUCT_HUNT_API_KEY".to_string(),
                })?;

        info!("Fetching top posts from Product Hunt...");
        let body = json!({
            "query": TRENDING_POSTS_QUERY,
            "variables": { "first": self.config.max_posts },
        });

        let response = self
            .client
            .post(&self.config.api_url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| TrendSourceError::http(PROVIDER, e))?;

        if !response.status().is_success() {
            return Err(TrendSourceError::Status {
                provider: PROVIDER.to_string(),
                status: response.status().as_u16(),
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| TrendSourceError::http(PROVIDER, e))?;
        let topics = parse_topics(&text)?;

        Ok(topics
            .into_iter()
            .map(|t| TrendObservation::new(t, TrendSource::ProductHunt, DEFAULT_VELOCITY, DEFAULT_SCORE))
            .collect())
    }
}

/// Topic names across all posts, deduplicated in first-seen order.
fn parse_topics(body: &str) -> Result<Vec<String>, TrendSourceError> {
    let response: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| TrendSourceError::parse(PROVIDER, e))?;

    let data = match response.data {
        Some(data) => data,
        None => {
            let reason = response
                .errors
                .first()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| "response has no data".to_string());
            return Err(TrendSourceError::parse(PROVIDER, reason));
        }
    };

    let mut seen = HashSet::new();
    let mut topics = Vec::new();
    for post in data.posts.edges {
        let Some(post_topics) = post.node.topics else {
            continue;
        };
        for topic in post_topics.edges {
            let name = topic.node.name.trim().to_string();
            if !name.is_empty() && seen.insert(name.clone()) {
                topics.push(name);
            }
        }
    }
    Ok(topics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_topics_dedupes_in_order() {
        let body = r#"{"data":{"posts":{"edges":[
            {"node":{"name":"Foo","topics":{"edges":[{"node":{"name":"Artificial Intelligence"}},{"node":{"name":"Productivity"}}]}}},
            {"node":{"name":"Bar","topics":{"edges":[{"node":{"name":"Productivity"}},{"node":{"name":"Developer Tools"}}]}}},
            {"node":{"name":"Baz","topics":null}}
        ]}}}"#;

        let topics = parse_topics(body).unwrap();
        assert_eq!(
            topics,
            vec!["Artificial Intelligence", "Productivity", "Developer Tools"]
        );
    }

    #[test]
    fn test_graphql_error_is_parse_error() {
        let body = r#"{"data":null,"errors":[{"message":"invalid_oauth_token"}]}"#;
        let err = parse_topics(body).unwrap_err();
        assert!(err.to_string().contains("invalid_oauth_token"));
    }

    #[test]
    fn test_disabled_without_api_key() {
        let source = ProductHuntSource::new(Client::new(), ProductHuntConfig::default());
        assert!(source.disabled_reason().is_some());
    }

    #[tokio::test]
    async fn test_missing_key_reports_disabled_outcome() {
        use crate::domain::trends::OutcomeKind;

        let source = ProductHuntSource::new(Client::new(), ProductHuntConfig::default());
        assert_eq!(source.fetch().await.kind(), OutcomeKind::Disabled);
    }
}
