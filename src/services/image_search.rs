//! Image URLs from the Google Custom Search JSON API.
//!
//! `GET {endpoint}?key={key}&cx={cx}&q={query}&searchType=image&num={count}`
//! and keep `items[].link` in result order.

use super::{error_body, ImageFinder};
use crate::config::{ServiceConfig, DEFAULT_IMAGE_SEARCH_URL};
use crate::error::{EnrichmentStage, SlidesError};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    link: String,
}

/// [`ImageFinder`] backed by a programmable search engine.
pub struct CustomSearchImageFinder {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    engine_id: String,
}

impl CustomSearchImageFinder {
    pub fn new(
        client: reqwest::Client,
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        engine_id: impl Into<String>,
    ) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            engine_id: engine_id.into(),
        }
    }

    pub fn from_config(client: reqwest::Client, services: &ServiceConfig) -> Result<Self, SlidesError> {
        let not_configured = |hint: &str| SlidesError::ServiceNotConfigured {
            service: "image-search".into(),
            hint: hint.into(),
        };
        let key = services
            .google_api_key
            .as_deref()
            .ok_or_else(|| not_configured("Set GOOGLE_API_KEY."))?;
        let cx = services
            .search_engine_id
            .as_deref()
            .ok_or_else(|| not_configured("Set GOOGLE_CUSTOM_SEARCH_ENGINE_ID."))?;
        let endpoint = services
            .image_search_url
            .as_deref()
            .unwrap_or(DEFAULT_IMAGE_SEARCH_URL);
        Ok(Self::new(client, endpoint, key, cx))
    }
}

#[async_trait]
impl ImageFinder for CustomSearchImageFinder {
    async fn find(&self, query: &str, count: usize) -> Result<Vec<String>, SlidesError> {
        let failed = |detail: String| SlidesError::EnrichmentFailed {
            stage: EnrichmentStage::Images,
            sentence: 0,
            detail,
        };
        debug!("Querying images with: {}", query);

        let num = count.clamp(1, 10).to_string();
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.engine_id.as_str()),
                ("q", query),
                ("searchType", "image"),
                ("num", num.as_str()),
            ])
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(error_body(response).await));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| failed(format!("unexpected response: {e}")))?;
        Ok(collect_links(parsed, count))
    }
}

fn collect_links(response: SearchResponse, count: usize) -> Vec<String> {
    response
        .items
        .into_iter()
        .map(|item| item.link)
        .filter(|link| !link.trim().is_empty())
        .take(count)
        .collect()
}
