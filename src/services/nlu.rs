//! Keywords from a natural-language-understanding REST service.
//!
//! Speaks the Watson NLU `analyze` protocol:
//! `POST {url}/v1/analyze?version=2022-04-07` with HTTP basic auth
//! (`apikey:{key}`) and a `{"text", "features": {"keywords": {}}}` body.
//! Keywords come back sorted by relevance, which is the order we keep.

use super::{error_body, KeywordExtractor};
use crate::config::ServiceConfig;
use crate::error::{EnrichmentStage, SlidesError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

const API_VERSION: &str = "2022-04-07";
const MAX_KEYWORDS: usize = 10;

#[derive(Debug, Serialize)]
struct AnalyzeRequest<'a> {
    text: &'a str,
    language: &'a str,
    features: Features,
}

#[derive(Debug, Serialize)]
struct Features {
    keywords: KeywordOptions,
}

#[derive(Debug, Serialize)]
struct KeywordOptions {
    limit: usize,
}

#[derive(Debug, Deserialize)]
struct AnalyzeResponse {
    #[serde(default)]
    keywords: Vec<Keyword>,
}

#[derive(Debug, Deserialize)]
struct Keyword {
    text: String,
}

/// [`KeywordExtractor`] backed by an NLU `analyze` endpoint.
pub struct NluKeywordExtractor {
    client: reqwest::Client,
    analyze_url: String,
    api_key: String,
    language: String,
}

impl NluKeywordExtractor {
    pub fn new(
        client: reqwest::Client,
        base_url: &str,
        api_key: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            client,
            analyze_url: format!("{}/v1/analyze", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
            language: language.into(),
        }
    }

    pub fn from_config(
        client: reqwest::Client,
        services: &ServiceConfig,
        language: &str,
    ) -> Result<Self, SlidesError> {
        let not_configured = |hint: &str| SlidesError::ServiceNotConfigured {
            service: "nlu".into(),
            hint: hint.into(),
        };
        let url = services
            .nlu_url
            .as_deref()
            .ok_or_else(|| not_configured("Set WATSON_NLU_URL to your NLU instance URL."))?;
        let key = services
            .nlu_api_key
            .as_deref()
            .ok_or_else(|| not_configured("Set WATSON_API_KEY, or use --keywords llm."))?;
        Ok(Self::new(client, url, key, language))
    }
}

#[async_trait]
impl KeywordExtractor for NluKeywordExtractor {
    async fn extract(&self, sentence: &str) -> Result<Vec<String>, SlidesError> {
        let failed = |detail: String| SlidesError::EnrichmentFailed {
            stage: EnrichmentStage::Keywords,
            sentence: 0,
            detail,
        };

        let body = AnalyzeRequest {
            text: sentence,
            language: &self.language,
            features: Features {
                keywords: KeywordOptions {
                    limit: MAX_KEYWORDS,
                },
            },
        };

        let response = self
            .client
            .post(&self.analyze_url)
            .query(&[("version", API_VERSION)])
            .basic_auth("apikey", Some(&self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| failed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(failed(error_body(response).await));
        }

        let parsed: AnalyzeResponse = response
            .json()
            .await
            .map_err(|e| failed(format!("unexpected response: {e}")))?;
        let keywords = collect_keywords(parsed);
        debug!("NLU returned {} keywords", keywords.len());
        Ok(keywords)
    }
}

fn collect_keywords(response: AnalyzeResponse) -> Vec<String> {
    response
        .keywords
        .into_iter()
        .map(|k| k.text.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
