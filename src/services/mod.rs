//! External collaborators: article text, keywords, images, and the deck host.
//!
//! The pipeline only knows these four traits. Concrete HTTP clients live in
//! the submodules; tests and `--dry-run` swap in [`memory::MemoryHost`] or
//! their own fakes through [`Collaborators`].
//!
//! | Trait | HTTP implementation |
//! |-------|---------------------|
//! | [`ContentSource`]    | [`wikipedia::WikipediaSource`] |
//! | [`KeywordExtractor`] | [`nlu::NluKeywordExtractor`], [`llm::LlmKeywordExtractor`] |
//! | [`ImageFinder`]      | [`image_search::CustomSearchImageFinder`] |
//! | [`PresentationHost`] | [`slides::SlidesApiHost`] |

pub mod image_search;
pub mod llm;
pub mod memory;
pub mod nlu;
pub mod slides;
pub mod wikipedia;

use crate::config::{DeckConfig, KeywordBackend};
use crate::error::SlidesError;
use crate::operation::OperationBatch;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// Returns raw article text for a topic.
#[async_trait]
pub trait ContentSource: Send + Sync {
    async fn fetch(&self, topic: &str) -> Result<String, SlidesError>;
}

/// Returns keywords for one sentence, most relevant first.
#[async_trait]
pub trait KeywordExtractor: Send + Sync {
    async fn extract(&self, sentence: &str) -> Result<Vec<String>, SlidesError>;
}

/// Returns up to `count` image URLs for a query, best match first.
#[async_trait]
pub trait ImageFinder: Send + Sync {
    async fn find(&self, query: &str, count: usize) -> Result<Vec<String>, SlidesError>;
}

/// Creates presentations and applies operation batches to them.
///
/// `apply_batch` is all-or-nothing from the caller's point of view.
#[async_trait]
pub trait PresentationHost: Send + Sync {
    /// Create an empty presentation and return its id.
    async fn create_presentation(&self, title: &str) -> Result<String, SlidesError>;

    async fn apply_batch(
        &self,
        presentation_id: &str,
        batch: &OperationBatch,
    ) -> Result<(), SlidesError>;

    /// Browser URL for a presentation, when the host has one.
    fn presentation_url(&self, presentation_id: &str) -> Option<String> {
        let _ = presentation_id;
        None
    }
}

/// The four collaborators a run needs.
#[derive(Clone)]
pub struct Collaborators {
    pub source: Arc<dyn ContentSource>,
    pub keywords: Arc<dyn KeywordExtractor>,
    pub images: Arc<dyn ImageFinder>,
    pub host: Arc<dyn PresentationHost>,
}

impl Collaborators {
    /// Build the HTTP-backed collaborators described by `config.services`.
    ///
    /// Fails with [`SlidesError::ServiceNotConfigured`] when a required
    /// credential is missing, before any network traffic happens.
    pub fn from_config(config: &DeckConfig) -> Result<Self, SlidesError> {
        let client = http_client(config.request_timeout_secs)?;
        let host = Arc::new(slides::SlidesApiHost::from_config(
            client.clone(),
            &config.services,
        )?);
        Self::with_host(client, config, host)
    }

    /// Same as [`Collaborators::from_config`] but with an in-memory host, so
    /// nothing is published and no Slides token is needed.
    pub fn dry_run(config: &DeckConfig) -> Result<Self, SlidesError> {
        let client = http_client(config.request_timeout_secs)?;
        Self::with_host(client, config, Arc::new(memory::MemoryHost::new()))
    }

    fn with_host(
        client: reqwest::Client,
        config: &DeckConfig,
        host: Arc<dyn PresentationHost>,
    ) -> Result<Self, SlidesError> {
        let services = &config.services;

        let source = Arc::new(wikipedia::WikipediaSource::new(
            client.clone(),
            services.wiki_endpoint(&config.language),
        ));

        let keywords: Arc<dyn KeywordExtractor> = match services.keyword_backend {
            KeywordBackend::Nlu => Arc::new(nlu::NluKeywordExtractor::from_config(
                client.clone(),
                services,
                &config.language,
            )?),
            KeywordBackend::Llm => Arc::new(llm::LlmKeywordExtractor::from_config(
                services,
                config.request_timeout_secs,
            )?),
        };

        let images = Arc::new(image_search::CustomSearchImageFinder::from_config(
            client, services,
        )?);

        Ok(Self {
            source,
            keywords,
            images,
            host,
        })
    }
}

/// Shared HTTP client with the per-request timeout applied.
pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client, SlidesError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| SlidesError::Internal(format!("HTTP client: {e}")))
}

/// Read a response body for an error message, capped to keep logs tidy.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    let body = body.trim();
    if body.is_empty() {
        format!("HTTP {status}")
    } else {
        let snippet: String = body.chars().take(200).collect();
        format!("HTTP {status}: {snippet}")
    }
}
