//! Article text from the MediaWiki `extracts` API.
//!
//! One request per run:
//! `GET {endpoint}?action=query&prop=extracts&explaintext=1&redirects=1&format=json&formatversion=2&titles={topic}`.
//! The plain-text extract keeps section markers (`== History ==`) and blank
//! lines, which [`crate::pipeline::normalize`] removes afterwards.

use super::{error_body, ContentSource};
use crate::error::SlidesError;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct QueryResponse {
    query: Option<Query>,
}

#[derive(Debug, Deserialize)]
struct Query {
    #[serde(default)]
    pages: Vec<Page>,
}

#[derive(Debug, Deserialize)]
struct Page {
    title: Option<String>,
    #[serde(default)]
    missing: bool,
    #[serde(default)]
    invalid: bool,
    extract: Option<String>,
}

/// [`ContentSource`] backed by a MediaWiki installation.
pub struct WikipediaSource {
    client: reqwest::Client,
    endpoint: String,
}

impl WikipediaSource {
    pub fn new(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ContentSource for WikipediaSource {
    async fn fetch(&self, topic: &str) -> Result<String, SlidesError> {
        info!("Fetching article for '{}' from {}", topic, self.endpoint);
        let unavailable = |reason: String| SlidesError::SourceUnavailable {
            topic: topic.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("action", "query"),
                ("prop", "extracts"),
                ("explaintext", "1"),
                ("redirects", "1"),
                ("format", "json"),
                ("formatversion", "2"),
                ("titles", topic),
            ])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    unavailable("request timed out".into())
                } else {
                    unavailable(e.to_string())
                }
            })?;

        if !response.status().is_success() {
            return Err(unavailable(error_body(response).await));
        }

        let body = response.text().await.map_err(|e| unavailable(e.to_string()))?;
        let text = parse_extract(&body).map_err(unavailable)?;
        debug!("Fetched {} chars for '{}'", text.len(), topic);
        Ok(text)
    }
}

/// Pull the first page's plain-text extract out of a query response.
fn parse_extract(body: &str) -> Result<String, String> {
    let parsed: QueryResponse =
        serde_json::from_str(body).map_err(|e| format!("unexpected response: {e}"))?;
    let page = parsed
        .query
        .and_then(|q| q.pages.into_iter().next())
        .ok_or_else(|| "response contained no pages".to_string())?;

    if page.missing || page.invalid {
        return Err(format!(
            "no article named '{}'",
            page.title.unwrap_or_default()
        ));
    }
    match page.extract {
        Some(text) if !text.trim().is_empty() => Ok(text),
        _ => Err("article is empty".into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_extract() {
        let body = r#"{"batchcomplete":true,"query":{"pages":[
            {"pageid":1,"ns":0,"title":"Rust","extract":"Rust is a language.\n\n== History ==\nIt began in 2006."}
        ]}}"#;
        let text = parse_extract(body).unwrap();
        assert!(text.starts_with("Rust is a language."));
        assert!(text.contains("== History =="));
    }

    #[test]
    fn missing_page_is_an_error() {
        let body = r#"{"query":{"pages":[{"ns":0,"title":"Zzxq","missing":true}]}}"#;
        let err = parse_extract(body).unwrap_err();
        assert!(err.contains("Zzxq"), "got: {err}");
    }

    #[test]
    fn empty_extract_is_an_error() {
        let body = r#"{"query":{"pages":[{"pageid":2,"title":"Stub","extract":"  "}]}}"#;
        assert_eq!(parse_extract(body).unwrap_err(), "article is empty");
    }

    #[test]
    fn malformed_body_is_an_error() {
        assert!(parse_extract("<html>").is_err());
        assert!(parse_extract(r#"{"batchcomplete":true}"#).is_err());
    }
}
