//! Result types returned by [`crate::generate`] and the JSON run report.

use crate::error::SlidesError;
use crate::model::ContentModel;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::Path;

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckOutput {
    /// Id assigned by the presentation host.
    pub presentation_id: String,
    /// Browser URL, when the host has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub title: String,
    /// The fully enriched model the deck was built from.
    pub model: ContentModel,
    pub operation_count: usize,
    pub stats: RunStats,
}

/// Counts and timings for one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStats {
    /// Sentences in the article after splitting, before truncation.
    pub sentences_found: usize,
    /// Sentences that became slides.
    pub slides: usize,
    pub operations: usize,
    pub images_found: usize,
    pub fetch_duration_ms: u64,
    pub enrich_duration_ms: u64,
    pub submit_duration_ms: u64,
    pub total_duration_ms: u64,
}

impl DeckOutput {
    /// Write this output as pretty JSON.
    ///
    /// The report is written to a temp file in the same directory and then
    /// renamed over `path`, so readers never see a half-written report.
    pub fn write_report(&self, path: impl AsRef<Path>) -> Result<(), SlidesError> {
        let path = path.as_ref();
        let fail = |source: std::io::Error| SlidesError::ReportWriteFailed {
            path: path.to_path_buf(),
            source,
        };

        let json = serde_json::to_vec_pretty(self)
            .map_err(|e| SlidesError::Internal(format!("report serialisation: {e}")))?;

        let parent = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent).map_err(fail)?;

        let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(fail)?;
        tmp.write_all(&json).map_err(fail)?;
        tmp.write_all(b"\n").map_err(fail)?;
        tmp.persist(path).map_err(|e| fail(e.error))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Prefix;

    fn sample() -> DeckOutput {
        let mut model = ContentModel::from_article(
            "Rust",
            Prefix::WhatIs,
            "Rust is fast.",
            "Rust is fast.",
            vec!["Rust is fast.".to_string()],
            10,
        );
        model.sentences[0].keywords = vec!["Rust".into()];
        model.sentences[0].images = vec!["https://img.example/rust.png".into()];
        DeckOutput {
            presentation_id: "dry-run-1".into(),
            url: None,
            title: "Rust".into(),
            model,
            operation_count: 5,
            stats: RunStats {
                sentences_found: 1,
                slides: 1,
                operations: 5,
                images_found: 1,
                ..Default::default()
            },
        }
    }

    #[test]
    fn report_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("reports/run.json");
        sample().write_report(&path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"prefix\": \"What is\""));
        let back: DeckOutput = serde_json::from_str(&text).unwrap();
        assert_eq!(back.model.sentences[0].images[0], "https://img.example/rust.png");
        assert_eq!(back.stats.operations, 5);
        assert!(!text.contains("\"url\""));
    }

    #[test]
    fn report_into_missing_parent_that_is_a_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "x").unwrap();
        let err = sample().write_report(blocker.join("run.json")).unwrap_err();
        assert!(matches!(err, SlidesError::ReportWriteFailed { .. }));
    }
}
