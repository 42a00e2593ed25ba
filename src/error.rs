//! Error types for the topic2slides library.
//!
//! Every failure in the pipeline is fatal to the run: there is no partial
//! deck and no retry against the external services. [`SlidesError`] groups
//! its variants by the stage that raises them so the binary can print a
//! message that points at the right knob (flag, env var, or service).
//!
//! The presentation host is only contacted after the whole operation batch
//! has been built, so errors other than [`SlidesError::HostRejected`] and
//! [`SlidesError::ReportWriteFailed`] mean nothing reached the host. A
//! rejected batch can leave an empty presentation behind; a failed report
//! write happens after the deck is published.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the topic2slides library.
#[derive(Debug, Error)]
pub enum SlidesError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// The topic or prefix supplied by the user is unusable.
    #[error("Invalid input: {reason}")]
    InvalidInput { reason: String },

    /// The interactive prompt gave up after too many invalid answers.
    #[error("No valid answer for '{question}' after {attempts} attempts")]
    InputExhausted { question: String, attempts: u32 },

    // ── Content source ────────────────────────────────────────────────────
    /// Article text could not be fetched, or the article is empty.
    #[error("Content source unavailable for '{topic}': {reason}\nTry a more specific topic or check --wiki-url.")]
    SourceUnavailable { topic: String, reason: String },

    /// The sentence-boundary model could not be loaded.
    #[error("Sentence tokenizer unavailable for language '{language}': {reason}")]
    TokenizerUnavailable { language: String, reason: String },

    // ── Enrichment ────────────────────────────────────────────────────────
    /// The keyword extractor or image finder failed for one sentence.
    #[error("{stage} failed for sentence {sentence}: {detail}")]
    EnrichmentFailed {
        stage: EnrichmentStage,
        sentence: usize,
        detail: String,
    },

    /// A collaborator is missing the credentials it needs.
    #[error("Service '{service}' is not configured.\n{hint}")]
    ServiceNotConfigured { service: String, hint: String },

    // ── Assembly ──────────────────────────────────────────────────────────
    /// A sentence reached the operation builder without any image URL.
    #[error("Sentence {sentence} has no image; refusing to build a slide without one")]
    MissingImage { sentence: usize },

    /// The batch exceeds the configured per-call operation limit.
    #[error("Operation batch has {operations} operations, limit is {limit}\nLower --max-sentences or raise the limit.")]
    BatchTooLarge { operations: usize, limit: usize },

    // ── Presentation host ─────────────────────────────────────────────────
    /// The presentation host refused to create the deck or apply the batch.
    #[error("Presentation host rejected the request: {detail}")]
    HostRejected { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the JSON run report.
    #[error("Failed to write report '{path}': {source}")]
    ReportWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Which enrichment collaborator failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnrichmentStage {
    Keywords,
    Images,
}

impl std::fmt::Display for EnrichmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EnrichmentStage::Keywords => f.write_str("Keyword extraction"),
            EnrichmentStage::Images => f.write_str("Image search"),
        }
    }
}

impl SlidesError {
    /// Attach the sentence index to an enrichment failure.
    ///
    /// Collaborators only see sentence text; the pipeline knows the index.
    pub fn at_sentence(self, index: usize) -> Self {
        match self {
            SlidesError::EnrichmentFailed { stage, detail, .. } => SlidesError::EnrichmentFailed {
                stage,
                sentence: index,
                detail,
            },
            other => other,
        }
    }

    /// True when the error was raised before anything reached the host.
    pub fn is_pre_submission(&self) -> bool {
        !matches!(
            self,
            SlidesError::HostRejected { .. } | SlidesError::ReportWriteFailed { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_image_display() {
        let e = SlidesError::MissingImage { sentence: 3 };
        assert!(e.to_string().contains("Sentence 3"), "got: {e}");
    }

    #[test]
    fn enrichment_display_names_stage() {
        let e = SlidesError::EnrichmentFailed {
            stage: EnrichmentStage::Images,
            sentence: 2,
            detail: "HTTP 403".into(),
        };
        let msg = e.to_string();
        assert!(msg.starts_with("Image search failed"), "got: {msg}");
        assert!(msg.contains("HTTP 403"));
    }

    #[test]
    fn batch_too_large_display() {
        let e = SlidesError::BatchTooLarge {
            operations: 55,
            limit: 50,
        };
        assert!(e.to_string().contains("55"));
        assert!(e.to_string().contains("50"));
    }

    #[test]
    fn at_sentence_rewrites_only_enrichment_errors() {
        let e = SlidesError::EnrichmentFailed {
            stage: EnrichmentStage::Keywords,
            sentence: 0,
            detail: "boom".into(),
        }
        .at_sentence(7);
        assert!(matches!(e, SlidesError::EnrichmentFailed { sentence: 7, .. }));

        let e = SlidesError::Internal("x".into()).at_sentence(7);
        assert!(matches!(e, SlidesError::Internal(_)));
    }

    #[test]
    fn host_and_report_errors_are_post_submission() {
        assert!(SlidesError::MissingImage { sentence: 0 }.is_pre_submission());
        assert!(!SlidesError::HostRejected {
            detail: "quota".into()
        }
        .is_pre_submission());
        assert!(!SlidesError::ReportWriteFailed {
            path: PathBuf::from("/ro/report.json"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        }
        .is_pre_submission());
    }
}
