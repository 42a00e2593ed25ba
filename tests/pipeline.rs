//! Offline integration tests for the whole generation pipeline.
//!
//! Every collaborator is an in-memory fake, so these run without network
//! access or credentials:
//!   cargo test --test pipeline

use async_trait::async_trait;
use std::io::Write;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use topic2slides::services::memory::MemoryHost;
use topic2slides::{
    generate, generate_sync, generate_to_report, Collaborators, ContentSource, DeckConfig,
    DeckProgressCallback, ImageFinder, KeywordExtractor, OperationKind, Prefix, SlideOperation,
    SlidesError, Stage,
};

// ── Fakes ────────────────────────────────────────────────────────────────────

const ARTICLE: &str = "\
Ada Lovelace (1815–1852) was an English mathematician.
She worked with Charles Babbage on the Analytical Engine.

== Early life ==
Her father was Lord Byron.  She was taught by Mary Somerville (a scientist) .
Dr. Kay wrote about her in 1978.
";

struct StaticSource(String);

#[async_trait]
impl ContentSource for StaticSource {
    async fn fetch(&self, _topic: &str) -> Result<String, SlidesError> {
        Ok(self.0.clone())
    }
}

/// Capitalised words, in order.
struct CapitalisedWords;

#[async_trait]
impl KeywordExtractor for CapitalisedWords {
    async fn extract(&self, sentence: &str) -> Result<Vec<String>, SlidesError> {
        Ok(sentence
            .split_whitespace()
            .skip(1)
            .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|w| w.chars().next().is_some_and(char::is_uppercase))
            .map(str::to_string)
            .collect())
    }
}

#[derive(Default)]
struct FakeImages {
    queries: Mutex<Vec<String>>,
    empty_for: Option<&'static str>,
}

#[async_trait]
impl ImageFinder for FakeImages {
    async fn find(&self, query: &str, count: usize) -> Result<Vec<String>, SlidesError> {
        self.queries.lock().unwrap().push(query.to_string());
        if self.empty_for == Some(query) {
            return Ok(Vec::new());
        }
        let slug = query.to_lowercase().replace(' ', "-");
        Ok((0..count)
            .map(|i| format!("https://img.example/{slug}/{i}.jpg"))
            .collect())
    }
}

fn collaborators(
    source: impl Into<String>,
    images: Arc<FakeImages>,
    host: Arc<MemoryHost>,
) -> Collaborators {
    Collaborators {
        source: Arc::new(StaticSource(source.into())),
        keywords: Arc::new(CapitalisedWords),
        images,
        host,
    }
}

// ── Happy path ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_generate_builds_one_slide_per_sentence() {
    let images = Arc::new(FakeImages::default());
    let host = Arc::new(MemoryHost::new());
    let c = collaborators(ARTICLE, images.clone(), host.clone());

    let out = generate("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default())
        .await
        .unwrap();

    let texts: Vec<&str> = out.model.sentences.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "Ada Lovelace was an English mathematician.",
            "She worked with Charles Babbage on the Analytical Engine.",
            "Her father was Lord Byron.",
            "She was taught by Mary Somerville.",
            "Dr. Kay wrote about her in 1978.",
        ]
    );
    assert_eq!(out.stats.slides, 5);
    assert_eq!(out.operation_count, 25);
    assert_eq!(out.model.prefix, Prefix::WhoIs);

    // Published exactly once, with the batch the output describes.
    let presentations = host.presentations();
    assert_eq!(presentations.len(), 1);
    assert_eq!(presentations[0].1, "Ada Lovelace");
    let batches = host.batches();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].0, out.presentation_id);
    assert_eq!(batches[0].1.len(), 25);
}

#[tokio::test]
async fn test_operations_follow_sentence_order() {
    let host = Arc::new(MemoryHost::new());
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), host.clone());
    let out = generate("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default())
        .await
        .unwrap();

    let batches = host.batches();
    let batch = &batches[0].1;
    let expected: Vec<OperationKind> = (0..5)
        .flat_map(|_| {
            [
                OperationKind::CreateSlide,
                OperationKind::CreateTextBox,
                OperationKind::InsertText,
                OperationKind::SetTextStyle,
                OperationKind::CreateImage,
            ]
        })
        .collect();
    assert_eq!(batch.kinds(), expected);

    let inserted: Vec<&str> = batch
        .iter()
        .filter_map(|op| match op {
            SlideOperation::InsertText { text, .. } => Some(text.as_str()),
            _ => None,
        })
        .collect();
    let sentences: Vec<&str> = out.model.sentences.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(inserted, sentences);

    let ids = batch.created_ids();
    let unique: std::collections::HashSet<_> = ids.iter().collect();
    assert_eq!(unique.len(), ids.len(), "object ids must be unique");
}

#[tokio::test]
async fn test_image_queries_use_topic_then_keyword() {
    let images = Arc::new(FakeImages::default());
    let c = collaborators(ARTICLE, images.clone(), Arc::new(MemoryHost::new()));
    generate("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default())
        .await
        .unwrap();

    let queries = images.queries.lock().unwrap().clone();
    assert_eq!(
        queries,
        vec![
            "Ada Lovelace",
            "Ada Lovelace Charles",
            "Ada Lovelace Lord",
            "Ada Lovelace Mary",
            "Ada Lovelace Kay",
        ]
    );
}

#[tokio::test]
async fn test_truncates_to_max_sentences() {
    let article = (1..=15)
        .map(|i| format!("Fact number {i} is true."))
        .collect::<Vec<_>>()
        .join(" ");
    let c = collaborators(article, Arc::new(FakeImages::default()), Arc::new(MemoryHost::new()));
    let out = generate("Facts", Prefix::WhatIs, &c, &DeckConfig::default())
        .await
        .unwrap();

    assert_eq!(out.stats.sentences_found, 15);
    assert_eq!(out.stats.slides, 10);
    assert_eq!(out.model.sentences[9].text, "Fact number 10 is true.");
}

#[tokio::test]
async fn test_concurrent_enrichment_keeps_order() {
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), Arc::new(MemoryHost::new()));
    let serial = generate("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default())
        .await
        .unwrap();
    let config = DeckConfig::builder().concurrency(4).build().unwrap();
    let parallel = generate("Ada Lovelace", Prefix::WhoIs, &c, &config)
        .await
        .unwrap();
    assert_eq!(serial.model.sentences, parallel.model.sentences);
}

// ── Failure paths ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_missing_image_aborts_before_host() {
    let images = Arc::new(FakeImages {
        empty_for: Some("Ada Lovelace Lord"),
        ..Default::default()
    });
    let host = Arc::new(MemoryHost::new());
    let c = collaborators(ARTICLE, images, host.clone());

    let err = generate("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SlidesError::MissingImage { sentence: 2 }), "got {err}");
    assert!(err.is_pre_submission());
    assert_eq!(host.call_count(), 0);
}

#[tokio::test]
async fn test_batch_limit_aborts_before_host() {
    let host = Arc::new(MemoryHost::new());
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), host.clone());
    let config = DeckConfig::builder()
        .max_operations_per_batch(20)
        .build()
        .unwrap();

    let err = generate("Ada Lovelace", Prefix::WhoIs, &c, &config)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        SlidesError::BatchTooLarge {
            operations: 25,
            limit: 20
        }
    ));
    assert_eq!(host.call_count(), 0);
}

#[tokio::test]
async fn test_empty_article_is_source_unavailable() {
    let host = Arc::new(MemoryHost::new());
    let c = collaborators("  \n== Heading ==\n", Arc::new(FakeImages::default()), host.clone());
    let err = generate("Nothing", Prefix::WhatIs, &c, &DeckConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SlidesError::SourceUnavailable { .. }), "got {err}");
    assert_eq!(host.call_count(), 0);
}

#[tokio::test]
async fn test_unsupported_language_is_tokenizer_unavailable() {
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), Arc::new(MemoryHost::new()));
    let config = DeckConfig::builder().language("xx").build().unwrap();
    let err = generate("Ada Lovelace", Prefix::WhoIs, &c, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, SlidesError::TokenizerUnavailable { .. }));
}

#[tokio::test]
async fn test_host_rejection_is_reported() {
    let host = Arc::new(MemoryHost::rejecting("quota exceeded"));
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), host.clone());
    let err = generate("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default())
        .await
        .unwrap_err();
    assert!(matches!(err, SlidesError::HostRejected { .. }));
    assert!(!err.is_pre_submission());

    // The presentation was created before the batch was refused.
    assert_eq!(host.presentations().len(), 1);
    assert!(host.batches().is_empty());
}

#[tokio::test]
async fn test_report_failure_happens_after_publishing() {
    // A regular file where the report directory should be.
    let blocker = tempfile::NamedTempFile::new().unwrap();
    let path = blocker.path().join("run.json");
    let host = Arc::new(MemoryHost::new());
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), host.clone());

    let err = generate_to_report("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default(), &path)
        .await
        .unwrap_err();
    assert!(matches!(err, SlidesError::ReportWriteFailed { .. }), "got {err}");
    assert!(!err.is_pre_submission());
    assert_eq!(host.batches().len(), 1);
}

// ── Sentence boundaries ──────────────────────────────────────────────────────

const WAR_ARTICLE: &str = "\
He fought in World War I. He survived the war.
Vitamin C. It is vital.
The answer was no. Then he left.
";

#[tokio::test]
async fn test_sentences_ending_in_letters_get_own_slides() {
    let c = collaborators(WAR_ARTICLE, Arc::new(FakeImages::default()), Arc::new(MemoryHost::new()));
    let out = generate("Veteran", Prefix::WhoIs, &c, &DeckConfig::default())
        .await
        .unwrap();
    let texts: Vec<&str> = out.model.sentences.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(
        texts,
        vec![
            "He fought in World War I.",
            "He survived the war.",
            "Vitamin C.",
            "It is vital.",
            "The answer was no.",
            "Then he left.",
        ]
    );
    assert_eq!(out.stats.slides, 6);
}

#[tokio::test]
async fn test_abbreviations_file_keeps_entries_inside_sentences() {
    let article = "The Dept. Office opened in 1900. It closed later.";
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "dept").unwrap();

    let c = collaborators(article, Arc::new(FakeImages::default()), Arc::new(MemoryHost::new()));
    let plain = generate("Office", Prefix::WhatIs, &c, &DeckConfig::default())
        .await
        .unwrap();
    assert_eq!(plain.stats.sentences_found, 3);

    let config = DeckConfig::builder()
        .abbreviations_file(file.path())
        .build()
        .unwrap();
    let out = generate("Office", Prefix::WhatIs, &c, &config)
        .await
        .unwrap();
    let texts: Vec<&str> = out.model.sentences.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["The Dept. Office opened in 1900.", "It closed later."]);
}

#[tokio::test]
async fn test_missing_abbreviations_file_is_tokenizer_unavailable() {
    let host = Arc::new(MemoryHost::new());
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), host.clone());
    let config = DeckConfig::builder()
        .abbreviations_file("/definitely/not/here.txt")
        .build()
        .unwrap();
    let err = generate("Ada Lovelace", Prefix::WhoIs, &c, &config)
        .await
        .unwrap_err();
    assert!(matches!(err, SlidesError::TokenizerUnavailable { .. }), "got {err}");
    assert_eq!(host.call_count(), 0);
}

// ── Blocking entry point ─────────────────────────────────────────────────────

#[test]
fn test_generate_sync_publishes_deck() {
    let host = Arc::new(MemoryHost::new());
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), host.clone());
    let out = generate_sync("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default()).unwrap();

    assert_eq!(out.stats.slides, 5);
    assert_eq!(out.presentation_id, "dry-run-1");
    assert_eq!(host.batches().len(), 1);
}

// ── Report and progress ──────────────────────────────────────────────────────

#[tokio::test]
async fn test_report_written_with_enriched_model() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("run.json");
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), Arc::new(MemoryHost::new()));

    generate_to_report("Ada Lovelace", Prefix::WhoIs, &c, &DeckConfig::default(), &path)
        .await
        .unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(report["model"]["prefix"], "Who is");
    assert_eq!(report["model"]["sentences"].as_array().unwrap().len(), 5);
    assert_eq!(
        report["model"]["sentences"][0]["images"][0],
        "https://img.example/ada-lovelace/0.jpg"
    );
    assert_eq!(report["stats"]["operations"], 25);
}

#[derive(Default)]
struct RecordingCallback {
    stages: Mutex<Vec<Stage>>,
    enriched: AtomicUsize,
    slides: AtomicUsize,
}

impl DeckProgressCallback for RecordingCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.stages.lock().unwrap().push(stage);
    }
    fn on_sentence_enriched(&self, _index: usize, _total: usize, _image_count: usize) {
        self.enriched.fetch_add(1, Ordering::SeqCst);
    }
    fn on_run_complete(&self, slides: usize) {
        self.slides.store(slides, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn test_progress_events_in_stage_order() {
    let cb = Arc::new(RecordingCallback::default());
    let config = DeckConfig::builder()
        .progress_callback(cb.clone())
        .build()
        .unwrap();
    let c = collaborators(ARTICLE, Arc::new(FakeImages::default()), Arc::new(MemoryHost::new()));
    generate("Ada Lovelace", Prefix::WhoIs, &c, &config)
        .await
        .unwrap();

    assert_eq!(
        *cb.stages.lock().unwrap(),
        vec![
            Stage::Fetch,
            Stage::Normalize,
            Stage::Split,
            Stage::Enrich,
            Stage::Build,
            Stage::Submit
        ]
    );
    assert_eq!(cb.enriched.load(Ordering::SeqCst), 5);
    assert_eq!(cb.slides.load(Ordering::SeqCst), 5);
}
