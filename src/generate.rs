//! Eager (whole-deck) generation entry points.
//!
//! [`generate`] runs every stage in order and returns only once the deck is
//! published. The host is contacted last: the full operation batch is built
//! and checked first, so a run that fails before submission leaves nothing
//! on the host. If the batch itself is rejected, the presentation created
//! for it stays behind empty and its id is logged.

use crate::config::DeckConfig;
use crate::error::SlidesError;
use crate::model::{ContentModel, Prefix};
use crate::operation::OperationBatch;
use crate::output::{DeckOutput, RunStats};
use crate::pipeline::split::BoundarySplitter;
use crate::pipeline::{build, enrich, normalize};
use crate::progress::Stage;
use crate::services::Collaborators;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Generate and publish a deck about `topic`.
///
/// # Errors
/// Any stage failure aborts the run. Every error except
/// [`SlidesError::HostRejected`] is raised before the host is called.
/// A rejected batch leaves an empty presentation on the host.
pub async fn generate(
    topic: impl AsRef<str>,
    prefix: Prefix,
    collaborators: &Collaborators,
    config: &DeckConfig,
) -> Result<DeckOutput, SlidesError> {
    let total_start = Instant::now();
    let topic = topic.as_ref();
    info!("Generating deck: {} {}", prefix, topic);

    // ── Step 1: Fetch article ────────────────────────────────────────────
    stage_start(config, Stage::Fetch);
    let fetch_start = Instant::now();
    let raw = collaborators.source.fetch(topic).await?;
    if raw.trim().is_empty() {
        return Err(SlidesError::SourceUnavailable {
            topic: topic.to_string(),
            reason: "article is empty".into(),
        });
    }
    let fetch_duration_ms = fetch_start.elapsed().as_millis() as u64;
    stage_complete(config, Stage::Fetch, fetch_duration_ms);
    info!("Fetched {} bytes of article text", raw.len());

    // ── Step 2: Normalize ────────────────────────────────────────────────
    let step = Instant::now();
    stage_start(config, Stage::Normalize);
    let normalized = normalize::normalize(&raw);
    stage_complete(config, Stage::Normalize, step.elapsed().as_millis() as u64);

    // ── Step 3: Split and truncate ───────────────────────────────────────
    let step = Instant::now();
    stage_start(config, Stage::Split);
    let mut splitter = BoundarySplitter::for_language(&config.language)?;
    if let Some(ref path) = config.abbreviations_file {
        splitter = splitter.with_abbreviations_file(path)?;
    }
    let sentences = splitter.split(&normalized);
    let sentences_found = sentences.len();
    let model = ContentModel::from_article(
        topic,
        prefix,
        raw,
        normalized,
        sentences,
        config.max_sentences,
    );
    if model.sentences.is_empty() {
        return Err(SlidesError::SourceUnavailable {
            topic: topic.to_string(),
            reason: "article has no usable sentences".into(),
        });
    }
    stage_complete(config, Stage::Split, step.elapsed().as_millis() as u64);
    info!(
        "Using {}/{} sentences",
        model.sentences.len(),
        sentences_found
    );

    // ── Step 4: Keywords and images ──────────────────────────────────────
    stage_start(config, Stage::Enrich);
    let enrich_start = Instant::now();
    let model = enrich::enrich(
        model,
        collaborators.keywords.as_ref(),
        collaborators.images.as_ref(),
        config,
    )
    .await?;
    let enrich_duration_ms = enrich_start.elapsed().as_millis() as u64;
    stage_complete(config, Stage::Enrich, enrich_duration_ms);

    // ── Step 5: Layout and operations ────────────────────────────────────
    let step = Instant::now();
    stage_start(config, Stage::Build);
    let batch = assemble(&model, config)?;
    stage_complete(config, Stage::Build, step.elapsed().as_millis() as u64);

    // ── Step 6: Publish ──────────────────────────────────────────────────
    stage_start(config, Stage::Submit);
    let submit_start = Instant::now();
    let host = &collaborators.host;
    let presentation_id = host.create_presentation(model.title()).await?;
    if let Err(e) = host.apply_batch(&presentation_id, &batch).await {
        warn!(
            "Batch rejected; presentation '{}' was created and left empty",
            presentation_id
        );
        return Err(e);
    }
    let submit_duration_ms = submit_start.elapsed().as_millis() as u64;
    stage_complete(config, Stage::Submit, submit_duration_ms);

    // ── Step 7: Stats ────────────────────────────────────────────────────
    let stats = RunStats {
        sentences_found,
        slides: model.sentences.len(),
        operations: batch.len(),
        images_found: model.sentences.iter().map(|s| s.images.len()).sum(),
        fetch_duration_ms,
        enrich_duration_ms,
        submit_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Deck complete: {} slides, {} operations, {}ms total",
        stats.slides, stats.operations, stats.total_duration_ms
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_run_complete(stats.slides);
    }

    Ok(DeckOutput {
        url: host.presentation_url(&presentation_id),
        presentation_id,
        title: model.title().to_string(),
        operation_count: batch.len(),
        model,
        stats,
    })
}

/// Turn an enriched model into the batch the host will receive.
///
/// Pure: no I/O. Fails with [`SlidesError::MissingImage`] when a sentence
/// has no image, and with [`SlidesError::BatchTooLarge`] when the batch
/// exceeds `config.max_operations_per_batch`.
pub fn assemble(model: &ContentModel, config: &DeckConfig) -> Result<OperationBatch, SlidesError> {
    let batch = build::build_batch(model, config)?;
    if let Some(limit) = config.max_operations_per_batch {
        if batch.len() > limit {
            return Err(SlidesError::BatchTooLarge {
                operations: batch.len(),
                limit,
            });
        }
    }
    debug!(
        "Assembled {} operations for {} slides",
        batch.len(),
        batch.slide_count()
    );
    Ok(batch)
}

/// Generate a deck and write the run report to `report_path`.
pub async fn generate_to_report(
    topic: impl AsRef<str>,
    prefix: Prefix,
    collaborators: &Collaborators,
    config: &DeckConfig,
    report_path: impl AsRef<Path>,
) -> Result<DeckOutput, SlidesError> {
    let output = generate(topic, prefix, collaborators, config).await?;
    output.write_report(report_path)?;
    Ok(output)
}

/// Synchronous wrapper around [`generate`].
///
/// Creates a temporary tokio runtime internally.
pub fn generate_sync(
    topic: impl AsRef<str>,
    prefix: Prefix,
    collaborators: &Collaborators,
    config: &DeckConfig,
) -> Result<DeckOutput, SlidesError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| SlidesError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(generate(topic, prefix, collaborators, config))
}

fn stage_start(config: &DeckConfig, stage: Stage) {
    debug!("{}", stage);
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_start(stage);
    }
}

fn stage_complete(config: &DeckConfig, stage: Stage, elapsed_ms: u64) {
    if let Some(ref cb) = config.progress_callback {
        cb.on_stage_complete(stage, elapsed_ms);
    }
}
