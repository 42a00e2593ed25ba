//! Progress-callback trait for pipeline stage and per-sentence events.
//!
//! Inject an [`Arc<dyn DeckProgressCallback>`] via
//! [`crate::config::DeckConfigBuilder::progress_callback`] to receive events
//! as the run advances. The binary renders them as a terminal progress bar;
//! library users can forward them anywhere.
//!
//! # Example
//!
//! ```rust
//! use topic2slides::{DeckConfig, DeckProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     enriched: AtomicUsize,
//! }
//!
//! impl DeckProgressCallback for CountingCallback {
//!     fn on_sentence_enriched(&self, index: usize, total: usize, image_count: usize) {
//!         let done = self.enriched.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("sentence {}/{} ({} images, {} done)", index + 1, total, image_count, done);
//!     }
//! }
//!
//! let config = DeckConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { enriched: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::fmt;
use std::sync::Arc;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stage {
    Fetch,
    Normalize,
    Split,
    Enrich,
    Build,
    Submit,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Fetch => "Fetching article",
            Stage::Normalize => "Normalizing text",
            Stage::Split => "Splitting sentences",
            Stage::Enrich => "Finding keywords and images",
            Stage::Build => "Building slides",
            Stage::Submit => "Publishing presentation",
        };
        f.write_str(name)
    }
}

/// Called by the pipeline as it runs.
///
/// Implementations must be `Send + Sync`: with `concurrency > 1`,
/// `on_sentence_enriched` may fire from several tasks and out of index
/// order. All methods default to no-ops.
pub trait DeckProgressCallback: Send + Sync {
    /// A stage is about to start.
    fn on_stage_start(&self, stage: Stage) {
        let _ = stage;
    }

    /// One sentence received its keywords and images.
    ///
    /// `index` is 0-based; `total` is the number of sentences being enriched.
    fn on_sentence_enriched(&self, index: usize, total: usize, image_count: usize) {
        let _ = (index, total, image_count);
    }

    /// A stage finished successfully.
    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        let _ = (stage, elapsed_ms);
    }

    /// The presentation was published (or recorded, in dry-run mode).
    fn on_run_complete(&self, slide_count: usize) {
        let _ = slide_count;
    }
}

/// A no-op implementation; the default when no callback is configured.
pub struct NoopProgressCallback;

impl DeckProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::DeckConfig`].
pub type ProgressCallback = Arc<dyn DeckProgressCallback>;
