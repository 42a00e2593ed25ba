//! # topic2slides
//!
//! Turn a topic into a slide deck: one slide per sentence of the topic's
//! encyclopedia article, each with the sentence as text and a matching image.
//!
//! ## Pipeline Overview
//!
//! ```text
//! topic
//!  │
//!  ├─ 1. Fetch      article text from the content source (Wikipedia)
//!  ├─ 2. Normalize  drop headings and parentheticals, collapse whitespace
//!  ├─ 3. Split      UAX #29 sentences, first N kept
//!  ├─ 4. Enrich     keywords per sentence, then images for topic + keyword
//!  ├─ 5. Build      layout + ordered slide operations with fresh ids
//!  └─ 6. Submit     create the presentation, apply the batch in one call
//! ```
//!
//! Steps 1, 4 and 6 talk to external services through the traits in
//! [`services`]; everything else is pure and deterministic apart from the
//! object ids.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use topic2slides::{generate, Collaborators, DeckConfig, Prefix, ServiceConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DeckConfig::builder()
//!         .services(ServiceConfig::from_env())
//!         .build()?;
//!     let collaborators = Collaborators::from_config(&config)?;
//!     let deck = generate("Ada Lovelace", Prefix::WhoIs, &collaborators, &config).await?;
//!     println!("{} slides: {:?}", deck.stats.slides, deck.url);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `topic2slides` binary (clap + anyhow + tracing-subscriber + indicatif + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod generate;
pub mod model;
pub mod operation;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;
pub mod services;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{DeckConfig, DeckConfigBuilder, KeywordBackend, LayoutConfig, ServiceConfig, TextStyle};
pub use error::{EnrichmentStage, SlidesError};
pub use generate::{assemble, generate, generate_sync, generate_to_report};
pub use model::{ContentModel, Prefix, SentenceRecord};
pub use operation::{ObjectId, OperationBatch, OperationKind, SlideOperation};
pub use output::{DeckOutput, RunStats};
pub use progress::{DeckProgressCallback, NoopProgressCallback, ProgressCallback, Stage};
pub use services::{Collaborators, ContentSource, ImageFinder, KeywordExtractor, PresentationHost};
