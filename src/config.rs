//! Configuration types for deck generation.
//!
//! All run behaviour is controlled through [`DeckConfig`], built via its
//! [`DeckConfigBuilder`]. Credentials and endpoints for the external
//! services live in [`ServiceConfig`], which is passed explicitly to every
//! collaborator at construction time; nothing in the library reads the
//! process environment except [`ServiceConfig::from_env`].

use crate::error::SlidesError;
use crate::operation::{Dimension, Placement, Position, Size, Unit};
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Configuration for one deck-generation run.
///
/// # Example
/// ```rust
/// use topic2slides::DeckConfig;
///
/// let config = DeckConfig::builder()
///     .max_sentences(5)
///     .language("en")
///     .concurrency(2)
///     .build()
///     .unwrap();
/// assert_eq!(config.max_sentences, 5);
/// ```
#[derive(Clone)]
pub struct DeckConfig {
    /// Maximum number of sentences (and therefore slides). Default: 10.
    pub max_sentences: usize,

    /// Article and sentence-boundary language. Default: "en".
    pub language: String,

    /// Extra entries that never end a sentence, one per line. Default: None.
    pub abbreviations_file: Option<PathBuf>,

    /// Result-count hint passed to the image finder. Range: 1–10. Default: 2.
    pub image_results: usize,

    /// Sentences enriched at once. Default: 1 (strictly sequential).
    ///
    /// Slide order is preserved regardless of this value.
    pub concurrency: usize,

    /// Per-request timeout for every external HTTP call, in seconds. Default: 30.
    pub request_timeout_secs: u64,

    /// Element geometry shared by every slide.
    pub layout: LayoutConfig,

    /// Font applied to every text box.
    pub text_style: TextStyle,

    /// Reject batches with more operations than this. Default: None (no limit).
    pub max_operations_per_batch: Option<usize>,

    /// Endpoints and credentials for the external services.
    pub services: ServiceConfig,

    /// Optional observer for stage and per-sentence events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for DeckConfig {
    fn default() -> Self {
        Self {
            max_sentences: 10,
            language: "en".to_string(),
            abbreviations_file: None,
            image_results: 2,
            concurrency: 1,
            request_timeout_secs: 30,
            layout: LayoutConfig::default(),
            text_style: TextStyle::default(),
            max_operations_per_batch: None,
            services: ServiceConfig::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for DeckConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeckConfig")
            .field("max_sentences", &self.max_sentences)
            .field("language", &self.language)
            .field("abbreviations_file", &self.abbreviations_file)
            .field("image_results", &self.image_results)
            .field("concurrency", &self.concurrency)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("layout", &self.layout)
            .field("text_style", &self.text_style)
            .field("max_operations_per_batch", &self.max_operations_per_batch)
            .field("services", &self.services)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn DeckProgressCallback>"),
            )
            .finish()
    }
}

impl DeckConfig {
    /// Create a new builder for `DeckConfig`.
    pub fn builder() -> DeckConfigBuilder {
        DeckConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`DeckConfig`].
pub struct DeckConfigBuilder {
    config: DeckConfig,
}

impl DeckConfigBuilder {
    pub fn max_sentences(mut self, n: usize) -> Self {
        self.config.max_sentences = n;
        self
    }

    pub fn language(mut self, lang: impl Into<String>) -> Self {
        self.config.language = lang.into();
        self
    }

    pub fn abbreviations_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.abbreviations_file = Some(path.into());
        self
    }

    pub fn image_results(mut self, n: usize) -> Self {
        self.config.image_results = n;
        self
    }

    pub fn concurrency(mut self, n: usize) -> Self {
        self.config.concurrency = n.max(1);
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn layout(mut self, layout: LayoutConfig) -> Self {
        self.config.layout = layout;
        self
    }

    pub fn text_style(mut self, style: TextStyle) -> Self {
        self.config.text_style = style;
        self
    }

    pub fn max_operations_per_batch(mut self, limit: usize) -> Self {
        self.config.max_operations_per_batch = Some(limit);
        self
    }

    pub fn services(mut self, services: ServiceConfig) -> Self {
        self.config.services = services;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<DeckConfig, SlidesError> {
        let c = &self.config;
        if c.max_sentences == 0 {
            return Err(SlidesError::InvalidConfig(
                "max_sentences must be ≥ 1".into(),
            ));
        }
        if !(1..=10).contains(&c.image_results) {
            return Err(SlidesError::InvalidConfig(format!(
                "image_results must be 1–10, got {}",
                c.image_results
            )));
        }
        if c.language.trim().is_empty() {
            return Err(SlidesError::InvalidConfig("language must not be empty".into()));
        }
        if c.request_timeout_secs == 0 {
            return Err(SlidesError::InvalidConfig(
                "request_timeout_secs must be ≥ 1".into(),
            ));
        }
        if c.text_style.font_size_pt <= 0.0 || c.text_style.font_family.trim().is_empty() {
            return Err(SlidesError::InvalidConfig(format!(
                "text style needs a positive size and a family, got {:?}",
                c.text_style
            )));
        }
        if c.max_operations_per_batch == Some(0) {
            return Err(SlidesError::InvalidConfig(
                "max_operations_per_batch must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Layout & style ───────────────────────────────────────────────────────

/// Geometry for the two elements of every slide.
///
/// The text box is expressed in points and the image in EMU, the host's
/// native unit. The defaults place the image on the left and the text box
/// on the right with no overlap.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub text_box: Placement,
    pub image: Placement,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            text_box: Placement {
                size: Size::square(Dimension::pt(350.0)),
                position: Position {
                    x: 350.0,
                    y: 100.0,
                    unit: Unit::Pt,
                },
            },
            image: Placement {
                size: Size::square(Dimension::emu(4_000_000.0)),
                position: Position {
                    x: 100_000.0,
                    y: 100_000.0,
                    unit: Unit::Emu,
                },
            },
        }
    }
}

/// Font applied to the sentence text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub font_size_pt: f64,
    pub font_family: String,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size_pt: 16.0,
            font_family: "Montserrat".to_string(),
        }
    }
}

// ── Services ─────────────────────────────────────────────────────────────

/// Which collaborator extracts keywords from sentences.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeywordBackend {
    /// Natural-language-understanding REST service (`/v1/analyze`). (default)
    #[default]
    Nlu,
    /// Any chat LLM reachable through `edgequake-llm`.
    Llm,
}

impl KeywordBackend {
    /// Parse a backend name, ignoring case and surrounding whitespace.
    /// Anything other than `llm` selects [`KeywordBackend::Nlu`].
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("llm") {
            KeywordBackend::Llm
        } else {
            KeywordBackend::Nlu
        }
    }
}

/// Endpoints and credentials of the external services.
#[derive(Clone, Default)]
pub struct ServiceConfig {
    /// MediaWiki API endpoint. None → `https://{language}.wikipedia.org/w/api.php`.
    pub wiki_api_url: Option<String>,
    pub keyword_backend: KeywordBackend,
    /// Base URL of the NLU instance.
    pub nlu_url: Option<String>,
    pub nlu_api_key: Option<String>,
    /// LLM provider name for [`KeywordBackend::Llm`] (e.g. "openai").
    pub llm_provider: Option<String>,
    pub llm_model: Option<String>,
    /// Google API key for Custom Search.
    pub google_api_key: Option<String>,
    /// Programmable search engine id (`cx`).
    pub search_engine_id: Option<String>,
    /// OAuth bearer token with the presentations scope.
    pub slides_access_token: Option<String>,
    /// Override for the Custom Search endpoint.
    pub image_search_url: Option<String>,
    /// Override for the Slides API base URL.
    pub slides_api_url: Option<String>,
}

pub const DEFAULT_IMAGE_SEARCH_URL: &str = "https://www.googleapis.com/customsearch/v1";
pub const DEFAULT_SLIDES_API_URL: &str = "https://slides.googleapis.com/v1";

impl ServiceConfig {
    /// Read every field from its environment variable.
    ///
    /// | Variable | Field |
    /// |----------|-------|
    /// | `WIKIPEDIA_API_URL` | `wiki_api_url` |
    /// | `TOPIC2SLIDES_KEYWORDS` | `keyword_backend` (`nlu` / `llm`) |
    /// | `WATSON_NLU_URL` | `nlu_url` |
    /// | `WATSON_API_KEY` | `nlu_api_key` |
    /// | `EDGEQUAKE_LLM_PROVIDER` | `llm_provider` |
    /// | `EDGEQUAKE_MODEL` | `llm_model` |
    /// | `GOOGLE_API_KEY` | `google_api_key` |
    /// | `GOOGLE_CUSTOM_SEARCH_ENGINE_ID` | `search_engine_id` |
    /// | `GOOGLE_SLIDES_ACCESS_TOKEN` | `slides_access_token` |
    pub fn from_env() -> Self {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());
        let keyword_backend = var("TOPIC2SLIDES_KEYWORDS")
            .map(|v| KeywordBackend::from_name(&v))
            .unwrap_or_default();
        Self {
            wiki_api_url: var("WIKIPEDIA_API_URL"),
            keyword_backend,
            nlu_url: var("WATSON_NLU_URL"),
            nlu_api_key: var("WATSON_API_KEY"),
            llm_provider: var("EDGEQUAKE_LLM_PROVIDER"),
            llm_model: var("EDGEQUAKE_MODEL"),
            google_api_key: var("GOOGLE_API_KEY"),
            search_engine_id: var("GOOGLE_CUSTOM_SEARCH_ENGINE_ID"),
            slides_access_token: var("GOOGLE_SLIDES_ACCESS_TOKEN"),
            image_search_url: var("GOOGLE_CUSTOM_SEARCH_URL"),
            slides_api_url: var("GOOGLE_SLIDES_API_URL"),
        }
    }

    /// Resolved MediaWiki endpoint for `language`.
    pub fn wiki_endpoint(&self, language: &str) -> String {
        self.wiki_api_url
            .clone()
            .unwrap_or_else(|| format!("https://{language}.wikipedia.org/w/api.php"))
    }
}

fn redact(v: &Option<String>) -> Option<&'static str> {
    v.as_ref().map(|_| "<redacted>")
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("wiki_api_url", &self.wiki_api_url)
            .field("keyword_backend", &self.keyword_backend)
            .field("nlu_url", &self.nlu_url)
            .field("nlu_api_key", &redact(&self.nlu_api_key))
            .field("llm_provider", &self.llm_provider)
            .field("llm_model", &self.llm_model)
            .field("google_api_key", &redact(&self.google_api_key))
            .field("search_engine_id", &self.search_engine_id)
            .field("slides_access_token", &redact(&self.slides_access_token))
            .field("image_search_url", &self.image_search_url)
            .field("slides_api_url", &self.slides_api_url)
            .finish()
    }
}
