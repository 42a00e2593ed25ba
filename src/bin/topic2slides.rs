//! CLI binary for topic2slides.
//!
//! A thin shim over the library crate that maps CLI flags to `DeckConfig`,
//! asks for missing input on the terminal, and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use topic2slides::pipeline::input::{read_prefix, read_topic, validate_topic};
use topic2slides::{
    generate, generate_to_report, Collaborators, DeckConfig, DeckProgressCallback, KeywordBackend,
    Prefix, ProgressCallback, ServiceConfig, Stage,
};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Spinner per stage, switching to a counted bar while sentences are
/// enriched.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        bar.set_style(Self::spinner_style());
        bar.set_prefix("Starting");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS)
    }

    fn bar_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:32.green/238}] {pos:>2}/{len} sentences  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS)
    }
}

impl DeckProgressCallback for CliProgressCallback {
    fn on_stage_start(&self, stage: Stage) {
        self.bar.set_prefix(stage.to_string());
        if stage == Stage::Enrich {
            self.bar.set_position(0);
        }
    }

    fn on_sentence_enriched(&self, index: usize, total: usize, image_count: usize) {
        if self.bar.length() != Some(total as u64) {
            self.bar.set_length(total as u64);
            self.bar.set_style(Self::bar_style());
        }
        self.bar.println(format!(
            "  {} Sentence {:>2}/{:<2}  {}",
            green("✓"),
            index + 1,
            total,
            dim(&format!("{image_count} images")),
        ));
        self.bar.inc(1);
    }

    fn on_stage_complete(&self, stage: Stage, elapsed_ms: u64) {
        if stage == Stage::Enrich {
            self.bar.set_style(Self::spinner_style());
        }
        self.bar.set_message(dim(&format!("{stage}: {elapsed_ms}ms")));
    }

    fn on_run_complete(&self, slides: usize) {
        self.bar.finish_and_clear();
        eprintln!("{} {} slides built", green("✔"), bold(&slides.to_string()));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Ask for topic and prefix interactively
  topic2slides

  # Non-interactive
  topic2slides "Ada Lovelace" --prefix who

  # Build the deck without publishing it, and keep a report
  topic2slides "Rust (programming language)" --dry-run --report run.json

  # LLM keywords instead of the NLU service
  topic2slides "Eiffel Tower" --keywords llm --provider openai

ENVIRONMENT VARIABLES:
  GOOGLE_API_KEY                  Custom Search API key
  GOOGLE_CUSTOM_SEARCH_ENGINE_ID  Programmable search engine id (cx)
  GOOGLE_SLIDES_ACCESS_TOKEN      OAuth token with the presentations scope
  WATSON_NLU_URL, WATSON_API_KEY  Keyword service (--keywords nlu)
  OPENAI_API_KEY, ...             LLM credentials (--keywords llm)
  WIKIPEDIA_API_URL               Override the MediaWiki endpoint

  A .env file in the working directory is loaded first.
"#;

/// Build a slide deck from an encyclopedia article.
#[derive(Parser, Debug)]
#[command(
    name = "topic2slides",
    version,
    about = "Build a slide deck from an encyclopedia article",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Topic to search for. Asked interactively when omitted.
    topic: Option<String>,

    /// Title framing: 1-3, who, what or history. Asked interactively when omitted.
    #[arg(short, long, env = "TOPIC2SLIDES_PREFIX")]
    prefix: Option<Prefix>,

    /// Maximum number of slides.
    #[arg(short = 'n', long, env = "TOPIC2SLIDES_MAX_SENTENCES", default_value_t = 10)]
    max_sentences: usize,

    /// Article language (also selects the sentence rules).
    #[arg(short, long, env = "TOPIC2SLIDES_LANGUAGE", default_value = "en")]
    language: String,

    /// File of extra abbreviations that never end a sentence, one per line.
    #[arg(long, env = "TOPIC2SLIDES_ABBREVIATIONS")]
    abbreviations: Option<PathBuf>,

    /// Keyword backend.
    #[arg(long, env = "TOPIC2SLIDES_KEYWORDS", value_enum, default_value = "nlu")]
    keywords: KeywordsArg,

    /// LLM provider for `--keywords llm`.
    #[arg(long, env = "EDGEQUAKE_LLM_PROVIDER")]
    provider: Option<String>,

    /// LLM model for `--keywords llm`.
    #[arg(long, env = "EDGEQUAKE_MODEL")]
    model: Option<String>,

    /// MediaWiki API endpoint.
    #[arg(long, env = "WIKIPEDIA_API_URL")]
    wiki_url: Option<String>,

    /// Image URLs requested per sentence (1-10).
    #[arg(long, env = "TOPIC2SLIDES_IMAGES", default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(1..=10))]
    images: u8,

    /// Sentences enriched in parallel.
    #[arg(short, long, env = "TOPIC2SLIDES_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// Per-request timeout in seconds.
    #[arg(long, env = "TOPIC2SLIDES_TIMEOUT", default_value_t = 30)]
    timeout: u64,

    /// Refuse batches with more operations than this.
    #[arg(long, env = "TOPIC2SLIDES_MAX_OPERATIONS")]
    max_operations: Option<usize>,

    /// Build everything but keep the deck in memory instead of publishing.
    #[arg(long)]
    dry_run: bool,

    /// Write a JSON run report (content model + stats) to this path.
    #[arg(long, env = "TOPIC2SLIDES_REPORT")]
    report: Option<PathBuf>,

    /// Print the full result as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "TOPIC2SLIDES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum KeywordsArg {
    Nlu,
    Llm,
}

impl From<KeywordsArg> for KeywordBackend {
    fn from(v: KeywordsArg) -> Self {
        match v {
            KeywordsArg::Nlu => KeywordBackend::Nlu,
            KeywordsArg::Llm => KeywordBackend::Llm,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Topic and prefix ─────────────────────────────────────────────────
    let (topic, prefix) = collect_input(&cli)?;

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn DeckProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    let collaborators = if cli.dry_run {
        Collaborators::dry_run(&config)
    } else {
        Collaborators::from_config(&config)
    }
    .context("Failed to set up services")?;

    // ── Run ──────────────────────────────────────────────────────────────
    let output = match cli.report {
        Some(ref path) => generate_to_report(&topic, prefix, &collaborators, &config, path).await,
        None => generate(&topic, prefix, &collaborators, &config).await,
    }
    .context("Deck generation failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else {
        println!("{}", output.url.as_deref().unwrap_or(&output.presentation_id));
    }

    if !cli.quiet && !cli.json {
        eprintln!(
            "{}  {} {}  {} slides  {} operations  {}ms{}",
            green("✔"),
            prefix,
            bold(&output.title),
            output.stats.slides,
            output.stats.operations,
            output.stats.total_duration_ms,
            if cli.dry_run { dim("  (dry run)") } else { String::new() },
        );
        if let Some(ref path) = cli.report {
            eprintln!("   report → {}", bold(&path.display().to_string()));
        }
    }

    Ok(())
}

/// Take topic and prefix from flags, asking on the terminal for whatever is
/// missing.
fn collect_input(cli: &Cli) -> Result<(String, Prefix)> {
    let stdin = io::stdin();
    let mut reader = stdin.lock();
    let mut writer = io::stderr();

    let topic = match cli.topic {
        Some(ref t) => validate_topic(t)?,
        None => read_topic(&mut reader, &mut writer)?,
    };
    let prefix = match cli.prefix {
        Some(p) => p,
        None => read_prefix(&mut reader, &mut writer)?,
    };
    Ok((topic, prefix))
}

/// Map CLI args to `DeckConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<DeckConfig> {
    let mut services = ServiceConfig::from_env();
    services.keyword_backend = cli.keywords.clone().into();
    if cli.provider.is_some() {
        services.llm_provider = cli.provider.clone();
    }
    if cli.model.is_some() {
        services.llm_model = cli.model.clone();
    }
    if cli.wiki_url.is_some() {
        services.wiki_api_url = cli.wiki_url.clone();
    }

    let mut builder = DeckConfig::builder()
        .max_sentences(cli.max_sentences)
        .language(cli.language.clone())
        .image_results(cli.images as usize)
        .concurrency(cli.concurrency)
        .request_timeout_secs(cli.timeout)
        .services(services);

    if let Some(ref path) = cli.abbreviations {
        builder = builder.abbreviations_file(path.clone());
    }
    if let Some(limit) = cli.max_operations {
        builder = builder.max_operations_per_batch(limit);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
