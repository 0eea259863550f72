//! CLI binary for documark.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ViewerConfig`, runs one conversion and prints or exports the result.

use anyhow::{Context, Result};
use clap::Parser;
use documark::views::Sidebar;
use documark::{
    render_page, ApplyOutcome, Controller, ConversionProgressCallback, ConversionStage,
    ExportOutcome, Locale, Phase, ProcessingState, ProgressCallback, SlugPolicy, SystemClipboard,
    ViewerConfig,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal spinner that follows the conversion stages.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));
        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_selection(&self, file_name: &str, _seq: u64) {
        self.bar.set_prefix(file_name.to_string());
    }

    fn on_stage(&self, _seq: u64, stage: ConversionStage) {
        self.bar.set_message(stage.to_string());
    }

    fn on_finished(&self, _seq: u64, state: &ProcessingState) {
        self.bar.finish_and_clear();
        match state.phase() {
            Phase::Success => eprintln!("{} converted", green("✔")),
            _ => eprintln!("{} conversion failed", red("✘")),
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert and print Markdown (stdout)
  documark report.pdf

  # Print the outline only
  documark --outline report.pdf

  # Jump to a section and print it
  documark --goto findings report.pdf

  # Export report.md next to a standalone HTML viewer
  documark report.docx -o out/ --html out/report.html

  # Copy the result to the clipboard
  documark --copy report.pdf

  # Use another provider through edgequake-llm
  documark --provider openai --model gpt-4.1 report.pdf

ENVIRONMENT VARIABLES:
  API_KEY             Gemini API key (checked when the request is made)
  GEMINI_API_KEY      Fallback Gemini API key
  DOCUMARK_MODEL      Override model ID
  DOCUMARK_PROVIDER   Use an edgequake-llm provider instead of Gemini
  RUST_LOG            Log filter, overrides -v / -q
"#;

/// View PDF and Word documents as navigable Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "documark",
    version,
    about = "Convert PDF and Word documents to navigable Markdown using Gemini",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Document to convert (.pdf, .docx, .doc).
    input: PathBuf,

    /// Write `<name>.md` into this directory.
    #[arg(short, long, env = "DOCUMARK_OUTPUT")]
    output: Option<PathBuf>,

    /// Write a standalone HTML viewer page to this file.
    #[arg(long, env = "DOCUMARK_HTML")]
    html: Option<PathBuf>,

    /// Print the outline instead of the Markdown.
    #[arg(long)]
    outline: bool,

    /// Navigate to a heading id and print that section.
    #[arg(long, value_name = "ID")]
    goto: Option<String>,

    /// Copy the Markdown to the system clipboard.
    #[arg(long)]
    copy: bool,

    /// Output state, outline and Markdown as JSON.
    #[arg(long, env = "DOCUMARK_JSON")]
    json: bool,

    /// Model ID.
    #[arg(long, env = "DOCUMARK_MODEL")]
    model: Option<String>,

    /// edgequake-llm provider: openai, anthropic, gemini, ollama, …
    #[arg(long, env = "DOCUMARK_PROVIDER")]
    provider: Option<String>,

    /// Environment variable holding the Gemini API key.
    #[arg(long, env = "DOCUMARK_API_KEY_ENV", default_value = "API_KEY")]
    api_key_env: String,

    /// Gemini REST endpoint.
    #[arg(long, env = "DOCUMARK_ENDPOINT")]
    endpoint: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "DOCUMARK_TEMPERATURE", default_value_t = 0.2)]
    temperature: f32,

    /// Max LLM output tokens.
    #[arg(long, env = "DOCUMARK_MAX_TOKENS")]
    max_tokens: Option<usize>,

    /// Language of error messages.
    #[arg(long, env = "DOCUMARK_LOCALE", value_enum, default_value = "en")]
    locale: LocaleArg,

    /// Give repeated headings distinct ids (`-1`, `-2`, …).
    #[arg(long)]
    unique_slugs: bool,

    /// Keep model output as-is (no fence stripping or whitespace cleanup).
    #[arg(long)]
    raw: bool,

    /// Path to a text file containing a custom system prompt.
    #[arg(long, env = "DOCUMARK_SYSTEM_PROMPT")]
    system_prompt: Option<PathBuf>,

    /// Disable the spinner.
    #[arg(long, env = "DOCUMARK_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCUMARK_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCUMARK_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum LocaleArg {
    En,
    ZhCn,
}

impl From<LocaleArg> for Locale {
    fn from(v: LocaleArg) -> Self {
        match v {
            LocaleArg::En => Locale::En,
            LocaleArg::ZhCn => Locale::ZhCn,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the feedback; keep INFO logs out of its way.
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb).await?;
    let locale = config.locale;

    // ── Run conversion ───────────────────────────────────────────────────
    let mut controller = Controller::from_config(config).context("Failed to set up the model client")?;
    let outcome = controller
        .convert_file(&cli.input)
        .await
        .with_context(|| format!("Cannot open {}", cli.input.display()))?;

    if let Some(ref path) = cli.html {
        // The page inlines the preview snapshot, which is a blocking read.
        let page = tokio::task::block_in_place(|| render_page(&controller));
        tokio::fs::write(path, page)
            .await
            .with_context(|| format!("Failed to write viewer page to {}", path.display()))?;
        if !cli.quiet {
            eprintln!("{} viewer page  →  {}", dim("•"), bold(&path.display().to_string()));
        }
    }

    if outcome != ApplyOutcome::Applied(Phase::Success) {
        let message = controller
            .processing()
            .error_message(locale)
            .unwrap_or_else(|| "conversion did not complete".to_string());
        if cli.json {
            print_json(&cli, &controller)?;
        }
        anyhow::bail!(message);
    }

    // ── Navigation ───────────────────────────────────────────────────────
    let section = match cli.goto {
        Some(ref id) => {
            controller.navigate(id);
            let visible = controller
                .rendered()
                .filter(|doc| doc.scroll_count() > 0)
                .map(|doc| doc.visible_section().to_string());
            if visible.is_none() && !cli.quiet {
                eprintln!("{} no heading with id '{}'", red("✘"), id);
            }
            visible
        }
        None => None,
    };

    // ── Output ───────────────────────────────────────────────────────────
    if cli.json {
        print_json(&cli, &controller)?;
    } else if cli.outline {
        let sidebar = Sidebar::new(controller.outline(), controller.active_heading(), None);
        print!("{}", sidebar.render_text());
    } else if cli.goto.is_some() {
        if let Some(ref text) = section {
            write_stdout(text)?;
        }
    } else {
        write_stdout(controller.markdown())?;
    }

    // ── Export ───────────────────────────────────────────────────────────
    if let Some(ref dir) = cli.output {
        if let ExportOutcome::Written(path) = controller
            .download_markdown(dir)
            .await
            .context("Export failed")?
        {
            if !cli.quiet {
                eprintln!("{} markdown     →  {}", green("✔"), bold(&path.display().to_string()));
            }
        }
    }

    if cli.copy {
        let mut clipboard = SystemClipboard::new().context("Clipboard unavailable")?;
        if let ExportOutcome::Copied { bytes } = controller
            .copy_markdown(&mut clipboard)
            .context("Copy failed")?
        {
            if !cli.quiet {
                eprintln!("{} copied {} bytes to the clipboard", green("✔"), bytes);
            }
        }
    }

    Ok(())
}

fn write_stdout(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

fn print_json(cli: &Cli, controller: &Controller) -> Result<()> {
    let value = serde_json::json!({
        "file": cli.input,
        "state": controller.processing(),
        "active": controller.active_heading(),
        "outline": controller.outline(),
        "markdown": controller.markdown(),
    });
    let json = serde_json::to_string_pretty(&value).context("Failed to serialise output")?;
    println!("{json}");
    Ok(())
}

/// Map CLI args to `ViewerConfig`.
async fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ViewerConfig> {
    let mut builder = ViewerConfig::builder()
        .api_key_env(cli.api_key_env.clone())
        .temperature(cli.temperature)
        .locale(cli.locale.into())
        .clean_output(!cli.raw);

    if cli.unique_slugs {
        builder = builder.slug_policy(SlugPolicy::Disambiguate);
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref endpoint) = cli.endpoint {
        builder = builder.endpoint(endpoint.clone());
    }
    if let Some(n) = cli.max_tokens {
        builder = builder.max_output_tokens(n);
    }
    if let Some(ref path) = cli.system_prompt {
        let prompt = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read system prompt from {:?}", path))?;
        builder = builder.system_prompt(prompt);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
