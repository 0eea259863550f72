//! # documark
//!
//! Turn PDF and Word documents into navigable Markdown with a multimodal
//! model, and view the result next to the source.
//!
//! ## Why this crate?
//!
//! Reading a long report is mostly navigation. Instead of extracting text
//! page by page, this crate sends the whole document to a model instructed to
//! produce well-hierarchised Markdown. It then derives a clickable outline
//! from the heading markers, so every `#`, `##` and `###` becomes an entry in
//! a table of contents that scrolls the rendered result.
//!
//! ## Flow
//!
//! ```text
//! file (.pdf/.docx/.doc)
//!  │
//!  ├─ 1. Select   validate type, snapshot a preview, state → in-flight
//!  ├─ 2. Read     bytes → base64
//!  ├─ 3. Convert  one call to Gemini (or any edgequake-llm provider)
//!  ├─ 4. Polish   strip fences, normalise whitespace
//!  ├─ 5. Outline  h1–h3 → [`Outline`] with slug ids
//!  └─ 6. View     sidebar + preview + rendered Markdown
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use documark::{Controller, ViewerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credential read from API_KEY / GEMINI_API_KEY when the call is made
//!     let mut controller = Controller::from_config(ViewerConfig::default())?;
//!     controller.convert_file("report.pdf").await?;
//!     for heading in controller.outline() {
//!         println!("{} {}", "#".repeat(heading.level as usize), heading.text);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `documark` binary (clap + anyhow + tracing-subscriber + indicatif + arboard) |
//!
//! Disable `cli` when using only the library:
//! ```toml
//! documark = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod controller;
pub mod document;
pub mod error;
pub mod export;
pub mod navigator;
pub mod outline;
pub mod postprocess;
pub mod progress;
pub mod prompts;
pub mod state;
pub mod views;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{ConversionClient, ConversionRequest, GeminiClient, ProviderClient, StubClient};
pub use config::{Locale, ResponseOrdering, SlugPolicy, ViewerConfig, ViewerConfigBuilder};
pub use controller::{ApplyOutcome, Completion, Controller, PendingConversion};
pub use document::{markdown_file_name, DocumentKind, SelectedDocument};
pub use error::{ConversionError, DocumarkError};
pub use export::{Clipboard, ExportOutcome, MemoryClipboard};
pub use navigator::{Anchor, DocumentView, NavigateOutcome, Navigator, ScrollBehavior};
pub use outline::{extract_outline, extract_outline_with, slugify, Heading, Outline};
pub use progress::{ConversionProgressCallback, ConversionStage, NoopProgressCallback, ProgressCallback};
pub use state::{Phase, ProcessingState};
pub use views::{render_markdown, render_page, RenderedDocument};

#[cfg(feature = "cli")]
pub use export::SystemClipboard;
