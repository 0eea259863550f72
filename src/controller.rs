//! Application controller: owns the viewer state and drives conversions.
//!
//! ## Lifecycle of a selection
//!
//! ```text
//! select_file ──▶ PendingConversion ──run()──▶ Completion ──apply()──▶ state
//!   (sync)          (owns its inputs)           (async)       (sync)
//! ```
//!
//! Async callers load the [`SelectedDocument`] first, so the preview copy
//! runs on the blocking pool, and hand it to
//! [`select_document`](Controller::select_document).
//!
//! Splitting the async part out keeps the controller free of locks: a
//! [`PendingConversion`] owns everything it needs and never borrows the
//! controller, so several can be in flight while the controller keeps
//! accepting selections. [`Controller::apply`] then decides, per
//! [`ResponseOrdering`], whether a completion may still land.

use crate::client::{self, ConversionClient, ConversionRequest};
use crate::config::{ResponseOrdering, ViewerConfig};
use crate::document::{read_base64, SelectedDocument};
use crate::error::{ConversionError, DocumarkError};
use crate::export::{self, Clipboard, ExportOutcome};
use crate::navigator::{Anchor, DocumentView, NavigateOutcome, Navigator, ScrollBehavior};
use crate::outline::{extract_outline_with, Outline};
use crate::postprocess::clean_markdown;
use crate::progress::{ConversionStage, ProgressCallback};
use crate::state::{Phase, ProcessingState};
use crate::views::markdown::{render_markdown, RenderedDocument};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Owner of all viewer state.
pub struct Controller {
    config: ViewerConfig,
    client: Arc<dyn ConversionClient>,
    document: Option<SelectedDocument>,
    markdown: String,
    outline: Outline,
    rendered: Option<RenderedDocument>,
    navigator: Navigator,
    processing: ProcessingState,
    latest_seq: u64,
}

/// A conversion that has been started but not yet run.
pub struct PendingConversion {
    seq: u64,
    path: PathBuf,
    mime_type: &'static str,
    client: Arc<dyn ConversionClient>,
    callback: Option<ProgressCallback>,
}

/// The outcome of a [`PendingConversion`], ready to be applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    seq: u64,
    result: Result<String, ConversionError>,
}

/// Whether [`Controller::apply`] changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The completion landed; the state is now in this phase.
    Applied(Phase),
    /// A newer selection exists; the completion was dropped.
    Discarded,
}

// Stand-in view while nothing is rendered: every lookup misses.
struct DetachedView;

impl DocumentView for DetachedView {
    fn locate(&self, _id: &str) -> Option<Anchor> {
        None
    }

    fn scroll_into_view(&mut self, _anchor: &Anchor, _behavior: ScrollBehavior) {}
}

impl Controller {
    pub fn new(config: ViewerConfig, client: Arc<dyn ConversionClient>) -> Self {
        Self {
            config,
            client,
            document: None,
            markdown: String::new(),
            outline: Outline::default(),
            rendered: None,
            navigator: Navigator::new(),
            processing: ProcessingState::idle(),
            latest_seq: 0,
        }
    }

    /// Build a controller with the client described by `config`.
    pub fn from_config(config: ViewerConfig) -> Result<Self, DocumarkError> {
        let client = client::from_config(&config)?;
        Ok(Self::new(config, client))
    }

    // ── Getters ──────────────────────────────────────────────────────────

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    pub fn document(&self) -> Option<&SelectedDocument> {
        self.document.as_ref()
    }

    /// Current Markdown; empty until a conversion succeeds.
    pub fn markdown(&self) -> &str {
        &self.markdown
    }

    pub fn outline(&self) -> &Outline {
        &self.outline
    }

    pub fn rendered(&self) -> Option<&RenderedDocument> {
        self.rendered.as_ref()
    }

    pub fn active_heading(&self) -> Option<&str> {
        self.navigator.active()
    }

    pub fn processing(&self) -> &ProcessingState {
        &self.processing
    }

    /// Sequence number of the most recent selection; 0 before the first.
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    // ── Conversion ───────────────────────────────────────────────────────

    /// Select `path` and start a conversion for it.
    ///
    /// Unsupported file types are rejected before any state changes.
    /// Otherwise the previous document and its preview are released, the
    /// result and outline are cleared and the state goes in-flight. The
    /// active heading is kept. The preview snapshot is copied on the
    /// calling thread.
    pub fn select_file(&mut self, path: impl AsRef<Path>) -> Result<PendingConversion, DocumarkError> {
        let document = SelectedDocument::open(path.as_ref())?;
        Ok(self.select_document(document))
    }

    /// Make an already opened document the selection; see
    /// [`select_file`](Self::select_file).
    pub fn select_document(&mut self, document: SelectedDocument) -> PendingConversion {
        self.latest_seq += 1;
        let seq = self.latest_seq;

        info!(
            "Selected '{}' ({}) as #{}",
            document.name(),
            document.kind(),
            seq
        );
        if let Some(ref cb) = self.config.progress_callback {
            cb.on_selection(document.name(), seq);
        }

        let pending = PendingConversion {
            seq,
            path: document.path().to_path_buf(),
            mime_type: document.kind().mime_type(),
            client: Arc::clone(&self.client),
            callback: self.config.progress_callback.clone(),
        };

        // Replacing the document drops the old preview handle.
        self.document = Some(document);
        self.markdown.clear();
        self.outline = Outline::default();
        self.rendered = None;
        self.processing = ProcessingState::in_flight();
        pending
    }

    /// Land a completion according to the configured [`ResponseOrdering`].
    pub fn apply(&mut self, completion: Completion) -> ApplyOutcome {
        let Completion { seq, result } = completion;

        if self.config.response_ordering == ResponseOrdering::LatestRequest && seq != self.latest_seq {
            warn!(
                "Discarding stale response #{} (latest is #{})",
                seq, self.latest_seq
            );
            if let Some(ref cb) = self.config.progress_callback {
                cb.on_discarded(seq);
            }
            return ApplyOutcome::Discarded;
        }

        let result = result.and_then(|md| {
            let md = if self.config.clean_output {
                clean_markdown(&md)
            } else {
                md
            };
            client::non_empty(md)
        });

        match result {
            Ok(md) => {
                let policy = self.config.slug_policy;
                self.outline = extract_outline_with(&md, policy);
                self.rendered = Some(render_markdown(&md, policy));
                self.markdown = md;
                self.processing = ProcessingState::succeeded();
                info!(
                    "Conversion #{} done: {} bytes, {} headings",
                    seq,
                    self.markdown.len(),
                    self.outline.len()
                );
            }
            Err(e) => {
                warn!("Conversion #{} failed: {}", seq, e);
                self.processing = ProcessingState::failed(e);
            }
        }

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_finished(seq, &self.processing);
        }
        ApplyOutcome::Applied(self.processing.phase())
    }

    /// Select, convert and apply in one call.
    pub async fn convert_file(&mut self, path: impl AsRef<Path>) -> Result<ApplyOutcome, DocumarkError> {
        let document = SelectedDocument::load(path.as_ref()).await?;
        let pending = self.select_document(document);
        let completion = pending.run().await;
        Ok(self.apply(completion))
    }

    // ── Navigation ───────────────────────────────────────────────────────

    /// Make `id` the active heading and scroll the result pane to it.
    pub fn navigate(&mut self, id: &str) -> NavigateOutcome {
        match self.rendered.as_mut() {
            Some(doc) => self.navigator.navigate(id, doc),
            None => self.navigator.navigate(id, &mut DetachedView),
        }
    }

    // ── Export ───────────────────────────────────────────────────────────

    pub fn copy_markdown(&self, clipboard: &mut dyn Clipboard) -> Result<ExportOutcome, DocumarkError> {
        export::copy(&self.markdown, clipboard)
    }

    /// Write the Markdown into `dir`, named after the selected file.
    pub async fn download_markdown(&self, dir: &Path) -> Result<ExportOutcome, DocumarkError> {
        let name = self.document.as_ref().map(|d| d.name());
        export::download(&self.markdown, name, dir).await
    }

    /// Release the selected document and its preview.
    pub fn close(&mut self) {
        if let Some(doc) = self.document.take() {
            debug!("Released '{}'", doc.name());
        }
    }
}

impl PendingConversion {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn stage(&self, stage: ConversionStage) {
        debug!("#{}: {}", self.seq, stage);
        if let Some(ref cb) = self.callback {
            cb.on_stage(self.seq, stage);
        }
    }

    /// Read the file and ask the client for Markdown.
    ///
    /// Never fails as a whole: errors are carried in the [`Completion`].
    pub async fn run(self) -> Completion {
        let start = Instant::now();
        let result = self.convert().await;
        debug!(
            "#{} resolved in {}ms via {}",
            self.seq,
            start.elapsed().as_millis(),
            self.client.name()
        );
        Completion {
            seq: self.seq,
            result,
        }
    }

    async fn convert(&self) -> Result<String, ConversionError> {
        self.stage(ConversionStage::Reading);
        let data = read_base64(&self.path).await?;

        self.stage(ConversionStage::Initializing);
        let request = ConversionRequest::new(data, self.mime_type);

        self.stage(ConversionStage::Uploading);
        let markdown = self.client.convert(&request).await?;

        self.stage(ConversionStage::Generating);
        Ok(markdown)
    }
}

impl Completion {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn result(&self) -> &Result<String, ConversionError> {
        &self.result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::StubClient;
    use std::io::Write;

    fn pdf() -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        f.write_all(b"%PDF-1.4").unwrap();
        f
    }

    fn controller(client: StubClient) -> Controller {
        Controller::new(ViewerConfig::default(), Arc::new(client))
    }

    #[test]
    fn select_goes_in_flight_and_keeps_active() {
        let file = pdf();
        let mut c = controller(StubClient::returning("# A"));
        c.navigate("somewhere");

        let pending = c.select_file(file.path()).unwrap();

        assert_eq!(pending.seq(), 1);
        assert_eq!(c.processing().phase(), Phase::InFlight);
        assert_eq!(c.processing().progress(), 10);
        assert!(c.markdown().is_empty());
        assert!(c.outline().is_empty());
        assert_eq!(c.active_heading(), Some("somewhere"));
    }

    #[test]
    fn unsupported_file_changes_nothing() {
        let file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        let mut c = controller(StubClient::returning("# A"));
        assert!(matches!(
            c.select_file(file.path()),
            Err(DocumarkError::UnsupportedFormat { .. })
        ));
        assert_eq!(c.latest_seq(), 0);
        assert_eq!(c.processing().phase(), Phase::Idle);
    }

    #[tokio::test]
    async fn success_builds_outline() {
        let file = pdf();
        let mut c = controller(StubClient::returning("```markdown\n# Title\n\nSome text\n## Sub\n```"));

        let outcome = c.convert_file(file.path()).await.unwrap();

        assert_eq!(outcome, ApplyOutcome::Applied(Phase::Success));
        assert_eq!(c.processing().progress(), 100);
        assert_eq!(c.markdown(), "# Title\n\nSome text\n## Sub\n");
        let ids: Vec<_> = c.outline().iter().map(|h| h.id.as_str()).collect();
        assert_eq!(ids, vec!["title", "sub"]);
    }

    #[tokio::test]
    async fn blank_output_after_cleaning_is_empty_result() {
        let file = pdf();
        let mut c = controller(StubClient::returning("```\n\n```"));
        c.convert_file(file.path()).await.unwrap();
        assert_eq!(c.processing().error(), Some(&ConversionError::EmptyResult));
    }

    #[tokio::test]
    async fn navigate_after_success_scrolls() {
        let file = pdf();
        let mut c = controller(StubClient::returning("# One\n\n## Two\n"));
        c.convert_file(file.path()).await.unwrap();

        assert!(matches!(c.navigate("two"), NavigateOutcome::Scrolled(_)));
        assert_eq!(c.rendered().unwrap().scroll_count(), 1);
        assert_eq!(c.navigate("missing"), NavigateOutcome::NotFound);
        assert_eq!(c.active_heading(), Some("missing"));
        assert_eq!(c.rendered().unwrap().scroll_count(), 1);
    }

    #[tokio::test]
    async fn every_sidebar_entry_scrolls_for_decorated_headings() {
        let file = pdf();
        let md = "## Overview ##\n\n## See [docs](https://example.com)\n\n\
                  ## _Intro_\n\n## Fish &amp; Chips\n";
        let mut c = controller(StubClient::returning(md));
        c.convert_file(file.path()).await.unwrap();

        let ids: Vec<String> = c.outline().iter().map(|h| h.id.clone()).collect();
        assert_eq!(
            ids,
            vec!["overview-", "see-docshttpsexamplecom", "_intro_", "fish-amp-chips"]
        );
        for (n, id) in ids.iter().enumerate() {
            assert!(matches!(c.navigate(id), NavigateOutcome::Scrolled(_)), "'{id}'");
            assert_eq!(c.rendered().unwrap().scroll_count(), n + 1);
        }
    }

    #[tokio::test]
    async fn select_document_takes_a_loaded_document() {
        let file = pdf();
        let mut c = controller(StubClient::returning("# A"));
        let doc = SelectedDocument::load(file.path()).await.unwrap();

        let pending = c.select_document(doc);

        assert_eq!(pending.seq(), 1);
        assert_eq!(c.processing().phase(), Phase::InFlight);
        assert!(c.document().unwrap().preview().is_some());
        assert_eq!(c.apply(pending.run().await), ApplyOutcome::Applied(Phase::Success));
    }

    #[tokio::test]
    async fn close_releases_preview() {
        let file = pdf();
        let mut c = controller(StubClient::returning("# A"));
        c.convert_file(file.path()).await.unwrap();
        let preview = c.document().unwrap().preview().unwrap().path().to_path_buf();
        assert!(preview.exists());

        c.close();

        assert!(c.document().is_none());
        assert!(!preview.exists());
    }
}
