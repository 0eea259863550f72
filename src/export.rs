//! Copy and download of the converted Markdown.
//!
//! Both operations are no-ops when there is nothing to export, mirroring
//! the disabled toolbar buttons in the result pane.

use crate::document::markdown_file_name;
use crate::error::DocumarkError;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Destination for [`copy`].
pub trait Clipboard {
    fn set_text(&mut self, text: &str) -> Result<(), DocumarkError>;
}

/// The OS clipboard.
#[cfg(feature = "cli")]
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

#[cfg(feature = "cli")]
impl SystemClipboard {
    pub fn new() -> Result<Self, DocumarkError> {
        arboard::Clipboard::new()
            .map(|inner| Self { inner })
            .map_err(|e| DocumarkError::Clipboard(e.to_string()))
    }
}

#[cfg(feature = "cli")]
impl Clipboard for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), DocumarkError> {
        self.inner
            .set_text(text.to_string())
            .map_err(|e| DocumarkError::Clipboard(e.to_string()))
    }
}

/// In-process clipboard; holds the last text written.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: Option<String>,
}

impl MemoryClipboard {
    pub fn contents(&self) -> Option<&str> {
        self.contents.as_deref()
    }
}

impl Clipboard for MemoryClipboard {
    fn set_text(&mut self, text: &str) -> Result<(), DocumarkError> {
        self.contents = Some(text.to_string());
        Ok(())
    }
}

/// What an export call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExportOutcome {
    /// Markdown placed on the clipboard.
    Copied { bytes: usize },
    /// Markdown written to this path.
    Written(PathBuf),
    /// No Markdown to export; nothing happened.
    Skipped,
}

/// Put `markdown` on the clipboard.
pub fn copy(markdown: &str, clipboard: &mut dyn Clipboard) -> Result<ExportOutcome, DocumarkError> {
    if markdown.is_empty() {
        debug!("Copy skipped: no markdown");
        return Ok(ExportOutcome::Skipped);
    }
    clipboard.set_text(markdown)?;
    info!("Copied {} bytes of markdown", markdown.len());
    Ok(ExportOutcome::Copied {
        bytes: markdown.len(),
    })
}

/// Write `markdown` to `dir/<stem>.md`, named after the source file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn download(
    markdown: &str,
    source_name: Option<&str>,
    dir: &Path,
) -> Result<ExportOutcome, DocumarkError> {
    if markdown.is_empty() {
        debug!("Download skipped: no markdown");
        return Ok(ExportOutcome::Skipped);
    }
    let path = dir.join(markdown_file_name(source_name));
    let write_err = |source| DocumarkError::OutputWriteFailed {
        path: path.clone(),
        source,
    };

    tokio::fs::create_dir_all(dir).await.map_err(write_err)?;
    let tmp_path = path.with_extension("md.tmp");
    tokio::fs::write(&tmp_path, markdown)
        .await
        .map_err(write_err)?;
    if let Err(e) = tokio::fs::rename(&tmp_path, &path).await {
        if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
            warn!("Could not remove {}: {}", tmp_path.display(), cleanup);
        }
        return Err(write_err(e));
    }

    info!("Wrote {}", path.display());
    Ok(ExportOutcome::Written(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_without_markdown_is_noop() {
        let mut clip = MemoryClipboard::default();
        assert_eq!(copy("", &mut clip).unwrap(), ExportOutcome::Skipped);
        assert_eq!(clip.contents(), None);
    }

    #[test]
    fn copy_sets_clipboard() {
        let mut clip = MemoryClipboard::default();
        let out = copy("# Hi\n", &mut clip).unwrap();
        assert_eq!(out, ExportOutcome::Copied { bytes: 5 });
        assert_eq!(clip.contents(), Some("# Hi\n"));
    }

    #[tokio::test]
    async fn download_without_markdown_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let out = download("", Some("a.pdf"), dir.path()).await.unwrap();
        assert_eq!(out, ExportOutcome::Skipped);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn download_names_after_source() {
        let dir = tempfile::tempdir().unwrap();
        let out = download("# Report\n", Some("Q3 report.v2.pdf"), dir.path())
            .await
            .unwrap();
        let expected = dir.path().join("Q3 report.v2.md");
        assert_eq!(out, ExportOutcome::Written(expected.clone()));
        assert_eq!(std::fs::read_to_string(&expected).unwrap(), "# Report\n");
        assert!(!dir.path().join("Q3 report.v2.md.tmp").exists());
    }

    #[tokio::test]
    async fn failed_rename_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        // A non-empty directory where the output file should go.
        let blocker = dir.path().join("report.md");
        std::fs::create_dir(&blocker).unwrap();
        std::fs::write(blocker.join("keep.txt"), "x").unwrap();

        let err = download("# Report\n", Some("report.pdf"), dir.path())
            .await
            .unwrap_err();

        assert!(matches!(err, DocumarkError::OutputWriteFailed { ref path, .. } if *path == blocker));
        assert!(!dir.path().join("report.md.tmp").exists());
        assert!(blocker.join("keep.txt").exists());
    }

    #[tokio::test]
    async fn download_defaults_to_document_md() {
        let dir = tempfile::tempdir().unwrap();
        download("x", None, dir.path()).await.unwrap();
        assert!(dir.path().join("document.md").exists());
    }
}
