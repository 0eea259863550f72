//! Selected documents: type detection, the preview handle and byte loading.
//!
//! ## Why a preview snapshot?
//!
//! The preview pane needs a same-origin reference to the selected file that
//! lives exactly as long as the selection. A [`PreviewHandle`] copies the
//! file into a temp file and deletes it when dropped, whether that happens
//! on a new selection, on controller teardown or while unwinding.

use crate::error::{ConversionError, DocumarkError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

/// The document types accepted by the file input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Docx,
    Doc,
}

impl DocumentKind {
    /// Detect the kind from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            "doc" => Some(Self::Doc),
            _ => None,
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Docx => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Self::Doc => "application/msword",
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Doc => "doc",
        }
    }

    /// Only PDFs get an embedded viewer; Word files get an info card.
    pub fn is_previewable(self) -> bool {
        matches!(self, Self::Pdf)
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word (.docx)",
            Self::Doc => "Word (.doc)",
        };
        f.write_str(s)
    }
}

/// Transient local copy of the selected file, deleted on drop.
#[derive(Debug)]
pub struct PreviewHandle {
    file: NamedTempFile,
    kind: DocumentKind,
}

impl PreviewHandle {
    /// Snapshot `source` into a fresh temp file with the same extension.
    ///
    /// Blocking; async callers go through [`SelectedDocument::load`].
    pub fn acquire(source: &Path, kind: DocumentKind) -> std::io::Result<Self> {
        let file = tempfile::Builder::new()
            .prefix("documark-preview-")
            .suffix(&format!(".{}", kind.extension()))
            .tempfile()?;
        std::fs::copy(source, file.path())?;
        debug!("Preview snapshot: {}", file.path().display());
        Ok(Self { file, kind })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// `file://` URL of the snapshot, for embedding in the viewer page.
    pub fn url(&self) -> String {
        let p = self.file.path().to_string_lossy().replace('\\', "/");
        if p.starts_with('/') {
            format!("file://{p}")
        } else {
            format!("file:///{p}")
        }
    }

    /// The snapshot inlined as a `data:` URI.
    ///
    /// Unlike [`url`](Self::url) this stays valid after the handle is
    /// dropped, so it is what pages written to disk embed.
    pub fn data_url(&self) -> std::io::Result<String> {
        let bytes = std::fs::read(self.file.path())?;
        Ok(format!(
            "data:{};base64,{}",
            self.kind.mime_type(),
            STANDARD.encode(&bytes)
        ))
    }
}

/// The file the user picked, plus its preview handle.
#[derive(Debug)]
pub struct SelectedDocument {
    path: PathBuf,
    name: String,
    kind: DocumentKind,
    size: Option<u64>,
    preview: Option<PreviewHandle>,
}

impl SelectedDocument {
    /// Accept `path` if it has a supported extension and take a preview
    /// snapshot.
    ///
    /// A file that cannot be snapshotted is still accepted without a
    /// preview; the read failure surfaces through the conversion itself.
    /// This copies the file on the calling thread; use [`load`](Self::load)
    /// from async code.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, DocumarkError> {
        let path = path.into();
        let kind = accepted_kind(&path)?;
        let size = std::fs::metadata(&path).ok().map(|m| m.len());
        let preview = PreviewHandle::acquire(&path, kind);
        Ok(Self::assemble(path, kind, size, preview))
    }

    /// [`open`](Self::open) for async callers: the snapshot copy runs on
    /// the blocking pool.
    pub async fn load(path: impl Into<PathBuf>) -> Result<Self, DocumarkError> {
        let path = path.into();
        let kind = accepted_kind(&path)?;
        let size = tokio::fs::metadata(&path).await.ok().map(|m| m.len());
        let source = path.clone();
        let preview = tokio::task::spawn_blocking(move || PreviewHandle::acquire(&source, kind))
            .await
            .unwrap_or_else(|e| Err(std::io::Error::other(format!("Snapshot task panicked: {e}"))));
        Ok(Self::assemble(path, kind, size, preview))
    }

    fn assemble(
        path: PathBuf,
        kind: DocumentKind,
        size: Option<u64>,
        preview: std::io::Result<PreviewHandle>,
    ) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let preview = match preview {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!("No preview for '{}': {}", path.display(), e);
                None
            }
        };
        Self {
            path,
            name,
            kind,
            size,
            preview,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// File name as selected, e.g. `report.pdf`.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Size in bytes at selection time, when it could be read.
    pub fn size(&self) -> Option<u64> {
        self.size
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }
}

fn accepted_kind(path: &Path) -> Result<DocumentKind, DocumarkError> {
    DocumentKind::from_path(path).ok_or_else(|| DocumarkError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

/// Read a file and base64-encode it for the conversion request.
pub async fn read_base64(path: &Path) -> Result<String, ConversionError> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| ConversionError::LocalReadFailure {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
    let b64 = STANDARD.encode(&bytes);
    debug!("Encoded {} bytes → {} bytes base64", bytes.len(), b64.len());
    Ok(b64)
}

/// Name for the exported Markdown: the source name with its last extension
/// replaced by `.md`, or `document.md` when nothing is left of the name.
pub fn markdown_file_name(source_name: Option<&str>) -> String {
    let stem = source_name
        .map(|n| match n.rfind('.') {
            Some(i) if i + 1 < n.len() => &n[..i],
            _ => n,
        })
        .filter(|s| !s.is_empty())
        .unwrap_or("document");
    format!("{stem}.md")
}
