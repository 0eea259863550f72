//! Source document pane.

use super::format_size;
use crate::document::{PreviewHandle, SelectedDocument};
use html_escape::{encode_double_quoted_attribute, encode_text};
use tracing::warn;

/// Viewer parameters that hide the browser's PDF chrome.
const EMBED_FRAGMENT: &str = "#toolbar=0&navpanes=0";

/// What the preview pane shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewPane {
    /// Nothing selected yet.
    Empty,
    /// A PDF shown in an embedded viewer.
    Embedded { title: String, src: String },
    /// A type the browser cannot preview; show its details instead.
    FileCard {
        name: String,
        kind: String,
        size: Option<String>,
    },
}

impl PreviewPane {
    /// Pane for a live view: the embedded viewer points at the preview
    /// snapshot, which is only valid while the document is selected.
    pub fn from_document(document: Option<&SelectedDocument>) -> Self {
        Self::build(document, |handle| Ok(handle.url()))
    }

    /// Pane for a page written to disk: the PDF is inlined as a `data:`
    /// URI and does not depend on the snapshot surviving.
    pub fn self_contained(document: Option<&SelectedDocument>) -> Self {
        Self::build(document, PreviewHandle::data_url)
    }

    fn build(
        document: Option<&SelectedDocument>,
        source: impl FnOnce(&PreviewHandle) -> std::io::Result<String>,
    ) -> Self {
        let Some(doc) = document else {
            return Self::Empty;
        };
        if let Some(handle) = doc.preview().filter(|_| doc.kind().is_previewable()) {
            match source(handle) {
                Ok(src) => {
                    return Self::Embedded {
                        title: doc.name().to_string(),
                        src: format!("{src}{EMBED_FRAGMENT}"),
                    };
                }
                Err(e) => warn!("Cannot embed preview of '{}': {}", doc.name(), e),
            }
        }
        Self::FileCard {
            name: doc.name().to_string(),
            kind: doc.kind().to_string(),
            size: doc.size().map(format_size),
        }
    }

    pub fn render_html(&self) -> String {
        let body = match self {
            Self::Empty => r#"<div class="placeholder"><p>No document selected</p></div>"#.to_string(),
            Self::Embedded { title, src } => format!(
                r#"<iframe class="pdf" src="{}" title="{}"></iframe>"#,
                encode_double_quoted_attribute(src),
                encode_double_quoted_attribute(title),
            ),
            Self::FileCard { name, kind, size } => {
                let size = size
                    .as_deref()
                    .map(|s| format!("<p class=\"meta\">{}</p>", encode_text(s)))
                    .unwrap_or_default();
                format!(
                    "<div class=\"file-card\"><h3>{}</h3><p class=\"meta\">{}</p>{}\
                     <p>This file type cannot be previewed here.<br>\
                     Conversion is not affected.</p></div>",
                    encode_text(name),
                    encode_text(kind),
                    size,
                )
            }
        };
        format!(
            "<section class=\"pane preview\"><header>Original document</header>\
             <div class=\"pane-body\">{body}</div></section>"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_without_document() {
        let pane = PreviewPane::from_document(None);
        assert_eq!(pane, PreviewPane::Empty);
        assert!(pane.render_html().contains("No document selected"));
    }

    #[test]
    fn pdf_is_embedded() {
        let mut src = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        src.write_all(b"%PDF-1.4").unwrap();
        let doc = SelectedDocument::open(src.path()).unwrap();

        let pane = PreviewPane::from_document(Some(&doc));
        match &pane {
            PreviewPane::Embedded { src, .. } => {
                assert!(src.starts_with("file://"));
                assert!(src.ends_with(EMBED_FRAGMENT));
            }
            other => panic!("expected embedded preview, got {other:?}"),
        }
        assert!(pane.render_html().contains("<iframe"));
    }

    #[test]
    fn self_contained_pdf_is_inlined() {
        let mut src = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        src.write_all(b"%PDF").unwrap();
        let doc = SelectedDocument::open(src.path()).unwrap();

        let pane = PreviewPane::self_contained(Some(&doc));
        drop(doc);
        assert_eq!(
            pane,
            PreviewPane::Embedded {
                title: src.path().file_name().unwrap().to_string_lossy().into_owned(),
                src: format!("data:application/pdf;base64,JVBERg=={EMBED_FRAGMENT}"),
            }
        );
    }

    #[test]
    fn self_contained_word_still_gets_file_card() {
        let mut src = tempfile::Builder::new().suffix(".doc").tempfile().unwrap();
        src.write_all(b"word").unwrap();
        let doc = SelectedDocument::open(src.path()).unwrap();
        assert!(matches!(
            PreviewPane::self_contained(Some(&doc)),
            PreviewPane::FileCard { .. }
        ));
    }

    #[test]
    fn word_gets_file_card() {
        let mut src = tempfile::Builder::new().suffix(".docx").tempfile().unwrap();
        src.write_all(&[0u8; 2048]).unwrap();
        let doc = SelectedDocument::open(src.path()).unwrap();

        let pane = PreviewPane::from_document(Some(&doc));
        let html = pane.render_html();
        assert!(matches!(pane, PreviewPane::FileCard { .. }));
        assert!(html.contains("Word (.docx)"));
        assert!(html.contains("2.0 KB"));
        assert!(html.contains("Conversion is not affected"));
    }

    #[test]
    fn names_are_escaped() {
        let pane = PreviewPane::FileCard {
            name: "<script>.doc".into(),
            kind: "Word (.doc)".into(),
            size: None,
        };
        assert!(pane.render_html().contains("&lt;script&gt;.doc"));
    }
}
