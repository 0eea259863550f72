//! The full viewer page: sidebar, preview and result side by side.

use super::{PreviewPane, ResultPane, Sidebar};
use crate::controller::Controller;
use html_escape::encode_text;

const STYLE: &str = r#"
html { scroll-behavior: smooth; }
body { margin: 0; display: flex; height: 100vh; font-family: system-ui, sans-serif; color: #1e293b; background: #f8fafc; }
.pane { display: flex; flex-direction: column; overflow: hidden; border-right: 1px solid #e2e8f0; }
.pane > header { padding: 12px 16px; font-weight: 600; border-bottom: 1px solid #e2e8f0; background: #fff; display: flex; justify-content: space-between; }
.pane-body { flex: 1; overflow: auto; padding: 16px; }
.sidebar { width: 260px; background: #fff; overflow-y: auto; }
.sidebar ul { list-style: none; margin: 0; padding: 8px 0; }
.sidebar a { display: block; padding-top: 4px; padding-bottom: 4px; color: #475569; text-decoration: none; font-size: 14px; border-left: 2px solid transparent; }
.sidebar a.h1 { font-weight: 600; color: #1e293b; }
.sidebar a.active { color: #4f46e5; background: #eef2ff; border-left-color: #4f46e5; }
.preview { flex: 1; }
.preview iframe.pdf { width: 100%; height: 100%; border: 0; }
.result { flex: 1; }
.markdown h1, .markdown h2, .markdown h3 { scroll-margin-top: 16px; }
.markdown table { border-collapse: collapse; }
.markdown td, .markdown th { border: 1px solid #cbd5e1; padding: 4px 8px; }
.placeholder, .meta { color: #94a3b8; }
.error { color: #b91c1c; }
.file-card { text-align: center; margin-top: 20%; }
button[disabled], a.button.disabled { opacity: .4; pointer-events: none; }
"#;

/// Render the current controller state as a standalone HTML document.
///
/// The page does not reference the preview snapshot: a PDF is inlined, so
/// the file stays viewable after the controller is gone. Reading the
/// snapshot blocks; async callers should wrap this in `block_in_place`.
pub fn render_page(controller: &Controller) -> String {
    let locale = controller.config().locale;
    let title = controller
        .document()
        .map(|d| format!("{} · documark", d.name()))
        .unwrap_or_else(|| "documark".to_string());

    let sidebar = Sidebar::new(
        controller.outline(),
        controller.active_heading(),
        controller.document().map(|d| d.name()),
    );
    let preview = PreviewPane::self_contained(controller.document());
    let result = ResultPane::from_state(controller.processing(), controller.rendered(), locale);

    format!(
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n<meta charset=\"utf-8\">\n\
         <title>{title}</title>\n<style>{STYLE}</style>\n</head>\n<body>\n{}\n{}\n{}\n</body>\n</html>\n",
        sidebar.render_html(),
        preview.render_html(),
        result.render_html(),
        lang = locale.html_lang(),
        title = encode_text(&title),
    )
}
