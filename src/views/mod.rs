//! Presentation views: pure renderers over controller state.
//!
//! The preview and result panes are enums describing *what* to show, built from state with a
//! `from_*` constructor, plus a `render_html` that turns it into markup.
//! Views never mutate state; clicks in the generated page are plain anchor
//! links handled by the browser.
//!
//! 1. [`preview`]: source document pane
//! 2. [`result`]: converted Markdown pane with copy/download toolbar
//! 3. [`sidebar`]: outline list
//! 4. [`markdown`]: Markdown rendering with heading anchors
//! 5. [`page`]: the three panes composed into one HTML document

pub mod markdown;
pub mod page;
pub mod preview;
pub mod result;
pub mod sidebar;

pub use markdown::{render_markdown, RenderedDocument};
pub use page::render_page;
pub use preview::PreviewPane;
pub use result::ResultPane;
pub use sidebar::Sidebar;

/// Human-readable byte size for info cards.
pub(crate) fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sizes() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.0 KB");
        assert_eq!(format_size(5 * 1024 * 1024 + 512 * 1024), "5.5 MB");
    }
}
