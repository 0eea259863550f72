//! Outline sidebar.

use crate::outline::{Heading, Outline};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

const EMPTY_HINT: &str = "No outline detected yet. Upload and convert a file.";

/// Left-hand outline list with the active heading highlighted.
#[derive(Debug, Clone, Copy)]
pub struct Sidebar<'a> {
    outline: &'a Outline,
    active: Option<&'a str>,
    file_name: Option<&'a str>,
}

impl<'a> Sidebar<'a> {
    pub fn new(outline: &'a Outline, active: Option<&'a str>, file_name: Option<&'a str>) -> Self {
        Self {
            outline,
            active,
            file_name,
        }
    }

    /// Left padding in px for a heading level.
    pub fn indent_px(level: u8) -> u32 {
        (u32::from(level).saturating_sub(1)) * 12 + 8
    }

    fn is_active(&self, heading: &Heading) -> bool {
        self.active == Some(heading.id.as_str())
    }

    pub fn render_html(&self) -> String {
        let mut out = String::from("<nav class=\"pane sidebar\"><header>Outline</header>");
        if let Some(name) = self.file_name {
            let _ = write!(out, "<p class=\"meta\">{}</p>", encode_text(name));
        }
        if self.outline.is_empty() {
            let _ = write!(out, "<p class=\"placeholder\">{EMPTY_HINT}</p></nav>");
            return out;
        }
        out.push_str("<ul>");
        for heading in self.outline {
            let class = if self.is_active(heading) {
                format!("h{} active", heading.level)
            } else {
                format!("h{}", heading.level)
            };
            let _ = write!(
                out,
                "<li><a class=\"{class}\" href=\"#{}\" style=\"padding-left:{}px\">{}</a></li>",
                encode_double_quoted_attribute(&heading.id),
                Self::indent_px(heading.level),
                encode_text(&heading.text),
            );
        }
        out.push_str("</ul></nav>");
        out
    }

    /// Indented text listing for terminals; `*` marks the active entry.
    pub fn render_text(&self) -> String {
        if self.outline.is_empty() {
            return format!("{EMPTY_HINT}\n");
        }
        let mut out = String::new();
        for heading in self.outline {
            let marker = if self.is_active(heading) { '*' } else { ' ' };
            let indent = "  ".repeat(usize::from(heading.level.saturating_sub(1)));
            let _ = writeln!(out, "{marker} {indent}{}  #{}", heading.text, heading.id);
        }
        out
    }
}
