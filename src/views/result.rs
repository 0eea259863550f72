//! Converted Markdown pane.

use super::markdown::RenderedDocument;
use crate::config::Locale;
use crate::state::ProcessingState;
use html_escape::encode_text;

/// What the result pane shows. Checked in this order: loading, error,
/// empty, rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultPane {
    Loading { progress: u8 },
    Failed { message: String },
    Empty,
    Rendered { html: String },
}

impl ResultPane {
    pub fn from_state(
        processing: &ProcessingState,
        rendered: Option<&RenderedDocument>,
        locale: Locale,
    ) -> Self {
        if processing.is_processing() {
            return Self::Loading {
                progress: processing.progress(),
            };
        }
        if let Some(message) = processing.error_message(locale) {
            return Self::Failed { message };
        }
        match rendered {
            Some(doc) if !doc.source().is_empty() => Self::Rendered {
                html: doc.html().to_string(),
            },
            _ => Self::Empty,
        }
    }

    /// Copy and download are only offered when there is a result.
    pub fn actions_enabled(&self) -> bool {
        matches!(self, Self::Rendered { .. })
    }

    pub fn render_html(&self) -> String {
        let disabled = if self.actions_enabled() { "" } else { " disabled" };
        let toolbar = format!(
            "<header>Result<span class=\"actions\">\
             <button id=\"copy\" title=\"Copy to clipboard\"{disabled}>Copy</button>\
             <a id=\"download\" class=\"button{disabled}\" download>Export</a>\
             </span></header>"
        );
        let body = match self {
            Self::Loading { progress } => {
                let pct = if *progress > 0 {
                    format!("<p class=\"meta\">{progress}% done</p>")
                } else {
                    String::new()
                };
                format!("<div class=\"overlay\"><p>Analysing document…</p>{pct}</div>")
            }
            Self::Failed { message } => format!(
                "<div class=\"error\"><p><strong>Analysis failed</strong></p><p>{}</p></div>",
                encode_text(message)
            ),
            Self::Empty => "<div class=\"placeholder\"><p>Waiting for a file…</p></div>".to_string(),
            Self::Rendered { html } => format!("<article class=\"markdown\">{html}</article>"),
        };
        format!(
            "<section class=\"pane result\">{toolbar}<div class=\"pane-body\">{body}</div></section>"
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SlugPolicy;
    use crate::error::ConversionError;
    use crate::views::markdown::render_markdown;

    #[test]
    fn loading_wins_over_everything() {
        let doc = render_markdown("# Old", SlugPolicy::Raw);
        let pane = ResultPane::from_state(&ProcessingState::in_flight(), Some(&doc), Locale::En);
        assert_eq!(pane, ResultPane::Loading { progress: 10 });
        assert!(pane.render_html().contains("10% done"));
        assert!(!pane.actions_enabled());
    }

    #[test]
    fn error_is_localized() {
        let state = ProcessingState::failed(ConversionError::PermissionDenied {
            detail: "bad key".into(),
        });
        let pane = ResultPane::from_state(&state, None, Locale::ZhCn);
        assert_eq!(
            pane,
            ResultPane::Failed {
                message: "权限被拒绝 (403)。请检查 API Key 是否有效。".into()
            }
        );
    }

    #[test]
    fn idle_without_markdown_is_empty() {
        let pane = ResultPane::from_state(&ProcessingState::idle(), None, Locale::En);
        assert_eq!(pane, ResultPane::Empty);
        assert!(pane.render_html().contains("disabled"));
    }

    #[test]
    fn rendered_enables_actions() {
        let doc = render_markdown("# Done\n", SlugPolicy::Raw);
        let pane = ResultPane::from_state(&ProcessingState::succeeded(), Some(&doc), Locale::En);
        assert!(pane.actions_enabled());
        let html = pane.render_html();
        assert!(html.contains(r#"<h1 id="done">Done</h1>"#));
        assert!(!html.contains("disabled"));
    }
}
