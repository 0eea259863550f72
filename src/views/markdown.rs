//! Markdown → HTML with navigable heading ids.
//!
//! `pulldown-cmark` does the rendering; this module only walks its event
//! stream to stamp an `id` on h1–h3. Ids are not derived from the rendered
//! text: each heading takes the id the outline extractor assigned to its
//! source line, so every sidebar link names a rendered heading. Headings
//! the extractor does not list (setext, indented, nested in quotes or
//! lists) render without an id.

use crate::config::SlugPolicy;
use crate::navigator::{Anchor, DocumentView, ScrollBehavior};
use crate::outline::locate_headings;
use pulldown_cmark::{html, Event, HeadingLevel, Options, Parser, Tag};
use std::collections::HashMap;
use tracing::debug;

/// Rendered Markdown plus the anchors it exposes and a scroll position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    source: String,
    html: String,
    anchors: Vec<Anchor>,
    viewport: usize,
    scrolls: usize,
}

impl RenderedDocument {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    /// Anchors in document order; ids may repeat under [`SlugPolicy::Raw`].
    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    /// Byte offset of the top of the viewport in the Markdown source.
    pub fn viewport(&self) -> usize {
        self.viewport
    }

    /// Number of scrolls performed so far.
    pub fn scroll_count(&self) -> usize {
        self.scrolls
    }

    /// Markdown from the viewport to the end of the document.
    pub fn visible_source(&self) -> &str {
        self.source.get(self.viewport..).unwrap_or("")
    }

    /// Markdown of the section starting at the viewport, up to the next
    /// anchor of the same or a higher level.
    pub fn visible_section(&self) -> &str {
        let Some(current) = self.anchors.iter().find(|a| a.offset == self.viewport) else {
            return self.visible_source();
        };
        let end = self
            .anchors
            .iter()
            .find(|a| a.offset > current.offset && a.level <= current.level)
            .map(|a| a.offset)
            .unwrap_or(self.source.len());
        &self.source[current.offset..end]
    }
}

impl DocumentView for RenderedDocument {
    fn locate(&self, id: &str) -> Option<Anchor> {
        self.anchors.iter().find(|a| a.id == id).cloned()
    }

    fn scroll_into_view(&mut self, anchor: &Anchor, behavior: ScrollBehavior) {
        debug!("Scroll ({:?}) to '{}' at {}", behavior, anchor.id, anchor.offset);
        self.viewport = anchor.offset;
        self.scrolls += 1;
    }
}

fn outline_level(level: HeadingLevel) -> Option<u8> {
    match level {
        HeadingLevel::H1 => Some(1),
        HeadingLevel::H2 => Some(2),
        HeadingLevel::H3 => Some(3),
        _ => None,
    }
}

/// Render `source` to HTML, attaching ids to h1–h3.
pub fn render_markdown(source: &str, policy: SlugPolicy) -> RenderedDocument {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);
    options.insert(Options::ENABLE_FOOTNOTES);

    let ids: HashMap<usize, String> = locate_headings(source, policy)
        .into_iter()
        .map(|(line_start, heading)| (line_start, heading.id))
        .collect();

    let mut events: Vec<Event<'_>> = Vec::with_capacity(source.len() / 8);
    let mut anchors = Vec::new();

    for (event, range) in Parser::new_ext(source, options).into_offset_iter() {
        let event = match event {
            Event::Start(Tag::Heading {
                level,
                id: _,
                classes,
                attrs,
            }) => {
                let line_start = source[..range.start].rfind('\n').map_or(0, |i| i + 1);
                let id = outline_level(level)
                    .and_then(|lvl| ids.get(&line_start).map(|id| (lvl, id.clone())));
                match id {
                    Some((lvl, id)) => {
                        anchors.push(Anchor {
                            id: id.clone(),
                            level: lvl,
                            offset: range.start,
                        });
                        Event::Start(Tag::Heading {
                            level,
                            id: Some(id.into()),
                            classes,
                            attrs,
                        })
                    }
                    None => Event::Start(Tag::Heading {
                        level,
                        id: None,
                        classes,
                        attrs,
                    }),
                }
            }
            other => other,
        };
        events.push(event);
    }

    let mut out = String::with_capacity(source.len() * 3 / 2);
    html::push_html(&mut out, events.into_iter());

    RenderedDocument {
        source: source.to_string(),
        html: out,
        anchors,
        viewport: 0,
        scrolls: 0,
    }
}
