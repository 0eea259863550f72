//! Heading extraction: derive a navigable outline from generated Markdown.
//!
//! The outline is a flat, ordered list of level 1–3 ATX headings. It is a
//! pure function of the Markdown text, so the controller rebuilds it from
//! scratch on every new result instead of patching it.
//!
//! Matching is line-based on purpose: a `# line` inside a fenced code block
//! still counts, exactly like the sidebar has always behaved.

use crate::config::SlugPolicy;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One entry of the outline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Heading {
    /// 1, 2 or 3: the number of leading `#` markers.
    pub level: u8,
    /// Heading text with surrounding whitespace trimmed.
    pub text: String,
    /// Slug used to link the sidebar entry to the rendered heading.
    pub id: String,
}

/// Ordered sequence of headings, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Outline {
    headings: Vec<Heading>,
}

impl Outline {
    pub fn new(headings: Vec<Heading>) -> Self {
        Self { headings }
    }

    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    pub fn len(&self) -> usize {
        self.headings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Heading> {
        self.headings.iter()
    }

    /// First heading carrying `id`.
    pub fn find(&self, id: &str) -> Option<&Heading> {
        self.headings.iter().find(|h| h.id == id)
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.find(id).is_some()
    }
}

impl<'a> IntoIterator for &'a Outline {
    type Item = &'a Heading;
    type IntoIter = std::slice::Iter<'a, Heading>;

    fn into_iter(self) -> Self::IntoIter {
        self.headings.iter()
    }
}

// Bounded to 1–3 markers; a fourth `#` fails the mandatory whitespace.
static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,3})\s+(.+)$").unwrap());
static RE_WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());
static RE_NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w-]").unwrap());

/// Extract the outline with the default [`SlugPolicy::Raw`].
pub fn extract_outline(markdown: &str) -> Outline {
    extract_outline_with(markdown, SlugPolicy::Raw)
}

/// Extract the outline, assigning ids according to `policy`.
pub fn extract_outline_with(markdown: &str, policy: SlugPolicy) -> Outline {
    let headings = locate_headings(markdown, policy)
        .into_iter()
        .map(|(_, heading)| heading)
        .collect();
    Outline::new(headings)
}

/// Outline entries paired with the byte offset of the line they start on.
///
/// The renderer takes its heading ids from here, so a rendered heading
/// carries exactly the id of the sidebar entry for the same line.
pub(crate) fn locate_headings(markdown: &str, policy: SlugPolicy) -> Vec<(usize, Heading)> {
    let mut ids = SlugAllocator::new(policy);
    let mut found = Vec::new();
    let mut offset = 0;
    for raw in markdown.split_inclusive('\n') {
        let start = offset;
        offset += raw.len();
        let line = raw.strip_suffix('\n').unwrap_or(raw);
        let line = line.strip_suffix('\r').unwrap_or(line);
        let Some(caps) = RE_HEADING.captures(line) else {
            continue;
        };
        let text = caps[2].trim();
        if text.is_empty() {
            continue;
        }
        found.push((
            start,
            Heading {
                level: caps[1].len() as u8,
                text: text.to_string(),
                id: ids.allocate(text),
            },
        ));
    }
    found
}

/// Normalise heading text into an anchor id.
///
/// Lowercase, whitespace runs become one `-`, anything that is not a word
/// character or `-` is dropped. Word characters are Unicode-aware, so CJK
/// headings keep their text. Ids for non-ASCII headings therefore differ
/// from the ones the older browser viewer produced, whose word class was
/// ASCII-only; old `#anchor` links to such headings will not resolve.
///
/// ```rust
/// assert_eq!(documark::outline::slugify("Hello, World!"), "hello-world");
/// ```
pub fn slugify(text: &str) -> String {
    let lower = text.to_lowercase();
    let hyphenated = RE_WHITESPACE.replace_all(&lower, "-");
    RE_NON_SLUG.replace_all(&hyphenated, "").into_owned()
}

/// Hands out ids for a sequence of headings under a [`SlugPolicy`].
#[derive(Debug)]
struct SlugAllocator {
    policy: SlugPolicy,
    seen: HashMap<String, usize>,
}

impl SlugAllocator {
    fn new(policy: SlugPolicy) -> Self {
        Self {
            policy,
            seen: HashMap::new(),
        }
    }

    fn allocate(&mut self, text: &str) -> String {
        let base = slugify(text);
        match self.policy {
            SlugPolicy::Raw => base,
            SlugPolicy::Disambiguate => {
                let count = self.seen.entry(base.clone()).or_insert(0);
                let id = if *count == 0 {
                    base
                } else {
                    format!("{base}-{count}")
                };
                *count += 1;
                id
            }
        }
    }
}
