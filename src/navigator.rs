//! Outline navigation: turn a sidebar click into a scroll of the rendered
//! document.
//!
//! The navigator owns a single piece of state, the active heading id. The
//! thing being scrolled is abstracted behind [`DocumentView`] so the same
//! logic drives the HTML viewer, the terminal pager and test doubles.

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Location of a rendered heading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anchor {
    /// Element id, as attached to the rendered heading.
    pub id: String,
    /// Heading level, 1–3.
    pub level: u8,
    /// Byte offset of the heading in the Markdown source.
    pub offset: usize,
}

/// How a scroll is animated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScrollBehavior {
    #[default]
    Smooth,
    Instant,
}

/// A rendered document that can be searched by element id and scrolled.
pub trait DocumentView {
    /// First element carrying `id`, if any.
    fn locate(&self, id: &str) -> Option<Anchor>;

    /// Bring `anchor` into view.
    fn scroll_into_view(&mut self, anchor: &Anchor, behavior: ScrollBehavior);
}

/// Result of one [`Navigator::navigate`] call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigateOutcome {
    /// The element was found and one scroll was issued.
    Scrolled(Anchor),
    /// No element with that id is rendered; nothing scrolled.
    NotFound,
}

/// Tracks the active heading and dispatches scrolls.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    active: Option<String>,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id of the heading most recently navigated to.
    ///
    /// Not validated against the current outline: it survives new
    /// selections until the next navigation replaces it.
    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Record `id` as active, then scroll to it if it is rendered.
    ///
    /// Exactly one scroll is issued per call when the element exists; a
    /// missing element is a silent no-op apart from the active record.
    pub fn navigate(&mut self, id: &str, view: &mut dyn DocumentView) -> NavigateOutcome {
        self.active = Some(id.to_string());
        match view.locate(id) {
            Some(anchor) => {
                view.scroll_into_view(&anchor, ScrollBehavior::Smooth);
                NavigateOutcome::Scrolled(anchor)
            }
            None => {
                debug!("Navigate: no rendered element with id '{}'", id);
                NavigateOutcome::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakeView {
        anchors: Vec<Anchor>,
        scrolls: Vec<(String, ScrollBehavior)>,
    }

    impl DocumentView for FakeView {
        fn locate(&self, id: &str) -> Option<Anchor> {
            self.anchors.iter().find(|a| a.id == id).cloned()
        }

        fn scroll_into_view(&mut self, anchor: &Anchor, behavior: ScrollBehavior) {
            self.scrolls.push((anchor.id.clone(), behavior));
        }
    }

    fn anchor(id: &str, offset: usize) -> Anchor {
        Anchor {
            id: id.into(),
            level: 2,
            offset,
        }
    }

    #[test]
    fn scrolls_once_to_existing_anchor() {
        let mut view = FakeView {
            anchors: vec![anchor("intro", 0), anchor("usage", 40)],
            ..Default::default()
        };
        let mut nav = Navigator::new();

        let outcome = nav.navigate("usage", &mut view);

        assert_eq!(outcome, NavigateOutcome::Scrolled(anchor("usage", 40)));
        assert_eq!(nav.active(), Some("usage"));
        assert_eq!(view.scrolls, vec![("usage".to_string(), ScrollBehavior::Smooth)]);
    }

    #[test]
    fn missing_anchor_updates_active_without_scrolling() {
        let mut view = FakeView::default();
        let mut nav = Navigator::new();

        let outcome = nav.navigate("ghost", &mut view);

        assert_eq!(outcome, NavigateOutcome::NotFound);
        assert_eq!(nav.active(), Some("ghost"));
        assert!(view.scrolls.is_empty());
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let mut view = FakeView {
            anchors: vec![anchor("dup", 3), anchor("dup", 99)],
            ..Default::default()
        };
        let mut nav = Navigator::new();
        assert_eq!(
            nav.navigate("dup", &mut view),
            NavigateOutcome::Scrolled(anchor("dup", 3))
        );
    }

    #[test]
    fn repeated_navigation_scrolls_each_time() {
        let mut view = FakeView {
            anchors: vec![anchor("a", 0)],
            ..Default::default()
        };
        let mut nav = Navigator::new();
        nav.navigate("a", &mut view);
        nav.navigate("a", &mut view);
        assert_eq!(view.scrolls.len(), 2);
    }
}
