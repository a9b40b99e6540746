//! Element queries: the locator resolver.
//!
//! An [`ElementQuery`] is a declarative description of target elements:
//! a structural scope, a base CSS selector, zero or more substring text
//! filters (ANDed, case-sensitive), and an ordinal selector. It is a pure
//! value compiled to a JavaScript expression and re-evaluated against the
//! live DOM on every use — never cached, because the DOM mutates between
//! workflow steps.
//!
//! Resolution is a snapshot with no implicit waiting; callers that need
//! readiness go through [`crate::wait`] first. Zero matches is a normal
//! outcome, not an error.

use serde::{Deserialize, Serialize};

use crate::driver::{eval_json, UiDriver};
use crate::result::VerifyResult;

/// CSS selector for the left (source column) panel of the mapper view.
/// Layout class of the application under test.
pub const LEFT_PANEL_SELECTOR: &str = ".w-1\\/3";

/// CSS selector for the right (drop target) panel of the mapper view.
pub const RIGHT_PANEL_SELECTOR: &str = ".w-2\\/3";

/// Structural scope narrowing the search root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Scope {
    /// Search the whole document
    Anywhere,
    /// Search under the mapper's source-column panel
    LeftPanel,
    /// Search under the mapper's drop-target panel
    RightPanel,
    /// Search under an arbitrary CSS scope
    Css(String),
}

impl Scope {
    fn prefix(&self) -> &str {
        match self {
            Self::Anywhere => "",
            Self::LeftPanel => LEFT_PANEL_SELECTOR,
            Self::RightPanel => RIGHT_PANEL_SELECTOR,
            Self::Css(css) => css,
        }
    }
}

/// Ordinal selector picking one element from the filtered set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Ordinal {
    /// First match
    #[default]
    First,
    /// Last match
    Last,
    /// Match at index N
    Nth(usize),
}

/// Snapshot of one matched element, as observed at resolution time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// Position within the filtered match set
    pub index: usize,
    /// Lowercased tag name
    pub tag: String,
    /// Rendered text content
    pub text: String,
    /// Whether the element carries the `disabled` property
    pub disabled: bool,
    /// Value of the `class` attribute
    pub class_name: String,
    /// Bounding box x
    pub x: f64,
    /// Bounding box y
    pub y: f64,
    /// Bounding box width
    pub width: f64,
    /// Bounding box height
    pub height: f64,
}

impl ElementSnapshot {
    /// Vertical midpoint of the bounding box
    #[must_use]
    pub fn mid_height(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

/// A declarative, re-evaluated-on-demand description of target elements.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementQuery {
    scope: Scope,
    base: String,
    text_filters: Vec<String>,
    ordinal: Ordinal,
}

impl ElementQuery {
    /// Create a query over the whole document
    #[must_use]
    pub fn new(base: impl Into<String>) -> Self {
        Self::scoped(Scope::Anywhere, base)
    }

    /// Create a query under a structural scope
    #[must_use]
    pub fn scoped(scope: Scope, base: impl Into<String>) -> Self {
        Self {
            scope,
            base: base.into(),
            text_filters: Vec::new(),
            ordinal: Ordinal::First,
        }
    }

    /// Add a substring text filter (case-sensitive). Filters AND together.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text_filters.push(text.into());
        self
    }

    /// Pick the first match (the default)
    #[must_use]
    pub const fn first(mut self) -> Self {
        self.ordinal = Ordinal::First;
        self
    }

    /// Pick the last match
    #[must_use]
    pub const fn last(mut self) -> Self {
        self.ordinal = Ordinal::Last;
        self
    }

    /// Pick the match at index `n`
    #[must_use]
    pub const fn nth(mut self, n: usize) -> Self {
        self.ordinal = Ordinal::Nth(n);
        self
    }

    /// Get the ordinal selector
    #[must_use]
    pub const fn ordinal(&self) -> Ordinal {
        self.ordinal
    }

    fn scoped_selector(&self) -> String {
        let prefix = self.scope.prefix();
        if prefix.is_empty() {
            self.base.clone()
        } else {
            format!("{prefix} {}", self.base)
        }
    }

    /// JS expression evaluating to the array of matching elements.
    ///
    /// Re-embedded inside interaction scripts so that locate-and-act is a
    /// single atomic evaluation against the live DOM.
    #[must_use]
    pub fn to_match_js(&self) -> String {
        let mut js = format!(
            "Array.from(document.querySelectorAll({:?}))",
            self.scoped_selector()
        );
        for text in &self.text_filters {
            js.push_str(&format!(
                ".filter(el => (el.textContent || \"\").includes({text:?}))"
            ));
        }
        js
    }

    /// JS expression evaluating to the number of matching elements.
    #[must_use]
    pub fn to_count_js(&self) -> String {
        format!("{}.length", self.to_match_js())
    }

    /// JS expression evaluating to the ordinally-selected element, or null.
    #[must_use]
    pub fn to_pick_js(&self) -> String {
        let index = match self.ordinal {
            Ordinal::First => "0".to_string(),
            Ordinal::Last => "els.length - 1".to_string(),
            Ordinal::Nth(n) => n.to_string(),
        };
        format!(
            "(() => {{ const els = {matched}; if (els.length === 0) return null; \
             const i = {index}; return (i >= 0 && i < els.length) ? els[i] : null; }})()",
            matched = self.to_match_js()
        )
    }

    /// JS expression evaluating to an array of [`ElementSnapshot`] objects.
    #[must_use]
    pub fn to_snapshot_js(&self) -> String {
        format!(
            "(() => {{ const els = {matched}; return els.map((el, index) => {{ \
             const r = el.getBoundingClientRect(); \
             return {{ index, tag: el.tagName.toLowerCase(), text: el.textContent || \"\", \
             disabled: !!el.disabled, class_name: el.getAttribute(\"class\") || \"\", \
             x: r.x, y: r.y, width: r.width, height: r.height }}; }}); }})()",
            matched = self.to_match_js()
        )
    }

    /// Apply the ordinal selector to a resolved match set.
    #[must_use]
    pub fn select<'a>(&self, matches: &'a [ElementSnapshot]) -> Option<&'a ElementSnapshot> {
        if matches.is_empty() {
            return None;
        }
        let index = match self.ordinal {
            Ordinal::First => 0,
            Ordinal::Last => matches.len() - 1,
            Ordinal::Nth(n) => n,
        };
        matches.get(index)
    }
}

/// Resolve a query into the set of matching element snapshots, evaluated at
/// call time against the live DOM. An empty set is a normal outcome.
pub async fn resolve<D: UiDriver + ?Sized>(
    driver: &D,
    query: &ElementQuery,
) -> VerifyResult<Vec<ElementSnapshot>> {
    eval_json(driver, &query.to_snapshot_js()).await
}
