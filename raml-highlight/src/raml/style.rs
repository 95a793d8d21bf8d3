//! Classification vocabulary.
//!
//!     A [Style] is a space-separated list of classes, the same shape editors use for CSS
//!     class names (`"tag bracket"`, `"header header-2"`). Grammars return them as-is; the
//!     core only ever adds the indentation and include-link classes below.

use serde::Serialize;
use std::borrow::Cow;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Style(Cow<'static, str>);

impl Style {
    pub const fn new(classes: &'static str) -> Self {
        Style(Cow::Borrowed(classes))
    }

    pub fn owned(classes: String) -> Self {
        Style(Cow::Owned(classes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether `class` is one of the space-separated classes.
    pub fn has_class(&self, class: &str) -> bool {
        self.0.split_whitespace().any(|c| c == class)
    }

    /// Builds a style from several optional classes, skipping the empty ones.
    pub fn join<'c>(classes: impl IntoIterator<Item = &'c str>) -> Option<Style> {
        let joined = classes
            .into_iter()
            .filter(|c| !c.is_empty())
            .collect::<Vec<_>>()
            .join(" ");
        (!joined.is_empty()).then(|| Style::owned(joined))
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for Style {
    fn from(classes: &'static str) -> Self {
        Style::new(classes)
    }
}

/// Classes produced by the overlays.
pub mod classes {
    use super::Style;

    pub const INDENT: &str = "indent";
    pub const INDENT_INCOMPLETE: Style = Style::new("indent-incomplete");
    pub const INCLUDE_LINK: Style = Style::new("include-link");

    /// `indent indent-col-<column>` for a two-space run starting at `column`.
    pub fn indent_at(column: usize) -> Style {
        Style::owned(format!("{INDENT} indent-col-{column}"))
    }
}
