use crate::raml::grammar::{Boundary, Grammar};
use crate::raml::stream::StringStream;
use crate::raml::style::{classes, Style};

pub const DEFAULT_INCLUDE_MARKER: &str = "!include";

/// Finds the include marker anywhere on a line and classes everything after it.
///
/// The marker itself (and the whitespace after it) is left to the base grammar; the call that
/// follows the marker swallows the rest of the line as `include-link`.
#[derive(Debug, Clone)]
pub struct IncludeOverlay {
    marker: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IncludeState {
    pub found_marker: bool,
}

impl IncludeOverlay {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }
}

impl Default for IncludeOverlay {
    fn default() -> Self {
        Self::new(DEFAULT_INCLUDE_MARKER)
    }
}

impl Grammar for IncludeOverlay {
    type State = IncludeState;

    fn name(&self) -> &'static str {
        "include"
    }

    fn start_state(&self, _boundary: Boundary) -> IncludeState {
        IncludeState::default()
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut IncludeState) -> Option<Style> {
        if state.found_marker && stream.sol() {
            // A marker at the very end of the previous line has nothing to link.
            state.found_marker = false;
        }
        if state.found_marker {
            stream.skip_to_end();
            state.found_marker = false;
            return Some(classes::INCLUDE_LINK);
        }

        if !self.marker.is_empty() && stream.match_str(&self.marker, true, false) {
            stream.eat_space();
            state.found_marker = true;
            return None;
        }

        while stream.next_char().is_some() && !stream.match_str(&self.marker, false, false) {}
        None
    }

    fn blank_line(&self, state: &mut IncludeState) {
        state.found_marker = false;
    }
}
