use crate::raml::grammar::{Boundary, Grammar};
use crate::raml::stream::StringStream;
use crate::raml::style::{classes, Style};

#[derive(Debug, Clone, Copy, Default)]
pub struct IndentationOverlay;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndentationState {
    /// Last column at which an indentation run may start. Rewritten by the caller before every
    /// call; `None` classifies indentation at any depth.
    pub cutoff: Option<usize>,
}

impl Grammar for IndentationOverlay {
    type State = IndentationState;

    fn name(&self) -> &'static str {
        "indentation"
    }

    fn start_state(&self, _boundary: Boundary) -> IndentationState {
        IndentationState::default()
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut IndentationState) -> Option<Style> {
        let within_cutoff = match state.cutoff {
            None => true,
            Some(0) => false,
            Some(cutoff) => stream.column() <= cutoff,
        };
        if within_cutoff {
            if stream.match_str("  ", true, false) {
                return Some(classes::indent_at(stream.column()));
            }
            if stream.match_str(" ", true, false) {
                return Some(classes::INDENT_INCOMPLETE);
            }
        }
        stream.skip_to_end();
        None
    }
}
