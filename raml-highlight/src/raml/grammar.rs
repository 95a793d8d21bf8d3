//! Grammar capability shared by every tokenizer.
//!
//!     Each grammar is a read-only capability bundle: it builds start states, copies them and
//!     scans one token at a time from a [StringStream], mutating only the state it is handed.
//!     Nothing else is shared, so one grammar value can serve any number of independent scans
//!     (grammars are `Send + Sync`, states are plain owned values).
//!
//!     Overlays are grammars too. [Overlaid] layers one over another, which is how the
//!     indentation and include-link passes are attached to whatever grammar is active.

mod overlay;

pub use overlay::{Overlaid, OverlaidState};

use crate::raml::stream::StringStream;
use crate::raml::style::Style;
use logos::Logos;
use std::fmt::Debug;

/// Describes where an embedded region ends.
///
/// Passed to [Grammar::start_state] so that grammars which care about the surrounding
/// document (the Markdown grammar measures indentation relative to it) receive the boundary
/// at construction time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Boundary {
    /// Indentation column at or below which the region is closed. `None` for top-level scans.
    pub column: Option<usize>,
}

impl Boundary {
    pub const fn none() -> Self {
        Boundary { column: None }
    }

    pub const fn at(column: usize) -> Self {
        Boundary {
            column: Some(column),
        }
    }
}

pub trait Grammar: Send + Sync {
    type State: Clone + Debug + PartialEq;

    /// Short identifier (`"yaml"`, `"json"`, ...).
    fn name(&self) -> &'static str;

    fn start_state(&self, boundary: Boundary) -> Self::State;

    /// Scans one token starting at the stream position and returns its class.
    ///
    /// Implementations must consume at least one character whenever the stream is not at the
    /// end of the line.
    fn token(&self, stream: &mut StringStream<'_>, state: &mut Self::State) -> Option<Style>;

    fn copy_state(&self, state: &Self::State) -> Self::State {
        state.clone()
    }

    /// Called by the host for empty lines, which never reach [Grammar::token].
    fn blank_line(&self, _state: &mut Self::State) {}
}

/// Forces one character of progress when a tokenizer returned without consuming anything.
pub(crate) fn ensure_progress(stream: &mut StringStream<'_>) {
    if stream.pos() <= stream.start() {
        stream.next_char();
    }
}

/// Lexes a single logos token at the stream position without consuming it.
///
/// Returns the token (or `None` when no rule matches) and its length in bytes. The length is
/// always at least one character so callers can advance safely.
pub(crate) fn peek_lexeme<'s, T>(stream: &StringStream<'s>) -> Option<(Option<T>, usize)>
where
    T: Logos<'s, Source = str>,
    T::Extras: Default,
{
    let rest: &'s str = stream.rest();
    let first = rest.chars().next()?;
    let mut lexer = T::lexer(rest);
    match lexer.next() {
        Some(Ok(token)) if lexer.span().end > 0 => Some((Some(token), lexer.span().end)),
        _ => Some((None, first.len_utf8())),
    }
}
