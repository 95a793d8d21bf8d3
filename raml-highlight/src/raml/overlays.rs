//! Annotation passes layered over the grammars.
//!
//!     indentation  Marks two-space indentation runs (`indent indent-col-N`) up to a cutoff.
//!     include      Marks the target of an include marker (`include-link`).

mod include;
mod indentation;

pub use include::{IncludeOverlay, IncludeState, DEFAULT_INCLUDE_MARKER};
pub use indentation::{IndentationOverlay, IndentationState};
