//! Main module for raml-highlight functionality

pub mod document;
pub mod grammar;
pub mod grammars;
pub mod links;
pub mod mode;
pub mod options;
pub mod overlays;
pub mod stream;
pub mod style;

pub use document::{highlight_line, Highlighter, StyledSpan};
pub use links::IncludeLink;
pub use mode::{Embedded, InnerMode, Mode, RamlMode, ScanState};
pub use options::ModeOptions;
pub use stream::StringStream;
pub use style::Style;
