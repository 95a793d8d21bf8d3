//! The RAML mode: a state machine switching between the primary YAML grammar and the
//! embedded grammars.
//!
//! # States
//!
//!     Primary                 Every call checks the line triggers ([LineFacts]). A matching
//!                             trigger arms an embedded region for the lines that follow; the
//!                             call itself is always scanned by the primary grammar.
//!     Embedded(grammar)       Three rules, in order:
//!                               1. `schema: |` / `example: |` lines are scanned by the primary
//!                                  grammar. The region stays open.
//!                               2. A non-blank line indented at or before the region boundary
//!                                  closes the region and is scanned as Primary (it may open a
//!                                  new region right away).
//!                               3. Otherwise the embedded grammar scans, with its indentation
//!                                  overlay cut off at the boundary.
//!
//! # Boundary
//!
//!     Fixed when the region opens: indentation of the opening line, plus the grammar's offset
//!     (0 for markdown, 2 for json and xml), plus one indent unit when the opening line is a
//!     `- ` sequence item.
//!
//! # Composition
//!
//!     Every grammar runs under the indentation overlay. The primary grammar additionally runs
//!     under the include overlay. The composed grammars are built once per [RamlMode]; the
//!     default table is shared process-wide ([RamlMode::shared]).

mod line_facts;

pub use line_facts::LineFacts;

use crate::raml::grammar::{Boundary, Grammar, Overlaid, OverlaidState};
use crate::raml::grammars::{
    JsonGrammar, JsonState, MarkdownGrammar, MarkdownState, XmlGrammar, XmlState, YamlGrammar,
    YamlState,
};
use crate::raml::options::ModeOptions;
use crate::raml::overlays::{IncludeOverlay, IncludeState, IndentationOverlay, IndentationState};
use crate::raml::stream::StringStream;
use crate::raml::style::Style;
use once_cell::sync::Lazy;
use tracing::{debug, trace};

type Indented<G> = Overlaid<G, IndentationOverlay>;
type PrimaryGrammar = Overlaid<Indented<YamlGrammar>, IncludeOverlay>;

pub type IndentedState<S> = OverlaidState<S, IndentationState>;
pub type PrimaryState = OverlaidState<IndentedState<YamlState>, IncludeState>;

static SHARED: Lazy<RamlMode> = Lazy::new(|| RamlMode::new(ModeOptions::default()));

/// The embedded grammars a region can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Embedded {
    /// XML, opened by `text/xml:`.
    Markup,
    /// JSON, opened by `application/json:`.
    StructuredData,
    /// Markdown, opened by `description: |` and `content: |`.
    Documentation,
}

impl Embedded {
    /// Columns added to the opening line's indentation to get the region boundary.
    pub fn offset(self) -> usize {
        match self {
            Embedded::Documentation => 0,
            Embedded::StructuredData | Embedded::Markup => 2,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Embedded::Markup => "xml",
            Embedded::StructuredData => "json",
            Embedded::Documentation => "markdown",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmbeddedState {
    Markup(IndentedState<XmlState>),
    StructuredData(IndentedState<JsonState>),
    Documentation(IndentedState<MarkdownState>),
}

impl EmbeddedState {
    pub fn grammar(&self) -> Embedded {
        match self {
            EmbeddedState::Markup(_) => Embedded::Markup,
            EmbeddedState::StructuredData(_) => Embedded::StructuredData,
            EmbeddedState::Documentation(_) => Embedded::Documentation,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EmbeddedRegion {
    /// Indentation column at or below which the region closes.
    pub boundary: usize,
    pub state: EmbeddedState,
}

impl EmbeddedRegion {
    pub fn grammar(&self) -> Embedded {
        self.state.grammar()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Primary,
    Embedded(EmbeddedRegion),
}

/// Everything the mode carries from one token call to the next.
///
/// The primary state is always present, also while a region is open, so the primary grammar
/// resumes where it left off once the region closes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScanState {
    pub mode: Mode,
    pub primary: PrimaryState,
}

impl ScanState {
    pub fn region(&self) -> Option<&EmbeddedRegion> {
        match &self.mode {
            Mode::Primary => None,
            Mode::Embedded(region) => Some(region),
        }
    }
}

/// The grammar and sub-state currently driving classification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InnerMode<'s> {
    Primary(&'s YamlState),
    Markup(&'s XmlState),
    StructuredData(&'s JsonState),
    Documentation(&'s MarkdownState),
}

impl InnerMode<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            InnerMode::Primary(_) => "yaml",
            InnerMode::Markup(_) => Embedded::Markup.name(),
            InnerMode::StructuredData(_) => Embedded::StructuredData.name(),
            InnerMode::Documentation(_) => Embedded::Documentation.name(),
        }
    }
}

/// Composed grammar table plus the options it was built with.
#[derive(Debug)]
pub struct RamlMode {
    options: ModeOptions,
    primary: PrimaryGrammar,
    markup: Indented<XmlGrammar>,
    structured_data: Indented<JsonGrammar>,
    documentation: Indented<MarkdownGrammar>,
}

impl RamlMode {
    pub fn new(options: ModeOptions) -> Self {
        let include = IncludeOverlay::new(options.include_marker.clone());
        Self {
            primary: Overlaid::new(Overlaid::new(YamlGrammar, IndentationOverlay), include),
            markup: Overlaid::new(XmlGrammar, IndentationOverlay),
            structured_data: Overlaid::new(JsonGrammar, IndentationOverlay),
            documentation: Overlaid::new(MarkdownGrammar, IndentationOverlay),
            options,
        }
    }

    /// The mode built with default options, constructed on first use.
    pub fn shared() -> &'static RamlMode {
        &SHARED
    }

    pub fn options(&self) -> &ModeOptions {
        &self.options
    }

    pub fn start_state(&self) -> ScanState {
        ScanState {
            mode: Mode::Primary,
            primary: self.primary.start_state(Boundary::none()),
        }
    }

    /// Independent copy of `state`; scanning the copy never affects the original.
    pub fn copy_state(&self, state: &ScanState) -> ScanState {
        let mode = match &state.mode {
            Mode::Primary => Mode::Primary,
            Mode::Embedded(region) => Mode::Embedded(EmbeddedRegion {
                boundary: region.boundary,
                state: match &region.state {
                    EmbeddedState::Markup(s) => EmbeddedState::Markup(self.markup.copy_state(s)),
                    EmbeddedState::StructuredData(s) => {
                        EmbeddedState::StructuredData(self.structured_data.copy_state(s))
                    }
                    EmbeddedState::Documentation(s) => {
                        EmbeddedState::Documentation(self.documentation.copy_state(s))
                    }
                },
            }),
        };
        ScanState {
            mode,
            primary: self.primary.copy_state(&state.primary),
        }
    }

    pub fn inner_mode<'s>(&self, state: &'s ScanState) -> InnerMode<'s> {
        match &state.mode {
            Mode::Primary => InnerMode::Primary(&state.primary.base.base),
            Mode::Embedded(region) => match &region.state {
                EmbeddedState::Markup(s) => InnerMode::Markup(&s.base),
                EmbeddedState::StructuredData(s) => InnerMode::StructuredData(&s.base),
                EmbeddedState::Documentation(s) => InnerMode::Documentation(&s.base),
            },
        }
    }

    pub fn token(&self, stream: &mut StringStream<'_>, state: &mut ScanState) -> Option<Style> {
        let facts = LineFacts::classify(stream.line());

        let Mode::Embedded(region) = &mut state.mode else {
            return self.primary_token(stream, state, &facts);
        };

        if facts.primary_block {
            trace!(
                grammar = region.grammar().name(),
                "block scalar inside region, scanning as primary"
            );
            return self.primary.token(stream, &mut state.primary);
        }

        if !facts.blank && stream.indentation() <= region.boundary {
            debug!(
                grammar = region.grammar().name(),
                boundary = region.boundary,
                "closing embedded region"
            );
            state.mode = Mode::Primary;
            return self.primary_token(stream, state, &facts);
        }

        self.embedded_token(stream, region)
    }

    /// Empty lines never reach [RamlMode::token]; the active grammar still gets to see them.
    pub fn blank_line(&self, state: &mut ScanState) {
        match &mut state.mode {
            Mode::Primary => self.primary.blank_line(&mut state.primary),
            Mode::Embedded(region) => match &mut region.state {
                EmbeddedState::Markup(s) => self.markup.blank_line(s),
                EmbeddedState::StructuredData(s) => self.structured_data.blank_line(s),
                EmbeddedState::Documentation(s) => self.documentation.blank_line(s),
            },
        }
    }

    fn primary_token(
        &self,
        stream: &mut StringStream<'_>,
        state: &mut ScanState,
        facts: &LineFacts,
    ) -> Option<Style> {
        if let Some(grammar) = facts.opens {
            let mut boundary = stream.indentation() + grammar.offset();
            if facts.sequence_item {
                boundary += self.options.indent_unit;
            }
            debug!(grammar = grammar.name(), boundary, "opening embedded region");
            state.mode = Mode::Embedded(EmbeddedRegion {
                boundary,
                state: self.start_embedded(grammar, boundary),
            });
        }
        self.primary.token(stream, &mut state.primary)
    }

    fn start_embedded(&self, grammar: Embedded, boundary: usize) -> EmbeddedState {
        let boundary = Boundary::at(boundary);
        match grammar {
            Embedded::Markup => EmbeddedState::Markup(self.markup.start_state(boundary)),
            Embedded::StructuredData => {
                EmbeddedState::StructuredData(self.structured_data.start_state(boundary))
            }
            Embedded::Documentation => {
                EmbeddedState::Documentation(self.documentation.start_state(boundary))
            }
        }
    }

    fn embedded_token(
        &self,
        stream: &mut StringStream<'_>,
        region: &mut EmbeddedRegion,
    ) -> Option<Style> {
        let cutoff = Some(region.boundary);
        match &mut region.state {
            EmbeddedState::Markup(s) => {
                s.overlay.cutoff = cutoff;
                self.markup.token(stream, s)
            }
            EmbeddedState::StructuredData(s) => {
                s.overlay.cutoff = cutoff;
                self.structured_data.token(stream, s)
            }
            EmbeddedState::Documentation(s) => {
                s.overlay.cutoff = cutoff;
                self.documentation.token(stream, s)
            }
        }
    }
}

impl Default for RamlMode {
    fn default() -> Self {
        Self::new(ModeOptions::default())
    }
}
