//! Document host: drives [RamlMode] over whole texts the way an editor does.
//!
//!     Each line is scanned with the state left by the line above. The state before every line
//!     is cached, so an edit only rescans from the edited line down, and stops as soon as a
//!     line ends in the same state with the same spans it had before.

use crate::raml::grammar::ensure_progress;
use crate::raml::mode::{RamlMode, ScanState};
use crate::raml::stream::{StringStream, DEFAULT_TAB_SIZE};
use crate::raml::style::Style;
use serde::Serialize;
use std::ops::Range;
use tracing::trace;

/// A classified byte range of one line. Adjacent fragments with the same style are merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSpan {
    pub start: usize,
    pub end: usize,
    pub style: Option<Style>,
}

/// Scans one line, advancing `state` past it.
///
/// Empty lines produce no spans and are reported to the mode through
/// [RamlMode::blank_line].
pub fn highlight_line(
    mode: &RamlMode,
    line: &str,
    state: &mut ScanState,
    tab_size: usize,
) -> Vec<StyledSpan> {
    let mut spans: Vec<StyledSpan> = Vec::new();
    if line.is_empty() {
        mode.blank_line(state);
        return spans;
    }

    let mut stream = StringStream::new(line, tab_size);
    while !stream.eol() {
        stream.begin_token();
        let style = mode.token(&mut stream, state);
        ensure_progress(&mut stream);
        match spans.last_mut() {
            Some(last) if last.style == style && last.end == stream.start() => {
                last.end = stream.pos()
            }
            _ => spans.push(StyledSpan {
                start: stream.start(),
                end: stream.pos(),
                style,
            }),
        }
    }
    spans
}

pub struct Highlighter<'m> {
    mode: &'m RamlMode,
    tab_size: usize,
    lines: Vec<String>,
    /// `states[i]` is the state before line `i`; the last entry is the state after the text.
    states: Vec<ScanState>,
    spans: Vec<Vec<StyledSpan>>,
}

impl<'m> Highlighter<'m> {
    pub fn new(mode: &'m RamlMode) -> Self {
        Self {
            mode,
            tab_size: DEFAULT_TAB_SIZE,
            lines: Vec::new(),
            states: vec![mode.start_state()],
            spans: Vec::new(),
        }
    }

    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self.rescan_from(0, self.lines.len());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.set_text(text);
        self
    }

    pub fn mode(&self) -> &'m RamlMode {
        self.mode
    }

    /// Replaces the whole document.
    pub fn set_text(&mut self, text: &str) {
        let lines: Vec<&str> = text.lines().collect();
        self.replace_lines(0..self.lines.len(), &lines);
    }

    /// Replaces `range` with `new_lines` and re-highlights. Returns how many lines were
    /// rescanned. Out-of-range bounds are clamped to the document.
    pub fn replace_lines(&mut self, range: Range<usize>, new_lines: &[&str]) -> usize {
        let mode = self.mode;
        let start = range.start.min(self.lines.len());
        let end = range.end.clamp(start, self.lines.len());

        self.lines
            .splice(start..end, new_lines.iter().map(|line| line.to_string()));
        self.spans
            .splice(start..end, new_lines.iter().map(|_| Vec::new()));
        self.states.splice(
            start + 1..end + 1,
            new_lines.iter().map(|_| mode.start_state()),
        );

        self.rescan_from(start, start + new_lines.len())
    }

    /// Replaces the text of one line. `None` when `index` is past the last line.
    pub fn edit_line(&mut self, index: usize, text: &str) -> Option<usize> {
        (index < self.lines.len()).then(|| self.replace_lines(index..index + 1, &[text]))
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }

    pub fn spans(&self, index: usize) -> Option<&[StyledSpan]> {
        self.spans.get(index).map(Vec::as_slice)
    }

    /// Text and style of every span of a line.
    pub fn fragments(&self, index: usize) -> Vec<(&str, Option<&Style>)> {
        let (Some(line), Some(spans)) = (self.lines.get(index), self.spans.get(index)) else {
            return Vec::new();
        };
        spans
            .iter()
            .map(|span| (&line[span.start..span.end], span.style.as_ref()))
            .collect()
    }

    /// A copy of the state the scan was in before line `index` (`index == line_count()` gives
    /// the state after the last line). Scanning the copy never touches the cache.
    pub fn state_before(&self, index: usize) -> Option<ScanState> {
        self.states
            .get(index)
            .map(|state| self.mode.copy_state(state))
    }

    /// Rescans from line `start`. Lines before `edited_end` are always rescanned; after that
    /// the scan stops at the first line whose result matches the cache.
    fn rescan_from(&mut self, start: usize, edited_end: usize) -> usize {
        let mode = self.mode;
        let mut state = mode.copy_state(&self.states[start]);
        let mut index = start;
        while index < self.lines.len() {
            let spans = highlight_line(mode, &self.lines[index], &mut state, self.tab_size);
            let converged = index >= edited_end
                && self.states[index + 1] == state
                && self.spans[index] == spans;
            self.spans[index] = spans;
            self.states[index + 1] = mode.copy_state(&state);
            index += 1;
            if converged {
                break;
            }
        }
        trace!(start, rescanned = index - start, "re-highlighted lines");
        index - start
    }
}
