//! Line cursor handed to every tokenizer.
//!
//!     A [StringStream] wraps exactly one line of source text (without its line terminator).
//!     Tokenizers are called repeatedly with the same stream; before each call the host marks
//!     the token start ([StringStream::begin_token]) and after the call everything between
//!     `start` and `pos` is the fragment the returned class applies to.
//!
//!     Positions are byte offsets and always sit on char boundaries. Columns are visual columns
//!     with tabs expanded to the configured tab size.

use regex::{Captures, Regex};

/// Default tab width used when expanding tabs into columns.
pub const DEFAULT_TAB_SIZE: usize = 4;

/// Visual column of byte offset `end` in `text`, expanding tabs.
pub fn count_column(text: &str, end: usize, tab_size: usize) -> usize {
    let end = end.min(text.len());
    let mut column = 0;
    for ch in text[..end].chars() {
        if ch == '\t' && tab_size > 0 {
            column += tab_size - (column % tab_size);
        } else {
            column += 1;
        }
    }
    column
}

#[derive(Debug, Clone)]
pub struct StringStream<'a> {
    line: &'a str,
    pos: usize,
    start: usize,
    tab_size: usize,
}

impl<'a> StringStream<'a> {
    pub fn new(line: &'a str, tab_size: usize) -> Self {
        Self {
            line,
            pos: 0,
            start: 0,
            tab_size,
        }
    }

    /// The whole line, regardless of the current position.
    pub fn line(&self) -> &'a str {
        self.line
    }

    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn tab_size(&self) -> usize {
        self.tab_size
    }

    /// Marks the current position as the start of the next token.
    pub fn begin_token(&mut self) {
        self.start = self.pos;
    }

    /// Moves the cursor to an absolute byte offset. Used by overlay composition to rewind
    /// a second tokenizer over the same fragment.
    pub(crate) fn set_pos(&mut self, pos: usize) {
        let mut pos = pos.min(self.line.len());
        while !self.line.is_char_boundary(pos) {
            pos -= 1;
        }
        self.pos = pos;
    }

    pub fn sol(&self) -> bool {
        self.pos == 0
    }

    pub fn eol(&self) -> bool {
        self.pos >= self.line.len()
    }

    /// Unconsumed remainder of the line.
    pub fn rest(&self) -> &'a str {
        &self.line[self.pos..]
    }

    /// Text of the token being scanned (from `start` to `pos`).
    pub fn current(&self) -> &'a str {
        &self.line[self.start..self.pos]
    }

    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    pub fn next_char(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += ch.len_utf8();
        Some(ch)
    }

    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    pub fn eat_if(&mut self, pred: impl Fn(char) -> bool) -> Option<char> {
        match self.peek() {
            Some(ch) if pred(ch) => {
                self.pos += ch.len_utf8();
                Some(ch)
            }
            _ => None,
        }
    }

    /// Consumes characters while `pred` holds. Returns whether anything was eaten.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> bool {
        let before = self.pos;
        while self.eat_if(&pred).is_some() {}
        self.pos > before
    }

    pub fn eat_space(&mut self) -> bool {
        self.eat_while(|ch| ch == ' ' || ch == '\t' || ch == '\u{a0}')
    }

    pub fn skip_to_end(&mut self) {
        self.pos = self.line.len();
    }

    /// Moves to the next occurrence of `ch` (not consuming it). Returns false, without
    /// moving, when `ch` does not occur in the rest of the line.
    pub fn skip_to(&mut self, ch: char) -> bool {
        match self.rest().find(ch) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => false,
        }
    }

    /// Moves the cursor back by `bytes`, never before the token start.
    pub fn back_up(&mut self, bytes: usize) {
        self.set_pos(self.pos.saturating_sub(bytes).max(self.start));
    }

    /// Consumes `bytes` bytes (clamped to the end of the line).
    pub fn advance(&mut self, bytes: usize) {
        self.set_pos(self.pos + bytes);
    }

    /// Visual column of the token start.
    pub fn column(&self) -> usize {
        count_column(self.line, self.start, self.tab_size)
    }

    /// Visual column of the first non-whitespace character, or the width of the line when
    /// the line is blank.
    pub fn indentation(&self) -> usize {
        let first = self
            .line
            .find(|ch: char| !ch.is_whitespace() && ch != '\u{a0}')
            .unwrap_or(self.line.len());
        count_column(self.line, first, self.tab_size)
    }

    /// Matches a literal at the cursor.
    pub fn match_str(&mut self, pattern: &str, consume: bool, case_insensitive: bool) -> bool {
        let rest = self.rest();
        let Some(candidate) = rest.get(..pattern.len()) else {
            return false;
        };
        let matched = if case_insensitive {
            candidate.eq_ignore_ascii_case(pattern)
        } else {
            candidate == pattern
        };
        if matched && consume {
            self.pos += pattern.len();
        }
        matched
    }

    /// Matches a regex anchored at the cursor, returning the matched length in bytes.
    pub fn match_regex(&mut self, re: &Regex, consume: bool) -> Option<usize> {
        let found = re.find(self.rest()).filter(|m| m.start() == 0)?;
        if consume {
            self.pos += found.end();
        }
        Some(found.end())
    }

    /// Captures of a regex anchored at the cursor. Never consumes.
    pub fn captures(&self, re: &Regex) -> Option<Captures<'a>> {
        let rest: &'a str = self.rest();
        re.captures(rest)
            .filter(|caps| caps.get(0).is_some_and(|m| m.start() == 0))
    }
}
