//! YAML tokenizer (the primary grammar).
//!
//!     Line-local and regex driven. The only cross-line memory is whether the previous key
//!     introduced a block literal (`key: |`), in which case every following line indented past
//!     that key is a `string`.

use crate::raml::grammar::{Boundary, Grammar};
use crate::raml::stream::StringStream;
use crate::raml::style::Style;
use once_cell::sync::Lazy;
use regex::Regex;

static QUOTED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:'(?:[^'\\]|\\.)*'?|"(?:[^"\\]|\\.)*"?)"#).unwrap());
static SEQUENCE_DASH: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-(?:\s+|$)").unwrap());
static BLOCK_INDICATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*[|>][-+0-9]*\s*").unwrap());
static ANCHOR_OR_ALIAS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*[&*][a-z0-9._-]+\b").unwrap());
static NUMBER_TO_EOL: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*-?[0-9.,]+\s?$").unwrap());
static NUMBER_IN_FLOW: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*-?[0-9.,]+\s?)[,}]").unwrap());
static KEYWORD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^(?:true|false|on|off|yes|no|null|~)\s*$").unwrap());
static KEY: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^(\s*(?:[,\[\]{}&*!|>'"%@`][^\s'":]|[^,\[\]{}#&*!|>'"%@`])[^#]*?)\s*:(?:\s|$)"#)
        .unwrap()
});
static PAIR_SEPARATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"^:\s*").unwrap());

const COMMENT: Style = Style::new("comment");
const STRING: Style = Style::new("string");
const DEF: Style = Style::new("def");
const META: Style = Style::new("meta");
const ATOM: Style = Style::new("atom");
const NUMBER: Style = Style::new("number");
const KEYWORD_STYLE: Style = Style::new("keyword");
const VARIABLE: Style = Style::new("variable-2");

#[derive(Debug, Clone, Copy, Default)]
pub struct YamlGrammar;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct YamlState {
    escaped: bool,
    /// Inside a block literal opened by `|` or `>`.
    pub literal: bool,
    /// Indentation of the key owning the current pair.
    pub key_col: usize,
    pair: bool,
    pair_start: bool,
    inline_pairs: usize,
    inline_list: usize,
}

impl Grammar for YamlGrammar {
    type State = YamlState;

    fn name(&self) -> &'static str {
        "yaml"
    }

    fn start_state(&self, _boundary: Boundary) -> YamlState {
        YamlState::default()
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut YamlState) -> Option<Style> {
        let ch = stream.peek();
        let escaped = std::mem::take(&mut state.escaped);

        if ch == Some('#') && preceded_by_space(stream) {
            stream.skip_to_end();
            return Some(COMMENT);
        }

        if stream.match_regex(&QUOTED, true).is_some() {
            return Some(STRING);
        }

        if state.literal {
            if stream.indentation() > state.key_col {
                stream.skip_to_end();
                return Some(STRING);
            }
            state.literal = false;
        }

        if stream.sol() {
            state.key_col = 0;
            state.pair = false;
            state.pair_start = false;
            if stream.match_str("---", true, false) || stream.match_str("...", true, false) {
                return Some(DEF);
            }
            if stream.match_regex(&SEQUENCE_DASH, true).is_some() {
                return Some(META);
            }
        }

        match ch {
            Some('{') => {
                stream.next_char();
                state.inline_pairs += 1;
                return Some(META);
            }
            Some('}') => {
                stream.next_char();
                state.inline_pairs = state.inline_pairs.saturating_sub(1);
                return Some(META);
            }
            Some('[') => {
                stream.next_char();
                state.inline_list += 1;
                return Some(META);
            }
            Some(']') => {
                stream.next_char();
                state.inline_list = state.inline_list.saturating_sub(1);
                return Some(META);
            }
            Some(',') if !escaped && state.inline_list > 0 => {
                stream.next_char();
                return Some(META);
            }
            Some(',') if !escaped && state.inline_pairs > 0 => {
                state.key_col = 0;
                state.pair = false;
                state.pair_start = false;
                stream.next_char();
                return Some(META);
            }
            _ => {}
        }

        if state.pair_start {
            if stream.match_regex(&BLOCK_INDICATOR, true).is_some() {
                state.literal = true;
                return Some(META);
            }
            if stream.match_regex(&ANCHOR_OR_ALIAS, true).is_some() {
                return Some(VARIABLE);
            }
            if state.inline_pairs == 0 && stream.match_regex(&NUMBER_TO_EOL, true).is_some() {
                return Some(NUMBER);
            }
            if state.inline_pairs > 0 {
                if let Some(number) = stream.captures(&NUMBER_IN_FLOW).and_then(|c| c.get(1)) {
                    stream.advance(number.end());
                    return Some(NUMBER);
                }
            }
            if stream.match_regex(&KEYWORD, true).is_some() {
                return Some(KEYWORD_STYLE);
            }
        }

        if !state.pair {
            if let Some(key) = stream.captures(&KEY).and_then(|c| c.get(1)) {
                stream.advance(key.end());
                state.pair = true;
                state.key_col = stream.indentation();
                return Some(ATOM);
            }
        }

        if state.pair && stream.match_regex(&PAIR_SEPARATOR, true).is_some() {
            state.pair_start = true;
            return Some(META);
        }

        state.pair_start = false;
        state.escaped = ch == Some('\\');
        stream.next_char();
        None
    }
}

fn preceded_by_space(stream: &StringStream<'_>) -> bool {
    stream.line()[..stream.pos()]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace)
}
