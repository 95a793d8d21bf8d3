//! Markdown tokenizer for `description: |` and `content: |` blocks.
//!
//!     The state is split in two layers:
//!
//!     Block layer ([BlockState]): what the current line is (header, quote, list item, fenced
//!     or indented code) and what carries over between lines (open fence, first content
//!     indentation). It is built from the [Boundary] of the embedding region so indentation is
//!     measured relative to where the region ends, not to column zero.
//!
//!     Inline layer ([InlineState]): open strong/emphasis spans and a pending link target,
//!     lexed with logos once the line prefix has been dealt with.

use crate::raml::grammar::{peek_lexeme, Boundary, Grammar};
use crate::raml::stream::StringStream;
use crate::raml::style::Style;
use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(#{1,6})(?:[ \t]+|$)").unwrap());
static FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(`{3,}|~{3,})").unwrap());
static RULE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:(?:\*[ \t]*){3,}|(?:-[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});
static LIST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[-*+]|[0-9]{1,9}[.)])(?:[ \t]+|$)").unwrap());

/// Columns of extra indentation that turn a line into an indented code block.
const CODE_INDENT: usize = 4;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum InlineToken {
    #[regex(r"[ \t]+")]
    Space,
    #[regex(r"\\.")]
    Escape,
    #[token("**")]
    #[token("__")]
    Strong,
    #[token("*")]
    #[token("_")]
    Emphasis,
    #[regex(r"`[^`]*`")]
    Code,
    #[regex(r"!?\[[^\]]*\]")]
    LinkText,
    #[regex(r"<[A-Za-z][A-Za-z0-9+.-]*:[^>\s]*>")]
    AutoLink,
    #[token("!")]
    #[token("<")]
    #[token("`")]
    #[token("[")]
    #[token("\\")]
    Punctuation,
    #[regex(r"[^ \t\\*_`\[<!]+")]
    Text,
}

const CODE: &str = "comment";
const LIST: Style = Style::new("variable-2");
const RULE_STYLE: Style = Style::new("hr");
const LINK: &str = "link";
const URL: Style = Style::new("string url");

#[derive(Debug, Clone, Copy, Default)]
pub struct MarkdownGrammar;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence {
    pub marker: char,
    pub len: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BlockState {
    /// Column at or below which the embedding document takes over.
    pub parent_indentation: usize,
    /// Indentation of the first content line, relative to `parent_indentation`.
    pub content_indent: Option<usize>,
    pub fence: Option<Fence>,
    /// `>` depth of the current line.
    pub quote: usize,
    /// Header level of the current line, 0 when not a header.
    pub header: usize,
    pub in_list: bool,
    indented_code: bool,
    prefix_done: bool,
    after_blank: bool,
    line_after_blank: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InlineState {
    pub strong: bool,
    pub em: bool,
    link_target_next: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MarkdownState {
    pub base: BlockState,
    pub inline: InlineState,
}

impl Grammar for MarkdownGrammar {
    type State = MarkdownState;

    fn name(&self) -> &'static str {
        "markdown"
    }

    fn start_state(&self, boundary: Boundary) -> MarkdownState {
        MarkdownState {
            base: BlockState {
                parent_indentation: boundary.column.unwrap_or(0),
                after_blank: true,
                ..BlockState::default()
            },
            inline: InlineState::default(),
        }
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut MarkdownState) -> Option<Style> {
        if stream.sol() {
            start_line(&mut state.base);
            if let Some(fence) = state.base.fence {
                stream.eat_space();
                if closes_fence(stream.rest(), fence) {
                    state.base.fence = None;
                }
                stream.skip_to_end();
                return Some(Style::new(CODE));
            }
        }
        if state.base.fence.is_some() || state.base.indented_code {
            stream.skip_to_end();
            return Some(Style::new(CODE));
        }

        if !state.base.prefix_done {
            if let Some(style) = block_prefix(stream, state) {
                return style;
            }
        }
        inline_token(stream, state)
    }

    fn blank_line(&self, state: &mut MarkdownState) {
        state.base.after_blank = true;
        state.inline = InlineState::default();
    }
}

fn start_line(base: &mut BlockState) {
    base.line_after_blank = std::mem::take(&mut base.after_blank);
    base.quote = 0;
    base.header = 0;
    base.indented_code = false;
    base.prefix_done = false;
}

fn closes_fence(rest: &str, fence: Fence) -> bool {
    let run = rest.chars().take_while(|&ch| ch == fence.marker).count();
    run >= fence.len && rest[run * fence.marker.len_utf8()..].trim().is_empty()
}

/// Handles the start of a line (indentation, quote markers, headers, fences, rules, list
/// markers). Returns `None` once the prefix is complete and inline scanning should take over.
fn block_prefix(stream: &mut StringStream<'_>, state: &mut MarkdownState) -> Option<Option<Style>> {
    let base = &mut state.base;

    if stream.eat_space() {
        if stream.eol() {
            base.after_blank = true;
        }
        return Some(None);
    }

    if base.quote == 0 {
        let indent = stream.column().saturating_sub(base.parent_indentation);
        let content_indent = *base.content_indent.get_or_insert(indent);
        if indent >= content_indent + CODE_INDENT && base.line_after_blank && !base.in_list {
            base.indented_code = true;
            stream.skip_to_end();
            return Some(Some(Style::new(CODE)));
        }
        if indent <= content_indent && !LIST_MARKER.is_match(stream.rest()) {
            base.in_list = false;
        }
    }

    if stream.eat('>') {
        base.quote += 1;
        stream.eat(' ');
        return Some(Some(quote_style(base.quote)));
    }

    base.prefix_done = true;

    if let Some(hashes) = stream.captures(&HEADER).and_then(|c| c.get(1)) {
        base.header = hashes.len();
        stream.advance(hashes.len());
        return Some(line_style(state, &[]));
    }
    if let Some(marker) = stream.captures(&FENCE).and_then(|c| c.get(1)) {
        let text = marker.as_str();
        base.fence = text.chars().next().map(|marker| Fence {
            marker,
            len: text.len(),
        });
        stream.skip_to_end();
        return Some(Some(Style::new(CODE)));
    }
    if stream.match_regex(&RULE, true).is_some() {
        return Some(Some(RULE_STYLE));
    }
    if stream.match_regex(&LIST_MARKER, true).is_some() {
        base.in_list = true;
        return Some(Some(LIST));
    }
    None
}

fn inline_token(stream: &mut StringStream<'_>, state: &mut MarkdownState) -> Option<Style> {
    if std::mem::take(&mut state.inline.link_target_next) && stream.peek() == Some('(') {
        if !stream.skip_to(')') {
            stream.skip_to_end();
        } else {
            stream.next_char();
        }
        return Some(URL);
    }

    let before = stream.line()[..stream.pos()].chars().next_back();
    let (token, len) = peek_lexeme::<InlineToken>(stream)?;
    stream.advance(len);
    let after = stream.peek();

    match token {
        Some(InlineToken::Strong) | Some(InlineToken::Emphasis)
            if stream.current().starts_with('_') && is_intraword(before, after) =>
        {
            line_style(state, &[])
        }
        Some(InlineToken::Strong) => {
            let opening = !state.inline.strong;
            state.inline.strong = true;
            let style = line_style(state, &[]);
            state.inline.strong = opening;
            style
        }
        Some(InlineToken::Emphasis) => {
            let opening = !state.inline.em;
            state.inline.em = true;
            let style = line_style(state, &[]);
            state.inline.em = opening;
            style
        }
        Some(InlineToken::Code) => line_style(state, &[CODE]),
        Some(InlineToken::LinkText) => {
            state.inline.link_target_next = true;
            line_style(state, &[LINK])
        }
        Some(InlineToken::AutoLink) => line_style(state, &[LINK]),
        Some(InlineToken::Space)
        | Some(InlineToken::Escape)
        | Some(InlineToken::Punctuation)
        | Some(InlineToken::Text)
        | None => line_style(state, &[]),
    }
}

fn is_intraword(before: Option<char>, after: Option<char>) -> bool {
    before.is_some_and(char::is_alphanumeric) && after.is_some_and(char::is_alphanumeric)
}

fn quote_style(depth: usize) -> Style {
    Style::owned(format!("quote quote-{}", (depth - 1) % 3 + 1))
}

/// Classes that apply to everything on the current line at the current inline position.
fn line_style(state: &MarkdownState, extra: &[&str]) -> Option<Style> {
    let header = (state.base.header > 0).then(|| format!("header header-{}", state.base.header));
    let quote = (state.base.quote > 0).then(|| quote_style(state.base.quote).to_string());
    let strong = if state.inline.strong { "strong" } else { "" };
    let em = if state.inline.em { "em" } else { "" };

    Style::join(
        header
            .as_deref()
            .into_iter()
            .chain(quote.as_deref())
            .chain([strong, em])
            .chain(extra.iter().copied()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raml::stream::DEFAULT_TAB_SIZE;

    fn scan(lines: &[&str]) -> (Vec<Vec<(String, Option<String>)>>, MarkdownState) {
        let grammar = MarkdownGrammar;
        let mut state = grammar.start_state(Boundary::at(0));
        let mut out = Vec::new();
        for line in lines {
            let mut tokens: Vec<(String, Option<String>)> = Vec::new();
            if line.is_empty() {
                grammar.blank_line(&mut state);
            }
            let mut stream = StringStream::new(line, DEFAULT_TAB_SIZE);
            while !stream.eol() {
                stream.begin_token();
                let style = grammar.token(&mut stream, &mut state).map(|s| s.to_string());
                match tokens.last_mut() {
                    Some(last) if last.1 == style => last.0.push_str(stream.current()),
                    _ => tokens.push((stream.current().to_string(), style)),
                }
            }
            out.push(tokens);
        }
        (out, state)
    }

    fn frag(text: &str, style: Option<&str>) -> (String, Option<String>) {
        (text.to_string(), style.map(str::to_string))
    }

    #[test]
    fn boundary_becomes_parent_indentation() {
        let state = MarkdownGrammar.start_state(Boundary::at(6));
        assert_eq!(state.base.parent_indentation, 6);
        assert_eq!(MarkdownGrammar.start_state(Boundary::none()).base.parent_indentation, 0);
    }

    #[test]
    fn header_styles_whole_line() {
        let (lines, _) = scan(&["  ## Usage notes"]);
        assert_eq!(
            lines[0],
            vec![frag("  ", None), frag("## Usage notes", Some("header header-2"))]
        );
    }

    #[test]
    fn strong_and_emphasis_spans() {
        let (lines, state) = scan(&["  a **bold** and *soft* end"]);
        assert_eq!(
            lines[0],
            vec![
                frag("  a ", None),
                frag("**bold**", Some("strong")),
                frag(" and ", None),
                frag("*soft*", Some("em")),
                frag(" end", None),
            ]
        );
        assert!(!state.inline.strong && !state.inline.em);
    }

    #[test]
    fn intraword_underscores_are_text() {
        let (lines, _) = scan(&["  use snake_case_names"]);
        assert_eq!(lines[0], vec![frag("  use snake_case_names", None)]);
    }

    #[test]
    fn links_and_targets() {
        let (lines, _) = scan(&["  see [the docs](http://x.io) or <https://y.io>"]);
        assert_eq!(lines[0][1], frag("[the docs]", Some("link")));
        assert_eq!(lines[0][2], frag("(http://x.io)", Some("string url")));
        assert_eq!(lines[0][4], frag("<https://y.io>", Some("link")));
    }

    #[test]
    fn fenced_code_spans_lines() {
        let (lines, state) = scan(&["  ```json", "  { \"a\": 1 }", "  ```", "  after"]);
        assert_eq!(lines[0], vec![frag("  ", None), frag("```json", Some("comment"))]);
        assert_eq!(lines[1], vec![frag("  { \"a\": 1 }", Some("comment"))]);
        assert_eq!(lines[2], vec![frag("  ```", Some("comment"))]);
        assert_eq!(lines[3], vec![frag("  after", None)]);
        assert_eq!(state.base.fence, None);
    }

    #[test]
    fn nested_quotes_and_list_markers() {
        let (lines, _) = scan(&["  > > quoted", "  - item"]);
        assert_eq!(lines[0][1], frag("> ", Some("quote quote-1")));
        assert_eq!(lines[0][2], frag("> quoted", Some("quote quote-2")));
        assert_eq!(lines[1][1], frag("- ", Some("variable-2")));
    }

    #[test]
    fn indented_code_needs_blank_line_before() {
        let (lines, _) = scan(&["  text", "", "        code()", "  more"]);
        assert_eq!(lines[2], vec![frag("        ", None), frag("code()", Some("comment"))]);
        assert_eq!(lines[3], vec![frag("  more", None)]);

        let (lines, _) = scan(&["  text", "        continued"]);
        assert_eq!(lines[1], vec![frag("        continued", None)]);
    }

    #[test]
    fn blank_line_closes_open_emphasis() {
        let (_, state) = scan(&["  **never closed", ""]);
        assert!(!state.inline.strong);
    }
}
