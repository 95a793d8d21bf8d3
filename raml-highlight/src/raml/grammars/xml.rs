//! XML tokenizer for `text/xml` bodies.
//!
//!     Text content is scanned by hand; the inside of a tag (names, attributes, values) is
//!     lexed with logos. Comments, CDATA sections, processing instructions and quoted attribute
//!     values may continue over several lines, so the current context is part of the state.

use crate::raml::grammar::{peek_lexeme, Boundary, Grammar};
use crate::raml::stream::StringStream;
use crate::raml::style::Style;
use logos::Logos;
use once_cell::sync::Lazy;
use regex::Regex;

static ENTITY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^&(?:#[0-9]+|#x[0-9a-fA-F]+|[A-Za-z][A-Za-z0-9]*);").unwrap());

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum TagToken {
    #[regex(r"[ \t\r]+")]
    Whitespace,
    #[token(">")]
    Close,
    #[token("/>")]
    SelfClose,
    #[token("=")]
    Equals,
    #[regex(r#""[^"]*""#)]
    #[regex(r#"'[^']*'"#)]
    Quoted,
    #[regex(r#""[^"]*"#)]
    OpenDoubleQuoted,
    #[regex(r#"'[^']*"#)]
    OpenSingleQuoted,
    #[regex(r"[A-Za-z_:][A-Za-z0-9_:.-]*")]
    Name,
}

const TAG: Style = Style::new("tag");
const TAG_BRACKET: Style = Style::new("tag bracket");
const TAG_ERROR: Style = Style::new("tag error");
const ATTRIBUTE: Style = Style::new("attribute");
const STRING: Style = Style::new("string");
const COMMENT: Style = Style::new("comment");
const META: Style = Style::new("meta");
const ATOM: Style = Style::new("atom");
const ERROR: Style = Style::new("error");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XmlContext {
    #[default]
    Text,
    /// After `<` or `</`, before the element name.
    TagName { closing: bool },
    /// After the element name, until `>` or `/>`.
    Attributes,
    /// Inside a quoted attribute value that did not close on its line.
    AttributeValue { quote: char },
    Comment,
    CData,
    Instruction,
    Doctype,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct XmlGrammar;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlState {
    pub context: XmlContext,
    /// Names of the currently open elements, innermost last.
    pub open_tags: Vec<String>,
}

impl Grammar for XmlGrammar {
    type State = XmlState;

    fn name(&self) -> &'static str {
        "xml"
    }

    fn start_state(&self, _boundary: Boundary) -> XmlState {
        XmlState::default()
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut XmlState) -> Option<Style> {
        match state.context {
            XmlContext::Text => text_token(stream, state),
            XmlContext::TagName { .. } | XmlContext::Attributes => tag_token(stream, state),
            XmlContext::AttributeValue { quote } => {
                if stream.skip_to(quote) {
                    stream.next_char();
                    state.context = XmlContext::Attributes;
                } else {
                    stream.skip_to_end();
                }
                Some(STRING)
            }
            XmlContext::Comment => Some(until(stream, state, "-->", COMMENT)),
            XmlContext::CData => Some(until(stream, state, "]]>", ATOM)),
            XmlContext::Instruction => Some(until(stream, state, "?>", META)),
            XmlContext::Doctype => Some(until(stream, state, ">", META)),
        }
    }
}

fn text_token(stream: &mut StringStream<'_>, state: &mut XmlState) -> Option<Style> {
    if stream.match_str("<!--", true, false) {
        state.context = XmlContext::Comment;
        return Some(until(stream, state, "-->", COMMENT));
    }
    if stream.match_str("<![CDATA[", true, false) {
        state.context = XmlContext::CData;
        return Some(until(stream, state, "]]>", ATOM));
    }
    if stream.match_str("<?", true, false) {
        state.context = XmlContext::Instruction;
        return Some(until(stream, state, "?>", META));
    }
    if stream.match_str("<!", true, false) {
        state.context = XmlContext::Doctype;
        return Some(until(stream, state, ">", META));
    }
    if stream.match_str("</", true, false) {
        state.context = XmlContext::TagName { closing: true };
        return Some(TAG_BRACKET);
    }
    if stream.eat('<') {
        state.context = XmlContext::TagName { closing: false };
        return Some(TAG_BRACKET);
    }
    if stream.peek() == Some('&') {
        if stream.match_regex(&ENTITY, true).is_some() {
            return Some(ATOM);
        }
        stream.next_char();
        return Some(ERROR);
    }
    stream.eat_while(|ch| ch != '<' && ch != '&');
    None
}

fn tag_token(stream: &mut StringStream<'_>, state: &mut XmlState) -> Option<Style> {
    let (token, len) = peek_lexeme::<TagToken>(stream)?;
    let text = &stream.rest()[..len];
    stream.advance(len);

    let Some(token) = token else {
        return Some(ERROR);
    };
    match token {
        TagToken::Whitespace | TagToken::Equals => None,
        TagToken::Name => match state.context {
            XmlContext::TagName { closing: false } => {
                state.open_tags.push(text.to_string());
                state.context = XmlContext::Attributes;
                Some(TAG)
            }
            XmlContext::TagName { closing: true } => {
                state.context = XmlContext::Attributes;
                if state.open_tags.last().map(String::as_str) == Some(text) {
                    state.open_tags.pop();
                    Some(TAG)
                } else {
                    Some(TAG_ERROR)
                }
            }
            _ => Some(ATTRIBUTE),
        },
        TagToken::Close => {
            state.context = XmlContext::Text;
            Some(TAG_BRACKET)
        }
        TagToken::SelfClose => {
            if state.context == XmlContext::Attributes {
                state.open_tags.pop();
            }
            state.context = XmlContext::Text;
            Some(TAG_BRACKET)
        }
        TagToken::Quoted => Some(STRING),
        TagToken::OpenDoubleQuoted => {
            state.context = XmlContext::AttributeValue { quote: '"' };
            Some(STRING)
        }
        TagToken::OpenSingleQuoted => {
            state.context = XmlContext::AttributeValue { quote: '\'' };
            Some(STRING)
        }
    }
}

/// Consumes through `terminator` (returning to text) or to the end of the line.
fn until(
    stream: &mut StringStream<'_>,
    state: &mut XmlState,
    terminator: &str,
    style: Style,
) -> Style {
    match stream.rest().find(terminator) {
        Some(offset) => {
            stream.advance(offset + terminator.len());
            state.context = XmlContext::Text;
        }
        None => stream.skip_to_end(),
    }
    style
}
