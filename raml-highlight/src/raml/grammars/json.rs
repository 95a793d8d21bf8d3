//! JSON tokenizer for `application/json` bodies.
//!
//!     Lexing is done by logos one token at a time from the stream position. The state only
//!     remembers the open brackets so that stray closers can be flagged.

use crate::raml::grammar::{peek_lexeme, Boundary, Grammar};
use crate::raml::stream::StringStream;
use crate::raml::style::Style;
use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum JsonToken {
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[token("{")]
    OpenBrace,
    #[token("}")]
    CloseBrace,
    #[token("[")]
    OpenBracket,
    #[token("]")]
    CloseBracket,
    #[token(":")]
    Colon,
    #[token(",")]
    Comma,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,
    // Strings cannot span lines; an unclosed one runs to the end of the line.
    #[regex(r#""([^"\\]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"-?[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?")]
    Number,

    #[token("true")]
    #[token("false")]
    #[token("null")]
    Literal,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Word,
}

const STRING: Style = Style::new("string");
const PROPERTY: Style = Style::new("string property");
const NUMBER: Style = Style::new("number");
const ATOM: Style = Style::new("atom");
const BRACKET: Style = Style::new("bracket");
const VARIABLE: Style = Style::new("variable");
const ERROR: Style = Style::new("error");

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonGrammar;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct JsonState {
    /// Currently open `{` and `[`, innermost last.
    pub nesting: Vec<char>,
}

impl Grammar for JsonGrammar {
    type State = JsonState;

    fn name(&self) -> &'static str {
        "json"
    }

    fn start_state(&self, _boundary: Boundary) -> JsonState {
        JsonState::default()
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut JsonState) -> Option<Style> {
        let (token, len) = peek_lexeme::<JsonToken>(stream)?;
        stream.advance(len);

        match token? {
            JsonToken::Whitespace | JsonToken::Colon | JsonToken::Comma => None,
            JsonToken::OpenBrace => {
                state.nesting.push('{');
                Some(BRACKET)
            }
            JsonToken::OpenBracket => {
                state.nesting.push('[');
                Some(BRACKET)
            }
            JsonToken::CloseBrace => Some(close(state, '{')),
            JsonToken::CloseBracket => Some(close(state, '[')),
            JsonToken::String => {
                if state.nesting.last() == Some(&'{') && stream.rest().trim_start().starts_with(':')
                {
                    Some(PROPERTY)
                } else {
                    Some(STRING)
                }
            }
            JsonToken::UnterminatedString => Some(STRING),
            JsonToken::Number => Some(NUMBER),
            JsonToken::Literal => Some(ATOM),
            JsonToken::Word => Some(VARIABLE),
        }
    }
}

fn close(state: &mut JsonState, opener: char) -> Style {
    if state.nesting.last() == Some(&opener) {
        state.nesting.pop();
        BRACKET
    } else {
        ERROR
    }
}
