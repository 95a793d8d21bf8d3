//! Renderings of a highlighted document.

use raml_highlight::raml::{Highlighter, Style};
use serde::Serialize;
use std::fmt::Write;

pub const FORMATS: &[(&str, &str)] = &[
    ("token-json", "Every line with its classified fragments, as JSON"),
    ("token-simple", "The source text with [class]fragment[/] markers"),
    ("links", "Include targets, resolved against the file's directory"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    TokenJson,
    TokenSimple,
    Links,
}

impl Format {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "token-json" => Some(Format::TokenJson),
            "token-simple" => Some(Format::TokenSimple),
            "links" => Some(Format::Links),
            _ => None,
        }
    }
}

#[derive(Serialize)]
struct LineTokens<'a> {
    line: usize,
    tokens: Vec<Token<'a>>,
}

#[derive(Serialize)]
struct Token<'a> {
    start: usize,
    end: usize,
    text: &'a str,
    style: Option<&'a Style>,
}

pub fn token_json(highlighter: &Highlighter<'_>) -> Result<String, serde_json::Error> {
    let lines: Vec<LineTokens<'_>> = (0..highlighter.line_count())
        .map(|index| {
            let line = highlighter.line(index).unwrap_or_default();
            let tokens = highlighter
                .spans(index)
                .unwrap_or_default()
                .iter()
                .map(|span| Token {
                    start: span.start,
                    end: span.end,
                    text: &line[span.start..span.end],
                    style: span.style.as_ref(),
                })
                .collect();
            LineTokens {
                line: index,
                tokens,
            }
        })
        .collect();
    serde_json::to_string_pretty(&lines)
}

pub fn token_simple(highlighter: &Highlighter<'_>) -> String {
    let mut out = String::new();
    for index in 0..highlighter.line_count() {
        for (text, style) in highlighter.fragments(index) {
            match style {
                Some(style) => {
                    let _ = write!(out, "[{style}]{text}[/]");
                }
                None => out.push_str(text),
            }
        }
        out.push('\n');
    }
    out
}

/// One include per line: `line:column<TAB>target<TAB>resolved`, both positions one-based.
pub fn links(highlighter: &Highlighter<'_>, parent: &str) -> String {
    let mut out = String::new();
    for link in highlighter.include_links() {
        let _ = writeln!(
            out,
            "{}:{}\t{}\t{}",
            link.line + 1,
            link.start + 1,
            link.target,
            link.resolve(parent)
        );
    }
    out
}
