//! Property-based tests for the RAML mode
//!
//! These check the contract every host relies on: any line can be scanned, spans always tile
//! the line, and a copied state continues exactly like the original.

use proptest::prelude::*;
use raml_highlight::raml::grammar::{Boundary, Grammar};
use raml_highlight::raml::overlays::{IndentationOverlay, IndentationState};
use raml_highlight::raml::stream::{StringStream, DEFAULT_TAB_SIZE};
use raml_highlight::raml::{highlight_line, Highlighter, RamlMode, StyledSpan};

/// Lines that exercise every trigger and every embedded grammar, at random indentation.
fn raml_line_strategy() -> impl Strategy<Value = String> {
    let body = prop_oneof![
        Just("title: Example API"),
        Just("description: |"),
        Just("content: |"),
        Just("application/json:"),
        Just("text/xml:"),
        Just("- application/json:"),
        Just("schema: |"),
        Just("example: |"),
        Just("{ \"id\": [1, true, null] }"),
        Just("}"),
        Just("<user id=\"1\">Ada &amp; co</user>"),
        Just("<!-- open comment"),
        Just("-->"),
        Just("## Header with *em* and `code`"),
        Just("```"),
        Just("> quoted **strong"),
        Just("type: !include types/user.raml"),
        Just("- item"),
        Just("key: 'quoted' # comment"),
        Just(""),
    ];
    (0usize..12, body).prop_map(|(indent, body)| {
        if body.is_empty() {
            String::new()
        } else {
            format!("{}{}", " ".repeat(indent), body)
        }
    })
}

fn raml_document_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(raml_line_strategy(), 1..30)
}

fn scan(mode: &RamlMode, lines: &[String]) -> Vec<Vec<StyledSpan>> {
    let mut state = mode.start_state();
    lines
        .iter()
        .map(|line| highlight_line(mode, line, &mut state, DEFAULT_TAB_SIZE))
        .collect()
}

/// Highlighter holding exactly `lines`, empty trailing lines included.
fn highlighter_for<'m>(mode: &'m RamlMode, lines: &[String]) -> Highlighter<'m> {
    let mut highlighter = Highlighter::new(mode);
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
    highlighter.replace_lines(0..0, &lines);
    highlighter
}

fn assert_tiles(line: &str, spans: &[StyledSpan]) {
    let mut expected_start = 0;
    for span in spans {
        assert_eq!(span.start, expected_start);
        assert!(span.end > span.start);
        assert!(line.is_char_boundary(span.end));
        expected_start = span.end;
    }
    assert_eq!(expected_start, line.len());
}

#[cfg(test)]
mod proptests {
    use super::*;

    proptest! {
        #[test]
        fn test_any_line_is_tiled(lines in prop::collection::vec("\\PC{0,40}", 1..8)) {
            // No input can make the mode panic or stall; every byte ends up in a span
            let mode = RamlMode::shared();
            for (line, spans) in lines.iter().zip(scan(mode, &lines)) {
                assert_tiles(line, &spans);
            }
        }

        #[test]
        fn test_raml_documents_are_tiled(lines in raml_document_strategy()) {
            let mode = RamlMode::shared();
            for (line, spans) in lines.iter().zip(scan(mode, &lines)) {
                assert_tiles(line, &spans);
            }
        }

        #[test]
        fn test_copy_continues_like_original(lines in raml_document_strategy(), split in 0usize..30) {
            let mode = RamlMode::shared();
            let split = split.min(lines.len());

            let mut original = mode.start_state();
            for line in &lines[..split] {
                highlight_line(mode, line, &mut original, DEFAULT_TAB_SIZE);
            }
            let mut copy = mode.copy_state(&original);
            prop_assert_eq!(&copy, &original);

            for line in &lines[split..] {
                let from_original = highlight_line(mode, line, &mut original, DEFAULT_TAB_SIZE);
                let from_copy = highlight_line(mode, line, &mut copy, DEFAULT_TAB_SIZE);
                prop_assert_eq!(from_original, from_copy);
            }
            prop_assert_eq!(copy, original);
        }

        #[test]
        fn test_rescanning_a_line_is_idempotent(lines in raml_document_strategy()) {
            let highlighter = highlighter_for(RamlMode::shared(), &lines);
            for index in 0..highlighter.line_count() {
                let mut state = highlighter.state_before(index).unwrap();
                let line = highlighter.line(index).unwrap();
                let again = highlight_line(RamlMode::shared(), line, &mut state, DEFAULT_TAB_SIZE);
                prop_assert_eq!(highlighter.spans(index).unwrap(), again.as_slice());
                prop_assert_eq!(Some(state), highlighter.state_before(index + 1));
            }
        }

        #[test]
        fn test_incremental_edit_matches_fresh_scan(
            lines in raml_document_strategy(),
            at in 0usize..30,
            replacement in raml_line_strategy(),
        ) {
            let mode = RamlMode::shared();
            let at = at.min(lines.len() - 1);
            let mut highlighter = highlighter_for(mode, &lines);
            highlighter.edit_line(at, &replacement);

            let mut edited = lines.clone();
            edited[at] = replacement;
            let fresh = scan(mode, &edited);
            for (index, spans) in fresh.iter().enumerate() {
                prop_assert_eq!(highlighter.spans(index).unwrap(), spans.as_slice());
            }
        }

        #[test]
        fn test_indentation_respects_cutoff(spaces in 0usize..16, cutoff in 1usize..12) {
            let line = format!("{}x", " ".repeat(spaces));
            let overlay = IndentationOverlay;
            let mut state: IndentationState = overlay.start_state(Boundary::none());
            state.cutoff = Some(cutoff);

            let mut stream = StringStream::new(&line, DEFAULT_TAB_SIZE);
            let mut classified = Vec::new();
            while !stream.eol() {
                stream.begin_token();
                if let Some(style) = overlay.token(&mut stream, &mut state) {
                    classified.push((stream.start(), style.to_string()));
                }
            }

            // Runs start at even columns and stop at the first run past the cutoff
            for (column, style) in &classified {
                prop_assert!(*column <= cutoff);
                if *column + 1 < spaces {
                    prop_assert_eq!(style, &format!("indent indent-col-{column}"));
                }
            }
            let expected = (0..spaces).step_by(2).filter(|column| *column <= cutoff).count();
            prop_assert_eq!(classified.len(), expected);
        }
    }
}
