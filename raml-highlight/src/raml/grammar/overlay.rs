//! Overlay composition.
//!
//!     The base grammar and the overlay scan the same line independently, each keeping its own
//!     position. Every call advances whichever of the two is lagging behind the token start and
//!     returns the fragment up to the nearer of the two positions. When the overlay has a class
//!     for that fragment it replaces the base class, otherwise the base class shows through.

use super::{ensure_progress, Boundary, Grammar};
use crate::raml::stream::StringStream;
use crate::raml::style::Style;

#[derive(Debug, Clone)]
pub struct Overlaid<B, O> {
    base: B,
    overlay: O,
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlaidState<B, O> {
    pub base: B,
    pub overlay: O,
    base_pos: usize,
    base_cur: Option<Style>,
    overlay_pos: usize,
    overlay_cur: Option<Style>,
}

impl<B, O> Overlaid<B, O> {
    pub fn new(base: B, overlay: O) -> Self {
        Self { base, overlay }
    }

    pub fn base(&self) -> &B {
        &self.base
    }

    pub fn overlay(&self) -> &O {
        &self.overlay
    }
}

impl<B: Grammar, O: Grammar> Grammar for Overlaid<B, O> {
    type State = OverlaidState<B::State, O::State>;

    fn name(&self) -> &'static str {
        self.base.name()
    }

    fn start_state(&self, boundary: Boundary) -> Self::State {
        OverlaidState {
            base: self.base.start_state(boundary),
            overlay: self.overlay.start_state(boundary),
            base_pos: 0,
            base_cur: None,
            overlay_pos: 0,
            overlay_cur: None,
        }
    }

    fn token(&self, stream: &mut StringStream<'_>, state: &mut Self::State) -> Option<Style> {
        let start = stream.start();
        // First token of a line, or positions left over from another line.
        if start == 0 || state.base_pos.min(state.overlay_pos) < start {
            state.base_pos = start;
            state.overlay_pos = start;
        }

        if start == state.base_pos {
            state.base_cur = self.base.token(stream, &mut state.base);
            ensure_progress(stream);
            state.base_pos = stream.pos();
        }
        if start == state.overlay_pos {
            stream.set_pos(start);
            state.overlay_cur = self.overlay.token(stream, &mut state.overlay);
            ensure_progress(stream);
            state.overlay_pos = stream.pos();
        }
        stream.set_pos(state.base_pos.min(state.overlay_pos));

        match &state.overlay_cur {
            Some(overlay) => Some(overlay.clone()),
            None => state.base_cur.clone(),
        }
    }

    fn copy_state(&self, state: &Self::State) -> Self::State {
        OverlaidState {
            base: self.base.copy_state(&state.base),
            overlay: self.overlay.copy_state(&state.overlay),
            base_pos: state.base_pos,
            base_cur: state.base_cur.clone(),
            overlay_pos: state.overlay_pos,
            overlay_cur: state.overlay_cur.clone(),
        }
    }

    fn blank_line(&self, state: &mut Self::State) {
        self.base.blank_line(&mut state.base);
        self.overlay.blank_line(&mut state.overlay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raml::stream::DEFAULT_TAB_SIZE;

    /// Classes every word as `word`.
    struct Words;

    impl Grammar for Words {
        type State = ();

        fn name(&self) -> &'static str {
            "words"
        }

        fn start_state(&self, _boundary: Boundary) {}

        fn token(&self, stream: &mut StringStream<'_>, _state: &mut ()) -> Option<Style> {
            if stream.eat_space() {
                return None;
            }
            stream.eat_while(|ch| !ch.is_whitespace());
            Some(Style::new("word"))
        }
    }

    /// Marks every `x` and skips everything else.
    struct MarkX;

    impl Grammar for MarkX {
        type State = ();

        fn name(&self) -> &'static str {
            "mark-x"
        }

        fn start_state(&self, _boundary: Boundary) {}

        fn token(&self, stream: &mut StringStream<'_>, _state: &mut ()) -> Option<Style> {
            if stream.eat('x') {
                return Some(Style::new("x"));
            }
            stream.eat_while(|ch| ch != 'x');
            None
        }
    }

    fn run(line: &str) -> Vec<(String, Option<String>)> {
        let grammar = Overlaid::new(Words, MarkX);
        let mut state = grammar.start_state(Boundary::none());
        let mut stream = StringStream::new(line, DEFAULT_TAB_SIZE);
        let mut out = Vec::new();
        while !stream.eol() {
            stream.begin_token();
            let style = grammar.token(&mut stream, &mut state);
            out.push((
                stream.current().to_string(),
                style.map(|s| s.as_str().to_string()),
            ));
        }
        out
    }

    #[test]
    fn overlay_splits_base_tokens_and_wins() {
        assert_eq!(
            run("abxcd ef"),
            vec![
                ("ab".to_string(), Some("word".to_string())),
                ("x".to_string(), Some("x".to_string())),
                ("cd".to_string(), Some("word".to_string())),
                (" ".to_string(), None),
                ("ef".to_string(), Some("word".to_string())),
            ]
        );
    }

    #[test]
    fn positions_reset_on_each_new_line() {
        let grammar = Overlaid::new(Words, MarkX);
        let mut state = grammar.start_state(Boundary::none());
        for line in ["long line here", "ab"] {
            let mut stream = StringStream::new(line, DEFAULT_TAB_SIZE);
            let mut fragments = Vec::new();
            while !stream.eol() {
                stream.begin_token();
                grammar.token(&mut stream, &mut state);
                fragments.push(stream.current().to_string());
            }
            assert_eq!(fragments.concat(), line);
        }
    }
}
