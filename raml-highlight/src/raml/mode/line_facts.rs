//! Per-line pre-classification.
//!
//!     The state machine only ever asks a handful of questions about the raw line it is
//!     scanning. They are all answered here, in one pass, from the whole line text (not the
//!     unscanned remainder).
//!
//!     Region triggers are checked in priority order; the first match wins:
//!
//!         1. `content: |` / `description: |`   opens documentation (markdown)
//!         2. `application/json:`                opens structured data (json)
//!         3. `text/xml:`                        opens markup (xml)

use super::Embedded;
use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

/// Trigger patterns, indexed like [TRIGGER_ORDER].
static TRIGGERS: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"\b(?:content|description):\s?\|",
        r"application/json:",
        r"text/xml:",
    ])
    .unwrap()
});

const TRIGGER_ORDER: [Embedded; 3] = [
    Embedded::Documentation,
    Embedded::StructuredData,
    Embedded::Markup,
];

static PRIMARY_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(?:schema|example):\s?\|").unwrap());
static SEQUENCE_ITEM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*- ").unwrap());

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LineFacts {
    /// Embedded grammar this line opens when scanned by the primary grammar.
    pub opens: Option<Embedded>,
    /// `schema: |` or `example: |`: scanned by the primary grammar even inside a region.
    pub primary_block: bool,
    /// Starts with a `- ` sequence marker.
    pub sequence_item: bool,
    /// Whitespace only.
    pub blank: bool,
}

impl LineFacts {
    pub fn classify(line: &str) -> Self {
        let opens = TRIGGERS
            .matches(line)
            .iter()
            .next()
            .map(|index| TRIGGER_ORDER[index]);
        LineFacts {
            opens,
            primary_block: PRIMARY_BLOCK.is_match(line),
            sequence_item: SEQUENCE_ITEM.is_match(line),
            blank: line.trim().is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("description: |", Some(Embedded::Documentation))]
    #[case("  content:|", Some(Embedded::Documentation))]
    #[case("      application/json:", Some(Embedded::StructuredData))]
    #[case("- text/xml:", Some(Embedded::Markup))]
    #[case("description: plain text", None)]
    #[case("schema: |", None)]
    #[case("mycontent: |", None)]
    fn triggers(#[case] line: &str, #[case] expected: Option<Embedded>) {
        assert_eq!(LineFacts::classify(line).opens, expected);
    }

    #[test]
    fn earlier_trigger_wins() {
        let facts = LineFacts::classify("description: | text/xml: application/json:");
        assert_eq!(facts.opens, Some(Embedded::Documentation));
        let facts = LineFacts::classify("text/xml: application/json:");
        assert_eq!(facts.opens, Some(Embedded::StructuredData));
    }

    #[test]
    fn primary_blocks_and_sequence_items() {
        let facts = LineFacts::classify("    - example: |");
        assert!(facts.primary_block);
        assert!(facts.sequence_item);
        assert!(!facts.blank);

        let facts = LineFacts::classify("-item");
        assert!(!facts.sequence_item);
        assert!(LineFacts::classify(" \t ").blank);
    }
}
