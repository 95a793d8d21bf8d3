//! Include targets found by the include overlay.
//!
//!     Targets are collected from `include-link` spans and resolved against the directory of
//!     the including file: absolute targets (leading `/`) are kept as written, relative ones are
//!     joined to the parent path.

use crate::raml::document::Highlighter;
use crate::raml::style::classes;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IncludeLink {
    /// Zero-based line index.
    pub line: usize,
    /// Byte range of the target within the line.
    pub start: usize,
    pub end: usize,
    pub target: String,
}

impl IncludeLink {
    pub fn is_relative(&self) -> bool {
        is_relative(&self.target)
    }

    /// Path of the target as seen from `parent` (the including file's directory).
    pub fn resolve(&self, parent: &str) -> String {
        resolve(parent, &self.target)
    }
}

pub fn is_relative(target: &str) -> bool {
    !target.starts_with('/')
}

pub fn resolve(parent: &str, target: &str) -> String {
    if !is_relative(target) || parent.is_empty() {
        target.to_string()
    } else if parent.ends_with('/') {
        format!("{parent}{target}")
    } else {
        format!("{parent}/{target}")
    }
}

impl Highlighter<'_> {
    /// Every include target in the document, in order.
    pub fn include_links(&self) -> Vec<IncludeLink> {
        let link_class = classes::INCLUDE_LINK;
        let mut links = Vec::new();
        for index in 0..self.line_count() {
            let (Some(line), Some(spans)) = (self.line(index), self.spans(index)) else {
                continue;
            };
            for span in spans {
                if span.style.as_ref() != Some(&link_class) {
                    continue;
                }
                let target = line[span.start..span.end].trim_end();
                if target.is_empty() {
                    continue;
                }
                links.push(IncludeLink {
                    line: index,
                    start: span.start,
                    end: span.start + target.len(),
                    target: target.to_string(),
                });
            }
        }
        links
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raml::mode::RamlMode;
    use crate::raml::options::ModeOptions;
    use rstest::rstest;

    #[rstest]
    #[case("api", "types/user.raml", "api/types/user.raml")]
    #[case("api/", "types/user.raml", "api/types/user.raml")]
    #[case("api", "/shared/user.raml", "/shared/user.raml")]
    #[case("", "user.raml", "user.raml")]
    fn resolves_against_parent(#[case] parent: &str, #[case] target: &str, #[case] expected: &str) {
        assert_eq!(resolve(parent, target), expected);
    }

    #[test]
    fn collects_targets_with_positions() {
        let text = "\
types:
  User: !include types/user.raml
  Error: !include /shared/error.raml
traits: !include
";
        let highlighter = Highlighter::new(RamlMode::shared()).with_text(text);
        let links = highlighter.include_links();
        assert_eq!(
            links,
            vec![
                IncludeLink {
                    line: 1,
                    start: 17,
                    end: 32,
                    target: "types/user.raml".to_string(),
                },
                IncludeLink {
                    line: 2,
                    start: 18,
                    end: 36,
                    target: "/shared/error.raml".to_string(),
                },
            ]
        );
        assert!(links[0].is_relative());
        assert_eq!(links[1].resolve("api"), "/shared/error.raml");
    }

    #[test]
    fn custom_marker() {
        let mode = RamlMode::new(ModeOptions {
            include_marker: "!ref".to_string(),
            ..ModeOptions::default()
        });
        let highlighter = Highlighter::new(&mode).with_text("a: !ref x.raml\nb: !include y.raml");
        let targets: Vec<_> = highlighter
            .include_links()
            .into_iter()
            .map(|link| link.target)
            .collect();
        assert_eq!(targets, vec!["x.raml".to_string()]);
    }
}
