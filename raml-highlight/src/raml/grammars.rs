//! The four grammars the RAML mode switches between.
//!
//!     yaml      The primary grammar. Every line outside an embedded region goes through it.
//!     json      Structured data under `application/json:` bodies.
//!     xml       Markup under `text/xml:` bodies.
//!     markdown  Documentation under `description: |` and `content: |` blocks.
//!
//! Classes follow the names editors already ship themes for (`atom`, `string`, `tag`,
//! `header header-1`, ...).

pub mod json;
pub mod markdown;
pub mod xml;
pub mod yaml;

pub use json::{JsonGrammar, JsonState};
pub use markdown::{MarkdownGrammar, MarkdownState};
pub use xml::{XmlGrammar, XmlState};
pub use yaml::{YamlGrammar, YamlState};
