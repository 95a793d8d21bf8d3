//! # raml-highlight
//!
//! Incremental, line-oriented highlighting for RAML documents.
//!
//! A RAML document is YAML with other formats nested inside it: Markdown under
//! `description: |`, JSON under `application/json:`, XML under `text/xml:`. The mode scans one
//! line at a time, switches grammars when it sees those triggers and switches back on dedent.
//! Two overlays run on top of whichever grammar is active: indentation runs and include
//! targets.
//!
//! File Layout
//!
//! src/raml
//!   ├── stream      Line cursor handed to every tokenizer
//!   ├── style       Class vocabulary
//!   ├── grammar     Grammar capability and overlay composition
//!   ├── grammars    yaml, json, xml, markdown
//!   ├── overlays    indentation, include
//!   ├── mode        The mode-switch state machine
//!   ├── document    Whole-document host with incremental re-highlighting
//!   └── links       Include target extraction and resolution

pub mod raml;
