use crate::raml::overlays::DEFAULT_INCLUDE_MARKER;
use serde::{Deserialize, Serialize};

/// Knobs that change how the mode classifies a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModeOptions {
    /// Extra boundary columns granted to regions opened on a `- ` sequence item line.
    pub indent_unit: usize,
    /// Token after which the rest of the line is an include target.
    pub include_marker: String,
}

impl Default for ModeOptions {
    fn default() -> Self {
        Self {
            indent_unit: 2,
            include_marker: DEFAULT_INCLUDE_MARKER.to_string(),
        }
    }
}
