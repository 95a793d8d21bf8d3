//! Shared configuration loader for the raml-highlight tools.
//!
//! `defaults/raml-highlight.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top of those
//! defaults via [`Loader`] before deserializing into [`HighlightConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use raml_highlight::raml::ModeOptions;
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/raml-highlight.default.toml");

/// Top-level configuration consumed by raml-highlight applications.
#[derive(Debug, Clone, Deserialize)]
pub struct HighlightConfig {
    pub mode: ModeSection,
    pub render: RenderSection,
}

/// Mirrors [`ModeOptions`].
#[derive(Debug, Clone, Deserialize)]
pub struct ModeSection {
    pub indent_unit: usize,
    pub include_marker: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RenderSection {
    pub tab_size: usize,
}

impl HighlightConfig {
    pub fn mode_options(&self) -> ModeOptions {
        ModeOptions {
            indent_unit: self.mode.indent_unit,
            include_marker: self.mode.include_marker.clone(),
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<HighlightConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<HighlightConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.mode.indent_unit, 2);
        assert_eq!(config.render.tab_size, 4);
        assert_eq!(config.mode_options(), ModeOptions::default());
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("mode.include_marker", "!ref")
            .expect("override to apply")
            .set_override("render.tab_size", 8i64)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.mode.include_marker, "!ref");
        assert_eq!(config.render.tab_size, 8);
    }

    #[test]
    fn user_file_layers_over_defaults() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[mode]\nindent_unit = 4").expect("write config");

        let config = Loader::new()
            .with_file(file.path())
            .build()
            .expect("config to build");
        assert_eq!(config.mode.indent_unit, 4);
        assert_eq!(config.mode.include_marker, "!include");
    }

    #[test]
    fn missing_optional_file_is_ignored() {
        let dir = tempfile::tempdir().expect("temp dir");
        let config = Loader::new()
            .with_optional_file(dir.path().join("absent.toml"))
            .build()
            .expect("config to build");
        assert_eq!(config.mode.indent_unit, 2);

        let missing = Loader::new().with_file(dir.path().join("absent.toml")).build();
        assert!(missing.is_err());
    }
}
