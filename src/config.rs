//! Configuration loading
//!
//! `defaults/unmangle.default.toml` is embedded into every binary so docs
//! and runtime behavior stay in sync. Applications layer user files and
//! CLI overrides on top of those defaults via [`Loader`] before
//! deserializing into [`RewriteConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/unmangle.default.toml");

/// Top-level configuration consumed by the rewrite engine.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteConfig {
    pub rewrite: RewriteSection,
    pub compat: CompatSection,
}

/// Engine knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct RewriteSection {
    /// Minimum element count (exclusive) for a declaration to be
    /// registered and thus eligible for substitution.
    pub threshold: usize,
}

/// Switches reproducing historical behavior.
#[derive(Debug, Clone, Deserialize)]
pub struct CompatSection {
    /// Allow depth to go negative on unbalanced closing braces instead of
    /// clamping at zero.
    pub legacy_depth: bool,
}

impl Default for RewriteConfig {
    fn default() -> Self {
        // The embedded defaults are validated by tests; failing to parse
        // them is a build defect, not a runtime condition.
        load_defaults().expect("embedded defaults are valid")
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

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<RewriteConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<RewriteConfig, ConfigError> {
    Loader::new().build()
}
