//! Configuration loader for the gedcom parser and serializer.
//!
//! `defaults/gedcom.default.toml` is embedded into the library so that the
//! documented defaults and runtime behavior stay in sync. Callers layer their
//! own files on top of those defaults via [`Loader`] before deserializing into
//! [`GedcomConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/gedcom.default.toml");

/// Top-level configuration consumed by the gedcom library.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GedcomConfig {
    pub header: HeaderConfig,
    pub ids: IdConfig,
    pub input: InputConfig,
}

/// Contents of the header synthesized for documents that lack one.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HeaderConfig {
    pub source_name: String,
    pub source_version: String,
    pub charset: String,
    pub gedcom_version: String,
    pub gedcom_form: String,
}

/// Pointer allocation knobs.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IdConfig {
    pub individual_prefix: String,
    pub family_prefix: String,
    pub max_attempts: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InputConfig {
    pub max_path_len: usize,
}

impl Default for GedcomConfig {
    /// Mirrors `defaults/gedcom.default.toml` without going through the loader.
    fn default() -> Self {
        Self {
            header: HeaderConfig {
                source_name: "gedcom".to_string(),
                source_version: "0.1.0".to_string(),
                charset: "UNICODE".to_string(),
                gedcom_version: "5.5".to_string(),
                gedcom_form: "LINEAGE-LINKED".to_string(),
            },
            ids: IdConfig {
                individual_prefix: "I".to_string(),
                family_prefix: "F".to_string(),
                max_attempts: 1_000_000,
            },
            input: InputConfig { max_path_len: 1024 },
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

    /// Apply a single key/value override.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<GedcomConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<GedcomConfig, ConfigError> {
    Loader::new().build()
}
