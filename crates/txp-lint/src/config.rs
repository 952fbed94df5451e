//! Linter configuration.
//!
//! Layered as: built-in defaults, then an optional YAML file, then the
//! `TXP_SCHEMATA_ROOT` environment variable, then explicit overrides from
//! the caller (the CLI's `--root`).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::identifier::{COUNTRY_CODE_ALPHA2_PATTERN, DEFAULT_PREVIEW_LIMIT};

/// Environment variable overriding [`LintConfig::root`].
pub const ROOT_ENV_VAR: &str = "TXP_SCHEMATA_ROOT";

/// Default schemata root, relative to the repository root.
pub const DEFAULT_ROOT: &str = "crates/model/symbolic/schemata";

/// Default identifier registry, relative to the schemata root.
pub const DEFAULT_IDENTIFIER_REGISTRY: &str = "place/polity/country/iso_3166_entity.yaml";

/// Settings for a lint run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LintConfig {
    /// Directory tree to lint.
    pub root: PathBuf,
    /// File extensions (without the dot) included in the run.
    pub extensions: Vec<String>,
    /// Identifier registry path, relative to `root`.
    pub identifier_registry: PathBuf,
    /// Pattern every registry identifier must match.
    pub identifier_pattern: String,
    /// Invalid identifiers shown in reports.
    pub preview_limit: usize,
}

impl Default for LintConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from(DEFAULT_ROOT),
            extensions: vec!["yaml".to_string()],
            identifier_registry: PathBuf::from(DEFAULT_IDENTIFIER_REGISTRY),
            identifier_pattern: COUNTRY_CODE_ALPHA2_PATTERN.to_string(),
            preview_limit: DEFAULT_PREVIEW_LIMIT,
        }
    }
}

impl LintConfig {
    /// Parse a configuration from YAML text. Missing keys take defaults.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    /// Read a YAML configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_yaml_str(&content)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(self) -> Self {
        self.apply_env_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn apply_env_from(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(root) = lookup(ROOT_ENV_VAR).filter(|v| !v.is_empty()) {
            self.root = PathBuf::from(root);
        }
        self
    }

    /// Replace the root.
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Absolute-or-relative path of the identifier registry.
    pub fn registry_path(&self) -> PathBuf {
        self.root.join(&self.identifier_registry)
    }

    /// Whether `path` carries one of the configured extensions.
    pub fn matches_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|want| want == ext))
    }

    /// Human-readable problems with this configuration. Empty when usable.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.extensions.is_empty() {
            errors.push("extensions must list at least one file extension".to_string());
        }
        for ext in &self.extensions {
            if ext.is_empty() || ext.starts_with('.') {
                errors.push(format!("extension {ext:?} must be non-empty and have no leading dot"));
            }
        }
        if self.identifier_registry.is_absolute() {
            errors.push(format!(
                "identifier_registry ({}) must be relative to the root",
                self.identifier_registry.display()
            ));
        }
        if self.preview_limit == 0 {
            errors.push("preview_limit must be at least 1".to_string());
        }
        errors
    }
}

/// A configuration file could not be turned into a [`LintConfig`].
///
/// Semantic problems with a parsed configuration are reported by
/// [`LintConfig::validate`] and surface as `LintError::Config`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("cannot read config {path}: {reason}")]
    Unreadable {
        /// Path of the config file.
        path: String,
        /// Underlying IO message.
        reason: String,
    },

    /// The config text is not valid YAML or has unknown or mistyped keys.
    #[error("invalid config: {0}")]
    Invalid(String),
}
