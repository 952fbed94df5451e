//! # txp-cli — Command-Line Interface for txp-lint
//!
//! Provides the `txp-lint` binary.
//!
//! ## Subcommands
//!
//! - `txp-lint check`: Run all four passes over a schemata tree.
//! - `txp-lint check-file`: Check one file with the rules for its category.
//!
//! ```bash
//! txp-lint check
//! txp-lint check --root crates/model/symbolic/schemata --format json
//! txp-lint -vv check-file place/polity/country/iso_3166_entity.yaml
//! ```
//!
//! ## Exit Codes
//!
//! `0` when every check passed, `1` when any check failed, `2` on an
//! operational error (missing root, unreadable or invalid configuration).
//!
//! ## Crate Policy
//!
//! - Argument parsing lives here; checking lives in `txp-lint`.
//! - Handlers return `anyhow::Result<u8>`; `main` maps errors to exit code 2.

pub mod check;
pub mod render;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use txp_lint::LintConfig;

/// Exit code for a run with no failures.
pub const EXIT_OK: u8 = 0;
/// Exit code for a run with at least one failed check.
pub const EXIT_FAILED: u8 = 1;
/// Exit code for operational errors.
pub const EXIT_ERROR: u8 = 2;

/// Build the effective configuration: defaults, then the optional config
/// file, then the environment.
pub fn load_config(path: Option<&Path>) -> Result<LintConfig> {
    let config = match path {
        Some(path) => LintConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => LintConfig::default(),
    };
    Ok(config.apply_env())
}

/// Resolve a path that may be relative to the schemata root.
///
/// Absolute paths are returned as-is. A relative path that exists under
/// `root` resolves there; otherwise it is taken relative to the current
/// directory.
pub fn resolve_path(path: &Path, root: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    let root_relative = root.join(path);
    if root_relative.exists() {
        root_relative
    } else {
        path.to_path_buf()
    }
}
