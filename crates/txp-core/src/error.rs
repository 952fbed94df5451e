//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types shared by every crate in the linter. All errors
//! use `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Per-document failures ([`ParseError`]) are recoverable: the aggregator
//!   turns them into a failed check and keeps going.
//! - Run-level failures ([`LintError`]) abort a run and are reported once as
//!   a single top-level diagnostic.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for a lint run.
#[derive(Error, Debug)]
pub enum LintError {
    /// The schemata root does not exist or is not a directory.
    #[error("schemata root not found: {}", .0.display())]
    RootNotFound(PathBuf),

    /// The identifier pattern could not be compiled.
    #[error("invalid identifier pattern {pattern:?}: {reason}")]
    InvalidPattern {
        /// The offending regular expression.
        pattern: String,
        /// Compiler message.
        reason: String,
    },

    /// The linter configuration is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

/// A document could not be turned into a parsed tree.
///
/// Carries the document path and the underlying message so the failure can
/// be reported without the raw `std::io::Error` or `serde_yaml::Error`
/// crossing the loader boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The file could not be read.
    #[error("cannot read {path}: {reason}")]
    Unreadable {
        /// Path of the document.
        path: String,
        /// Underlying IO message.
        reason: String,
    },

    /// The file was read but is not well-formed YAML.
    #[error("invalid YAML in {path}: {reason}")]
    Malformed {
        /// Path of the document.
        path: String,
        /// Underlying parser message.
        reason: String,
    },
}

impl ParseError {
    /// Path of the document that failed to load.
    pub fn path(&self) -> &str {
        match self {
            Self::Unreadable { path, .. } | Self::Malformed { path, .. } => path,
        }
    }

    /// The underlying message, without the path prefix.
    pub fn reason(&self) -> &str {
        match self {
            Self::Unreadable { reason, .. } | Self::Malformed { reason, .. } => reason,
        }
    }
}
