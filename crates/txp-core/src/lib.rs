//! # txp-core — Foundational Types for the Schemata Linter
//!
//! The leaf crate of the workspace. It owns the three things every other
//! crate agrees on:
//!
//! 1. **[`Document`]**: a file path plus its parsed YAML tree, produced by
//!    [`load`]. Malformed input surfaces as a [`ParseError`], never a panic.
//!
//! 2. **[`Category`]**: `Schema`, `Instance`, or `Skip`, assigned by
//!    [`classify`] from the file's base name only.
//!
//! 3. **The error hierarchy**: [`ParseError`] for recoverable per-document
//!    failures, [`LintError`] for run-level failures.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `txp-*` crates.
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod category;
pub mod document;
pub mod error;

pub use category::{classify, Category, INSTANCE_MARKER, SCHEMA_FILE_NAME};
pub use document::{is_truthy, load, scalar_text, Document};
pub use error::{LintError, ParseError};
