//! # txp-lint — Schemata Convention Linter
//!
//! Checks a TextPast schemata tree in four independent passes:
//!
//! 1. **Syntax** ([`runner::check_syntax`]): every matched file must parse
//!    as YAML.
//! 2. **Schema metadata** ([`rules::SCHEMA_RULES`]): `schema.yaml` files
//!    carry a namespaced `id`, `name`, `version` and `created_on`.
//! 3. **Instance metadata** ([`rules::INSTANCE_RULES`]): entity files carry
//!    a namespaced `id`, a `schema` reference, `version`, `created_on` and an
//!    `instances` key.
//! 4. **Identifiers** ([`identifier`]): every entry of the country registry
//!    matches `^[A-Z]{2}$`.
//!
//! The passes are summed into a [`LintReport`]; a run is clean iff no
//! check failed in any pass. Per-document failures never abort a run.
//!
//! ## Crate Policy
//!
//! - Depends only on `txp-core` internally.
//! - The rule tables are closed. New conventions are new table rows, not
//!   plugins.

pub mod config;
pub mod discovery;
pub mod identifier;
pub mod report;
pub mod rules;
pub mod runner;

pub use config::{ConfigError, LintConfig};
pub use discovery::discover;
pub use identifier::{
    IdentifierCheckResult, IdentifierChecker, IdentifierOutcome, RegistryShapeError,
};
pub use report::{LintReport, Observation, RuleName, RuleResult, Tally, ValidationSummary};
pub use rules::{FieldRule, Requirement, Violation};
pub use runner::{FileReport, Linter};
