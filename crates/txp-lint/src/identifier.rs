//! # Identifier Pattern Checker
//!
//! Validates the `instances[*].id` values of the country identifier
//! registry against the `CountryCodeAlpha2Identifier` pattern.
//!
//! Unlike the metadata rules, which report one violation per field, this
//! check is all-or-nothing at the file level: any invalid entry fails the
//! whole registry as a single unit, and the run counts it once.
//!
//! A missing registry file is not a failure. It yields
//! [`IdentifierOutcome::Skipped`], which contributes nothing to either
//! counter. A registry that parses but has the wrong shape (a non-mapping
//! root, an `instances` value that is present but not a sequence, or an
//! entry that is not a mapping) fails as a unit with
//! [`IdentifierOutcome::Malformed`]. Only an absent `instances` key reads
//! as an empty list.

use std::path::PathBuf;

use regex::Regex;
use serde::Serialize;
use serde_yaml::Value;
use thiserror::Error;

use txp_core::{scalar_text, Document, LintError};

use crate::report::Tally;

/// ISO 3166-1 alpha-2: exactly two uppercase ASCII letters.
pub const COUNTRY_CODE_ALPHA2_PATTERN: &str = "^[A-Z]{2}$";

/// Number of invalid identifiers shown in reports.
pub const DEFAULT_PREVIEW_LIMIT: usize = 10;

/// Result of checking one registry document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IdentifierCheckResult {
    /// Registry document path.
    pub path: PathBuf,
    /// Pattern the identifiers were tested against.
    pub pattern: String,
    /// Entries whose `id` matched the pattern.
    pub valid_count: usize,
    /// Non-matching `id` values, in document order.
    pub invalid: Vec<String>,
    /// How many invalid values [`IdentifierCheckResult::preview`] shows.
    pub preview_limit: usize,
}

impl IdentifierCheckResult {
    /// True when every entry matched.
    pub fn passed(&self) -> bool {
        self.invalid.is_empty()
    }

    /// The first `preview_limit` invalid values.
    pub fn preview(&self) -> &[String] {
        let end = self.invalid.len().min(self.preview_limit);
        &self.invalid[..end]
    }

    /// Total entries inspected.
    pub fn entry_count(&self) -> usize {
        self.valid_count + self.invalid.len()
    }
}

/// The registry parsed as YAML but is not shaped like an instance file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryShapeError {
    /// The document root is not a mapping (empty file, list, scalar).
    #[error("registry root is {found}, expected a mapping")]
    RootNotMapping {
        /// YAML kind of the root.
        found: &'static str,
    },

    /// `instances` is present but not a sequence.
    #[error("'instances' is {found}, expected a sequence")]
    InstancesNotSequence {
        /// YAML kind of the value.
        found: &'static str,
    },

    /// An entry of `instances` is not a mapping.
    #[error("instances[{index}] is {found}, expected a mapping")]
    EntryNotMapping {
        /// Zero-based entry position.
        index: usize,
        /// YAML kind of the entry.
        found: &'static str,
    },
}

/// What happened to the registry check during a run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IdentifierOutcome {
    /// The registry file does not exist. Counts as (0, 0).
    Skipped {
        /// Where the registry was expected.
        path: PathBuf,
    },
    /// The registry was loaded and checked.
    Checked(IdentifierCheckResult),
    /// The registry exists but could not be loaded. Counts as (0, 1).
    Unloadable {
        /// Registry document path.
        path: PathBuf,
        /// Load error message.
        error: String,
    },
    /// The registry loaded but has the wrong shape. Counts as (0, 1).
    Malformed {
        /// Registry document path.
        path: PathBuf,
        /// Shape error message.
        error: String,
    },
}

impl IdentifierOutcome {
    /// Contribution of this outcome to the run totals.
    pub fn tally(&self) -> Tally {
        match self {
            Self::Skipped { .. } => Tally::new(0, 0),
            Self::Checked(result) if result.passed() => Tally::new(1, 0),
            Self::Checked(_) | Self::Unloadable { .. } | Self::Malformed { .. } => {
                Tally::new(0, 1)
            }
        }
    }

    /// True when the outcome adds no failure.
    pub fn passed(&self) -> bool {
        self.tally().failed == 0
    }

    /// True for the skipped outcome.
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped { .. })
    }
}

/// Compiled identifier checker.
#[derive(Debug, Clone)]
pub struct IdentifierChecker {
    pattern: Regex,
    preview_limit: usize,
}

impl IdentifierChecker {
    /// Compile `pattern`.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::InvalidPattern`] if the pattern does not compile.
    pub fn new(pattern: &str, preview_limit: usize) -> Result<Self, LintError> {
        let pattern = Regex::new(pattern).map_err(|e| LintError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            pattern,
            preview_limit,
        })
    }

    /// The compiled pattern's source.
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Whether a single identifier matches.
    pub fn is_valid(&self, id: &str) -> bool {
        self.pattern.is_match(id)
    }

    /// Check every entry of the document's `instances` sequence.
    ///
    /// An absent `instances` key reads as an empty sequence; an entry without
    /// an `id` reads as the empty string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryShapeError`] when the root is not a mapping, when
    /// `instances` is present but not a sequence, or when an entry is not a
    /// mapping.
    pub fn check(&self, doc: &Document) -> Result<IdentifierCheckResult, RegistryShapeError> {
        let root = untag(doc.root());
        if !root.is_mapping() {
            return Err(RegistryShapeError::RootNotMapping {
                found: kind(root),
            });
        }
        let entries: &[Value] = match root.get("instances").map(untag) {
            None => &[],
            Some(Value::Sequence(seq)) => seq,
            Some(other) => {
                return Err(RegistryShapeError::InstancesNotSequence { found: kind(other) })
            }
        };

        let mut valid_count = 0usize;
        let mut invalid = Vec::new();

        for (index, entry) in entries.iter().enumerate() {
            let entry = untag(entry);
            if !entry.is_mapping() {
                return Err(RegistryShapeError::EntryNotMapping {
                    index,
                    found: kind(entry),
                });
            }
            let id = scalar_text(entry.get("id"));
            if self.is_valid(&id) {
                valid_count += 1;
            } else {
                invalid.push(id);
            }
        }

        Ok(IdentifierCheckResult {
            path: doc.path().to_path_buf(),
            pattern: self.pattern().to_string(),
            valid_count,
            invalid,
            preview_limit: self.preview_limit,
        })
    }

    /// Check a loaded registry and wrap the result as an outcome.
    pub fn outcome(&self, doc: &Document) -> IdentifierOutcome {
        match self.check(doc) {
            Ok(result) => IdentifierOutcome::Checked(result),
            Err(e) => IdentifierOutcome::Malformed {
                path: doc.path().to_path_buf(),
                error: e.to_string(),
            },
        }
    }
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(tagged) => kind(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(content: &str) -> Document {
        Document::parse("place/polity/country/iso_3166_entity.yaml", content).unwrap()
    }

    fn checker() -> IdentifierChecker {
        IdentifierChecker::new(COUNTRY_CODE_ALPHA2_PATTERN, DEFAULT_PREVIEW_LIMIT).unwrap()
    }

    fn shape_error(content: &str) -> RegistryShapeError {
        checker().check(&registry(content)).unwrap_err()
    }

    #[test]
    fn mixed_entries_preserve_invalid_order() {
        let doc = registry(
            "instances:\n  - id: US\n  - id: us\n  - id: USA\n  - id: ''\n",
        );
        let result = checker().check(&doc).unwrap();
        assert_eq!(result.valid_count, 1);
        assert_eq!(result.invalid, ["us", "USA", ""]);
        assert!(!result.passed());
    }

    #[test]
    fn all_valid_entries_pass_as_one_unit() {
        let doc = registry("instances:\n  - id: US\n  - id: DE\n  - id: JP\n");
        let result = checker().check(&doc).unwrap();
        assert!(result.passed());
        assert_eq!(result.valid_count, 3);
        let outcome = IdentifierOutcome::Checked(result);
        assert_eq!(outcome.tally(), Tally::new(1, 0));
    }

    #[test]
    fn many_invalid_entries_still_fail_once() {
        // All-or-nothing: three bad entries count as a single failure.
        let doc = registry("instances:\n  - id: usa\n  - id: x\n  - id: '12'\n");
        let outcome = checker().outcome(&doc);
        assert_eq!(outcome.tally(), Tally::new(0, 1));
    }

    #[test]
    fn missing_instances_is_empty_and_passes() {
        let result = checker().check(&registry("id: x\n")).unwrap();
        assert_eq!(result.entry_count(), 0);
        assert!(result.passed());
    }

    #[test]
    fn entry_without_id_is_empty_string() {
        let result = checker().check(&registry("instances:\n  - label: France\n")).unwrap();
        assert_eq!(result.invalid, [""]);
    }

    #[test]
    fn non_string_ids_are_rendered_and_rejected() {
        let result = checker().check(&registry("instances:\n  - id: 12\n  - id: true\n")).unwrap();
        assert_eq!(result.invalid, ["12", "true"]);
    }

    #[test]
    fn pattern_is_anchored_on_both_ends() {
        let c = checker();
        assert!(c.is_valid("GB"));
        assert!(!c.is_valid("GBR"));
        assert!(!c.is_valid("xGB"));
        assert!(!c.is_valid("G"));
        assert!(!c.is_valid("GB\n"));
        assert!(!c.is_valid("ÄB"));
    }

    #[test]
    fn preview_is_bounded() {
        let entries: String = (0..15).map(|i| format!("  - id: bad{i}\n")).collect();
        let result = checker().check(&registry(&format!("instances:\n{entries}"))).unwrap();
        assert_eq!(result.invalid.len(), 15);
        assert_eq!(result.preview().len(), DEFAULT_PREVIEW_LIMIT);
        assert_eq!(result.preview()[0], "bad0");
    }

    #[test]
    fn skipped_is_distinct_from_pass_and_fail() {
        let skipped = IdentifierOutcome::Skipped {
            path: PathBuf::from("place/polity/country/iso_3166_entity.yaml"),
        };
        assert!(skipped.is_skipped());
        assert_eq!(skipped.tally(), Tally::new(0, 0));

        let unloadable = IdentifierOutcome::Unloadable {
            path: PathBuf::from("iso_3166_entity.yaml"),
            error: "invalid YAML".to_string(),
        };
        assert!(!unloadable.is_skipped());
        assert_eq!(unloadable.tally(), Tally::new(0, 1));
    }

    #[test]
    fn empty_registry_is_malformed() {
        assert_eq!(
            shape_error(""),
            RegistryShapeError::RootNotMapping { found: "null" }
        );
    }

    #[test]
    fn list_root_is_malformed() {
        assert_eq!(
            shape_error("- id: usa\n"),
            RegistryShapeError::RootNotMapping { found: "a sequence" }
        );
    }

    #[test]
    fn null_instances_is_malformed_not_absent() {
        assert_eq!(
            shape_error("instances:\n"),
            RegistryShapeError::InstancesNotSequence { found: "null" }
        );
    }

    #[test]
    fn mapping_instances_is_malformed() {
        assert_eq!(
            shape_error("instances:\n  us: 1\n  usa: 2\n"),
            RegistryShapeError::InstancesNotSequence { found: "a mapping" }
        );
    }

    #[test]
    fn scalar_entry_is_malformed() {
        assert_eq!(
            shape_error("instances:\n  - id: US\n  - DE\n"),
            RegistryShapeError::EntryNotMapping {
                index: 1,
                found: "a string"
            }
        );
    }

    #[test]
    fn malformed_registry_fails_as_a_unit() {
        let outcome = checker().outcome(&registry("instances:\n"));
        assert!(matches!(outcome, IdentifierOutcome::Malformed { .. }));
        assert_eq!(outcome.tally(), Tally::new(0, 1));
        assert!(!outcome.passed());
    }

    #[test]
    fn result_records_pattern_source() {
        let result = checker().check(&registry("instances: []\n")).unwrap();
        assert_eq!(result.pattern, COUNTRY_CODE_ALPHA2_PATTERN);
        assert!(result.passed());
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = IdentifierChecker::new("^[A-Z", 10).unwrap_err();
        assert!(matches!(err, LintError::InvalidPattern { .. }));
    }
}
