//! # Metadata Rule Set
//!
//! The fixed, ordered rule tables applied to schema and instance documents.
//! Each [`FieldRule`] names one top-level field and one [`Requirement`];
//! evaluating a table runs every rule (no short-circuit) and collects one
//! [`Violation`] per failed rule, so a document missing both `name` and
//! `version` reports exactly two violations.
//!
//! The tables are closed: there is no registration mechanism. Adding a rule
//! means adding a row here.

use serde::Serialize;
use serde_yaml::Value;

use txp_core::{is_truthy, Category, Document, ParseError, SCHEMA_FILE_NAME};

use crate::report::{Observation, RuleName, RuleResult};

/// Identifier namespace for schema definitions.
pub const SCHEMA_ID_PREFIX: &str = "https://textpast.org/schema/";

/// Identifier namespace for instance documents.
pub const INSTANCE_ID_PREFIX: &str = "https://textpast.org/instance/";

/// Import prefix for locally-resolved TextPast schemas.
pub const TXP_IMPORT_PREFIX: &str = "txp:";

/// Field name used for the pseudo-violation raised when a document cannot
/// be loaded at all.
pub const DOCUMENT_FIELD: &str = "(document)";

/// What a [`FieldRule`] demands of its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    /// A string value starting with the given prefix.
    Prefix(&'static str),
    /// Any truthy value (absent, null, empty and zero all fail).
    NonEmpty,
    /// The key must exist; its value is irrelevant.
    Present,
}

/// One row of a rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldRule {
    /// Top-level field the rule inspects.
    pub field: &'static str,
    /// Condition the field must satisfy.
    pub requirement: Requirement,
}

/// Rules for `schema.yaml` documents, in evaluation order.
pub const SCHEMA_RULES: &[FieldRule] = &[
    FieldRule {
        field: "id",
        requirement: Requirement::Prefix(SCHEMA_ID_PREFIX),
    },
    FieldRule {
        field: "name",
        requirement: Requirement::NonEmpty,
    },
    FieldRule {
        field: "version",
        requirement: Requirement::NonEmpty,
    },
    FieldRule {
        field: "created_on",
        requirement: Requirement::NonEmpty,
    },
];

/// Rules for instance documents, in evaluation order.
pub const INSTANCE_RULES: &[FieldRule] = &[
    FieldRule {
        field: "id",
        requirement: Requirement::Prefix(INSTANCE_ID_PREFIX),
    },
    FieldRule {
        field: "schema",
        requirement: Requirement::Prefix(SCHEMA_ID_PREFIX),
    },
    FieldRule {
        field: "version",
        requirement: Requirement::NonEmpty,
    },
    FieldRule {
        field: "created_on",
        requirement: Requirement::NonEmpty,
    },
    FieldRule {
        field: "instances",
        requirement: Requirement::Present,
    },
];

/// A single failed condition on a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// The field that failed, or [`DOCUMENT_FIELD`] for load failures.
    pub field: String,
    /// Human-readable description.
    pub message: String,
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

impl Violation {
    /// The violation recorded for a document that failed to load.
    pub fn unloadable(err: &ParseError) -> Self {
        Self {
            field: DOCUMENT_FIELD.to_string(),
            message: err.to_string(),
        }
    }
}

impl FieldRule {
    /// Evaluate this rule against a document.
    pub fn check(&self, doc: &Document) -> Option<Violation> {
        let value = doc.field(self.field);
        let message = match self.requirement {
            Requirement::Prefix(prefix) => match doc.str_field(self.field) {
                Some(s) if s.starts_with(prefix) => return None,
                Some(s) => format!("'{}' should start with {prefix} (found {s:?})", self.field),
                None => format!("'{}' should start with {prefix}", self.field),
            },
            Requirement::NonEmpty => {
                if value.is_some_and(is_truthy) {
                    return None;
                }
                format!("missing '{}' field", self.field)
            }
            Requirement::Present => {
                if doc.has_field(self.field) {
                    return None;
                }
                format!("missing '{}' key", self.field)
            }
        };
        Some(Violation {
            field: self.field.to_string(),
            message,
        })
    }
}

/// Run every rule of a table, preserving table order.
pub fn evaluate_table(rules: &[FieldRule], doc: &Document) -> Vec<Violation> {
    rules.iter().filter_map(|rule| rule.check(doc)).collect()
}

/// Whether any entry of `imports` starts with `txp:`.
pub fn has_txp_imports(doc: &Document) -> bool {
    doc.sequence_field("imports")
        .iter()
        .filter_map(Value::as_str)
        .any(|import| import.starts_with(TXP_IMPORT_PREFIX))
}

/// Apply the schema rules.
pub fn check_schema(doc: &Document) -> RuleResult {
    let violations = evaluate_table(SCHEMA_RULES, doc);
    RuleResult {
        path: doc.path().to_path_buf(),
        rule: RuleName::SchemaMetadata,
        violations,
        observation: Some(Observation::TxpImports {
            present: has_txp_imports(doc),
        }),
    }
}

/// Apply the instance rules. The entry count is only observed on pass.
pub fn check_instance(doc: &Document) -> RuleResult {
    let violations = evaluate_table(INSTANCE_RULES, doc);
    let observation = violations.is_empty().then(|| Observation::InstanceCount {
        count: doc.sequence_field("instances").len(),
    });
    RuleResult {
        path: doc.path().to_path_buf(),
        rule: RuleName::InstanceMetadata,
        violations,
        observation,
    }
}

/// Dispatch a document to the rule set for its category.
///
/// Returns `None` for `Skip` documents and for instance-classified files
/// named exactly `schema.yaml`.
pub fn evaluate(category: Category, doc: &Document) -> Option<RuleResult> {
    match category {
        Category::Schema => Some(check_schema(doc)),
        Category::Instance if doc.base_name() != SCHEMA_FILE_NAME => Some(check_instance(doc)),
        Category::Instance | Category::Skip => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema(content: &str) -> Document {
        Document::parse("place/polity/country/schema.yaml", content).unwrap()
    }

    fn instance(content: &str) -> Document {
        Document::parse("place/polity/country/iso_3166_entity.yaml", content).unwrap()
    }

    fn fields(result: &RuleResult) -> Vec<&str> {
        result.violations.iter().map(|v| v.field.as_str()).collect()
    }

    const VALID_INSTANCE: &str = "\
id: https://textpast.org/instance/place/polity/country/iso_3166_entity
schema: https://textpast.org/schema/place/polity/country
version: 1.0.0
created_on: '2024-01-01'
instances:
  - id: US
  - id: DE
";

    #[test]
    fn minimal_schema_passes() {
        let doc = schema(
            "id: https://textpast.org/schema/x\nname: X\nversion: '1'\ncreated_on: '2024-01-01'\n",
        );
        let result = check_schema(&doc);
        assert!(result.passed(), "unexpected violations: {:?}", result.violations);
        assert_eq!(result.rule, RuleName::SchemaMetadata);
    }

    #[test]
    fn schema_missing_name_and_version_reports_two_violations() {
        let doc = schema("id: https://textpast.org/schema/x\ncreated_on: '2024-01-01'\n");
        let result = check_schema(&doc);
        assert!(!result.passed());
        assert_eq!(fields(&result), ["name", "version"]);
    }

    #[test]
    fn schema_with_nothing_reports_every_rule_in_order() {
        let result = check_schema(&schema("{}"));
        assert_eq!(fields(&result), ["id", "name", "version", "created_on"]);
    }

    #[test]
    fn schema_id_with_wrong_prefix_fails() {
        let doc = schema(
            "id: https://example.org/schema/x\nname: X\nversion: '1'\ncreated_on: '2024-01-01'\n",
        );
        let result = check_schema(&doc);
        assert_eq!(fields(&result), ["id"]);
        assert!(result.violations[0].message.contains(SCHEMA_ID_PREFIX));
        assert!(result.violations[0].message.contains("example.org"));
    }

    #[test]
    fn schema_instance_prefix_is_not_a_schema_id() {
        let doc = schema(
            "id: https://textpast.org/instance/x\nname: X\nversion: '1'\ncreated_on: '2024-01-01'\n",
        );
        assert_eq!(fields(&check_schema(&doc)), ["id"]);
    }

    #[test]
    fn falsy_values_count_as_missing() {
        let doc = schema(
            "id: https://textpast.org/schema/x\nname: ''\nversion: ~\ncreated_on: '2024-01-01'\n",
        );
        assert_eq!(fields(&check_schema(&doc)), ["name", "version"]);
    }

    #[test]
    fn non_string_id_fails_prefix_rule() {
        let doc = schema("id: 42\nname: X\nversion: '1'\ncreated_on: '2024-01-01'\n");
        assert_eq!(fields(&check_schema(&doc)), ["id"]);
    }

    #[test]
    fn non_mapping_schema_fails_every_rule() {
        let result = check_schema(&schema("- a\n- b\n"));
        assert_eq!(result.violations.len(), SCHEMA_RULES.len());
    }

    #[test]
    fn txp_imports_are_observed_but_never_fail() {
        let with = schema(
            "id: https://textpast.org/schema/x\nname: X\nversion: '1'\ncreated_on: '2024-01-01'\n\
             imports:\n  - linkml:types\n  - txp:meta/entity/hyperentity/schema\n",
        );
        let result = check_schema(&with);
        assert!(result.passed());
        assert_eq!(result.observation, Some(Observation::TxpImports { present: true }));

        let without = schema("imports:\n  - linkml:types\n");
        let result = check_schema(&without);
        assert!(!result.passed());
        assert_eq!(result.observation, Some(Observation::TxpImports { present: false }));
    }

    #[test]
    fn txp_detection_ignores_non_string_imports() {
        let doc = schema("imports:\n  - 7\n  - {txp: x}\n");
        assert!(!has_txp_imports(&doc));
    }

    #[test]
    fn valid_instance_passes_and_counts_entries() {
        let result = check_instance(&instance(VALID_INSTANCE));
        assert!(result.passed(), "unexpected violations: {:?}", result.violations);
        assert_eq!(result.observation, Some(Observation::InstanceCount { count: 2 }));
    }

    #[test]
    fn instance_missing_instances_key_fails_alone() {
        let content = VALID_INSTANCE
            .split("instances:")
            .next()
            .unwrap()
            .to_string();
        let result = check_instance(&instance(&content));
        assert_eq!(fields(&result), ["instances"]);
        assert_eq!(result.observation, None);
    }

    #[test]
    fn instance_with_null_instances_passes_with_zero_count() {
        let content = VALID_INSTANCE.replace("instances:\n  - id: US\n  - id: DE\n", "instances:\n");
        let result = check_instance(&instance(&content));
        assert!(result.passed());
        assert_eq!(result.observation, Some(Observation::InstanceCount { count: 0 }));
    }

    #[test]
    fn instance_schema_reference_must_be_a_schema_id() {
        let content = VALID_INSTANCE.replace(
            "schema: https://textpast.org/schema/",
            "schema: https://textpast.org/instance/",
        );
        assert_eq!(fields(&check_instance(&instance(&content))), ["schema"]);
    }

    #[test]
    fn instance_with_schema_id_prefix_fails() {
        let content = VALID_INSTANCE.replace(
            "id: https://textpast.org/instance/",
            "id: https://textpast.org/schema/",
        );
        assert_eq!(fields(&check_instance(&instance(&content))), ["id"]);
    }

    #[test]
    fn evaluate_dispatches_by_category() {
        let doc = instance(VALID_INSTANCE);
        assert_eq!(
            evaluate(Category::Instance, &doc).map(|r| r.rule),
            Some(RuleName::InstanceMetadata)
        );
        assert!(evaluate(Category::Skip, &doc).is_none());

        let doc = schema("{}");
        assert_eq!(
            evaluate(Category::Schema, &doc).map(|r| r.rule),
            Some(RuleName::SchemaMetadata)
        );
        // schema.yaml never receives the instance rules.
        assert!(evaluate(Category::Instance, &doc).is_none());
    }

    #[test]
    fn unloadable_violation_carries_parse_message() {
        let err = ParseError::Malformed {
            path: "x_entity.yaml".to_string(),
            reason: "mapping values are not allowed here".to_string(),
        };
        let v = Violation::unloadable(&err);
        assert_eq!(v.field, DOCUMENT_FIELD);
        assert!(v.to_string().contains("mapping values are not allowed here"));
    }

    #[test]
    fn rule_tables_have_no_duplicate_fields() {
        for table in [SCHEMA_RULES, INSTANCE_RULES] {
            let mut seen = std::collections::HashSet::new();
            for rule in table {
                assert!(seen.insert(rule.field), "duplicate rule for {}", rule.field);
            }
        }
    }
}
