//! # Check Results and Summaries
//!
//! Value types produced by a lint run. The runner fills them in; the CLI
//! renders them. Everything here is `Serialize` so a run can be emitted as
//! JSON for CI consumers.

use std::ops::AddAssign;
use std::path::PathBuf;

use serde::Serialize;

use crate::identifier::IdentifierOutcome;
use crate::rules::Violation;

/// The check pass a [`RuleResult`] belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleName {
    /// Every matched file must parse as YAML.
    YamlSyntax,
    /// Schema metadata conventions.
    SchemaMetadata,
    /// Instance metadata conventions.
    InstanceMetadata,
}

impl RuleName {
    /// Returns the snake_case identifier for this rule.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::YamlSyntax => "yaml_syntax",
            Self::SchemaMetadata => "schema_metadata",
            Self::InstanceMetadata => "instance_metadata",
        }
    }
}

impl std::fmt::Display for RuleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Informational facts recorded alongside a result. Never affect pass/fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Observation {
    /// Whether a schema imports at least one `txp:` schema.
    TxpImports {
        /// True when a `txp:` import was found.
        present: bool,
    },
    /// Number of entries under an instance document's `instances` key.
    InstanceCount {
        /// Entry count (0 when absent or not a sequence).
        count: usize,
    },
}

/// Outcome of one rule applied to one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RuleResult {
    /// Document the rule was applied to.
    pub path: PathBuf,
    /// Which check produced this result.
    pub rule: RuleName,
    /// Violations in rule order. Empty means pass.
    pub violations: Vec<Violation>,
    /// Optional informational observation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observation: Option<Observation>,
}

impl RuleResult {
    /// A passing result with no observation.
    pub fn pass(path: impl Into<PathBuf>, rule: RuleName) -> Self {
        Self {
            path: path.into(),
            rule,
            violations: Vec::new(),
            observation: None,
        }
    }

    /// A failing result with a single violation.
    pub fn fail(path: impl Into<PathBuf>, rule: RuleName, violation: Violation) -> Self {
        Self {
            path: path.into(),
            rule,
            violations: vec![violation],
            observation: None,
        }
    }

    /// True when no violations were recorded.
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Pass/fail counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    /// Checks that passed.
    pub passed: usize,
    /// Checks that failed.
    pub failed: usize,
}

impl Tally {
    /// Construct a tally.
    pub fn new(passed: usize, failed: usize) -> Self {
        Self { passed, failed }
    }

    /// Total checks counted.
    pub fn total(&self) -> usize {
        self.passed + self.failed
    }
}

impl AddAssign for Tally {
    fn add_assign(&mut self, rhs: Self) {
        self.passed += rhs.passed;
        self.failed += rhs.failed;
    }
}

/// All results of one check pass, in discovery order.
///
/// Invariant: `passed + failed == results.len()`. The counters are only
/// updated through [`ValidationSummary::record`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    /// The pass this summary covers.
    pub rule: RuleName,
    /// Documents that passed.
    pub passed: usize,
    /// Documents that failed.
    pub failed: usize,
    /// Every result, passing or failing, in discovery order.
    pub results: Vec<RuleResult>,
}

impl ValidationSummary {
    /// An empty summary for `rule`.
    pub fn new(rule: RuleName) -> Self {
        Self {
            rule,
            passed: 0,
            failed: 0,
            results: Vec::new(),
        }
    }

    /// Append a result and bump the matching counter.
    pub fn record(&mut self, result: RuleResult) {
        if result.passed() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
        self.results.push(result);
    }

    /// Failed results, in discovery order.
    pub fn failures(&self) -> impl Iterator<Item = &RuleResult> {
        self.results.iter().filter(|r| !r.passed())
    }

    /// Documents evaluated.
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Counters as a [`Tally`].
    pub fn tally(&self) -> Tally {
        Tally::new(self.passed, self.failed)
    }
}

/// The four independent passes of a full run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LintReport {
    /// Schemata root the run covered.
    pub root: PathBuf,
    /// YAML syntax over every matched file.
    pub syntax: ValidationSummary,
    /// Schema metadata over `schema.yaml` files.
    pub schemas: ValidationSummary,
    /// Instance metadata over entity files.
    pub instances: ValidationSummary,
    /// The identifier registry check.
    pub identifiers: IdentifierOutcome,
}

impl LintReport {
    /// Arithmetic sum of all four passes. A file appears in every pass
    /// that covers it.
    pub fn totals(&self) -> Tally {
        let mut total = self.syntax.tally();
        total += self.schemas.tally();
        total += self.instances.tally();
        total += self.identifiers.tally();
        total
    }

    /// True when no check failed in any pass.
    pub fn is_clean(&self) -> bool {
        self.totals().failed == 0
    }
}
