//! Text and JSON rendering of lint results.
//!
//! The text transcript prints one section per pass, a `✓`/`✗` line per
//! document, indented violations under failures, and a final summary.
//! Paths are shown relative to the schemata root.

use std::io::{self, Write};
use std::path::Path;

use clap::ValueEnum;
use txp_lint::discovery::relative_to;
use txp_lint::rules::DOCUMENT_FIELD;
use txp_lint::{
    FileReport, IdentifierCheckResult, IdentifierOutcome, LintReport, Observation, RuleName,
    RuleResult, ValidationSummary,
};

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable transcript.
    #[default]
    Text,
    /// Pretty-printed JSON.
    Json,
}

/// Write a full run report.
pub fn write_report(out: &mut impl Write, report: &LintReport) -> io::Result<()> {
    let root = report.root.as_path();
    writeln!(out, "=== Checking TextPast schemata conventions ===")?;
    writeln!(out, "Root: {}", root.display())?;

    write_summary(out, &report.syntax, root)?;
    write_summary(out, &report.schemas, root)?;
    write_summary(out, &report.instances, root)?;

    writeln!(out)?;
    writeln!(out, "Pass 4: identifier registry")?;
    write_identifiers(out, &report.identifiers, root)?;

    let totals = report.totals();
    writeln!(out)?;
    writeln!(out, "=== Summary ===")?;
    writeln!(out, "Passed: {}", totals.passed)?;
    writeln!(out, "Failed: {}", totals.failed)?;
    writeln!(out)?;
    if report.is_clean() {
        writeln!(out, "✓ All checks passed!")
    } else {
        writeln!(out, "✗ Some checks failed")
    }
}

/// Write the result of a single-file check.
pub fn write_file_report(out: &mut impl Write, report: &FileReport, root: &Path) -> io::Result<()> {
    writeln!(
        out,
        "{} ({})",
        relative_to(&report.path, root).display(),
        report.category
    )?;
    write_result(out, &report.syntax, root)?;
    match &report.metadata {
        Some(result) => write_result(out, result, root)?,
        None => writeln!(out, "  - no metadata rules apply")?,
    }
    if let Some(outcome) = &report.identifiers {
        write_identifiers(out, outcome, root)?;
    }
    writeln!(out)?;
    if report.passed() {
        writeln!(out, "✓ All checks passed!")
    } else {
        writeln!(out, "✗ Some checks failed")
    }
}

/// Serialize any report as pretty JSON followed by a newline.
pub fn write_json<T: serde::Serialize>(out: &mut impl Write, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

fn pass_title(rule: RuleName) -> &'static str {
    match rule {
        RuleName::YamlSyntax => "Pass 1: YAML syntax",
        RuleName::SchemaMetadata => "Pass 2: schema metadata",
        RuleName::InstanceMetadata => "Pass 3: instance metadata",
    }
}

fn write_summary(out: &mut impl Write, summary: &ValidationSummary, root: &Path) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", pass_title(summary.rule))?;
    for result in &summary.results {
        write_result(out, result, root)?;
    }
    writeln!(out, "  {}: {}/{} passed", summary.rule, summary.passed, summary.total())
}

fn write_result(out: &mut impl Write, result: &RuleResult, root: &Path) -> io::Result<()> {
    let rel = relative_to(&result.path, root).display();
    if result.passed() {
        let note = match result.observation {
            Some(Observation::TxpImports { present: true }) => " (has txp: imports)".to_string(),
            Some(Observation::InstanceCount { count }) => format!(" ({count} instances)"),
            Some(Observation::TxpImports { present: false }) | None => String::new(),
        };
        return writeln!(out, "  ✓ {rel}{note}");
    }

    match result.violations.as_slice() {
        [only] if only.field == DOCUMENT_FIELD => writeln!(out, "  ✗ {rel} - {only}"),
        violations => {
            writeln!(out, "  ✗ {rel}")?;
            for violation in violations {
                writeln!(out, "      - {violation}")?;
            }
            Ok(())
        }
    }
}

fn write_identifiers(out: &mut impl Write, outcome: &IdentifierOutcome, root: &Path) -> io::Result<()> {
    match outcome {
        IdentifierOutcome::Skipped { path } => {
            writeln!(out, "  ⚠ {} not found", relative_to(path, root).display())
        }
        IdentifierOutcome::Checked(result) => write_identifier_result(out, result),
        IdentifierOutcome::Unloadable { path, error }
        | IdentifierOutcome::Malformed { path, error } => {
            writeln!(out, "  ✗ {} - {error}", relative_to(path, root).display())
        }
    }
}

fn write_identifier_result(out: &mut impl Write, result: &IdentifierCheckResult) -> io::Result<()> {
    if result.passed() {
        return writeln!(
            out,
            "  ✓ All {} IDs match {}",
            result.valid_count, result.pattern
        );
    }
    let preview = result.preview();
    write!(
        out,
        "  ✗ Found {} of {} IDs not matching {}: {preview:?}",
        result.invalid.len(),
        result.entry_count(),
        result.pattern
    )?;
    if preview.len() < result.invalid.len() {
        write!(out, " (first {})", preview.len())?;
    }
    writeln!(out)
}
