//! # Aggregator
//!
//! Drives a full lint run: discover files, load each one once, then run the
//! four independent passes (syntax, schema metadata, instance metadata,
//! identifier registry) and collect their summaries into a [`LintReport`].
//!
//! No per-document failure aborts a run. Only run-level problems (missing
//! root, unusable configuration) surface as [`LintError`].

use std::path::{Path, PathBuf};

use serde::Serialize;

use txp_core::{classify, Category, Document, LintError, ParseError};

use crate::config::LintConfig;
use crate::discovery::discover;
use crate::identifier::{IdentifierChecker, IdentifierOutcome};
use crate::report::{LintReport, RuleName, RuleResult, ValidationSummary};
use crate::rules::{self, Violation};

/// A discovered file and the outcome of loading it.
#[derive(Debug, Clone)]
pub struct LoadedFile {
    /// Path as discovered.
    pub path: PathBuf,
    /// Classification by base name.
    pub category: Category,
    /// Parsed document or the load failure.
    pub document: Result<Document, ParseError>,
}

impl LoadedFile {
    /// Load and classify `path`.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let category = classify(&path);
        let document = Document::load(&path);
        if let Err(e) = &document {
            tracing::debug!(path = %path.display(), error = %e, "document failed to load");
        }
        Self {
            path,
            category,
            document,
        }
    }
}

/// Result of checking a single file outside a full run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    /// The checked file.
    pub path: PathBuf,
    /// Classification by base name.
    pub category: Category,
    /// YAML syntax result.
    pub syntax: RuleResult,
    /// Metadata rule result, absent for skipped categories.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<RuleResult>,
    /// Identifier check, present only when the file is the configured
    /// registry and loaded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifiers: Option<IdentifierOutcome>,
}

impl FileReport {
    /// True when every check that ran passed.
    pub fn passed(&self) -> bool {
        self.syntax.passed()
            && self.metadata.as_ref().map_or(true, RuleResult::passed)
            && self.identifiers.as_ref().map_or(true, IdentifierOutcome::passed)
    }
}

/// The schemata linter.
#[derive(Debug, Clone)]
pub struct Linter {
    config: LintConfig,
    checker: IdentifierChecker,
}

impl Linter {
    /// Build a linter from a configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::Config`] if [`LintConfig::validate`] reports
    /// problems and [`LintError::InvalidPattern`] if the identifier pattern
    /// does not compile.
    pub fn new(config: LintConfig) -> Result<Self, LintError> {
        let problems = config.validate();
        if !problems.is_empty() {
            return Err(LintError::Config(problems.join("; ")));
        }
        let checker = IdentifierChecker::new(&config.identifier_pattern, config.preview_limit)?;
        Ok(Self { config, checker })
    }

    /// The active configuration.
    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Run all four passes over the configured root.
    ///
    /// # Errors
    ///
    /// Returns [`LintError::RootNotFound`] if the root is not a directory.
    pub fn run(&self) -> Result<LintReport, LintError> {
        let files: Vec<LoadedFile> = discover(&self.config)?
            .into_iter()
            .map(LoadedFile::load)
            .collect();

        let report = LintReport {
            root: self.config.root.clone(),
            syntax: check_syntax(&files),
            schemas: check_schemas(&files),
            instances: check_instances(&files),
            identifiers: self.check_identifiers(),
        };

        let totals = report.totals();
        tracing::info!(
            passed = totals.passed,
            failed = totals.failed,
            "lint run complete"
        );
        Ok(report)
    }

    /// Check the configured identifier registry.
    pub fn check_identifiers(&self) -> IdentifierOutcome {
        let path = self.config.registry_path();
        if !path.exists() {
            tracing::warn!(path = %path.display(), "identifier registry not found, skipping");
            return IdentifierOutcome::Skipped { path };
        }
        let outcome = match Document::load(&path) {
            Ok(doc) => self.checker.outcome(&doc),
            Err(e) => IdentifierOutcome::Unloadable {
                path,
                error: e.to_string(),
            },
        };
        match &outcome {
            IdentifierOutcome::Checked(result) => tracing::info!(
                valid = result.valid_count,
                invalid = result.invalid.len(),
                "identifier pass"
            ),
            IdentifierOutcome::Malformed { error, .. }
            | IdentifierOutcome::Unloadable { error, .. } => {
                tracing::warn!(error = %error, "identifier registry failed")
            }
            IdentifierOutcome::Skipped { .. } => {}
        }
        outcome
    }

    /// Run the syntax check, the applicable rule set and, for the registry,
    /// the identifier check on one file.
    pub fn check_file(&self, path: &Path) -> FileReport {
        let file = LoadedFile::load(path);
        let syntax = syntax_result(&file);
        let metadata = metadata_result(&file);
        let identifiers = match &file.document {
            Ok(doc) if self.is_registry(path) => Some(self.checker.outcome(doc)),
            _ => None,
        };
        FileReport {
            path: file.path,
            category: file.category,
            syntax,
            metadata,
            identifiers,
        }
    }

    fn is_registry(&self, path: &Path) -> bool {
        path.ends_with(&self.config.identifier_registry)
    }
}

/// Syntax pass: one result per file.
pub fn check_syntax(files: &[LoadedFile]) -> ValidationSummary {
    let mut summary = ValidationSummary::new(RuleName::YamlSyntax);
    for file in files {
        summary.record(syntax_result(file));
    }
    tracing::info!(
        passed = summary.passed,
        failed = summary.failed,
        "syntax pass"
    );
    summary
}

/// Schema metadata pass over files classified `Schema`.
pub fn check_schemas(files: &[LoadedFile]) -> ValidationSummary {
    check_metadata(files, Category::Schema, RuleName::SchemaMetadata)
}

/// Instance metadata pass over files classified `Instance`.
pub fn check_instances(files: &[LoadedFile]) -> ValidationSummary {
    check_metadata(files, Category::Instance, RuleName::InstanceMetadata)
}

fn check_metadata(files: &[LoadedFile], category: Category, rule: RuleName) -> ValidationSummary {
    let mut summary = ValidationSummary::new(rule);
    for file in files.iter().filter(|f| f.category == category) {
        if let Some(result) = metadata_result(file) {
            tracing::debug!(
                path = %file.path.display(),
                violations = result.violations.len(),
                "{rule}"
            );
            summary.record(result);
        }
    }
    tracing::info!(
        rule = %rule,
        passed = summary.passed,
        failed = summary.failed,
        "metadata pass"
    );
    summary
}

fn syntax_result(file: &LoadedFile) -> RuleResult {
    match &file.document {
        Ok(_) => RuleResult::pass(&file.path, RuleName::YamlSyntax),
        Err(e) => RuleResult::fail(&file.path, RuleName::YamlSyntax, Violation::unloadable(e)),
    }
}

fn metadata_result(file: &LoadedFile) -> Option<RuleResult> {
    let rule = match file.category {
        Category::Schema => RuleName::SchemaMetadata,
        Category::Instance => RuleName::InstanceMetadata,
        Category::Skip => return None,
    };
    match &file.document {
        Ok(doc) => rules::evaluate(file.category, doc),
        Err(e) => Some(RuleResult::fail(&file.path, rule, Violation::unloadable(e))),
    }
}
