//! # Check Subcommands
//!
//! `check` runs the four passes over a whole schemata tree; `check-file`
//! runs the syntax check and the category's rule set on one document.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use txp_lint::{LintConfig, Linter};

use crate::render::{write_file_report, write_json, write_report, OutputFormat};
use crate::{resolve_path, EXIT_FAILED, EXIT_OK};

/// Arguments for `txp-lint check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Schemata root. Overrides the config file and `TXP_SCHEMATA_ROOT`.
    #[arg(long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Arguments for `txp-lint check-file`.
#[derive(Args, Debug)]
pub struct CheckFileArgs {
    /// File to check. Relative paths are tried under the schemata root
    /// first.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Execute `check`.
///
/// Returns exit code: 0 when every check passed, 1 when any failed.
/// Operational problems are returned as errors.
pub fn run_check(args: &CheckArgs, config: LintConfig) -> Result<u8> {
    let config = match &args.root {
        Some(root) => config.with_root(root),
        None => config,
    };
    let linter = Linter::new(config).context("invalid linter configuration")?;
    tracing::debug!(root = %linter.config().root.display(), "starting lint run");

    let report = linter.run().context("lint run aborted")?;

    let mut out = std::io::stdout().lock();
    match args.format {
        OutputFormat::Text => write_report(&mut out, &report)?,
        OutputFormat::Json => write_json(&mut out, &report)?,
    }

    Ok(if report.is_clean() { EXIT_OK } else { EXIT_FAILED })
}

/// Execute `check-file`.
///
/// Returns exit code: 0 when the file passed, 1 otherwise.
pub fn run_check_file(args: &CheckFileArgs, config: LintConfig) -> Result<u8> {
    let linter = Linter::new(config).context("invalid linter configuration")?;
    let root = linter.config().root.clone();
    let path = resolve_path(&args.path, &root);
    tracing::debug!(path = %path.display(), "checking single file");

    let report = linter.check_file(&path);

    let mut out = std::io::stdout().lock();
    match args.format {
        OutputFormat::Text => write_file_report(&mut out, &report, &root)?,
        OutputFormat::Json => write_json(&mut out, &report)?,
    }

    Ok(if report.passed() { EXIT_OK } else { EXIT_FAILED })
}
