//! File discovery under the schemata root.
//!
//! Walks the tree recursively, following symlinks, keeps files whose
//! extension is in the configured list, and returns them sorted by path
//! string so runs are reproducible across platforms. Symlink loops are
//! reported by walkdir as entry errors and skipped.

use std::path::{Path, PathBuf};

use txp_core::LintError;
use walkdir::WalkDir;

use crate::config::LintConfig;

/// Every matching file below `config.root`, sorted.
///
/// # Errors
///
/// Returns [`LintError::RootNotFound`] if the root is missing or is not a
/// directory. Unreadable subdirectories, dangling links and link loops are
/// logged and skipped.
pub fn discover(config: &LintConfig) -> Result<Vec<PathBuf>, LintError> {
    let root = config.root.as_path();
    if !root.is_dir() {
        return Err(LintError::RootNotFound(root.to_path_buf()));
    }

    tracing::debug!(root = %root.display(), "scanning schemata tree");
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!(error = %e, "skipping unreadable entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .filter(|path| config.matches_extension(path))
        .collect();

    files.sort_by(|a, b| a.to_string_lossy().cmp(&b.to_string_lossy()));
    tracing::info!(count = files.len(), "discovered schemata files");
    Ok(files)
}

/// `path` relative to `root`, or unchanged when it lies outside.
pub fn relative_to<'a>(path: &'a Path, root: &Path) -> &'a Path {
    path.strip_prefix(root).unwrap_or(path)
}
