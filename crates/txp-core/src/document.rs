//! # Document Loader
//!
//! Reads a schemata file and parses it into a generic YAML tree
//! (`serde_yaml::Value`). Every read or parse failure is converted into a
//! [`ParseError`] carrying the path and the underlying message; nothing
//! lower-level escapes this module.
//!
//! Field accessors are deliberately lenient: a missing key, a non-mapping
//! root, or a value of the wrong shape all read as "absent". Rule
//! evaluation turns absence into a violation instead of a crash.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use crate::error::ParseError;

/// A parsed schemata document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    path: PathBuf,
    root: Value,
}

/// Load and parse the document at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Document, ParseError> {
    Document::load(path)
}

impl Document {
    /// Read the file at `path` and parse it as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Unreadable`] if the file cannot be read and
    /// [`ParseError::Malformed`] if its content is not valid YAML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ParseError::Unreadable {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let doc = Self::parse(path, &content)?;
        tracing::trace!(path = %path.display(), "loaded document");
        Ok(doc)
    }

    /// Parse YAML text that claims to live at `path`.
    pub fn parse(path: impl Into<PathBuf>, content: &str) -> Result<Self, ParseError> {
        let path = path.into();
        let root: Value = serde_yaml::from_str(content).map_err(|e| ParseError::Malformed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self { path, root })
    }

    /// Path the document was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The parsed tree.
    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The file's base name, or an empty string for paths without one.
    pub fn base_name(&self) -> String {
        base_name(&self.path)
    }

    /// Top-level field lookup. `None` when the key is absent or the root is
    /// not a mapping.
    pub fn field(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    /// Whether the top-level key exists, regardless of its value.
    pub fn has_field(&self, key: &str) -> bool {
        self.field(key).is_some()
    }

    /// Top-level field as a string. `None` for absent or non-string values.
    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.field(key).and_then(|v| untag(v).as_str())
    }

    /// Top-level field as a sequence; empty when absent or not a sequence.
    pub fn sequence_field(&self, key: &str) -> &[Value] {
        sequence_of(self.field(key))
    }
}

/// The base name of `path` as a (lossy) string.
pub fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// YAML truthiness: null, `false`, zero, and empty strings or collections
/// are all falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        Value::Tagged(tagged) => is_truthy(&tagged.value),
    }
}

/// Render a scalar as text: strings verbatim, null as empty, other scalars
/// in their YAML form. Collections render as empty.
pub fn scalar_text(value: Option<&Value>) -> String {
    match value.map(untag) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(_) => String::new(),
    }
}

fn sequence_of(value: Option<&Value>) -> &[Value] {
    value
        .map(untag)
        .and_then(Value::as_sequence)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn untag(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untag(&tagged.value),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Document {
        Document::parse("test/schema.yaml", content).unwrap()
    }

    #[test]
    fn parse_reads_top_level_fields() {
        let doc = parse("id: https://textpast.org/schema/x\nname: X\nversion: '1'\n");
        assert_eq!(doc.str_field("id"), Some("https://textpast.org/schema/x"));
        assert_eq!(doc.str_field("name"), Some("X"));
        assert_eq!(doc.str_field("version"), Some("1"));
        assert!(doc.has_field("name"));
        assert!(!doc.has_field("created_on"));
    }

    #[test]
    fn parse_rejects_malformed_yaml() {
        let err = Document::parse("bad_entity.yaml", "id: [unclosed\n").unwrap_err();
        assert!(matches!(err, ParseError::Malformed { .. }));
        assert_eq!(err.path(), "bad_entity.yaml");
        assert!(!err.reason().is_empty());
    }

    #[test]
    fn load_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("absent.yaml")).unwrap_err();
        assert!(matches!(err, ParseError::Unreadable { .. }));
        assert!(err.path().ends_with("absent.yaml"));
    }

    #[test]
    fn load_reads_file_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.yaml");
        std::fs::write(&path, "name: country\nimports:\n  - txp:meta/entity/hyperentity/schema\n")
            .unwrap();
        let doc = load(&path).unwrap();
        assert_eq!(doc.path(), path.as_path());
        assert_eq!(doc.base_name(), "schema.yaml");
        assert_eq!(doc.sequence_field("imports").len(), 1);
    }

    #[test]
    fn non_mapping_root_reads_as_absent() {
        let doc = parse("- just\n- a\n- list\n");
        assert!(doc.field("id").is_none());
        assert!(doc.sequence_field("instances").is_empty());
    }

    #[test]
    fn sequence_field_is_empty_for_non_sequences() {
        let doc = parse("instances: {US: 1}\n");
        assert!(doc.has_field("instances"));
        assert!(doc.sequence_field("instances").is_empty());
    }

    #[test]
    fn str_field_ignores_non_strings() {
        let doc = parse("version: 2\n");
        assert_eq!(doc.str_field("version"), None);
    }

    #[test]
    fn truthiness_matches_yaml_falsy_values() {
        let falsy = ["~", "''", "false", "0", "[]", "{}", "0.0"];
        for src in falsy {
            let v: Value = serde_yaml::from_str(src).unwrap();
            assert!(!is_truthy(&v), "{src} should be falsy");
        }
        let truthy = ["x", "true", "1", "'0'", "[a]", "{a: 1}", "2024-01-01"];
        for src in truthy {
            let v: Value = serde_yaml::from_str(src).unwrap();
            assert!(is_truthy(&v), "{src} should be truthy");
        }
    }

    #[test]
    fn scalar_text_renders_scalars() {
        let v: Value = serde_yaml::from_str("{a: US, b: 12, c: ~, d: [x]}").unwrap();
        assert_eq!(scalar_text(v.get("a")), "US");
        assert_eq!(scalar_text(v.get("b")), "12");
        assert_eq!(scalar_text(v.get("c")), "");
        assert_eq!(scalar_text(v.get("d")), "");
        assert_eq!(scalar_text(v.get("missing")), "");
    }

    #[test]
    fn base_name_handles_paths_without_file_name() {
        assert_eq!(base_name(Path::new("a/b/Country_Entity.yaml")), "Country_Entity.yaml");
        assert_eq!(base_name(Path::new("/")), "");
    }
}
