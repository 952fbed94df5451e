//! # Document Classifier
//!
//! Assigns every file a [`Category`] from its base name alone, never from
//! its content, so a half-broken document is still routed to the right
//! rule set and reported there.
//!
//! Priority order:
//!
//! | # | Base name | Category |
//! |---|-----------|----------|
//! | 1 | exactly `schema.yaml` (case-sensitive) | `Schema` |
//! | 2 | contains `entity` (case-insensitive) | `Instance` |
//! | 3 | anything else | `Skip` |

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::base_name;

/// Base name that marks a schema definition.
pub const SCHEMA_FILE_NAME: &str = "schema.yaml";

/// Lower-case marker that identifies an instance document.
pub const INSTANCE_MARKER: &str = "entity";

/// The kind of a schemata document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// A data-model definition (`schema.yaml`).
    Schema,
    /// A file of concrete instances referencing a schema.
    Instance,
    /// Irrelevant to the metadata rules.
    Skip,
}

impl Category {
    /// Returns the snake_case identifier for this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Schema => "schema",
            Self::Instance => "instance",
            Self::Skip => "skip",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify a file by its base name.
pub fn classify(path: &Path) -> Category {
    classify_name(&base_name(path))
}

/// Classify a bare file name.
pub fn classify_name(name: &str) -> Category {
    if name == SCHEMA_FILE_NAME {
        Category::Schema
    } else if name.to_lowercase().contains(INSTANCE_MARKER) {
        Category::Instance
    } else {
        Category::Skip
    }
}
