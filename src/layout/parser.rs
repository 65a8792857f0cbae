// SPDX-License-Identifier: GPL-3.0-only

//! Loading custom layouts from JSON.
//!
//! A layout file describes the inputs of [`build_layout`](super::build_layout).
//! Every field is optional and falls back to the built-in QWERTY value:
//!
//! ```json
//! {
//!     "rows": [["Q", "W", "E"], ["SHIFT", "A", "BACK"]],
//!     "key_size": [55, 55],
//!     "size_overrides": { "SHIFT": [65, 40], "BACK": [75, 45] },
//!     "spacing": 7,
//!     "origin": [15, 15]
//! }
//! ```
//!
//! Parsing is permissive: suspicious but usable content produces
//! [`LayoutWarning`]s, only unreadable files, malformed JSON and layouts
//! without a single key are errors.

use crate::layout::types::LayoutSpec;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Error type for layout loading.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The layout file could not be read.
    #[error("failed to read layout file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The layout JSON is malformed.
    #[error("invalid layout JSON{} at line {line}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    Json {
        path: Option<PathBuf>,
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The layout has no keys at all.
    #[error("layout contains no keys")]
    Empty,
}

/// A non-fatal issue found while loading a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LayoutWarning {
    /// Path to the offending field (e.g. `rows[2]`).
    pub field_path: String,
    pub message: String,
}

impl LayoutWarning {
    fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field_path: field_path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LayoutWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[WARNING] {}: {}", self.field_path, self.message)
    }
}

/// A parsed layout spec together with the warnings collected on the way.
#[derive(Debug, Clone)]
pub struct ParseResult {
    pub spec: LayoutSpec,
    pub warnings: Vec<LayoutWarning>,
}

impl ParseResult {
    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}

/// Parses a layout spec from a JSON file.
pub fn parse_layout_file(path: impl AsRef<Path>) -> Result<ParseResult, ParseError> {
    let path = path.as_ref();
    let json = fs::read_to_string(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    parse_json(&json, Some(path))
}

/// Parses a layout spec from a JSON string.
pub fn parse_layout_from_string(json: &str) -> Result<ParseResult, ParseError> {
    parse_json(json, None)
}

fn parse_json(json: &str, path: Option<&Path>) -> Result<ParseResult, ParseError> {
    let spec: LayoutSpec = serde_json::from_str(json).map_err(|source| ParseError::Json {
        path: path.map(Path::to_path_buf),
        line: source.line(),
        source,
    })?;

    let warnings = validate_spec(&spec)?;
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }

    Ok(ParseResult { spec, warnings })
}

/// Checks a spec for usability, collecting warnings for odd content.
fn validate_spec(spec: &LayoutSpec) -> Result<Vec<LayoutWarning>, ParseError> {
    if spec.rows.iter().all(Vec::is_empty) {
        return Err(ParseError::Empty);
    }

    let mut warnings = Vec::new();

    for (index, row) in spec.rows.iter().enumerate() {
        if row.is_empty() {
            warnings.push(LayoutWarning::new(
                format!("rows[{}]", index),
                "Row is empty and only adds vertical space",
            ));
        }
        for (key_index, label) in row.iter().enumerate() {
            if label.is_empty() {
                warnings.push(LayoutWarning::new(
                    format!("rows[{}][{}]", index, key_index),
                    "Key label is empty",
                ));
            }
        }
    }

    if spec.key_size.width <= 0.0 || spec.key_size.height <= 0.0 {
        warnings.push(LayoutWarning::new("key_size", "Key size must be positive"));
    }

    if spec.spacing < 0.0 {
        warnings.push(LayoutWarning::new(
            "spacing",
            "Negative spacing makes neighbouring keys overlap",
        ));
    }

    let mut override_labels: Vec<&String> = spec.size_overrides.keys().collect();
    override_labels.sort();
    for label in override_labels {
        if !spec.rows.iter().flatten().any(|key| key == label) {
            warnings.push(LayoutWarning::new(
                format!("size_overrides.{}", label),
                "Override does not match any key label",
            ));
        }
    }

    Ok(warnings)
}

// ============================================================================
// Tests
// ============================================================================
