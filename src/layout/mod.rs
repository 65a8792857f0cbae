// SPDX-License-Identifier: GPL-3.0-only

//! Key layout model for the air keyboard overlay.
//!
//! A layout is a static set of labeled rectangles in overlay-canvas
//! coordinates. It is built once at startup, either from the built-in QWERTY
//! rows or from a JSON layout file, and never mutated afterwards.
//!
//! # Example
//!
//! ```rust,ignore
//! use airboard::layout::{LayoutSpec, Point};
//!
//! let layout = LayoutSpec::default().build();
//!
//! if let Some(key) = layout.hit_test(Point::new(40.0, 40.0)) {
//!     println!("Fingertip is over {}", key.label);
//! }
//! ```
//!
//! Custom layouts are loaded with [`parse_layout_file`]; see the [`parser`]
//! module for the file format.

pub mod builder;
pub mod parser;
pub mod types;

pub use builder::build_layout;
pub use parser::{parse_layout_file, parse_layout_from_string, LayoutWarning, ParseError, ParseResult};
pub use types::{Key, KeyAction, Layout, LayoutSpec, NamedKey, Point, Rect, Size, SizeClass};

/// Loads the layout named by `path`, or the built-in one when `path` is `None`.
///
/// A broken layout file is logged and replaced by the built-in layout so the
/// overlay still comes up.
#[must_use]
pub fn load_layout(path: Option<&str>) -> Layout {
    let Some(path) = path else {
        return LayoutSpec::default().build();
    };

    match parse_layout_file(path) {
        Ok(result) => {
            tracing::info!(
                "Loaded layout {} with {} warnings",
                path,
                result.warnings.len()
            );
            result.spec.build()
        }
        Err(err) => {
            tracing::error!("{}; using built-in layout", err);
            LayoutSpec::default().build()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Test: no path yields the built-in layout
    #[test]
    fn test_load_builtin_layout() {
        let layout = load_layout(None);
        assert_eq!(layout, LayoutSpec::default().build());
    }

    /// Test: an unreadable layout file falls back to the built-in layout
    #[test]
    fn test_load_missing_layout_falls_back() {
        let layout = load_layout(Some("/nonexistent/airboard/layout.json"));
        assert!(layout.key("SPACE").is_some(), "Fallback layout has a space bar");
    }

    /// Test: hit testing through the public API
    #[test]
    fn test_public_hit_test() {
        let layout = LayoutSpec::default().build();

        let key = layout.hit_test(Point::new(40.0, 40.0)).expect("backtick key");
        assert_eq!(key.label, "`");
        assert!(layout.hit_test(Point::new(5.0, 5.0)).is_none(), "Origin margin is empty");
    }
}
