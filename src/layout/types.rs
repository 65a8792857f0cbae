// SPDX-License-Identifier: GPL-3.0-only

//! Core data types for the key layout model.
//!
//! Keys are rectangles in overlay-canvas coordinates. A [`Layout`] is built
//! once from a [`LayoutSpec`] and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

// ============================================================================
// Geometry
// ============================================================================

/// A point in canvas (or camera pixel) coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[must_use]
    pub fn distance_to(&self, other: Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f32; 2]> for Point {
    fn from([x, y]: [f32; 2]) -> Self {
        Self { x, y }
    }
}

impl From<Point> for [f32; 2] {
    fn from(point: Point) -> Self {
        [point.x, point.y]
    }
}

/// Width and height of a key in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 2]", into = "[f32; 2]")]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

impl From<[f32; 2]> for Size {
    fn from([width, height]: [f32; 2]) -> Self {
        Self { width, height }
    }
}

impl From<Size> for [f32; 2] {
    fn from(size: Size) -> Self {
        [size.width, size.height]
    }
}

/// Axis-aligned key rectangle, `(x1, y1)` top-left and `(x2, y2)` bottom-right.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl Rect {
    #[must_use]
    pub const fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Rectangle with its top-left corner at `origin`.
    #[must_use]
    pub fn from_origin(origin: Point, size: Size) -> Self {
        Self::new(
            origin.x,
            origin.y,
            origin.x + size.width,
            origin.y + size.height,
        )
    }

    /// Strict interior test; points on an edge are outside.
    #[must_use]
    pub fn contains(&self, point: Point) -> bool {
        self.x1 < point.x && point.x < self.x2 && self.y1 < point.y && point.y < self.y2
    }

    #[must_use]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[must_use]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }
}

// ============================================================================
// Keys
// ============================================================================

/// Display size class of a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SizeClass {
    /// Uses the layout's base key size.
    Normal,
    /// Has a per-label size override (space bar, shift, ...).
    Special,
}

/// Named non-printable keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedKey {
    Space,
    Backspace,
    Enter,
    Tab,
}

impl NamedKey {
    /// XKB keysym name used for injection.
    #[must_use]
    pub fn keysym_name(&self) -> &'static str {
        match self {
            NamedKey::Space => "space",
            NamedKey::Backspace => "BackSpace",
            NamedKey::Enter => "Return",
            NamedKey::Tab => "Tab",
        }
    }
}

/// What pressing a key does, derived from its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Named key press; modifiers do not apply.
    Named(NamedKey),
    /// Sticky caps-lock toggle.
    CapsLock,
    /// One-shot shift.
    Shift,
    /// Single printable character.
    Printable(char),
    /// Any other label, passed to the injector as a key name.
    Keysym(String),
}

impl KeyAction {
    /// Derives the action for a key label.
    ///
    /// Multi-character labels are matched case-insensitively so layout files
    /// may spell `Shift` or `SHIFT`.
    #[must_use]
    pub fn from_label(label: &str) -> Self {
        let mut chars = label.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return KeyAction::Printable(c);
        }

        match label.to_ascii_uppercase().as_str() {
            "SPACE" => KeyAction::Named(NamedKey::Space),
            "BACK" | "BACKSPACE" => KeyAction::Named(NamedKey::Backspace),
            "ENTER" | "RETURN" => KeyAction::Named(NamedKey::Enter),
            "TAB" => KeyAction::Named(NamedKey::Tab),
            "CAPS" | "CAPSLOCK" => KeyAction::CapsLock,
            "SHIFT" => KeyAction::Shift,
            _ => KeyAction::Keysym(label.to_string()),
        }
    }

    /// Whether the action is a modifier that gets a sticky highlight.
    #[must_use]
    pub fn is_modifier(&self) -> bool {
        matches!(self, KeyAction::CapsLock | KeyAction::Shift)
    }
}

/// A single key on the overlay.
#[derive(Debug, Clone, PartialEq)]
pub struct Key {
    /// Label shown on the key; also its identity.
    pub label: String,
    /// Hit-box and drawing rectangle in canvas coordinates.
    pub rect: Rect,
    pub size_class: SizeClass,
    pub action: KeyAction,
}

// ============================================================================
// Layout
// ============================================================================

/// Laid-out keyboard: ordered rows of positioned keys.
///
/// Row and key order define rendering position and hit-test priority.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub(crate) rows: Vec<Vec<Key>>,
    pub(crate) base_key_size: Size,
    pub(crate) spacing: f32,
    pub(crate) origin: Point,
}

impl Layout {
    /// Rows in top-to-bottom order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Key>] {
        &self.rows
    }

    /// All keys in layout order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.rows.iter().flatten()
    }

    #[must_use]
    pub fn key_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// First key (in layout order) with the given label.
    #[must_use]
    pub fn key(&self, label: &str) -> Option<&Key> {
        self.keys().find(|key| key.label == label)
    }

    /// First key whose rectangle strictly contains `point`.
    #[must_use]
    pub fn hit_test(&self, point: Point) -> Option<&Key> {
        self.hit_test_indexed(point).map(|(_, key)| key)
    }

    /// Like [`hit_test`](Self::hit_test), also returning the key's position
    /// in layout order. Duplicate labels are told apart by this index.
    #[must_use]
    pub fn hit_test_indexed(&self, point: Point) -> Option<(usize, &Key)> {
        self.keys().enumerate().find(|(_, key)| key.rect.contains(point))
    }

    #[must_use]
    pub fn base_key_size(&self) -> Size {
        self.base_key_size
    }

    #[must_use]
    pub fn spacing(&self) -> f32 {
        self.spacing
    }

    #[must_use]
    pub fn origin(&self) -> Point {
        self.origin
    }

    /// X coordinate just past the widest row, including trailing spacing.
    #[must_use]
    pub fn keyboard_right_edge(&self) -> f32 {
        let widest = self
            .rows
            .iter()
            .map(|row| {
                row.iter()
                    .map(|key| key.rect.width() + self.spacing)
                    .sum::<f32>()
            })
            .fold(0.0_f32, f32::max);
        self.origin.x + widest
    }
}

/// Serializable description of a layout, the inputs of `build_layout`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSpec {
    /// Key labels, one inner list per row.
    pub rows: Vec<Vec<String>>,
    /// Size of keys without an override.
    pub key_size: Size,
    /// Per-label sizes for special keys.
    pub size_overrides: HashMap<String, Size>,
    /// Gap between keys and between rows.
    pub spacing: f32,
    /// Top-left corner of the first key.
    pub origin: Point,
}

impl Default for LayoutSpec {
    fn default() -> Self {
        let rows: [&[&str]; 5] = [
            &["`", "1", "2", "3", "4", "5", "6", "7", "8", "9", "0", "-", "=", "TAB"],
            &["Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "[", "]", "\\"],
            &["CAPS", "A", "S", "D", "F", "G", "H", "J", "K", "L", ";", "'"],
            &["SHIFT", "Z", "X", "C", "V", "B", "N", "M", ",", ".", "/", "SHIFT"],
            &["SPACE", "BACK", "ENTER"],
        ];

        let size_overrides = [
            ("SPACE", Size::new(300.0, 45.0)),
            ("BACK", Size::new(75.0, 45.0)),
            ("ENTER", Size::new(75.0, 45.0)),
            ("SHIFT", Size::new(65.0, 40.0)),
            ("TAB", Size::new(65.0, 40.0)),
            ("CAPS", Size::new(65.0, 40.0)),
        ]
        .into_iter()
        .map(|(label, size)| (label.to_string(), size))
        .collect();

        Self {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|label| (*label).to_string()).collect())
                .collect(),
            key_size: Size::new(55.0, 55.0),
            size_overrides,
            spacing: 7.0,
            origin: Point::new(15.0, 15.0),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
