// SPDX-License-Identifier: GPL-3.0-only

//! Deterministic key placement.

use crate::layout::types::{Key, KeyAction, Layout, LayoutSpec, Point, Rect, Size, SizeClass};
use std::collections::HashMap;

/// Lays out key rows into positioned rectangles.
///
/// Keys run left-to-right from `origin`; x advances by each key's width plus
/// `spacing`, y by the base key height plus `spacing` per row. Labels found
/// in `size_overrides` use that size and are [`SizeClass::Special`].
///
/// Rows are not checked for overlap: overlapping content yields overlapping
/// hit-boxes and the first key in layout order wins.
#[must_use]
pub fn build_layout<S: AsRef<str>>(
    rows: &[Vec<S>],
    base_key_size: Size,
    size_overrides: &HashMap<String, Size>,
    spacing: f32,
    origin: Point,
) -> Layout {
    let mut y = origin.y;
    let mut laid_out = Vec::with_capacity(rows.len());

    for row in rows {
        let mut x = origin.x;
        let mut keys = Vec::with_capacity(row.len());

        for label in row {
            let label = label.as_ref();
            let (size, size_class) = match size_overrides.get(label) {
                Some(size) => (*size, SizeClass::Special),
                None => (base_key_size, SizeClass::Normal),
            };

            keys.push(Key {
                label: label.to_string(),
                rect: Rect::from_origin(Point::new(x, y), size),
                size_class,
                action: KeyAction::from_label(label),
            });

            x += size.width + spacing;
        }

        laid_out.push(keys);
        y += base_key_size.height + spacing;
    }

    tracing::debug!(
        "Built layout with {} rows, {} keys",
        laid_out.len(),
        laid_out.iter().map(Vec::len).sum::<usize>()
    );

    Layout {
        rows: laid_out,
        base_key_size,
        spacing,
        origin,
    }
}

impl LayoutSpec {
    /// Builds the layout described by this `LayoutSpec`.
    #[must_use]
    pub fn build(&self) -> Layout {
        build_layout(
            &self.rows,
            self.key_size,
            &self.size_overrides,
            self.spacing,
            self.origin,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_overrides() -> HashMap<String, Size> {
        HashMap::new()
    }

    /// Test: keys advance by width plus spacing within a row
    #[test]
    fn test_keys_advance_horizontally() {
        let rows = vec![vec!["A", "B", "C"]];
        let layout = build_layout(
            &rows,
            Size::new(55.0, 55.0),
            &no_overrides(),
            7.0,
            Point::new(15.0, 15.0),
        );

        let keys: Vec<&Key> = layout.keys().collect();
        assert_eq!(keys[0].rect, Rect::new(15.0, 15.0, 70.0, 70.0));
        assert_eq!(keys[1].rect, Rect::new(77.0, 15.0, 132.0, 70.0));
        assert_eq!(keys[2].rect, Rect::new(139.0, 15.0, 194.0, 70.0));
    }

    /// Test: rows advance by base height plus spacing, even with shorter overrides
    #[test]
    fn test_rows_advance_by_base_height() {
        let rows = vec![vec!["SHIFT"], vec!["Z"]];
        let mut overrides = HashMap::new();
        overrides.insert("SHIFT".to_string(), Size::new(65.0, 40.0));

        let layout = build_layout(&rows, Size::new(55.0, 55.0), &overrides, 7.0, Point::new(0.0, 0.0));

        let shift = layout.key("SHIFT").expect("shift key");
        assert_eq!(shift.rect, Rect::new(0.0, 0.0, 65.0, 40.0));
        assert_eq!(shift.size_class, SizeClass::Special);

        let z = layout.key("Z").expect("z key");
        assert_eq!(z.rect.y1, 62.0, "Second row starts at 55 + 7");
        assert_eq!(z.size_class, SizeClass::Normal);
    }

    /// Test: the default QWERTY rows land on the expected pixels
    #[test]
    fn test_default_layout_geometry() {
        let layout = LayoutSpec::default().build();

        assert_eq!(layout.key_count(), 14 + 13 + 12 + 12 + 3);

        let backtick = layout.key("`").expect("backtick key");
        assert_eq!(backtick.rect, Rect::new(15.0, 15.0, 70.0, 70.0));

        let space = layout.key("SPACE").expect("space key");
        assert_eq!(space.rect, Rect::new(15.0, 263.0, 315.0, 308.0));

        let back = layout.key("BACK").expect("back key");
        assert_eq!(back.rect.x1, 322.0, "BACK follows SPACE after 300 + 7");

        // 13 keys of 55 plus TAB at 65, each followed by 7 of spacing
        assert_eq!(layout.keyboard_right_edge(), 15.0 + 13.0 * 62.0 + 72.0);
    }

    /// Test: duplicate labels keep both keys in layout order
    #[test]
    fn test_duplicate_labels_are_both_laid_out() {
        let layout = LayoutSpec::default().build();
        let shifts: Vec<&Key> = layout.keys().filter(|key| key.label == "SHIFT").collect();

        assert_eq!(shifts.len(), 2, "Both shift keys are present");
        assert!(shifts[0].rect.x1 < shifts[1].rect.x1);
    }

    /// Test: an empty row still advances y
    #[test]
    fn test_empty_row_advances() {
        let rows: Vec<Vec<&str>> = vec![vec![], vec!["A"]];
        let layout = build_layout(&rows, Size::new(10.0, 10.0), &no_overrides(), 2.0, Point::default());

        assert_eq!(layout.key("A").map(|key| key.rect.y1), Some(12.0));
    }
}
