//! Row layout and hit-testing.
//!
//! Horizontally, a row is a run of parts laid out from the item's indent:
//!
//! ```text
//! [checkbox][margin-left][image][text][margin-right][right ... client edge)
//! ```
//!
//! With `x0 = -h_offset` (plus one line height when checkboxes are shown):
//! `x_left = x0 + image_size * level`,
//! `x_image = x_left + image_margin_x + margin_left`,
//! `x_text = x_image + image_size + image_margin_x`,
//! `x_right = x_text + measured_width`.

use lattice_treeview_core::{Point, Size};

use crate::item::ItemRef;
use crate::metrics::Metrics;

/// Parts of an item row, as a bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TvParts(u8);

impl TvParts {
    /// Not on any part (the indent area left of the item).
    pub const NONE: Self = Self(0);
    pub const CHECKBOX: Self = Self(1 << 0);
    pub const MARGIN_LEFT: Self = Self(1 << 1);
    pub const IMAGE: Self = Self(1 << 2);
    pub const TEXT: Self = Self(1 << 3);
    pub const MARGIN_RIGHT: Self = Self(1 << 4);
    /// Empty space right of the item, up to the client edge.
    pub const RIGHT: Self = Self(1 << 5);
    pub const ALL: Self = Self(0b11_1111);

    /// Returns true if all parts of `other` are in this set.
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for TvParts {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl std::ops::BitOrAssign for TvParts {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

/// Result of [`TreeView::hit_test`](crate::TreeView::hit_test).
#[derive(Clone)]
pub struct HitTest {
    pub index: usize,
    pub item: ItemRef,
    /// Exactly one part flag, or [`TvParts::NONE`].
    pub part: TvParts,
}

impl std::fmt::Debug for HitTest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HitTest")
            .field("index", &self.index)
            .field("item", &crate::item::DebugItem(&self.item))
            .field("part", &self.part)
            .finish()
    }
}

/// Horizontal boundaries of one row, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowLayout {
    /// Left edge of the checkbox column, when checkboxes are shown.
    pub x_checkbox: Option<i32>,
    pub x_left: i32,
    pub x_image: i32,
    pub x_text: i32,
    pub x_right: i32,
    margin_left: i32,
    margin_right: i32,
}

impl RowLayout {
    /// Layout of a row at `level` whose text measured `measured` pixels.
    pub fn new(
        metrics: &Metrics,
        level: usize,
        measured: i32,
        h_offset: i32,
        has_checkboxes: bool,
    ) -> Self {
        let mut x0 = -h_offset;
        if has_checkboxes {
            x0 += metrics.line_height;
        }
        let level = i32::try_from(level).unwrap_or(i32::MAX / 2);
        let x_left = x0.saturating_add(metrics.image_size.saturating_mul(level));
        let x_image = x_left + metrics.image_margin_x + metrics.margin_left;
        let x_text = x_image + metrics.image_size + metrics.image_margin_x;
        Self {
            x_checkbox: has_checkboxes.then(|| x_left - metrics.line_height),
            x_left,
            x_image,
            x_text,
            x_right: x_text + measured.max(0),
            margin_left: metrics.margin_left,
            margin_right: metrics.margin_right,
        }
    }

    fn part_ranges(&self, client_width: i32) -> [(TvParts, i32, i32); 6] {
        let margin_right_end = self.x_right + self.margin_right;
        [
            (
                TvParts::CHECKBOX,
                self.x_checkbox.unwrap_or(self.x_left),
                self.x_left,
            ),
            (TvParts::MARGIN_LEFT, self.x_left, self.x_left + self.margin_left),
            (TvParts::IMAGE, self.x_left + self.margin_left, self.x_text),
            (TvParts::TEXT, self.x_text, self.x_right),
            (TvParts::MARGIN_RIGHT, self.x_right, margin_right_end),
            (
                TvParts::RIGHT,
                margin_right_end,
                client_width.max(margin_right_end),
            ),
        ]
    }

    /// Part containing client x coordinate `x`.
    pub fn part_at(&self, x: i32, client_width: i32) -> TvParts {
        self.part_ranges(client_width)
            .into_iter()
            .find(|&(_, start, end)| x >= start && x < end)
            .map_or(TvParts::NONE, |(part, _, _)| part)
    }

    /// Horizontal span `[left, right)` covering `parts`.
    ///
    /// Returns `None` if none of the requested parts has any width.
    pub fn x_range(&self, parts: TvParts, client_width: i32) -> Option<(i32, i32)> {
        self.part_ranges(client_width)
            .into_iter()
            .filter(|&(part, start, end)| parts.contains(part) && end > start)
            .fold(None, |acc, (_, start, end)| match acc {
                None => Some((start, end)),
                Some((l, r)) => Some((l.min(start), r.max(end))),
            })
    }
}

/// Row under client y coordinate `y`, for rows of `item_height` pixels
/// starting at row `top_index`. Rows above the viewport are addressed by
/// negative `y`.
pub fn row_at_y(y: i32, top_index: usize, item_height: i32, len: usize) -> Option<usize> {
    let row = i64::try_from(top_index).ok()? + i64::from(y.div_euclid(item_height.max(1)));
    let row = usize::try_from(row).ok()?;
    (row < len).then_some(row)
}

/// Whether `point` is inside a viewport of `size` at the client origin.
pub(crate) fn in_viewport(point: Point, size: Size) -> bool {
    (0..size.width).contains(&point.x) && (0..size.height).contains(&point.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TreeViewConfig;

    fn metrics() -> Metrics {
        let config = TreeViewConfig {
            item_margin_left: 2,
            item_margin_right: 3,
            ..Default::default()
        };
        // image 16, margin_x 4, line 18
        Metrics::new(&config, 15)
    }

    #[test]
    fn test_layout_formulas() {
        let m = metrics();
        let row = RowLayout::new(&m, 2, 40, 10, false);
        assert_eq!(row.x_checkbox, None);
        assert_eq!(row.x_left, -10 + 32);
        assert_eq!(row.x_image, 22 + 4 + 2);
        assert_eq!(row.x_text, 28 + 16 + 4);
        assert_eq!(row.x_right, 48 + 40);

        let boxed = RowLayout::new(&m, 0, 40, 0, true);
        assert_eq!(boxed.x_left, 18);
        assert_eq!(boxed.x_checkbox, Some(0));
    }

    #[test]
    fn test_part_at() {
        let m = metrics();
        let row = RowLayout::new(&m, 1, 40, 0, true);
        // x_left = 18 + 16 = 34
        assert_eq!(row.part_at(5, 300), TvParts::NONE);
        assert_eq!(row.part_at(16, 300), TvParts::CHECKBOX);
        assert_eq!(row.part_at(34, 300), TvParts::MARGIN_LEFT);
        assert_eq!(row.part_at(36, 300), TvParts::IMAGE);
        assert_eq!(row.part_at(row.x_text, 300), TvParts::TEXT);
        assert_eq!(row.part_at(row.x_right, 300), TvParts::MARGIN_RIGHT);
        assert_eq!(row.part_at(row.x_right + 3, 300), TvParts::RIGHT);
        assert_eq!(row.part_at(299, 300), TvParts::RIGHT);
    }

    #[test]
    fn test_x_range_union() {
        let m = metrics();
        let row = RowLayout::new(&m, 0, 40, 0, false);
        assert_eq!(
            row.x_range(TvParts::TEXT, 300),
            Some((row.x_text, row.x_right))
        );
        assert_eq!(
            row.x_range(TvParts::TEXT | TvParts::MARGIN_RIGHT | TvParts::RIGHT, 300),
            Some((row.x_text, 300))
        );
        assert_eq!(row.x_range(TvParts::CHECKBOX, 300), None);
        assert_eq!(row.x_range(TvParts::ALL, 300), Some((0, 300)));
    }

    #[test]
    fn test_row_at_y() {
        assert_eq!(row_at_y(0, 0, 20, 5), Some(0));
        assert_eq!(row_at_y(39, 0, 20, 5), Some(1));
        assert_eq!(row_at_y(100, 0, 20, 5), None);
        assert_eq!(row_at_y(-1, 2, 20, 5), Some(1));
        assert_eq!(row_at_y(-1, 0, 20, 5), None);
    }

    #[test]
    fn test_in_viewport() {
        let size = Size::new(100, 50);
        assert!(in_viewport(Point::new(0, 0), size));
        assert!(in_viewport(Point::new(99, 49), size));
        assert!(!in_viewport(Point::new(100, 10), size));
        assert!(!in_viewport(Point::new(10, 50), size));
        assert!(!in_viewport(Point::new(10, -1), size));
    }

    #[test]
    fn test_parts_set_ops() {
        let mut p = TvParts::TEXT;
        p |= TvParts::IMAGE;
        assert!(p.contains(TvParts::TEXT));
        assert!(!p.contains(TvParts::CHECKBOX));
        assert!(TvParts::ALL.contains(p));
        assert!(TvParts::NONE.is_empty());
    }
}
