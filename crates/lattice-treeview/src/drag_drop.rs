//! Drop target resolution and drag-over state.
//!
//! The view knows nothing about native drag APIs. The host calls
//! [`TreeView::drag_over`] while something is dragged over the view, and
//! [`TreeView::drop_at`] or [`TreeView::drag_leave`] when it ends; the view
//! resolves the insertion point and keeps the insert mark.
//!
//! A row is split into four horizontal bands. For a plain row the top half
//! means "before" and the bottom half "after". For a folder, the top band
//! means "before", the two middle bands "into the folder" and the bottom band
//! "after". When a folder's next row is its first child, everything below
//! the top band resolves to "before the first child".

use lattice_treeview_core::Point;
use lattice_treeview_core::logging::targets;

use crate::input::Key;
use crate::item::ItemRef;
use crate::scroll::ScrollSource;
use crate::view::{RepaintRegion, TreeView};

/// Dwell time near an edge before auto-scrolling starts.
const SCROLL_DELAY_MS: u64 = 400;
/// Minimum time between auto-scroll steps.
const SCROLL_INTERVAL_MS: u64 = 110;
/// Rows scrolled by arrow keys while dragging.
const KEY_SCROLL_ROWS: usize = 3;

/// Where a drop at some point would land.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DropInfo {
    pub point: Point,
    /// Row the drop refers to; `None` outside any row.
    pub target_index: Option<usize>,
    /// Insert after the target (otherwise before it).
    pub insert_after: bool,
    /// Insert as a child of the target folder.
    pub into_folder: bool,
}

/// Kind of insert mark drawn on a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InsertPosition {
    Before,
    After,
    Into,
}

/// The insert mark currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InsertMark {
    pub index: usize,
    pub position: InsertPosition,
}

impl InsertMark {
    fn from_drop(info: &DropInfo) -> Option<Self> {
        let index = info.target_index?;
        let position = if info.into_folder {
            InsertPosition::Into
        } else if info.insert_after {
            InsertPosition::After
        } else {
            InsertPosition::Before
        };
        Some(Self { index, position })
    }
}

/// Classify a point `y_in_row` pixels below the top of row `index`.
///
/// Returns `(target_index, insert_after, into_folder)`.
pub fn classify_drop(
    index: usize,
    y_in_row: i32,
    item_height: i32,
    is_folder: bool,
    next_is_first_child: bool,
) -> (usize, bool, bool) {
    let quarter = f64::from(item_height.max(1)) / 4.0;
    let y = f64::from(y_in_row);
    let after = y >= 2.0 * quarter;
    if is_folder && y >= quarter {
        if next_is_first_child {
            return (index + 1, false, false);
        }
        if y < 3.0 * quarter {
            return (index, false, true);
        }
    }
    (index, after, false)
}

/// Drag-over bookkeeping between `drag_over` calls.
#[derive(Debug, Clone, Default)]
pub(crate) struct DragOverState {
    /// When the pointer entered an auto-scroll zone.
    scroll_delay_since: Option<u64>,
    /// Last auto-scroll step.
    last_scroll: Option<u64>,
    pub(crate) mark: Option<InsertMark>,
}

impl TreeView {
    /// Resolve where a drop at `point` would land.
    ///
    /// Depends only on the current layout, so repeated calls with the same
    /// point agree until the view changes.
    pub fn drop_info(&self, point: Point) -> DropInfo {
        let mut info = DropInfo {
            point,
            target_index: None,
            insert_after: false,
            into_folder: false,
        };
        let Some(hit) = self.hit_test(point) else {
            return info;
        };
        let Ok(rect) = self.rect_of(hit.index) else {
            return info;
        };
        let (target, after, into) = classify_drop(
            hit.index,
            point.y - rect.top(),
            self.metrics.item_height,
            hit.item.is_folder(),
            self.seq.next_is_first_child(hit.index),
        );
        info.target_index = Some(target);
        info.insert_after = after;
        info.into_folder = into;
        info
    }

    /// Item a drop at `point` refers to.
    pub fn drop_target_item(&self, point: Point) -> Option<ItemRef> {
        self.drop_info(point)
            .target_index
            .and_then(|i| self.seq.item(i).cloned())
    }

    /// Insert mark currently shown.
    pub fn insert_mark(&self) -> Option<InsertMark> {
        self.drag.as_ref().and_then(|d| d.mark)
    }

    /// Something is being dragged over the view at `point`.
    ///
    /// `key` is a key pressed during the drag: Right/Left expand or collapse
    /// the folder under the pointer, the navigation keys scroll. Near the top
    /// or bottom edge the view auto-scrolls once the pointer has dwelt there.
    /// `now_ms` is a monotonic timestamp. The insert mark is shown only when
    /// `can_drop`.
    pub fn drag_over(&mut self, point: Point, can_drop: bool, key: Option<Key>, now_ms: u64) -> DropInfo {
        let mut state = self.drag.take().unwrap_or_default();
        self.pointer = Some(point);

        if let Some(key) = key {
            self.drag_key(point, key);
        }
        self.drag_auto_scroll(&mut state, point, now_ms);

        let info = self.drop_info(point);
        let mark = if can_drop {
            InsertMark::from_drop(&info)
        } else {
            None
        };
        if mark != state.mark {
            tracing::trace!(target: targets::DRAG_DROP, ?mark, "insert mark changed");
            for old_or_new in [state.mark, mark].into_iter().flatten() {
                self.request_repaint(RepaintRegion::Row(old_or_new.index));
            }
            state.mark = mark;
        }
        self.drag = Some(state);
        info
    }

    fn drag_key(&mut self, point: Point, key: Key) {
        let pos = self.vscroll.pos();
        match key {
            Key::Right | Key::Left => {
                if let Some(hit) = self.hit_test(point)
                    && hit.item.is_folder()
                    && let Err(err) = self.expand(hit.index, Some(key == Key::Right))
                {
                    tracing::debug!(target: targets::DRAG_DROP, %err, "expand during drag failed");
                }
            }
            Key::Down => self.scroll_to(pos + KEY_SCROLL_ROWS, ScrollSource::Keyboard),
            Key::Up => self.scroll_to(pos.saturating_sub(KEY_SCROLL_ROWS), ScrollSource::Keyboard),
            Key::PageDown => {
                let page = self.vscroll.page_size();
                self.scroll_to(pos + page, ScrollSource::Keyboard);
            }
            Key::PageUp => {
                let page = self.vscroll.page_size();
                self.scroll_to(pos.saturating_sub(page), ScrollSource::Keyboard);
            }
            Key::Home => self.scroll_to(0, ScrollSource::Keyboard),
            Key::End => self.scroll_to(self.vscroll.max(), ScrollSource::Keyboard),
            _ => {}
        }
    }

    fn drag_auto_scroll(&mut self, state: &mut DragOverState, point: Point, now_ms: u64) {
        let zone = self.metrics.image_size * 3 / 2;
        let height = self.viewport_size().height;
        let direction = if height <= zone * 3 {
            0
        } else if point.y < zone {
            -1
        } else if point.y >= height - zone {
            1
        } else {
            0
        };
        if direction == 0 {
            state.scroll_delay_since = None;
            state.last_scroll = None;
            return;
        }

        let since = *state.scroll_delay_since.get_or_insert(now_ms);
        if now_ms.saturating_sub(since) < SCROLL_DELAY_MS {
            return;
        }
        if state
            .last_scroll
            .is_some_and(|last| now_ms.saturating_sub(last) < SCROLL_INTERVAL_MS)
        {
            return;
        }
        state.last_scroll = Some(now_ms);
        let pos = self.vscroll.pos();
        let target = if direction < 0 {
            pos.saturating_sub(1)
        } else {
            pos + 1
        };
        tracing::trace!(target: targets::DRAG_DROP, direction, "drag auto-scroll");
        self.scroll_to(target, ScrollSource::Programmatic);
    }

    /// The drag left the view. Hides the insert mark.
    pub fn drag_leave(&mut self) {
        if let Some(state) = self.drag.take()
            && let Some(mark) = state.mark
        {
            self.request_repaint(RepaintRegion::Row(mark.index));
        }
    }

    /// The dragged data was dropped at `point`. Returns where it lands and
    /// hides the insert mark.
    pub fn drop_at(&mut self, point: Point) -> DropInfo {
        let info = self.drop_info(point);
        tracing::debug!(target: targets::DRAG_DROP, index = ?info.target_index, after = info.insert_after, into = info.into_folder, "drop");
        self.drag_leave();
        info
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_row_halves() {
        assert_eq!(classify_drop(3, 0, 20, false, false), (3, false, false));
        assert_eq!(classify_drop(3, 9, 20, false, false), (3, false, false));
        assert_eq!(classify_drop(3, 10, 20, false, false), (3, true, false));
        assert_eq!(classify_drop(3, 19, 20, false, false), (3, true, false));
    }

    #[test]
    fn test_folder_bands() {
        assert_eq!(classify_drop(2, 4, 20, true, false), (2, false, false));
        assert_eq!(classify_drop(2, 5, 20, true, false), (2, false, true));
        assert_eq!(classify_drop(2, 14, 20, true, false), (2, false, true));
        assert_eq!(classify_drop(2, 15, 20, true, false), (2, true, false));
    }

    #[test]
    fn test_expanded_folder_resolves_before_first_child() {
        // 60% down an expanded folder row.
        assert_eq!(classify_drop(0, 12, 20, true, true), (1, false, false));
        assert_eq!(classify_drop(0, 19, 20, true, true), (1, false, false));
        assert_eq!(classify_drop(0, 2, 20, true, true), (0, false, false));
    }

    #[test]
    fn test_insert_mark_kind() {
        let info = DropInfo {
            point: Point::ZERO,
            target_index: Some(4),
            insert_after: true,
            into_folder: false,
        };
        assert_eq!(
            InsertMark::from_drop(&info),
            Some(InsertMark {
                index: 4,
                position: InsertPosition::After
            })
        );
        let none = DropInfo {
            target_index: None,
            ..info
        };
        assert_eq!(InsertMark::from_drop(&none), None);
    }
}
