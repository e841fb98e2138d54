//! Scroll virtualization.
//!
//! A [`ScrollAxis`] is the logical state of one scrollbar: the position is an
//! item index, and the index-to-pixel mapping is a callback, so the axis does
//! not need to know how tall rows are. The vertical axis of a tree view maps
//! row `i` to `i * item_height`; the horizontal axis maps pixels to
//! themselves.

use std::ops::Range;
use std::sync::Arc;

use lattice_treeview_core::Signal;
use lattice_treeview_core::logging::targets;

use crate::input::Key;

/// What caused a scroll position change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScrollSource {
    /// Mouse wheel.
    Wheel,
    /// Scrollbar thumb tracking.
    Drag,
    /// Scrollbar arrows or track clicks.
    Line,
    /// Keyboard navigation.
    Keyboard,
    /// API call or internal adjustment.
    Programmatic,
}

impl ScrollSource {
    /// Whether the change comes from interacting with the scrollbar itself.
    pub fn is_scrollbar(self) -> bool {
        matches!(self, ScrollSource::Drag | ScrollSource::Line)
    }
}

/// Maps an item index to the pixel offset of its leading edge.
pub type OffsetFn = Arc<dyn Fn(usize) -> i64 + Send + Sync>;

/// Logical scrollbar state for one axis.
///
/// # Signals
///
/// - `position_changed((usize, ScrollSource))`: Emitted when the position
///   changes, tagged with its cause
pub struct ScrollAxis {
    vertical: bool,
    visible: bool,
    pos: usize,
    n_items: usize,
    viewport: i32,
    max: usize,
    offset_of: OffsetFn,

    /// Signal emitted when the position changes.
    pub position_changed: Signal<(usize, ScrollSource)>,
}

impl ScrollAxis {
    /// Create an axis with the given index-to-offset mapping.
    pub fn new(vertical: bool, offset_of: OffsetFn) -> Self {
        Self {
            vertical,
            visible: false,
            pos: 0,
            n_items: 0,
            viewport: 0,
            max: 0,
            offset_of,
            position_changed: Signal::new(),
        }
    }

    /// An axis whose items are `extent` pixels each.
    pub fn uniform(vertical: bool, extent: i32) -> Self {
        Self::new(vertical, uniform_offsets(extent))
    }

    pub fn is_vertical(&self) -> bool {
        self.vertical
    }

    /// Whether the scrollbar is shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide. Returns whether visibility changed.
    pub(crate) fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Index of the first item in view.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Largest position: the first index of the last full page.
    pub fn max(&self) -> usize {
        self.max
    }

    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Viewport length in pixels.
    pub fn viewport(&self) -> i32 {
        self.viewport
    }

    /// Replace the index-to-offset mapping.
    pub(crate) fn set_offset_mapping(&mut self, offset_of: OffsetFn) {
        self.offset_of = offset_of;
        self.recompute_max();
    }

    /// Pixel offset of item `index` from the start of the content.
    pub fn offset_of(&self, index: usize) -> i64 {
        (self.offset_of)(index)
    }

    /// Pixel offset of item `index` relative to the viewport start.
    pub fn view_offset(&self, index: usize) -> i64 {
        self.offset_of(index) - self.offset_of(self.pos)
    }

    /// Set item count and viewport length. The position is clamped.
    ///
    /// Returns `true` if clamping changed the position.
    pub(crate) fn set_range(&mut self, n_items: usize, viewport: i32) -> bool {
        self.n_items = n_items;
        self.viewport = viewport.max(0);
        self.recompute_max();
        let clamped = self.pos.min(self.max);
        self.apply_pos(clamped, ScrollSource::Programmatic)
    }

    /// Scroll to `pos`, clamped to `[0, max]`.
    ///
    /// Returns `true` and emits `position_changed` if the position changed.
    pub fn set_pos(&mut self, pos: usize, source: ScrollSource) -> bool {
        let pos = pos.min(self.max);
        self.apply_pos(pos, source)
    }

    fn apply_pos(&mut self, pos: usize, source: ScrollSource) -> bool {
        if pos == self.pos {
            return false;
        }
        tracing::trace!(
            target: targets::SCROLL,
            vertical = self.vertical,
            from = self.pos,
            to = pos,
            ?source,
            "scroll position changed"
        );
        self.pos = pos;
        self.position_changed.emit((pos, source));
        true
    }

    // Smallest position from which the rest of the content fits.
    fn recompute_max(&mut self) {
        let n = self.n_items;
        if n == 0 {
            self.max = 0;
            return;
        }
        let end = self.offset_of(n);
        let viewport = i64::from(self.viewport);
        let (mut lo, mut hi) = (0usize, n);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if end - self.offset_of(mid) <= viewport {
                hi = mid;
            } else {
                lo = mid + 1;
            }
        }
        self.max = lo.min(n - 1);
    }

    /// Number of items that fit entirely in the viewport from the current
    /// position (at least 1 when there are items).
    pub fn page_size(&self) -> usize {
        let start = self.offset_of(self.pos);
        let viewport = i64::from(self.viewport);
        let mut k = 0;
        while self.pos + k < self.n_items && self.offset_of(self.pos + k + 1) - start <= viewport {
            k += 1;
        }
        k.max(usize::from(self.n_items > 0))
    }

    /// Items at least partially inside a viewport of `length` pixels:
    /// `[pos, min(pos + ceil(length / extent), n))` for uniform extents.
    pub fn view_range(&self, length: i32) -> Range<usize> {
        if self.n_items == 0 {
            return 0..0;
        }
        let start = self.offset_of(self.pos);
        let limit = start + i64::from(length.max(0));
        let mut end = self.pos;
        while end < self.n_items && self.offset_of(end) < limit {
            end += 1;
        }
        self.pos..end
    }

    /// Index that navigation key `key` moves to from `focused`.
    ///
    /// Page keys first move to the edge of the current page, then by a page.
    /// Returns `None` for non-navigation keys or an empty axis.
    pub fn key_navigate(&self, focused: Option<usize>, key: Key) -> Option<usize> {
        let n = self.n_items;
        if n == 0 {
            return None;
        }
        let last = n - 1;
        let page = self.page_size();
        let step = page.saturating_sub(1).max(1);
        let target = match (key, focused) {
            (Key::Home, _) => 0,
            (Key::End, _) => last,
            (Key::Down, Some(f)) => f + 1,
            (Key::Up, Some(f)) => f.saturating_sub(1),
            (Key::Down | Key::Up, None) => self.pos,
            (Key::PageDown, f) => {
                let page_last = self.pos + page - 1;
                match f {
                    Some(f) if f >= page_last => f + step,
                    _ => page_last,
                }
            }
            (Key::PageUp, f) => match f {
                Some(f) if f <= self.pos => f.saturating_sub(step),
                _ => self.pos,
            },
            _ => return None,
        };
        Some(target.min(last))
    }
}

/// Mapping for items of a fixed pixel extent.
pub fn uniform_offsets(extent: i32) -> OffsetFn {
    let extent = i64::from(extent.max(1));
    Arc::new(move |i: usize| i as i64 * extent)
}

impl std::fmt::Debug for ScrollAxis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScrollAxis")
            .field("vertical", &self.vertical)
            .field("visible", &self.visible)
            .field("pos", &self.pos)
            .field("max", &self.max)
            .field("n_items", &self.n_items)
            .field("viewport", &self.viewport)
            .finish()
    }
}
