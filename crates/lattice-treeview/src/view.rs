//! The tree view: state, layout and the operations that tie the parts
//! together.
//!
//! [`TreeView`] owns the visible sequence, the scroll axes and the selection
//! and focus state. The host feeds it the client size and input events, and
//! draws what [`TreeView::render_rows`] returns whenever
//! `repaint_requested` fires.
//!
//! # Example
//!
//! ```
//! use lattice_treeview::{ItemRef, Size, TextMeasurer, TreeNode, TreeView};
//!
//! struct FixedWidth;
//!
//! impl TextMeasurer for FixedWidth {
//!     fn measure(&self, text: &str, _bold: bool) -> Size {
//!         Size::new(text.chars().count() as i32 * 7, 15)
//!     }
//! }
//!
//! let mut tv = TreeView::new(FixedWidth).with_multi_select(true);
//! tv.set_client_size(Size::new(300, 200));
//!
//! let roots: Vec<ItemRef> = vec![
//!     TreeNode::folder("Folder1")
//!         .expanded(true)
//!         .child(TreeNode::leaf("Leaf1"))
//!         .into(),
//!     TreeNode::leaf("Leaf2").into(),
//! ];
//! tv.set_items(roots, false);
//! assert_eq!(tv.count_visible(), 3);
//! ```

use lattice_treeview_core::logging::targets;
use lattice_treeview_core::{Point, Rect, Signal, Size};

use crate::config::TreeViewConfig;
use crate::drag_drop::{DragOverState, InsertPosition};
use crate::error::{Result, TreeError};
use crate::geometry::{self, HitTest, RowLayout, TvParts};
use crate::input::{PointerCapture, TvItemEvent};
use crate::item::{CheckState, ItemKey, ItemRef};
use crate::label_edit::{LabelEditEnded, LabelEditStarted, LabelEditor};
use crate::measure::{MeasureStats, TextMeasurer};
use crate::metrics::Metrics;
use crate::scroll::{ScrollAxis, ScrollSource, uniform_offsets};
use crate::visible::{VisibleItem, VisibleSequence};

/// Area the host should repaint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RepaintRegion {
    /// The whole client area.
    All,
    /// One row, by visible index.
    Row(usize),
}

/// Everything a renderer needs to draw one row.
#[derive(Clone)]
pub struct RowPaint {
    pub index: usize,
    pub item: ItemRef,
    /// Full-width row rectangle in client coordinates.
    pub rect: Rect,
    pub level: usize,
    pub layout: RowLayout,
    /// Cached text width, `None` if not yet measured.
    pub measured_width: Option<i32>,
    pub check_state: CheckState,
    pub selected: bool,
    pub focused: bool,
    pub hot: bool,
    pub disabled: bool,
    pub bold: bool,
    pub insert_mark: Option<InsertPosition>,
}

impl std::fmt::Debug for RowPaint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RowPaint")
            .field("index", &self.index)
            .field("item", &crate::item::DebugItem(&self.item))
            .field("rect", &self.rect)
            .field("level", &self.level)
            .field("selected", &self.selected)
            .field("focused", &self.focused)
            .field("hot", &self.hot)
            .field("insert_mark", &self.insert_mark)
            .finish()
    }
}

/// A virtualized tree/list view.
///
/// # Signals
///
/// - `selection_changed(())`: Emitted once per selection operation
/// - `selected_single(usize)`: Emitted when one item is selected and the rest unselected
/// - `expanded_changed((usize, bool))`: Emitted after a folder is expanded or collapsed
/// - `item_click(TvItemEvent)`: Emitted when an item is clicked or double-clicked
/// - `item_activated(TvItemEvent)`: Emitted on double click (or single click,
///   if configured) and on Enter; never for disabled items
/// - `item_drag_start(TvItemEvent)`: Emitted when the pointer moves far enough
///   with a button held on an item
/// - `right_click_in_empty_space(Point)`: Emitted on right button down outside any item
/// - `repaint_requested(RepaintRegion)`: Emitted when part of the view must be redrawn
/// - `label_edit_started(LabelEditStarted)` / `label_edit_ended(LabelEditEnded)`
pub struct TreeView {
    // Source and visible sequence
    pub(crate) roots: Vec<ItemRef>,
    pub(crate) seq: VisibleSequence,

    // Configuration
    pub(crate) config: TreeViewConfig,
    pub(crate) metrics: Metrics,
    pub(crate) measurer: Box<dyn TextMeasurer>,

    // Layout
    pub(crate) client: Option<Size>,
    pub(crate) items_width: i32,
    pub(crate) vscroll: ScrollAxis,
    pub(crate) hscroll: ScrollAxis,
    pub(crate) dont_measure: bool,
    pub(crate) in_scrollbar_scroll: bool,
    pub(crate) scroll_correction: bool,
    pub(crate) measure_stats: MeasureStats,
    pub(crate) pending_ensure_visible: Option<(usize, bool)>,

    // Focus and pointer
    pub(crate) focused: Option<usize>,
    pub(crate) hot: Option<usize>,
    pub(crate) pointer: Option<Point>,
    pub(crate) capture: Option<PointerCapture>,

    // Label editing and drag-over
    pub(crate) label_edit: LabelEditor,
    pub(crate) drag: Option<DragOverState>,

    // Signals
    /// Signal emitted once per selection operation.
    pub selection_changed: Signal<()>,
    /// Signal emitted when one item is selected and the others unselected.
    pub selected_single: Signal<usize>,
    /// Signal emitted after a folder is expanded (`true`) or collapsed.
    pub expanded_changed: Signal<(usize, bool)>,
    /// Signal emitted when an item is clicked.
    pub item_click: Signal<TvItemEvent>,
    /// Signal emitted when an item is activated.
    pub item_activated: Signal<TvItemEvent>,
    /// Signal emitted when a drag starts on an item.
    pub item_drag_start: Signal<TvItemEvent>,
    /// Signal emitted on right button down outside any item.
    pub right_click_in_empty_space: Signal<Point>,
    /// Signal emitted when part of the view must be redrawn.
    pub repaint_requested: Signal<RepaintRegion>,
    /// Signal emitted when a label edit starts.
    pub label_edit_started: Signal<LabelEditStarted>,
    /// Signal emitted when a label edit ends.
    pub label_edit_ended: Signal<LabelEditEnded>,
}

impl TreeView {
    /// Create an empty tree view that measures text with `measurer`.
    pub fn new(measurer: impl TextMeasurer + 'static) -> Self {
        let config = TreeViewConfig::default();
        let metrics = Metrics::new(&config, measurer.line_height());
        Self {
            roots: Vec::new(),
            seq: VisibleSequence::new(),
            config,
            metrics,
            measurer: Box::new(measurer),
            client: None,
            items_width: 0,
            vscroll: ScrollAxis::uniform(true, metrics.item_height),
            hscroll: ScrollAxis::uniform(false, 1),
            dont_measure: false,
            in_scrollbar_scroll: false,
            scroll_correction: false,
            measure_stats: MeasureStats::default(),
            pending_ensure_visible: None,
            focused: None,
            hot: None,
            pointer: None,
            capture: None,
            label_edit: LabelEditor::default(),
            drag: None,
            selection_changed: Signal::new(),
            selected_single: Signal::new(),
            expanded_changed: Signal::new(),
            item_click: Signal::new(),
            item_activated: Signal::new(),
            item_drag_start: Signal::new(),
            right_click_in_empty_space: Signal::new(),
            repaint_requested: Signal::new(),
            label_edit_started: Signal::new(),
            label_edit_ended: Signal::new(),
        }
    }

    // =========================================================================
    // Builder Pattern
    // =========================================================================

    /// Replace the whole configuration.
    pub fn with_config(mut self, config: TreeViewConfig) -> Self {
        self.set_config(config);
        self
    }

    pub fn with_multi_select(mut self, multi_select: bool) -> Self {
        self.set_multi_select(multi_select);
        self
    }

    pub fn with_hot_track(mut self, hot_track: bool) -> Self {
        self.config.hot_track = hot_track;
        self
    }

    pub fn with_single_click_activate(mut self, single_click_activate: bool) -> Self {
        self.config.single_click_activate = single_click_activate;
        self
    }

    pub fn with_full_row_expand(mut self, full_row_expand: bool) -> Self {
        self.config.full_row_expand = full_row_expand;
        self
    }

    pub fn with_checkboxes(mut self, has_checkboxes: bool) -> Self {
        self.set_has_checkboxes(has_checkboxes);
        self
    }

    // =========================================================================
    // Configuration
    // =========================================================================

    pub fn config(&self) -> &TreeViewConfig {
        &self.config
    }

    /// Apply a new configuration. Measurement-relevant changes (checkboxes,
    /// margins, item height, DPI) clear all measurements. Turning
    /// multi-select off leaves at most one row selected.
    pub fn set_config(&mut self, config: TreeViewConfig) {
        let remeasure = self.config.affects_measurement(&config);
        let to_single = self.config.multi_select && !config.multi_select;
        self.config = config;
        if to_single {
            self.keep_single_selection();
        }
        if remeasure {
            self.metrics = Metrics::new(&self.config, self.measurer.line_height());
            self.vscroll
                .set_offset_mapping(uniform_offsets(self.metrics.item_height));
            self.measure_clear(true);
        } else {
            self.request_repaint(RepaintRegion::All);
        }
    }

    /// Current physical-pixel metrics.
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn multi_select(&self) -> bool {
        self.config.multi_select
    }

    /// Turning multi-select off leaves at most one row selected.
    pub fn set_multi_select(&mut self, multi_select: bool) {
        if multi_select != self.config.multi_select {
            let config = TreeViewConfig {
                multi_select,
                ..self.config.clone()
            };
            self.set_config(config);
        }
    }

    pub fn has_checkboxes(&self) -> bool {
        self.config.has_checkboxes
    }

    /// Show or hide the checkbox column. Remeasures.
    pub fn set_has_checkboxes(&mut self, has_checkboxes: bool) {
        if has_checkboxes != self.config.has_checkboxes {
            let config = TreeViewConfig {
                has_checkboxes,
                ..self.config.clone()
            };
            self.set_config(config);
        }
    }

    pub fn set_hot_track(&mut self, hot_track: bool) {
        self.config.hot_track = hot_track;
    }

    // =========================================================================
    // Items
    // =========================================================================

    /// Set the root items.
    ///
    /// With `modified`, the roots are the same tree after items were added,
    /// removed or moved: selection, focus and scroll position are preserved.
    /// Otherwise the view is reset.
    pub fn set_items(&mut self, items: Vec<ItemRef>, modified: bool) {
        self.roots = items;
        self.set_visible_items(!modified);
    }

    /// Remove all items.
    pub fn clear(&mut self) {
        self.set_items(Vec::new(), false);
    }

    /// Root items.
    pub fn items(&self) -> &[ItemRef] {
        &self.roots
    }

    /// The visible sequence.
    pub fn visible(&self) -> &VisibleSequence {
        &self.seq
    }

    /// Number of visible items.
    pub fn count_visible(&self) -> usize {
        self.seq.len()
    }

    /// Visible item at `index`.
    pub fn item(&self, index: usize) -> Result<&ItemRef> {
        self.seq
            .item(index)
            .ok_or_else(|| TreeError::out_of_range(index, self.seq.len()))
    }

    /// Visible index of `item`, or `None` if it is not visible.
    pub fn index_of(&self, item: &ItemRef) -> Option<usize> {
        self.seq.index_of(item)
    }

    /// Visible index of the first item matching `pred`.
    pub fn index_where(&self, pred: impl FnMut(&ItemRef) -> bool) -> Option<usize> {
        self.seq.position(pred)
    }

    pub(crate) fn check_index(&self, index: usize) -> Result<()> {
        if index < self.seq.len() {
            Ok(())
        } else {
            tracing::warn!(target: targets::SELECTION, index, len = self.seq.len(), "index out of range");
            Err(TreeError::out_of_range(index, self.seq.len()))
        }
    }

    pub(crate) fn index_of_or_err(&self, item: &ItemRef) -> Result<usize> {
        self.seq.index_of(item).ok_or_else(|| {
            tracing::warn!(target: targets::SELECTION, "item not in visible sequence");
            TreeError::ItemNotFound
        })
    }

    /// Rebuild the visible sequence from the roots.
    ///
    /// Unless `init` (or the view was empty), the selected and focused items
    /// are captured by identity first and re-applied afterwards.
    #[tracing::instrument(skip(self), target = "lattice_treeview::flatten", level = "debug")]
    pub(crate) fn set_visible_items(&mut self, init: bool) {
        let was_empty = self.seq.is_empty();
        self.hot = None;
        self.pending_ensure_visible = None;
        if let Some(drag) = self.drag.as_mut() {
            drag.mark = None;
        }

        let preserve = !(init || was_empty);
        let (selected, focused) = if preserve {
            (self.selected_items(), self.focused_item().map(|f| ItemKey::of(&f)))
        } else {
            (Vec::new(), None)
        };

        self.focused = None;
        self.items_width = 0;
        self.seq = VisibleSequence::rebuild(&self.roots);

        if self.seq.is_empty() && was_empty {
            return;
        }

        let mut restored = 0usize;
        for item in &selected {
            if let Some(i) = self.seq.index_of(item)
                && let Some(row) = self.seq.get_mut(i)
                && row.select(true)
            {
                restored += 1;
            }
        }
        if let Some(key) = focused {
            self.focused = self.seq.index_of_key(key);
        }
        if preserve {
            tracing::debug!(
                target: targets::FLATTEN,
                selected = selected.len(),
                restored,
                focused = ?self.focused,
                "selection re-applied after rebuild"
            );
        }

        if self.client.is_some() {
            if init {
                self.vscroll.set_pos(0, ScrollSource::Programmatic);
            }
            self.measure(false);
            self.request_repaint(RepaintRegion::All);
        }
    }

    // =========================================================================
    // Expand / Collapse
    // =========================================================================

    /// Expand (`Some(true)`), collapse (`Some(false)`) or toggle (`None`) the
    /// folder at `index`.
    ///
    /// Collapsing a folder that contains the focused item moves focus (and
    /// selection) to the folder.
    pub fn expand(&mut self, index: usize, expand: Option<bool>) -> Result<()> {
        let item = self.item(index)?.clone();
        if !item.is_folder() {
            tracing::warn!(target: targets::FLATTEN, index, "expand on non-folder");
            return Err(TreeError::NotAFolder { index });
        }
        let was_expanded = item.is_expanded();
        let expand = expand.unwrap_or(!was_expanded);
        if expand == was_expanded {
            return Ok(());
        }
        let mut selection_moved = false;
        if !expand
            && let Some(focused) = self.focused
            && self.seq.is_inside(index, focused)
        {
            tracing::debug!(target: targets::SELECTION, index, focused, "focus moves to collapsed folder");
            self.focused = Some(index);
            let unselect_others = !self.config.multi_select;
            selection_moved = self.apply_selection(index..index + 1, true, unselect_others);
        }
        item.set_is_expanded(expand);
        self.set_visible_items(false);
        if selection_moved {
            self.selection_changed.emit(());
        }
        self.expanded_changed.emit((index, expand));
        Ok(())
    }

    /// [`expand`](Self::expand) by identity.
    ///
    /// Collapsing an item that is not visible is a no-op.
    pub fn expand_item(&mut self, item: &ItemRef, expand: Option<bool>) -> Result<()> {
        match self.seq.index_of(item) {
            Some(index) => self.expand(index, expand),
            None if expand == Some(false) => Ok(()),
            None => Err(TreeError::ItemNotFound),
        }
    }

    // =========================================================================
    // Layout
    // =========================================================================

    /// Set the client area size (scrollbars included). Call on every resize.
    pub fn set_client_size(&mut self, size: Size) {
        if self.client == Some(size) {
            return;
        }
        self.client = Some(size);
        self.viewport_changed();
        if let Some((index, scroll_top)) = self.pending_ensure_visible.take()
            && index < self.seq.len()
        {
            self.ensure_visible_from(index, scroll_top, ScrollSource::Programmatic);
        }
    }

    /// Client area size, `None` before the first layout.
    pub fn client_size(&self) -> Option<Size> {
        self.client
    }

    /// Client area minus visible scrollbars.
    pub fn viewport_size(&self) -> Size {
        let Some(client) = self.client else {
            return Size::ZERO;
        };
        let mut size = client;
        if self.vscroll.is_visible() {
            size.width -= self.metrics.scrollbar_v;
        }
        if self.hscroll.is_visible() {
            size.height -= self.metrics.scrollbar_h;
        }
        Size::new(size.width.max(0), size.height.max(0))
    }

    /// The viewport was resized, by the host or by a scrollbar toggle.
    pub(crate) fn viewport_changed(&mut self) {
        self.measure(false);
        self.request_repaint(RepaintRegion::All);
    }

    // =========================================================================
    // Scrolling
    // =========================================================================

    /// Vertical scroll axis.
    pub fn vscroll(&self) -> &ScrollAxis {
        &self.vscroll
    }

    /// Horizontal scroll axis.
    pub fn hscroll(&self) -> &ScrollAxis {
        &self.hscroll
    }

    /// Index of the first row in view.
    pub fn top_index(&self) -> usize {
        self.vscroll.pos()
    }

    /// Scroll so that `index` is the first row in view (clamped).
    pub fn set_top_index(&mut self, index: usize) {
        self.scroll_to(index, ScrollSource::Programmatic);
    }

    /// Scroll vertically to row `pos` on behalf of `source`.
    ///
    /// Hosts forward scrollbar interaction here with [`ScrollSource::Drag`]
    /// or [`ScrollSource::Line`], and call [`scroll_ended`](Self::scroll_ended)
    /// when the interaction is over.
    pub fn scroll_to(&mut self, pos: usize, source: ScrollSource) {
        if self.vscroll.set_pos(pos, source) {
            self.vscroll_changed(source);
        }
    }

    /// Scroll by `rows` (positive scrolls down) in response to the mouse wheel.
    pub fn wheel(&mut self, rows: i32) {
        if self.seq.is_empty() || !self.vscroll.is_visible() {
            return;
        }
        let pos = self.vscroll.pos() as i64 + i64::from(rows);
        self.scroll_to(usize::try_from(pos).unwrap_or(0), ScrollSource::Wheel);
    }

    pub(crate) fn vscroll_changed(&mut self, source: ScrollSource) {
        self.hot = None;
        self.in_scrollbar_scroll = source.is_scrollbar();
        self.measure(true);
        self.in_scrollbar_scroll = false;
        self.request_repaint(RepaintRegion::All);
        if source == ScrollSource::Wheel
            && let Some(point) = self.pointer
        {
            self.update_hot(point);
        }
    }

    /// Scrollbar interaction finished.
    ///
    /// If a horizontal scrollbar was deferred while the thumb was dragged, it
    /// is shown now; if that grew the vertical range while scrolled to the
    /// bottom, the last row is brought back into view.
    pub fn scroll_ended(&mut self) {
        if !self.scroll_correction {
            return;
        }
        self.scroll_correction = false;
        let (max, pos) = (self.vscroll.max(), self.vscroll.pos());
        tracing::trace!(target: targets::SCROLL, "applying deferred horizontal scrollbar");
        let vertical = self.vscroll.is_visible();
        self.set_scrollbars(vertical, true);
        self.update_scroll_ranges();
        if self.vscroll.max() > max && pos == max && !self.seq.is_empty() {
            self.ensure_visible_from(self.seq.len() - 1, false, ScrollSource::Programmatic);
        }
    }

    /// Horizontal scroll offset in pixels.
    pub fn h_offset(&self) -> i32 {
        i32::try_from(self.hscroll.pos()).unwrap_or(i32::MAX)
    }

    /// Scroll horizontally (clamped).
    pub fn set_h_offset(&mut self, offset: i32, source: ScrollSource) {
        let offset = usize::try_from(offset).unwrap_or(0);
        if self.hscroll.set_pos(offset, source) {
            self.request_repaint(RepaintRegion::All);
        }
    }

    // =========================================================================
    // Ensure Visible
    // =========================================================================

    /// Scroll if needed so that row `index` is fully in view, or is the top
    /// row with `scroll_top`.
    ///
    /// Before the first layout the request is remembered and applied when the
    /// client size is set.
    pub fn ensure_visible(&mut self, index: usize, scroll_top: bool) -> Result<()> {
        self.check_index(index)?;
        if self.client.is_none() {
            self.pending_ensure_visible = Some((index, scroll_top));
            return Ok(());
        }
        self.ensure_visible_from(index, scroll_top, ScrollSource::Programmatic);
        Ok(())
    }

    pub(crate) fn ensure_visible_from(&mut self, index: usize, scroll_top: bool, source: ScrollSource) {
        if self.client.is_none() {
            self.pending_ensure_visible = Some((index, scroll_top));
            return;
        }
        let mut retried = false;
        loop {
            self.pending_ensure_visible = None;
            let item_height = i64::from(self.metrics.item_height);
            let height = i64::from(self.viewport_size().height);
            let top = self.vscroll.view_offset(index);
            if scroll_top {
                if top != 0 {
                    self.scroll_to(index, source);
                }
            } else if top < 0 || top + item_height > height {
                let max = self.vscroll.max();
                let pos = if top < 0 || height < item_height {
                    index
                } else {
                    (index + 1).saturating_sub(usize::try_from(height / item_height).unwrap_or(0))
                };
                self.scroll_to(pos, source);
                // A horizontal scrollbar may have appeared and now cover the row.
                if !retried && self.vscroll.max() > max {
                    retried = true;
                    continue;
                }
            }
            break;
        }
    }

    /// Expand ancestor folders of `item` as needed and scroll it into view.
    pub fn ensure_item_visible(&mut self, item: &ItemRef, scroll_top: bool) -> Result<()> {
        if self.seq.index_of(item).is_none() {
            if !expand_ancestors(&self.roots, ItemKey::of(item)) {
                tracing::warn!(target: targets::FLATTEN, "item not found in tree");
                return Err(TreeError::ItemNotFound);
            }
            self.set_visible_items(false);
        }
        let index = self.index_of_or_err(item)?;
        self.ensure_visible(index, scroll_top)
    }

    // =========================================================================
    // Geometry
    // =========================================================================

    /// Horizontal layout of row `index`.
    pub fn row_layout(&self, index: usize) -> Result<RowLayout> {
        let row = self
            .seq
            .get(index)
            .ok_or_else(|| TreeError::out_of_range(index, self.seq.len()))?;
        Ok(self.layout_of(row))
    }

    fn layout_of(&self, row: &VisibleItem) -> RowLayout {
        RowLayout::new(
            &self.metrics,
            row.level(),
            row.measured,
            self.h_offset(),
            self.config.has_checkboxes,
        )
    }

    /// Full-width rectangle of row `index` in client coordinates.
    ///
    /// Rows outside the viewport get rectangles outside it.
    pub fn rect_of(&self, index: usize) -> Result<Rect> {
        self.check_index(index)?;
        let top = self.vscroll.view_offset(index);
        let top = i32::try_from(top).unwrap_or(if top < 0 { i32::MIN / 2 } else { i32::MAX / 2 });
        Ok(Rect::new(
            0,
            top,
            self.viewport_size().width,
            self.metrics.item_height,
        ))
    }

    /// Rectangle covering `parts` of row `index`.
    ///
    /// If none of the parts has any width, the result is an empty rectangle
    /// at the item's indent.
    pub fn rect_of_parts(&self, index: usize, parts: TvParts) -> Result<Rect> {
        let row_rect = self.rect_of(index)?;
        let layout = self.row_layout(index)?;
        let (left, right) = layout
            .x_range(parts, row_rect.width())
            .unwrap_or((layout.x_left, layout.x_left));
        Ok(row_rect.with_x_range(left, right))
    }

    /// Item and part under `point`, or `None` if no row is there or the
    /// point is outside the viewport (under a scrollbar, or off the client).
    pub fn hit_test(&self, point: Point) -> Option<HitTest> {
        let viewport = self.viewport_size();
        if !geometry::in_viewport(point, viewport) {
            return None;
        }
        let index = geometry::row_at_y(
            point.y,
            self.vscroll.pos(),
            self.metrics.item_height,
            self.seq.len(),
        )?;
        let row = self.seq.get(index)?;
        let part = self.layout_of(row).part_at(point.x, viewport.width);
        Some(HitTest {
            index,
            item: row.item.clone(),
            part,
        })
    }

    // =========================================================================
    // Redraw / Remeasure
    // =========================================================================

    pub(crate) fn request_repaint(&self, region: RepaintRegion) {
        if self.client.is_none() {
            return;
        }
        if let RepaintRegion::Row(index) = region {
            let range = self.vscroll.view_range(self.viewport_size().height);
            if !range.contains(&index) {
                return;
            }
        }
        self.repaint_requested.emit(region);
    }

    /// Repaint row `index`; with `remeasure`, also invalidate its width
    /// (call after changing its text or boldness).
    pub fn redraw(&mut self, index: usize, remeasure: bool) -> Result<()> {
        self.check_index(index)?;
        if remeasure {
            self.remeasure_row(index);
        }
        self.request_repaint(RepaintRegion::Row(index));
        Ok(())
    }

    /// [`redraw`](Self::redraw) by identity. Does nothing if `item` is not
    /// visible.
    pub fn redraw_item(&mut self, item: &ItemRef, remeasure: bool) {
        if let Some(index) = self.seq.index_of(item) {
            if remeasure {
                self.remeasure_row(index);
            }
            self.request_repaint(RepaintRegion::Row(index));
        }
    }

    /// Repaint everything; with `remeasure`, measure all widths again.
    pub fn redraw_all(&mut self, remeasure: bool) {
        if remeasure {
            self.measure_clear(true);
        } else {
            self.request_repaint(RepaintRegion::All);
        }
    }

    /// Draw data for the rows in view.
    pub fn render_rows(&self) -> Vec<RowPaint> {
        let viewport = self.viewport_size();
        let range = self.vscroll.view_range(viewport.height);
        let mark = self.insert_mark();
        let mut rows = Vec::with_capacity(range.len());
        for index in range {
            let Some(row) = self.seq.get(index) else {
                break;
            };
            let item = &row.item;
            let top = i32::try_from(self.vscroll.view_offset(index)).unwrap_or(0);
            rows.push(RowPaint {
                index,
                item: item.clone(),
                rect: Rect::new(0, top, viewport.width, self.metrics.item_height),
                level: row.level(),
                layout: self.layout_of(row),
                measured_width: row.measured_width(),
                check_state: item.check_state(),
                selected: row.is_selected,
                focused: self.focused == Some(index),
                hot: self.config.hot_track && self.hot == Some(index),
                disabled: item.is_disabled(),
                bold: item.is_bold(),
                insert_mark: mark
                    .filter(|m| m.index == index)
                    .map(|m| m.position),
            });
        }
        rows
    }

    /// Row under the pointer.
    pub fn hot_index(&self) -> Option<usize> {
        self.hot
    }

    // =========================================================================
    // Checkboxes
    // =========================================================================

    /// Indices of visible items whose check state is `Checked`.
    pub fn checked_indices(&self) -> Vec<usize> {
        self.seq
            .iter()
            .enumerate()
            .filter(|(_, v)| v.item.check_state() == CheckState::Checked)
            .map(|(i, _)| i)
            .collect()
    }

    /// Visible items whose check state is `Checked`.
    pub fn checked_items(&self) -> Vec<ItemRef> {
        self.seq
            .iter()
            .filter(|v| v.item.check_state() == CheckState::Checked)
            .map(|v| v.item.clone())
            .collect()
    }
}

/// Expand every folder on the path to `key`. Returns whether it was found.
fn expand_ancestors(items: &[ItemRef], key: ItemKey) -> bool {
    for item in items {
        if ItemKey::of(item) == key {
            return true;
        }
        if item.is_folder() && expand_ancestors(&item.children(), key) {
            item.set_is_expanded(true);
            return true;
        }
    }
    false
}

static_assertions::assert_impl_all!(TreeView: Send, Sync);
