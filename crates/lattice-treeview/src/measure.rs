//! Lazy measurement and scrollbar resolution.
//!
//! Widths are measured only for rows inside the viewport, and only once per
//! row until invalidated. The widest extent seen so far drives the
//! horizontal scrollbar; it only grows, except when the widest row itself is
//! invalidated, which clears every measurement.
//!
//! Toggling a scrollbar changes the client area, and a client-area change
//! normally triggers a measurement pass. While this module is itself toggling
//! scrollbars, such nested passes are ignored (see [`MeasureStats::ignored`]).

use lattice_treeview_core::Size;
use lattice_treeview_core::logging::targets;

use crate::scroll::ScrollSource;
use crate::view::{RepaintRegion, TreeView};

/// Text measurement service.
pub trait TextMeasurer: Send + Sync {
    /// Rendered size of `text` in the view font, bold or normal.
    fn measure(&self, text: &str, bold: bool) -> Size;

    /// Height of a line of text in the view font.
    fn line_height(&self) -> i32 {
        self.measure("A", false).height
    }
}

/// Inputs to [`resolve_scrollbars`], in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollbarInput {
    /// Whole client area, scrollbars included.
    pub client: Size,
    pub items_height: i64,
    pub items_width: i32,
    pub item_count: usize,
    pub image_size: i32,
    pub scrollbar_v: i32,
    pub scrollbar_h: i32,
}

/// Which scrollbars are needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollbarNeeds {
    pub vertical: bool,
    pub horizontal: bool,
}

/// Decide which scrollbars to show.
///
/// The vertical need is decided first, then the horizontal one against the
/// width left by the vertical bar. If the horizontal bar turns out to be
/// needed while the vertical one was not, the vertical need is evaluated
/// once more against the reduced height. There is no further iteration.
pub fn resolve_scrollbars(input: &ScrollbarInput) -> ScrollbarNeeds {
    let mut width = input.client.width;
    let mut height = input.client.height;
    let multi = input.item_count > 1;

    let mut vertical = input.items_height > i64::from(height) && multi;
    if vertical {
        width -= input.scrollbar_v;
    }
    let horizontal =
        input.items_width > width && height >= input.image_size + input.scrollbar_h;
    if horizontal && !vertical {
        height -= input.scrollbar_h;
        vertical = input.items_height > i64::from(height) && multi;
    }

    ScrollbarNeeds {
        vertical,
        horizontal,
    }
}

/// Counters for measurement passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MeasureStats {
    /// Passes that ran.
    pub passes: u64,
    /// Requests ignored because scrollbars were being toggled.
    pub ignored: u64,
}

impl TreeView {
    /// Measure rows in view and update scrollbars.
    ///
    /// Runs on resize, on scroll (`on_scroll`) and after every rebuild of the
    /// visible sequence. A scroll pass that finds nothing wider than before
    /// leaves the scrollbars alone.
    #[tracing::instrument(skip(self), target = "lattice_treeview::measure", level = "trace")]
    pub(crate) fn measure(&mut self, on_scroll: bool) {
        if self.dont_measure {
            self.measure_stats.ignored += 1;
            tracing::trace!(target: targets::MEASURE, "nested measure request ignored");
            return;
        }
        self.end_label_edit(false);

        let Some(client) = self.client else {
            return;
        };
        self.measure_stats.passes += 1;
        let m = self.metrics;
        if client.width <= m.scrollbar_v || client.height <= m.scrollbar_h || self.seq.is_empty()
        {
            self.set_scrollbars(false, false);
            self.update_scroll_ranges();
            return;
        }

        let height = if on_scroll {
            self.viewport_size().height
        } else {
            client.height
        };
        let range = self.vscroll.view_range(height);
        let has_checkboxes = self.config.has_checkboxes;
        let measurer = &*self.measurer;
        let mut max_width = self.items_width;
        let mut measured_rows = 0usize;
        for i in range.clone() {
            let Some(row) = self.seq.get_mut(i) else {
                break;
            };
            if row.measured > 0 {
                continue;
            }
            let item = &row.item;
            let text_width = item
                .measure_text_width(measurer)
                .unwrap_or_else(|| measurer.measure(&item.display_text(), item.is_bold()).width)
                .max(0)
                + 1;
            let extent = m.item_extent(text_width, row.level(), has_checkboxes);
            max_width = max_width.max(extent);
            row.measured = text_width.clamp(1, i32::from(u16::MAX));
            measured_rows += 1;
        }
        tracing::trace!(
            target: targets::MEASURE,
            from = range.start,
            to = range.end,
            measured_rows,
            max_width,
            "measured view range"
        );

        if max_width > self.items_width {
            self.items_width = max_width;
        } else if on_scroll {
            return;
        }

        let needs = resolve_scrollbars(&ScrollbarInput {
            client,
            items_height: self.seq.len() as i64 * i64::from(m.item_height),
            items_width: self.items_width,
            item_count: self.seq.len(),
            image_size: m.image_size,
            scrollbar_v: m.scrollbar_v,
            scrollbar_h: m.scrollbar_h,
        });
        let mut horizontal = needs.horizontal;
        self.scroll_correction =
            horizontal && on_scroll && self.in_scrollbar_scroll && !self.hscroll.is_visible();
        if self.scroll_correction {
            tracing::trace!(
                target: targets::MEASURE,
                "horizontal scrollbar deferred until scrolling ends"
            );
            horizontal = false;
        }
        tracing::debug!(
            target: targets::MEASURE,
            vertical = needs.vertical,
            horizontal,
            items_width = self.items_width,
            "scrollbars resolved"
        );
        self.set_scrollbars(needs.vertical, horizontal);
        self.update_scroll_ranges();
    }

    /// Show or hide scrollbars. A visibility change resizes the viewport,
    /// which requests a measurement pass; that request is ignored here.
    pub(crate) fn set_scrollbars(&mut self, vertical: bool, horizontal: bool) {
        self.dont_measure = true;
        let v_changed = self.vscroll.set_visible(vertical);
        let h_changed = self.hscroll.set_visible(horizontal);
        if v_changed || h_changed {
            self.viewport_changed();
        }
        self.dont_measure = false;
    }

    /// Push the item count and viewport size to both scroll axes.
    pub(crate) fn update_scroll_ranges(&mut self) {
        let viewport = self.viewport_size();
        let clamped = self.vscroll.set_range(self.seq.len(), viewport.height);
        let h_items = if self.hscroll.is_visible() {
            usize::try_from(self.items_width).unwrap_or(0)
        } else {
            0
        };
        self.hscroll.set_range(h_items, viewport.width);
        if clamped {
            self.vscroll_changed(ScrollSource::Programmatic);
        }
    }

    /// Forget all measured widths; with `update_now`, measure again and
    /// repaint.
    pub(crate) fn measure_clear(&mut self, update_now: bool) {
        if self.client.is_none() {
            return;
        }
        for row in self.seq.iter_mut() {
            row.measured = 0;
        }
        self.items_width = 0;
        if update_now {
            self.measure(false);
            self.request_repaint(RepaintRegion::All);
        }
    }

    /// Invalidate the measured width of row `index` and measure again.
    ///
    /// If the row was the widest measured row, every row is remeasured, so
    /// that the horizontal extent can shrink.
    pub(crate) fn remeasure_row(&mut self, index: usize) {
        if self.client.is_none() {
            return;
        }
        let max = self.seq.max_measured();
        let Some(row) = self.seq.get_mut(index) else {
            return;
        };
        if row.measured == max {
            tracing::trace!(target: targets::MEASURE, index, "widest row invalidated");
            self.measure_clear(true);
            return;
        }
        row.measured = 0;
        self.measure(false);
    }

    /// Measurement pass counters.
    pub fn measure_stats(&self) -> MeasureStats {
        self.measure_stats
    }

    /// Widest item extent measured so far, in pixels.
    pub fn items_width(&self) -> i32 {
        self.items_width
    }
}
