//! Selection and focus.
//!
//! Every visible row carries its own selection flag; focus is a single
//! optional index. Both are re-applied by identity whenever the visible
//! sequence is rebuilt.
//!
//! Index-based operations validate against the current sequence and return
//! [`TreeError::IndexOutOfRange`]. Identity-based selection fails with
//! [`TreeError::ItemNotFound`] only when selecting; unselecting an item that
//! is not visible is a no-op.

use std::ops::{Bound, Range, RangeBounds};

use lattice_treeview_core::logging::targets;

use crate::error::{Result, TreeError};
use crate::item::ItemRef;
use crate::scroll::ScrollSource;
use crate::view::{RepaintRegion, TreeView};

impl TreeView {
    fn resolve_range(&self, range: impl RangeBounds<usize>) -> Result<Range<usize>> {
        let len = self.seq.len();
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e.saturating_add(1),
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        if end > len {
            tracing::warn!(target: targets::SELECTION, end, len, "selection range out of bounds");
            return Err(TreeError::out_of_range(end - 1, len));
        }
        Ok(start..end.max(start))
    }

    /// Set selection flags without validation or notification.
    ///
    /// Returns whether any flag changed.
    pub(crate) fn apply_selection(&mut self, range: Range<usize>, on: bool, unselect_others: bool) -> bool {
        let mut changed = Vec::new();
        for (i, row) in self.seq.iter_mut().enumerate() {
            let target = if range.contains(&i) {
                on
            } else if unselect_others {
                false
            } else {
                continue;
            };
            if row.is_selected != target && row.select(target) {
                changed.push(i);
            }
        }
        for &i in &changed {
            self.request_repaint(RepaintRegion::Row(i));
        }
        !changed.is_empty()
    }

    /// Move focus without validation. Repaints the old and new focus rows.
    pub(crate) fn apply_focus(&mut self, index: Option<usize>, ensure_visible: bool, source: ScrollSource) {
        let old = std::mem::replace(&mut self.focused, index);
        if old != index {
            tracing::trace!(target: targets::SELECTION, ?old, new = ?index, "focus moved");
            if let Some(i) = old {
                self.request_repaint(RepaintRegion::Row(i));
            }
            if let Some(i) = index {
                self.request_repaint(RepaintRegion::Row(i));
            }
        }
        if ensure_visible && let Some(i) = index {
            self.ensure_visible_from(i, false, source);
        }
    }

    /// Drop all but one selected row after multi-select was turned off. The
    /// focused row is kept if selected, otherwise the first selected row.
    pub(crate) fn keep_single_selection(&mut self) {
        let keep = self
            .focused
            .filter(|&f| self.is_selected(f))
            .or_else(|| self.seq.iter().position(|v| v.is_selected));
        let Some(keep) = keep else {
            return;
        };
        if self.apply_selection(keep..keep + 1, true, true) {
            tracing::debug!(target: targets::SELECTION, keep, "selection reduced to one row");
            self.selection_changed.emit(());
        }
    }

    // =========================================================================
    // Selection
    // =========================================================================

    /// Select or unselect the row at `index`.
    pub fn select(&mut self, index: usize, on: bool, unselect_others: bool) -> Result<()> {
        self.select_range(index..=index, on, unselect_others)
    }

    /// Select or unselect a range of rows.
    ///
    /// Unselectable rows are skipped when selecting. Without multi-select,
    /// selecting more than one row is an error and `unselect_others` is
    /// implied. `selection_changed` fires at most once per call.
    pub fn select_range(
        &mut self,
        range: impl RangeBounds<usize>,
        on: bool,
        unselect_others: bool,
    ) -> Result<()> {
        let range = self.resolve_range(range)?;
        let mut unselect_others = unselect_others;
        if on && !self.config.multi_select {
            if range.len() > 1 {
                tracing::warn!(target: targets::SELECTION, len = range.len(), "range select without multi-select");
                return Err(TreeError::MultiSelectRequired { len: range.len() });
            }
            unselect_others = true;
        }
        self.select_range_unchecked(range, on, unselect_others);
        Ok(())
    }

    fn select_range_unchecked(&mut self, range: Range<usize>, on: bool, unselect_others: bool) {
        let single = (on && unselect_others && range.len() == 1).then_some(range.start);
        if self.apply_selection(range, on, unselect_others) {
            tracing::debug!(
                target: targets::SELECTION,
                on,
                unselect_others,
                selected = self.seq.iter().filter(|v| v.is_selected).count(),
                "selection changed"
            );
            self.selection_changed.emit(());
            if let Some(i) = single
                && self.seq.get(i).is_some_and(|v| v.is_selected)
            {
                self.selected_single.emit(i);
            }
        }
    }

    /// [`select`](Self::select) by identity.
    pub fn select_item(&mut self, item: &ItemRef, on: bool, unselect_others: bool) -> Result<()> {
        match self.seq.index_of(item) {
            Some(index) => self.select(index, on, unselect_others),
            None if !on => Ok(()),
            None => {
                tracing::warn!(target: targets::SELECTION, "select of item not in visible sequence");
                Err(TreeError::ItemNotFound)
            }
        }
    }

    /// Select `index`, unselect everything else, optionally focusing it.
    pub fn select_single(&mut self, index: usize, focus: bool) -> Result<()> {
        self.check_index(index)?;
        self.select_range_unchecked(index..index + 1, true, true);
        if focus {
            self.apply_focus(Some(index), true, ScrollSource::Programmatic);
        }
        Ok(())
    }

    /// [`select_single`](Self::select_single) by identity.
    pub fn select_single_item(&mut self, item: &ItemRef, focus: bool) -> Result<()> {
        let index = self.index_of_or_err(item)?;
        self.select_single(index, focus)
    }

    /// Select (or unselect) and focus `index`.
    ///
    /// With `scroll_top`, the row is scrolled to the top of the viewport;
    /// otherwise it is only scrolled into view.
    pub fn select_and_focus(
        &mut self,
        index: usize,
        on: bool,
        unselect_others: bool,
        scroll_top: bool,
    ) -> Result<()> {
        self.select(index, on, unselect_others)?;
        self.apply_focus(Some(index), false, ScrollSource::Programmatic);
        self.ensure_visible_from(index, scroll_top, ScrollSource::Programmatic);
        Ok(())
    }

    /// Select every selectable row.
    pub fn select_all(&mut self) -> Result<()> {
        self.select_range(.., true, false)
    }

    /// Clear the selection.
    pub fn unselect_all(&mut self) {
        let len = self.seq.len();
        self.select_range_unchecked(len..len, false, true);
    }

    /// Select every row between the focused row (or the first row) and `to`,
    /// inclusive, leaving the rest of the selection alone.
    pub fn shift_range_select(&mut self, to: usize) -> Result<()> {
        self.check_index(to)?;
        let from = self.focused.unwrap_or(0).min(self.seq.len() - 1);
        let (lo, hi) = if from <= to { (from, to) } else { (to, from) };
        self.select_range(lo..=hi, true, false)
    }

    // =========================================================================
    // Focus
    // =========================================================================

    /// Move focus to `index` (or clear it). Selection is not changed.
    pub fn set_focused_index(&mut self, index: Option<usize>, ensure_visible: bool) -> Result<()> {
        if let Some(i) = index {
            self.check_index(i)?;
        }
        self.apply_focus(index, ensure_visible, ScrollSource::Programmatic);
        Ok(())
    }

    /// [`set_focused_index`](Self::set_focused_index) by identity.
    pub fn set_focused_item(&mut self, item: &ItemRef, ensure_visible: bool) -> Result<()> {
        let index = self.index_of_or_err(item)?;
        self.set_focused_index(Some(index), ensure_visible)
    }

    // =========================================================================
    // Queries
    // =========================================================================

    pub fn is_selected(&self, index: usize) -> bool {
        self.seq.get(index).is_some_and(|v| v.is_selected)
    }

    /// Indices of selected rows, ascending.
    pub fn selected_indices(&self) -> Vec<usize> {
        self.seq
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_selected)
            .map(|(i, _)| i)
            .collect()
    }

    /// Selected items in visible order.
    pub fn selected_items(&self) -> Vec<ItemRef> {
        self.seq
            .iter()
            .filter(|v| v.is_selected)
            .map(|v| v.item.clone())
            .collect()
    }

    /// First selected row.
    pub fn selected_index(&self) -> Option<usize> {
        self.seq.iter().position(|v| v.is_selected)
    }

    /// First selected item.
    pub fn selected_item(&self) -> Option<ItemRef> {
        self.selected_index().and_then(|i| self.seq.item(i).cloned())
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.focused
    }

    pub fn focused_item(&self) -> Option<ItemRef> {
        self.focused.and_then(|i| self.seq.item(i).cloned())
    }
}
