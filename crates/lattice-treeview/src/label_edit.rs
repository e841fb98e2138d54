//! In-place label editing.
//!
//! The view does not own an edit control. It tells the host where to place
//! one and with which text (`label_edit_started`), receives text updates
//! through [`TreeView::set_label_edit_text`], and reports the outcome
//! (`label_edit_ended`). Only one session exists at a time.

use lattice_treeview_core::Rect;
use lattice_treeview_core::logging::targets;

use crate::error::{Result, TreeError};
use crate::geometry::TvParts;
use crate::item::ItemRef;
use crate::scroll::ScrollSource;
use crate::view::{RepaintRegion, TreeView};

/// Narrowest edit rectangle worth showing, in pixels.
const MIN_EDIT_WIDTH: i32 = 8;

/// Callback run when a session ends; receives whether it was committed.
pub type EndedCallback = Box<dyn FnOnce(bool) + Send + Sync>;

/// Whether a label edit is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum LabelEditState {
    #[default]
    Idle,
    Editing,
}

/// Payload of `label_edit_started`.
#[derive(Clone)]
pub struct LabelEditStarted {
    pub index: usize,
    pub item: ItemRef,
    /// Where to place the edit control, in client coordinates.
    pub rect: Rect,
    pub text: String,
}

impl std::fmt::Debug for LabelEditStarted {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelEditStarted")
            .field("index", &self.index)
            .field("item", &crate::item::DebugItem(&self.item))
            .field("rect", &self.rect)
            .field("text", &self.text)
            .finish()
    }
}

/// Payload of `label_edit_ended`.
#[derive(Clone)]
pub struct LabelEditEnded {
    pub item: ItemRef,
    pub committed: bool,
    /// Final text when committed.
    pub text: Option<String>,
}

impl std::fmt::Debug for LabelEditEnded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LabelEditEnded")
            .field("item", &crate::item::DebugItem(&self.item))
            .field("committed", &self.committed)
            .field("text", &self.text)
            .finish()
    }
}

struct EditSession {
    item: ItemRef,
    original: String,
    text: String,
    on_ended: Option<EndedCallback>,
}

#[derive(Default)]
pub(crate) struct LabelEditor {
    session: Option<EditSession>,
}

impl TreeView {
    /// Start editing the label of row `index`.
    ///
    /// Any running edit is ended first. Returns `Ok(false)` when there is
    /// no room to show an edit control.
    pub fn edit_label(&mut self, index: usize) -> Result<bool> {
        self.start_label_edit(index, None)
    }

    /// [`edit_label`](Self::edit_label), running `on_ended` with the
    /// committed flag when the session ends.
    pub fn edit_label_then(
        &mut self,
        index: usize,
        on_ended: impl FnOnce(bool) + Send + Sync + 'static,
    ) -> Result<bool> {
        self.start_label_edit(index, Some(Box::new(on_ended)))
    }

    /// Edit the focused row's label. `Ok(false)` if nothing is focused.
    pub fn edit_focused_label(&mut self) -> Result<bool> {
        match self.focused {
            Some(index) => self.edit_label(index),
            None => Ok(false),
        }
    }

    /// [`edit_label`](Self::edit_label) by identity.
    pub fn edit_item_label(&mut self, item: &ItemRef) -> Result<bool> {
        let index = self.index_of_or_err(item)?;
        self.edit_label(index)
    }

    fn start_label_edit(&mut self, index: usize, on_ended: Option<EndedCallback>) -> Result<bool> {
        let item = self.item(index)?.clone();
        if !item.can_rename() {
            tracing::warn!(target: targets::LABEL_EDIT, index, "item cannot be renamed");
            return Err(TreeError::NotRenamable { index });
        }
        self.end_label_edit(false);
        self.ensure_visible_from(index, false, ScrollSource::Programmatic);
        if self.client.is_none() {
            return Ok(false);
        }

        let mut rect = self.rect_of_parts(index, TvParts::TEXT | TvParts::MARGIN_RIGHT | TvParts::RIGHT)?;
        rect = Rect::from_ltrb(
            rect.left() - self.metrics.image_margin_x,
            rect.top(),
            rect.right(),
            rect.bottom(),
        );
        let viewport = self.viewport_size();
        let Some(rect) = rect.intersect(&Rect::new(0, 0, viewport.width, viewport.height)) else {
            return Ok(false);
        };
        if rect.width() < MIN_EDIT_WIDTH {
            tracing::debug!(target: targets::LABEL_EDIT, index, width = rect.width(), "no room for label edit");
            return Ok(false);
        }

        let text = item.display_text();
        tracing::debug!(target: targets::LABEL_EDIT, index, "label edit started");
        self.label_edit.session = Some(EditSession {
            item: item.clone(),
            original: text.clone(),
            text: text.clone(),
            on_ended,
        });
        self.label_edit_started.emit(LabelEditStarted {
            index,
            item,
            rect,
            text,
        });
        Ok(true)
    }

    /// Update the edit buffer. Ignored when no edit is running.
    pub fn set_label_edit_text(&mut self, text: impl Into<String>) {
        if let Some(session) = self.label_edit.session.as_mut() {
            session.text = text.into();
        }
    }

    /// Current edit buffer.
    pub fn label_edit_text(&self) -> Option<&str> {
        self.label_edit.session.as_ref().map(|s| s.text.as_str())
    }

    pub fn is_editing_label(&self) -> bool {
        self.label_edit.session.is_some()
    }

    pub fn label_edit_state(&self) -> LabelEditState {
        if self.is_editing_label() {
            LabelEditState::Editing
        } else {
            LabelEditState::Idle
        }
    }

    /// End the running edit, committing unless `cancel`.
    ///
    /// A session whose item is no longer visible is always cancelled. On
    /// commit with changed text the item is renamed and remeasured. Returns
    /// whether a session was running.
    pub fn end_label_edit(&mut self, cancel: bool) -> bool {
        let Some(session) = self.label_edit.session.take() else {
            return false;
        };
        let index = self.seq.index_of(&session.item);
        let committed = !cancel && index.is_some() && self.client.is_some();

        if committed && session.text != session.original {
            session.item.set_new_text(&session.text);
            if let Some(i) = index {
                self.remeasure_row(i);
                self.request_repaint(RepaintRegion::Row(i));
            }
        }
        tracing::debug!(target: targets::LABEL_EDIT, committed, "label edit ended");

        if let Some(on_ended) = session.on_ended {
            on_ended(committed);
        }
        self.label_edit_ended.emit(LabelEditEnded {
            item: session.item,
            committed,
            text: committed.then_some(session.text),
        });
        true
    }
}
