//! Keyboard and pointer processing.

use lattice_treeview_core::Point;
use lattice_treeview_core::logging::targets;

use crate::geometry::TvParts;
use crate::input::{Key, KeyboardModifiers, MouseButton, PointerCapture, TvItemEvent};
use crate::scroll::ScrollSource;
use crate::view::{RepaintRegion, TreeView};

impl TreeView {
    fn item_event(
        &self,
        index: usize,
        part: TvParts,
        button: Option<MouseButton>,
        click_count: u8,
        point: Point,
        modifiers: KeyboardModifiers,
    ) -> Option<TvItemEvent> {
        let item = self.seq.item(index)?.clone();
        Some(TvItemEvent {
            item,
            index,
            part,
            button,
            click_count,
            point,
            modifiers,
        })
    }

    fn activate(&self, event: TvItemEvent) {
        if event.item.is_disabled() {
            tracing::trace!(target: targets::INPUT, index = event.index, "activation of disabled item skipped");
            return;
        }
        self.item_activated.emit(event);
    }

    // =========================================================================
    // Keyboard
    // =========================================================================

    /// Key press. While a label edit is running, Enter commits and Escape
    /// cancels it and other keys belong to the edit control.
    ///
    /// Returns whether the key was handled.
    pub fn key_down(&mut self, key: Key, modifiers: KeyboardModifiers) -> bool {
        if self.is_editing_label() {
            return match key {
                Key::Enter => self.end_label_edit(false),
                Key::Escape => self.end_label_edit(true),
                _ => false,
            };
        }
        self.process_key(key, modifiers)
    }

    /// Handle a navigation, expansion or activation key.
    pub fn process_key(&mut self, key: Key, modifiers: KeyboardModifiers) -> bool {
        if self.seq.is_empty() {
            return false;
        }
        if key.is_navigation() {
            let Some(target) = self.vscroll.key_navigate(self.focused, key) else {
                return false;
            };
            tracing::trace!(target: targets::INPUT, ?key, target, "keyboard navigation");
            if self.config.multi_select && modifiers.shift && !modifiers.control {
                if let Err(err) = self.shift_range_select(target) {
                    tracing::debug!(target: targets::INPUT, %err, "range select failed");
                }
            } else if !modifiers.control {
                self.select_only(target);
            }
            self.apply_focus(Some(target), true, ScrollSource::Keyboard);
            return true;
        }

        let Some(focused) = self.focused.filter(|&f| f < self.seq.len()) else {
            return match key {
                Key::A if modifiers.control && self.config.multi_select => {
                    self.select_all().is_ok()
                }
                _ => false,
            };
        };
        let Some(item) = self.seq.item(focused).cloned() else {
            return false;
        };

        match key {
            Key::Right if item.is_folder() => {
                if !item.is_expanded() {
                    self.expand(focused, Some(true)).is_ok()
                } else if self.seq.next_is_first_child(focused) {
                    self.move_focus_to(focused + 1);
                    true
                } else {
                    false
                }
            }
            Key::Left => {
                if item.is_folder() && item.is_expanded() {
                    self.expand(focused, Some(false)).is_ok()
                } else if let Some(parent) = self.seq.parent_index(focused) {
                    self.move_focus_to(parent);
                    true
                } else {
                    false
                }
            }
            Key::Enter => {
                if let Some(event) =
                    self.item_event(focused, TvParts::NONE, None, 0, Point::ZERO, modifiers)
                {
                    self.activate(event);
                }
                true
            }
            Key::A if modifiers.control && self.config.multi_select => self.select_all().is_ok(),
            _ => false,
        }
    }

    fn select_only(&mut self, index: usize) {
        if let Err(err) = self.select(index, true, true) {
            tracing::debug!(target: targets::INPUT, %err, "select failed");
        }
    }

    fn move_focus_to(&mut self, index: usize) {
        self.select_only(index);
        self.apply_focus(Some(index), true, ScrollSource::Keyboard);
    }

    // =========================================================================
    // Pointer
    // =========================================================================

    /// Button press at `point`. Returns whether an item was hit.
    pub fn pointer_down(
        &mut self,
        button: MouseButton,
        point: Point,
        modifiers: KeyboardModifiers,
        double_click: bool,
    ) -> bool {
        self.pointer = Some(point);
        self.capture = None;
        self.end_label_edit(false);

        let Some(hit) = self.hit_test(point) else {
            if button == MouseButton::Right {
                self.right_click_in_empty_space.emit(point);
            }
            return false;
        };
        let (index, part) = (hit.index, hit.part);
        let is_folder = hit.item.is_folder();

        if button == MouseButton::Left && part == TvParts::IMAGE && is_folder {
            self.toggle(index);
            return true;
        }

        // Ctrl/Shift selection is applied on button up, so it does not
        // interfere with dragging.
        let multi_select = self.config.multi_select
            && button == MouseButton::Left
            && !double_click
            && modifiers.is_ctrl_or_shift_only();
        let checkbox = button == MouseButton::Left && part == TvParts::CHECKBOX && !multi_select;
        let mut unselect_on_up = false;
        if button == MouseButton::Left && !multi_select && !checkbox {
            // Clicking a selected item keeps the others until button up, so
            // several items can be dragged.
            unselect_on_up = self.config.multi_select && self.is_selected(index);
            if !unselect_on_up {
                self.select_only(index);
            }
            self.apply_focus(Some(index), true, ScrollSource::Programmatic);
        }

        if checkbox {
            if let Some(event) = self.item_event(index, part, Some(button), 1, point, modifiers) {
                self.item_click.emit(event);
            }
        } else if !double_click || button == MouseButton::Middle {
            self.capture = Some(PointerCapture {
                button,
                index,
                part,
                point,
                modifiers,
                multi_select,
                unselect_on_up,
            });
        } else if button == MouseButton::Left {
            let single_row_toggle = self.config.full_row_expand && !self.config.multi_select;
            if is_folder && !single_row_toggle {
                self.toggle(index);
            }
            if let Some(event) = self.item_event(index, part, Some(button), 2, point, modifiers) {
                self.item_click.emit(event.clone());
                if !self.config.single_click_activate {
                    self.activate(event);
                }
            }
        }
        true
    }

    /// Button release. Applies deferred multi-selection, or emits the click
    /// for a press that did not turn into a drag. Returns whether a press on
    /// an item was pending.
    pub fn pointer_up(&mut self, button: MouseButton) -> bool {
        let Some(capture) = self.capture.take_if(|c| c.button == button) else {
            return false;
        };
        let index = capture.index;
        if index >= self.seq.len() {
            return true;
        }
        if capture.multi_select {
            let result = if capture.modifiers.control {
                let on = !self.is_selected(index);
                self.select(index, on, false)
            } else {
                self.shift_range_select(index)
            };
            if let Err(err) = result {
                tracing::debug!(target: targets::INPUT, %err, "deferred selection failed");
            }
            self.apply_focus(Some(index), true, ScrollSource::Programmatic);
            return true;
        }

        if capture.unselect_on_up {
            self.select_only(index);
        }
        if self.config.full_row_expand
            && !self.config.multi_select
            && button == MouseButton::Left
            && capture.modifiers.none()
            && self.seq.item(index).is_some_and(|item| item.is_folder())
        {
            self.toggle(index);
        }
        if let Some(event) =
            self.item_event(index, capture.part, Some(button), 1, capture.point, capture.modifiers)
        {
            self.item_click.emit(event.clone());
            if self.config.single_click_activate && button == MouseButton::Left {
                self.activate(event);
            }
        }
        true
    }

    fn toggle(&mut self, index: usize) {
        if let Err(err) = self.expand(index, None) {
            tracing::debug!(target: targets::INPUT, %err, "toggle failed");
        }
    }

    /// Pointer moved to `point`; `buttons` is the held-buttons mask (see
    /// [`MouseButton::mask`]).
    ///
    /// Moving far enough with the pressed button held starts a drag.
    pub fn pointer_move(&mut self, point: Point, buttons: u8) {
        self.pointer = Some(point);
        if let Some(capture) = self.capture.as_ref() {
            if buttons & capture.button.mask() == 0 {
                // The release happened outside the view.
                self.capture = None;
            } else if point.distance(capture.point) > f64::from(self.metrics.line_height) / 4.0
                && let Some(capture) = self.capture.take()
            {
                self.start_drag(capture, point);
                return;
            }
        }
        self.update_hot(point);
    }

    fn start_drag(&mut self, capture: PointerCapture, point: Point) {
        let index = capture.index;
        if index >= self.seq.len() {
            return;
        }
        if !self.is_selected(index) {
            self.select_only(index);
            self.apply_focus(Some(index), false, ScrollSource::Programmatic);
        }
        tracing::debug!(target: targets::DRAG_DROP, index, "drag started");
        if let Some(event) = self.item_event(
            index,
            capture.part,
            Some(capture.button),
            1,
            point,
            capture.modifiers,
        ) {
            self.item_drag_start.emit(event);
        }
    }

    /// The pointer left the view.
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        self.set_hot(None);
    }

    pub(crate) fn update_hot(&mut self, point: Point) {
        let hot = self.hit_test(point).map(|h| h.index);
        self.set_hot(hot);
    }

    fn set_hot(&mut self, hot: Option<usize>) {
        let old = std::mem::replace(&mut self.hot, hot);
        if old == hot || !self.config.hot_track {
            return;
        }
        for index in [old, hot].into_iter().flatten() {
            self.request_repaint(RepaintRegion::Row(index));
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lattice_treeview_core::Size;
    use parking_lot::Mutex;

    use super::*;
    use crate::item::{ItemRef, TreeItem};
    use crate::measure::TextMeasurer;
    use crate::node::TreeNode;

    struct Fixed;

    impl TextMeasurer for Fixed {
        fn measure(&self, text: &str, _bold: bool) -> Size {
            Size::new(text.len() as i32 * 6, 15)
        }
    }

    fn view(multi: bool) -> TreeView {
        let mut tv = TreeView::new(Fixed).with_multi_select(multi);
        tv.set_client_size(Size::new(300, 200));
        let items: Vec<ItemRef> = vec![
            TreeNode::folder("Folder1")
                .expanded(true)
                .child(TreeNode::leaf("Leaf1"))
                .child(TreeNode::leaf("Leaf2"))
                .into(),
            TreeNode::leaf("Leaf3").into(),
            TreeNode::leaf("Leaf4").into(),
        ];
        tv.set_items(items, false);
        tv
    }

    fn text_point(tv: &TreeView, index: usize) -> Point {
        let rect = tv.rect_of_parts(index, TvParts::TEXT).unwrap();
        rect.center()
    }

    #[test]
    fn test_arrow_keys_move_selection() {
        let mut tv = view(false);
        assert!(tv.key_down(Key::Down, KeyboardModifiers::NONE));
        assert_eq!(tv.focused_index(), Some(0));
        tv.key_down(Key::Down, KeyboardModifiers::NONE);
        tv.key_down(Key::Down, KeyboardModifiers::NONE);
        assert_eq!(tv.focused_index(), Some(2));
        assert_eq!(tv.selected_indices(), vec![2]);
        tv.key_down(Key::End, KeyboardModifiers::NONE);
        assert_eq!(tv.selected_indices(), vec![4]);
    }

    #[test]
    fn test_shift_arrow_extends() {
        let mut tv = view(true);
        tv.select_single(1, true).unwrap();
        tv.key_down(Key::Down, KeyboardModifiers::SHIFT);
        tv.key_down(Key::Down, KeyboardModifiers::SHIFT);
        assert_eq!(tv.selected_indices(), vec![1, 2, 3]);
        assert_eq!(tv.focused_index(), Some(3));
    }

    #[test]
    fn test_left_right() {
        let mut tv = view(false);
        tv.select_single(2, true).unwrap();
        // Leaf2 -> parent.
        tv.key_down(Key::Left, KeyboardModifiers::NONE);
        assert_eq!(tv.focused_index(), Some(0));
        // Expanded folder collapses.
        tv.key_down(Key::Left, KeyboardModifiers::NONE);
        assert_eq!(tv.count_visible(), 3);
        tv.key_down(Key::Right, KeyboardModifiers::NONE);
        assert_eq!(tv.count_visible(), 5);
        // Expanded folder moves to its first child.
        tv.key_down(Key::Right, KeyboardModifiers::NONE);
        assert_eq!(tv.focused_index(), Some(1));
    }

    #[test]
    fn test_enter_activates() {
        let mut tv = view(false);
        let got = Arc::new(Mutex::new(Vec::new()));
        let g = got.clone();
        tv.item_activated.connect(move |ev| g.lock().push(ev.index));
        tv.select_single(3, true).unwrap();
        assert!(tv.key_down(Key::Enter, KeyboardModifiers::NONE));
        assert_eq!(*got.lock(), vec![3]);
    }

    #[test]
    fn test_ctrl_a() {
        let mut tv = view(true);
        assert!(tv.key_down(Key::A, KeyboardModifiers::CTRL));
        assert_eq!(tv.selected_indices().len(), 5);
        let mut single = view(false);
        assert!(!single.key_down(Key::A, KeyboardModifiers::CTRL));
    }

    #[test]
    fn test_click_selects_and_focuses() {
        let mut tv = view(false);
        let p = text_point(&tv, 3);
        assert!(tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, false));
        assert!(tv.pointer_up(MouseButton::Left));
        assert_eq!(tv.selected_indices(), vec![3]);
        assert_eq!(tv.focused_index(), Some(3));
    }

    #[test]
    fn test_ctrl_click_toggles_on_release() {
        let mut tv = view(true);
        tv.select_single(1, true).unwrap();
        let p = text_point(&tv, 3);
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::CTRL, false);
        assert_eq!(tv.selected_indices(), vec![1]);
        tv.pointer_up(MouseButton::Left);
        assert_eq!(tv.selected_indices(), vec![1, 3]);
    }

    #[test]
    fn test_image_click_toggles_folder() {
        let mut tv = view(false);
        let p = tv.rect_of_parts(0, TvParts::IMAGE).unwrap().center();
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, false);
        assert_eq!(tv.count_visible(), 3);
        assert!(!tv.item(0).unwrap().is_expanded());
    }

    #[test]
    fn test_double_click_toggles_and_activates() {
        let mut tv = view(false);
        let activated = Arc::new(Mutex::new(0));
        let a = activated.clone();
        tv.item_activated.connect(move |_| *a.lock() += 1);
        let p = text_point(&tv, 0);
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, false);
        tv.pointer_up(MouseButton::Left);
        assert_eq!(tv.count_visible(), 5);
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, true);
        assert_eq!(tv.count_visible(), 3);
        assert_eq!(*activated.lock(), 1);
    }

    #[test]
    fn test_right_click_empty_space() {
        let mut tv = view(false);
        let got = Arc::new(Mutex::new(None));
        let g = got.clone();
        tv.right_click_in_empty_space.connect(move |p| *g.lock() = Some(*p));
        let p = Point::new(10, 190);
        assert!(!tv.pointer_down(MouseButton::Right, p, KeyboardModifiers::NONE, false));
        assert_eq!(*got.lock(), Some(p));
    }

    #[test]
    fn test_drag_start_after_threshold() {
        let mut tv = view(false);
        let started = Arc::new(Mutex::new(Vec::new()));
        let s = started.clone();
        tv.item_drag_start.connect(move |ev| s.lock().push(ev.index));

        let p = text_point(&tv, 3);
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, false);
        tv.pointer_move(Point::new(p.x + 1, p.y), MouseButton::Left.mask());
        assert!(started.lock().is_empty());
        tv.pointer_move(Point::new(p.x + 20, p.y), MouseButton::Left.mask());
        assert_eq!(*started.lock(), vec![3]);
        // The press was consumed by the drag.
        assert!(!tv.pointer_up(MouseButton::Left));
    }

    #[test]
    fn test_right_click_leaves_selection() {
        let mut tv = view(false);
        tv.select_single(1, true).unwrap();
        let clicks = Arc::new(Mutex::new(Vec::new()));
        let c = clicks.clone();
        tv.item_click.connect(move |ev| c.lock().push((ev.index, ev.button)));

        let p = text_point(&tv, 3);
        assert!(tv.pointer_down(MouseButton::Right, p, KeyboardModifiers::NONE, false));
        assert_eq!(tv.selected_indices(), vec![1]);
        assert_eq!(tv.focused_index(), Some(1));
        assert!(clicks.lock().is_empty());
        assert!(tv.pointer_up(MouseButton::Right));
        assert_eq!(*clicks.lock(), vec![(3, Some(MouseButton::Right))]);
        assert_eq!(tv.selected_indices(), vec![1]);
    }

    #[test]
    fn test_click_emitted_on_release_not_on_drag() {
        let mut tv = view(false);
        let clicks = Arc::new(Mutex::new(0));
        let c = clicks.clone();
        tv.item_click.connect(move |_| *c.lock() += 1);

        let p = text_point(&tv, 2);
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, false);
        assert_eq!(*clicks.lock(), 0);
        tv.pointer_move(Point::new(p.x + 30, p.y), MouseButton::Left.mask());
        tv.pointer_up(MouseButton::Left);
        assert_eq!(*clicks.lock(), 0);

        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, false);
        tv.pointer_up(MouseButton::Left);
        assert_eq!(*clicks.lock(), 1);
    }

    #[test]
    fn test_release_outside_drops_pending_press() {
        let mut tv = view(false);
        let p = text_point(&tv, 2);
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, false);
        tv.pointer_move(Point::new(p.x + 30, p.y), 0);
        assert!(!tv.pointer_up(MouseButton::Left));
    }

    #[test]
    fn test_full_row_expand_toggles_on_plain_release() {
        let mut tv = view(false).with_full_row_expand(true);
        let p = text_point(&tv, 0);

        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, false);
        assert_eq!(tv.count_visible(), 5);
        tv.pointer_up(MouseButton::Left);
        assert_eq!(tv.count_visible(), 3);

        // Modifiers suppress the toggle.
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::CTRL, false);
        tv.pointer_up(MouseButton::Left);
        assert_eq!(tv.count_visible(), 3);

        // Double click does not toggle a second time.
        tv.pointer_down(MouseButton::Left, p, KeyboardModifiers::NONE, true);
        assert_eq!(tv.count_visible(), 3);
    }

    #[test]
    fn test_hot_tracking() {
        let mut tv = view(false).with_hot_track(true);
        let p = text_point(&tv, 2);
        tv.pointer_move(p, 0);
        assert_eq!(tv.hot_index(), Some(2));
        assert!(tv.render_rows()[2].hot);
        tv.pointer_leave();
        assert_eq!(tv.hot_index(), None);
    }
}
