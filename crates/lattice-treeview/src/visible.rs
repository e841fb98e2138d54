//! The visible sequence: a flattened, order-preserving projection of the tree.
//!
//! The sequence is the pre-order depth-first walk of the source roots,
//! descending into a folder's children only while the folder is expanded.
//! An identity index maps each item back to its position for O(1) lookup.
//!
//! Rebuilding is always wholesale. Selection and focus survive a rebuild only
//! because the view captures them by identity beforehand and re-applies them
//! through [`VisibleSequence::index_of`] afterwards.

use std::collections::HashMap;

use lattice_treeview_core::logging::targets;

use crate::item::{ItemKey, ItemRef};

/// One row of the visible sequence.
#[derive(Clone)]
pub struct VisibleItem {
    pub(crate) item: ItemRef,
    /// Text width + 1 in pixels, or 0 while unmeasured.
    pub(crate) measured: i32,
    pub(crate) level: u16,
    pub(crate) is_selected: bool,
}

impl VisibleItem {
    fn new(item: ItemRef, level: u16) -> Self {
        Self {
            item,
            measured: 0,
            level,
            is_selected: false,
        }
    }

    /// The source item.
    pub fn item(&self) -> &ItemRef {
        &self.item
    }

    /// Depth from the root, 0-based.
    pub fn level(&self) -> usize {
        usize::from(self.level)
    }

    /// Cached measured text width, `None` while unmeasured.
    pub fn measured_width(&self) -> Option<i32> {
        (self.measured > 0).then_some(self.measured)
    }

    pub fn is_selected(&self) -> bool {
        self.is_selected
    }

    /// Set the selection flag. Turning selection on is refused for
    /// unselectable items; returns whether the flag was applied.
    pub(crate) fn select(&mut self, on: bool) -> bool {
        if on && !self.item.is_selectable() {
            return false;
        }
        self.is_selected = on;
        true
    }
}

impl std::fmt::Debug for VisibleItem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibleItem")
            .field("item", &crate::item::DebugItem(&self.item))
            .field("measured", &self.measured)
            .field("level", &self.level)
            .field("is_selected", &self.is_selected)
            .finish()
    }
}

/// Flattened visible items plus their identity index.
#[derive(Debug, Default, Clone)]
pub struct VisibleSequence {
    items: Vec<VisibleItem>,
    index: HashMap<ItemKey, usize>,
}

impl VisibleSequence {
    /// An empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flatten `roots`.
    ///
    /// Visible nodes are counted first so the array can be allocated once;
    /// each expanded folder's `children()` is therefore evaluated twice.
    #[tracing::instrument(skip_all, target = "lattice_treeview::flatten", level = "debug")]
    pub fn rebuild(roots: &[ItemRef]) -> Self {
        let n = count_visible(roots);
        let mut seq = Self {
            items: Vec::with_capacity(n),
            index: HashMap::with_capacity(n),
        };
        seq.add_visible(roots, 0);
        debug_assert_eq!(seq.items.len(), n, "children() changed between count and fill");
        tracing::debug!(target: targets::FLATTEN, count = seq.items.len(), "visible sequence rebuilt");
        seq
    }

    fn add_visible(&mut self, items: &[ItemRef], level: u16) {
        for item in items {
            let i = self.items.len();
            if self.index.insert(ItemKey::of(item), i).is_some() {
                tracing::warn!(
                    target: targets::FLATTEN,
                    index = i,
                    "item appears twice in the tree; identity lookup returns the last occurrence"
                );
            }
            self.items.push(VisibleItem::new(item.clone(), level));
            if item.is_folder() && item.is_expanded() {
                self.add_visible(&item.children(), level.saturating_add(1));
            }
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&VisibleItem> {
        self.items.get(index)
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut VisibleItem> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, VisibleItem> {
        self.items.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> std::slice::IterMut<'_, VisibleItem> {
        self.items.iter_mut()
    }

    /// Item at `index`.
    pub fn item(&self, index: usize) -> Option<&ItemRef> {
        self.items.get(index).map(|v| &v.item)
    }

    /// Position of `item`, or `None` if it is not visible.
    pub fn index_of(&self, item: &ItemRef) -> Option<usize> {
        self.index.get(&ItemKey::of(item)).copied()
    }

    /// Position of the item with identity `key`.
    pub fn index_of_key(&self, key: ItemKey) -> Option<usize> {
        self.index.get(&key).copied()
    }

    /// First position whose item satisfies `pred`.
    pub fn position(&self, mut pred: impl FnMut(&ItemRef) -> bool) -> Option<usize> {
        self.items.iter().position(|v| pred(&v.item))
    }

    /// Whether `index` is a descendant of the row at `folder`.
    pub fn is_inside(&self, folder: usize, index: usize) -> bool {
        let Some(parent) = self.items.get(folder) else {
            return false;
        };
        if index <= folder || index >= self.items.len() {
            return false;
        }
        self.items[folder + 1..=index]
            .iter()
            .all(|v| v.level > parent.level)
    }

    /// Nearest row above `index` with a smaller level.
    pub fn parent_index(&self, index: usize) -> Option<usize> {
        let level = self.items.get(index)?.level;
        (0..index).rev().find(|&i| self.items[i].level < level)
    }

    /// Whether the row after `index` is its first child.
    pub fn next_is_first_child(&self, index: usize) -> bool {
        match (self.items.get(index), self.items.get(index + 1)) {
            (Some(row), Some(next)) => next.level > row.level,
            _ => false,
        }
    }

    /// Largest cached measured width.
    pub(crate) fn max_measured(&self) -> i32 {
        self.items.iter().map(|v| v.measured).max().unwrap_or(0)
    }
}

fn count_visible(items: &[ItemRef]) -> usize {
    items
        .iter()
        .map(|v| {
            1 + if v.is_folder() && v.is_expanded() {
                count_visible(&v.children())
            } else {
                0
            }
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::TreeNode;
    use crate::item::TreeItem;

    fn sample() -> Vec<ItemRef> {
        vec![
            TreeNode::folder("Folder1")
                .expanded(true)
                .child(TreeNode::leaf("Leaf1"))
                .child(TreeNode::leaf("Leaf2"))
                .into(),
            TreeNode::leaf("Leaf3").into(),
        ]
    }

    fn texts(seq: &VisibleSequence) -> Vec<(String, usize)> {
        seq.iter()
            .map(|v| (v.item().display_text(), v.level()))
            .collect()
    }

    #[test]
    fn test_rebuild_preorder() {
        let seq = VisibleSequence::rebuild(&sample());
        assert_eq!(
            texts(&seq),
            vec![
                ("Folder1".to_string(), 0),
                ("Leaf1".to_string(), 1),
                ("Leaf2".to_string(), 1),
                ("Leaf3".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_collapsed_folder_hides_children() {
        let roots = sample();
        roots[0].set_is_expanded(false);
        let seq = VisibleSequence::rebuild(&roots);
        assert_eq!(seq.len(), 2);
        assert_eq!(seq.index_of(&roots[1]), Some(1));
    }

    #[test]
    fn test_identity_index() {
        let roots = sample();
        let seq = VisibleSequence::rebuild(&roots);
        for (i, v) in seq.iter().enumerate() {
            assert_eq!(seq.index_of(v.item()), Some(i));
        }
        let stranger: ItemRef = TreeNode::leaf("x").into();
        assert_eq!(seq.index_of(&stranger), None);
    }

    #[test]
    fn test_empty() {
        let seq = VisibleSequence::rebuild(&[]);
        assert!(seq.is_empty());
        assert_eq!(seq.parent_index(0), None);
    }

    #[test]
    fn test_structure_queries() {
        let seq = VisibleSequence::rebuild(&sample());
        assert!(seq.is_inside(0, 1));
        assert!(seq.is_inside(0, 2));
        assert!(!seq.is_inside(0, 3));
        assert!(!seq.is_inside(1, 2));
        assert_eq!(seq.parent_index(2), Some(0));
        assert_eq!(seq.parent_index(3), None);
        assert!(seq.next_is_first_child(0));
        assert!(!seq.next_is_first_child(1));
        assert!(!seq.next_is_first_child(3));
    }

    #[test]
    fn test_unselectable_refuses_selection() {
        let roots: Vec<ItemRef> = vec![TreeNode::leaf("x").selectable(false).into()];
        let mut seq = VisibleSequence::rebuild(&roots);
        let row = seq.get_mut(0).unwrap();
        assert!(!row.select(true));
        assert!(!row.is_selected());
        assert!(row.select(false));
        assert_eq!(row.measured_width(), None);
    }
}
