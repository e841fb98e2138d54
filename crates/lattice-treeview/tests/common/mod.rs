//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use lattice_treeview::{ItemKey, ItemRef, Size, TextMeasurer, TreeItem, TreeNode, TreeView};

/// 6 px per character, 15 px line height.
pub struct FixedWidth;

impl TextMeasurer for FixedWidth {
    fn measure(&self, text: &str, bold: bool) -> Size {
        let per_char = if bold { 7 } else { 6 };
        Size::new(text.chars().count() as i32 * per_char, 15)
    }
}

/// Row pitch produced by [`FixedWidth`] at 96 DPI.
pub const ITEM_HEIGHT: i32 = 18;

/// Install a test-writer subscriber; honours `RUST_LOG`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn view(multi_select: bool) -> TreeView {
    init_tracing();
    TreeView::new(FixedWidth).with_multi_select(multi_select)
}

pub fn laid_out(multi_select: bool, width: i32, height: i32) -> TreeView {
    let mut tv = view(multi_select);
    tv.set_client_size(Size::new(width, height));
    tv
}

/// `Root{Folder1{Leaf1, Leaf2}, Leaf3}` with Folder1 expanded.
pub fn scenario_tree() -> Vec<ItemRef> {
    vec![
        TreeNode::folder("Folder1")
            .expanded(true)
            .child(TreeNode::leaf("Leaf1"))
            .child(TreeNode::leaf("Leaf2"))
            .into(),
        TreeNode::leaf("Leaf3").into(),
    ]
}

/// `count` leaves named `Item 0`, `Item 1`, ...
pub fn flat_items(count: usize) -> Vec<ItemRef> {
    (0..count)
        .map(|i| TreeNode::leaf(format!("Item {i}")).into())
        .collect()
}

pub fn texts(tv: &TreeView) -> Vec<String> {
    tv.visible()
        .iter()
        .map(|v| v.item().display_text())
        .collect()
}

/// Pre-order walk descending only into expanded folders.
pub fn expected_preorder(items: &[ItemRef], level: usize, out: &mut Vec<(ItemKey, usize)>) {
    for item in items {
        out.push((ItemKey::of(item), level));
        if item.is_folder() && item.is_expanded() {
            expected_preorder(&item.children(), level + 1, out);
        }
    }
}

/// Keep a typed handle alongside the erased one.
pub fn node(node: TreeNode) -> (Arc<TreeNode>, ItemRef) {
    let typed = Arc::new(node);
    let erased: ItemRef = typed.clone();
    (typed, erased)
}
