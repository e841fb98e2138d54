//! Selection and focus across rebuilds.

mod common;

use common::{flat_items, laid_out, scenario_tree, texts, view};
use lattice_treeview::{ItemRef, Key, KeyboardModifiers, TreeError, TreeItem, TreeNode};

#[test]
fn collapsing_folder_moves_focus_to_it() {
    let mut tv = view(false);
    tv.set_items(scenario_tree(), false);
    assert_eq!(texts(&tv), vec!["Folder1", "Leaf1", "Leaf2", "Leaf3"]);

    tv.select(1, true, true).unwrap();
    assert_eq!(tv.selected_indices(), vec![1]);
    tv.set_focused_index(Some(1), false).unwrap();

    tv.expand(0, Some(false)).unwrap();
    assert_eq!(texts(&tv), vec!["Folder1", "Leaf3"]);
    assert_eq!(tv.focused_index(), Some(0));
    assert_eq!(tv.selected_indices(), vec![0]);
}

#[test]
fn unrelated_collapse_preserves_selected_focused_item() {
    let mut tv = view(false);
    let roots: Vec<ItemRef> = vec![
        TreeNode::folder("F")
            .expanded(true)
            .child(TreeNode::leaf("F1"))
            .child(TreeNode::leaf("F2"))
            .into(),
        TreeNode::leaf("A").into(),
        TreeNode::leaf("B").into(),
        TreeNode::leaf("C").into(),
    ];
    tv.set_items(roots.clone(), false);
    let b = roots[2].clone();
    tv.select_single_item(&b, true).unwrap();
    assert_eq!(tv.focused_index(), Some(4));

    tv.expand(0, Some(false)).unwrap();
    assert_eq!(tv.index_of(&b), Some(2));
    assert_eq!(tv.focused_index(), Some(2));
    assert_eq!(tv.selected_indices(), vec![2]);
    assert!(std::sync::Arc::ptr_eq(&tv.focused_item().unwrap(), &b));
}

#[test]
fn single_select_never_holds_two() {
    let mut tv = view(false);
    tv.set_items(flat_items(6), false);
    let ops: [(usize, bool, bool); 7] = [
        (0, true, false),
        (3, true, false),
        (3, false, false),
        (5, true, true),
        (1, true, false),
        (2, true, false),
        (2, false, true),
    ];
    for (index, on, unselect_others) in ops {
        tv.select(index, on, unselect_others).unwrap();
        assert!(tv.selected_indices().len() <= 1);
    }
    assert!(tv.select_range(0..2, true, false).is_err());
    assert!(tv.select_all().is_err());
    assert!(tv.selected_indices().len() <= 1);
}

#[test]
fn unselect_of_hidden_item_is_noop() {
    let mut tv = view(true);
    let roots = scenario_tree();
    tv.set_items(roots.clone(), false);
    tv.select_range(0..4, true, false).unwrap();

    tv.expand(0, Some(false)).unwrap();
    let leaf1 = roots[0].children()[0].clone();
    tv.select_item(&leaf1, false, false).unwrap();
    assert!(matches!(
        tv.select_item(&leaf1, true, false),
        Err(TreeError::ItemNotFound)
    ));
    assert!(matches!(
        tv.set_focused_item(&leaf1, false),
        Err(TreeError::ItemNotFound)
    ));
    assert_eq!(tv.selected_indices(), vec![0, 1]);
}

#[test]
fn keyboard_focus_scrolls_into_view() {
    let mut tv = laid_out(false, 200, 100);
    tv.set_items(flat_items(30), false);
    tv.key_down(Key::Home, KeyboardModifiers::NONE);
    assert_eq!(tv.focused_index(), Some(0));

    // 100 px shows 5 full rows; PageDown goes to the page edge first.
    tv.key_down(Key::PageDown, KeyboardModifiers::NONE);
    assert_eq!(tv.focused_index(), Some(4));
    assert_eq!(tv.top_index(), 0);
    tv.key_down(Key::PageDown, KeyboardModifiers::NONE);
    assert_eq!(tv.focused_index(), Some(8));
    assert_eq!(tv.top_index(), 4);

    tv.key_down(Key::End, KeyboardModifiers::NONE);
    assert_eq!(tv.selected_indices(), vec![29]);
    assert_eq!(tv.top_index(), tv.vscroll().max());
}

#[test]
fn select_and_focus_scrolls_to_top() {
    let mut tv = laid_out(false, 200, 100);
    tv.set_items(flat_items(30), false);
    tv.select_and_focus(12, true, true, true).unwrap();
    assert_eq!(tv.top_index(), 12);
    assert_eq!(tv.focused_index(), Some(12));
    assert_eq!(tv.selected_item().map(|i| i.display_text()), Some("Item 12".into()));
}

#[test]
fn turning_multi_select_off_keeps_one_selected_row() {
    let mut tv = view(true);
    tv.set_items(flat_items(4), false);
    let changes = std::sync::Arc::new(parking_lot::Mutex::new(0));
    let c = changes.clone();

    tv.select_range(0..3, true, false).unwrap();
    tv.set_focused_index(Some(1), false).unwrap();
    tv.selection_changed.connect(move |_| *c.lock() += 1);

    tv.set_multi_select(false);
    assert_eq!(tv.selected_indices(), vec![1]);
    assert_eq!(*changes.lock(), 1);

    // Without a selected focused row, the first selected row stays.
    tv.set_multi_select(true);
    tv.select_range(2..4, true, false).unwrap();
    tv.set_focused_index(Some(0), false).unwrap();
    let config = lattice_treeview::TreeViewConfig {
        multi_select: false,
        ..tv.config().clone()
    };
    tv.set_config(config);
    assert_eq!(tv.selected_indices(), vec![1]);
    assert!(!tv.multi_select());
}
