//! Drop target resolution and drag-over behaviour.

mod common;

use common::{ITEM_HEIGHT, flat_items, laid_out, scenario_tree};
use lattice_treeview::{InsertMark, InsertPosition, Key, Point, TreeItem, TvParts};

fn row_point(tv: &lattice_treeview::TreeView, index: usize, percent: i32) -> Point {
    let rect = tv.rect_of_parts(index, TvParts::TEXT).unwrap();
    Point::new(rect.center().x, rect.top() + ITEM_HEIGHT * percent / 100)
}

#[test]
fn expanded_folder_resolves_to_before_first_child() {
    let mut tv = laid_out(false, 300, 200);
    tv.set_items(scenario_tree(), false);

    let info = tv.drop_info(row_point(&tv, 0, 60));
    assert_eq!(info.target_index, Some(1));
    assert!(!info.insert_after);
    assert!(!info.into_folder);
    assert_eq!(
        tv.drop_target_item(row_point(&tv, 0, 60)).map(|i| i.display_text()),
        Some("Leaf1".to_string())
    );
}

#[test]
fn collapsed_folder_accepts_drop_into() {
    let mut tv = laid_out(false, 300, 200);
    tv.set_items(scenario_tree(), false);
    tv.expand(0, Some(false)).unwrap();

    let into = tv.drop_info(row_point(&tv, 0, 60));
    assert_eq!(into.target_index, Some(0));
    assert!(into.into_folder);

    let after = tv.drop_info(row_point(&tv, 0, 90));
    assert_eq!(after.target_index, Some(0));
    assert!(after.insert_after);
    assert!(!after.into_folder);

    let leaf = tv.drop_info(row_point(&tv, 1, 10));
    assert_eq!(leaf.target_index, Some(1));
    assert!(!leaf.insert_after);
}

#[test]
fn resolution_is_repeatable() {
    let mut tv = laid_out(false, 300, 200);
    tv.set_items(scenario_tree(), false);
    for index in 0..tv.count_visible() {
        for percent in [0, 24, 25, 49, 50, 74, 75, 99] {
            let p = row_point(&tv, index, percent);
            assert_eq!(tv.drop_info(p), tv.drop_info(p));
        }
    }
    let outside = tv.drop_info(Point::new(10, 190));
    assert_eq!(outside.target_index, None);
    assert_eq!(outside, tv.drop_info(Point::new(10, 190)));
}

#[test]
fn drag_over_tracks_insert_mark() {
    let mut tv = laid_out(false, 300, 200);
    tv.set_items(scenario_tree(), false);

    tv.drag_over(row_point(&tv, 3, 80), true, None, 0);
    assert_eq!(
        tv.insert_mark(),
        Some(InsertMark {
            index: 3,
            position: InsertPosition::After
        })
    );
    let rows = tv.render_rows();
    assert_eq!(rows[3].insert_mark, Some(InsertPosition::After));
    assert_eq!(rows[2].insert_mark, None);

    tv.drag_over(row_point(&tv, 3, 80), false, None, 10);
    assert_eq!(tv.insert_mark(), None);

    tv.drag_over(row_point(&tv, 2, 10), true, None, 20);
    let info = tv.drop_at(row_point(&tv, 2, 10));
    assert_eq!(info.target_index, Some(2));
    assert_eq!(tv.insert_mark(), None);
}

#[test]
fn drag_over_keys_expand_and_collapse() {
    let mut tv = laid_out(false, 300, 200);
    tv.set_items(scenario_tree(), false);
    let folder = row_point(&tv, 0, 10);

    tv.drag_over(folder, true, Some(Key::Left), 0);
    assert_eq!(tv.count_visible(), 2);
    tv.drag_over(folder, true, Some(Key::Right), 10);
    assert_eq!(tv.count_visible(), 4);
    tv.drag_leave();
}

#[test]
fn drag_over_auto_scrolls_after_dwell() {
    let mut tv = laid_out(false, 200, 100);
    tv.set_items(flat_items(50), false);
    let near_bottom = Point::new(50, 90);

    tv.drag_over(near_bottom, true, None, 1_000);
    tv.drag_over(near_bottom, true, None, 1_300);
    assert_eq!(tv.top_index(), 0);
    tv.drag_over(near_bottom, true, None, 1_400);
    assert_eq!(tv.top_index(), 1);
    tv.drag_over(near_bottom, true, None, 1_450);
    assert_eq!(tv.top_index(), 1);
    tv.drag_over(near_bottom, true, None, 1_520);
    assert_eq!(tv.top_index(), 2);

    // Leaving the zone resets the dwell timer.
    tv.drag_over(Point::new(50, 50), true, None, 1_600);
    tv.drag_over(Point::new(50, 5), true, None, 1_700);
    assert_eq!(tv.top_index(), 2);
    tv.drag_over(Point::new(50, 5), true, None, 2_100);
    assert_eq!(tv.top_index(), 1);
}

#[test]
fn drag_over_navigation_keys_scroll() {
    let mut tv = laid_out(false, 200, 100);
    tv.set_items(flat_items(50), false);
    let middle = Point::new(50, 50);
    tv.drag_over(middle, true, Some(Key::Down), 0);
    assert_eq!(tv.top_index(), 3);
    tv.drag_over(middle, true, Some(Key::End), 0);
    assert_eq!(tv.top_index(), tv.vscroll().max());
    tv.drag_over(middle, true, Some(Key::Home), 0);
    assert_eq!(tv.top_index(), 0);
}
