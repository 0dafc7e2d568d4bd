use super::*;

fn populated(n: i64) -> Tree<i32> {
    let mut tree: Tree<i32> = Tree::new(2, 64);
    for i in 0..n {
        tree.add(&[i, -i], i as i32).unwrap();
    }
    tree
}

#[test]
fn add_and_len_track_each_other() {
    let tree = populated(10);
    assert_eq!(tree.len(), 10);
    assert!(!tree.is_empty());
}

#[test]
fn lazy_build_runs_on_first_query() {
    let mut tree = populated(20);
    let hits = tree.search(&[5, -5], 0).unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0], (vec![5, -5], 5));
}

#[test]
fn search_box_finds_everything_inside() {
    let mut tree = populated(20);
    let hits = tree.search_box(&[10, 1], &[0, -10]).unwrap();
    assert_eq!(hits.len(), 10);
}

#[test]
fn search_box_with_tuples_matches_search_box_unzipped() {
    let mut tree = populated(20);
    let (tuples, values) = tree.search_box_with_tuples(&[10, 1], &[0, -10]).unwrap();
    assert_eq!(tuples.len(), 10);
    assert_eq!(values.len(), 10);
    assert!(tuples.contains(&vec![5, -5]));
    assert!(values.contains(&5));
}

#[test]
fn nearest_neighbor_orders_by_distance() {
    let mut tree = populated(20);
    let hits = tree.nearest_neighbor(&[5, -5], &[true, true], 3).unwrap();
    assert_eq!(hits.len(), 3);
    assert_eq!(hits[0].0, vec![5, -5]);
}

#[test]
fn remove_exact_point_drops_len() {
    let mut tree = populated(10);
    tree.build().unwrap();
    let removed = tree.remove(&[3, -3], &3).unwrap();
    assert!(removed);
    assert_eq!(tree.len(), 9);
    let gone = tree.search(&[3, -3], 0).unwrap();
    assert!(gone.is_empty());
}

#[test]
fn remove_with_mismatched_value_leaves_the_point_alone() {
    let mut tree = populated(10);
    tree.build().unwrap();
    let removed = tree.remove(&[3, -3], &99).unwrap();
    assert!(!removed);
    assert_eq!(tree.len(), 10);
    let still_there = tree.search(&[3, -3], 0).unwrap();
    assert_eq!(still_there, vec![(vec![3, -3], 3)]);
}

#[test]
fn remove_drops_only_the_matching_value_from_a_shared_point() {
    let mut tree: Tree<i32> = Tree::new(1, 8);
    tree.add(&[0], 1).unwrap();
    tree.add(&[0], 2).unwrap();
    tree.build().unwrap();
    let removed = tree.remove(&[0], &1).unwrap();
    assert!(removed);
    assert_eq!(tree.len(), 1);
    let remaining = tree.search(&[0], 0).unwrap();
    assert_eq!(remaining, vec![(vec![0], 2)]);
}

#[test]
fn search_and_remove_drains_a_box() {
    let mut tree = populated(10);
    let removed = tree.search_and_remove_box(&[5, 1], &[0, -5]).unwrap();
    assert_eq!(removed.len(), 5);
    assert_eq!(tree.len(), 5);
}

#[test]
fn add_after_build_collapses_and_rebuilds() {
    let mut tree = populated(5);
    tree.build().unwrap();
    tree.add(&[100, -100], 99).unwrap();
    assert_eq!(tree.len(), 6);
    let hits = tree.search(&[100, -100], 0).unwrap();
    assert_eq!(hits, vec![(vec![100, -100], 99)]);
    let older = tree.search(&[2, -2], 0).unwrap();
    assert_eq!(older, vec![(vec![2, -2], 2)]);
}

#[test]
fn pick_value_with_always_gt_lands_on_a_real_point() {
    let mut tree = populated(15);
    let picked = tree.pick_value(Bias::AlwaysGt, false).unwrap();
    assert!(picked.is_some());
    assert_eq!(tree.len(), 15);
}

#[test]
fn pick_value_with_remove_shrinks_the_tree() {
    let mut tree = populated(15);
    let picked = tree.pick_value(Bias::AlwaysGt, true).unwrap();
    assert!(picked.is_some());
    assert_eq!(tree.len(), 14);
    let (tuple, value) = picked.unwrap();
    let hits = tree.search(&tuple, 0).unwrap();
    assert!(!hits.iter().any(|(_, v)| *v == value));
}

#[test]
fn try_clone_is_independent_of_the_original() {
    let mut tree = populated(8);
    tree.build().unwrap();
    let mut clone = tree.try_clone().unwrap();
    assert_eq!(clone.len(), tree.len());
    clone.remove(&[1, -1], &1).unwrap();
    assert_eq!(clone.len(), 7);
    let original_hit = tree.search(&[1, -1], 0).unwrap();
    assert_eq!(original_hit.len(), 1);
}

#[test]
fn capacity_exceeded_surfaces_as_error() {
    let mut tree: Tree<i32> = Tree::new(1, 1);
    tree.add(&[1], 1).unwrap();
    let err = tree.add(&[2], 2).unwrap_err();
    assert!(matches!(err, crate::error::Error::CapacityExceeded(_)));
}

#[test]
fn dimension_mismatch_surfaces_as_error() {
    let mut tree: Tree<i32> = Tree::new(2, 8);
    let err = tree.add(&[1], 1).unwrap_err();
    assert!(matches!(err, crate::error::Error::DimensionMismatch(_)));
}
