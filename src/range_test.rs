use super::*;
use crate::pool::Pool;

fn small_tree() -> Node<i32> {
    // 1-D tree: root 5, lt 2, gt 8.
    let mut root = Node::leaf(vec![5], vec![50]);
    root.lt = Some(Box::new(Node::leaf(vec![2], vec![20])));
    root.gt = Some(Box::new(Node::leaf(vec![8], vec![80])));
    root
}

fn sorted_tuples<V: Clone>(mut matches: Vec<(Vec<i64>, V)>) -> Vec<Vec<i64>> {
    matches.sort_by(|a, b| a.0.cmp(&b.0));
    matches.into_iter().map(|(t, _)| t).collect()
}

#[test]
fn box_search_is_lower_inclusive_upper_exclusive() {
    let tree = small_tree();
    let perm = Permutation::new(1, 3);
    let pool = Pool::new(1);
    let (qp, qm) = normalize_box(vec![8], vec![2]);
    let matches = search(&tree, &qp, &qm, &perm, 0, &pool);
    assert_eq!(sorted_tuples(matches), vec![vec![2], vec![5]]);
}

#[test]
fn hypercube_centers_and_clamps() {
    let tree = small_tree();
    let perm = Permutation::new(1, 3);
    let pool = Pool::new(1);
    let (qp, qm) = hypercube(&[5], 3);
    assert_eq!(qp, vec![8]);
    assert_eq!(qm, vec![2]);
    let matches = search(&tree, &qp, &qm, &perm, 0, &pool);
    assert_eq!(sorted_tuples(matches), vec![vec![2], vec![5]]);
}

#[test]
fn hypercube_saturates_at_domain_edges() {
    let (qp, qm) = hypercube(&[i64::MAX - 1], 10);
    assert_eq!(qp, vec![i64::MAX]);
    assert_eq!(qm, vec![i64::MAX - 11]);
}

#[test]
fn inverted_box_is_normalized() {
    let (qp, qm) = normalize_box(vec![2], vec![8]);
    assert_eq!(qp, vec![8]);
    assert_eq!(qm, vec![2]);
}

#[test]
fn search_and_remove_prunes_dead_leaf() {
    let mut tree = small_tree();
    let perm = Permutation::new(1, 3);
    let pool = Pool::new(1);
    // Box covering only the lt leaf (2).
    let (status, removed) = search_and_remove(&mut tree, &[3], &[0], &perm, 0, &pool);
    assert_eq!(status, Status::Alive);
    assert_eq!(sorted_tuples(removed), vec![vec![2]]);
    assert!(tree.lt.is_none());
    assert!(tree.gt.is_some());
    assert_eq!(tree.values, vec![50]);
}

#[test]
fn search_and_remove_reports_untouched_outside_box() {
    let mut tree = small_tree();
    let perm = Permutation::new(1, 3);
    let pool = Pool::new(1);
    let (status, removed) = search_and_remove(&mut tree, &[-5], &[-10], &perm, 0, &pool);
    assert_eq!(status, Status::Untouched);
    assert!(removed.is_empty());
    assert!(tree.lt.is_some());
    assert!(tree.gt.is_some());
}

#[test]
fn search_and_remove_everything_reports_empty() {
    let mut tree = small_tree();
    let perm = Permutation::new(1, 3);
    let pool = Pool::new(1);
    let (status, removed) = search_and_remove(&mut tree, &[100], &[-100], &perm, 0, &pool);
    assert_eq!(status, Status::Empty);
    assert_eq!(removed.len(), 3);
}
