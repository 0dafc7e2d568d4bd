//! Orthogonal range search, plain and destructive.
//!
//! A query is a half-open box: `query_minus[i] <= tuple[i] < query_plus[i]`
//! for every axis `i` (see `Node::in_box`). The hypercube form (a center
//! point and a cutoff) is just a box built by saturating add/sub around the
//! point, so it can never wrap at the `i64` domain edges.
//!
//! Descent at each node forks lt/gt through the pool exactly like the
//! builder: both sides are always visited when their half of the box is
//! non-empty, the pool decides whether that happens concurrently or
//! inline.

use crate::node::{Node, Status};
use crate::permutation::Permutation;
use crate::pool::Pool;

/// Normalize a box query so `query_minus[i] <= query_plus[i]` on every
/// axis, swapping any axis found inverted.
pub(crate) fn normalize_box(mut query_plus: Vec<i64>, mut query_minus: Vec<i64>) -> (Vec<i64>, Vec<i64>) {
    for i in 0..query_plus.len() {
        if query_minus[i] > query_plus[i] {
            std::mem::swap(&mut query_plus[i], &mut query_minus[i]);
        }
    }
    (query_plus, query_minus)
}

/// Build a box query centered on `point` with half-width `cutoff` on every
/// axis, clamping rather than wrapping at the `i64` domain edges.
pub(crate) fn hypercube(point: &[i64], cutoff: i64) -> (Vec<i64>, Vec<i64>) {
    let query_plus = point.iter().map(|&c| c.saturating_add(cutoff)).collect();
    let query_minus = point.iter().map(|&c| c.saturating_sub(cutoff)).collect();
    (query_plus, query_minus)
}

/// Collect every `(tuple, value)` pair whose tuple falls inside the box.
pub(crate) fn search<V: Clone + Send>(
    node: &Node<V>,
    query_plus: &[i64],
    query_minus: &[i64],
    perm: &Permutation,
    depth: usize,
    pool: &Pool,
) -> Vec<(Vec<i64>, V)> {
    let axis = perm.axis(depth);
    let mut out = Vec::new();
    if node.in_box(query_plus, query_minus) {
        out.extend(node.values.iter().cloned().map(|v| (node.tuple.clone(), v)));
    }

    let descend_lt = node.lt.is_some() && query_minus[axis] < node.tuple[axis];
    let descend_gt = node.gt.is_some() && query_plus[axis] > node.tuple[axis];

    let (lt_out, gt_out) = pool.join(
        depth,
        || {
            if descend_lt {
                search(node.lt.as_deref().unwrap(), query_plus, query_minus, perm, depth + 1, pool)
            } else {
                Vec::new()
            }
        },
        || {
            if descend_gt {
                search(node.gt.as_deref().unwrap(), query_plus, query_minus, perm, depth + 1, pool)
            } else {
                Vec::new()
            }
        },
    );
    out.extend(lt_out);
    out.extend(gt_out);
    out
}

/// Like `search`, but removes every matching value from the tree as it
/// goes, pruning any node left with no values and no children. Returns the
/// removed `(tuple, value)` pairs and the tri-state status of `node` for
/// the caller to decide whether to prune the link it descended through.
pub(crate) fn search_and_remove<V: Clone + Send>(
    node: &mut Node<V>,
    query_plus: &[i64],
    query_minus: &[i64],
    perm: &Permutation,
    depth: usize,
    pool: &Pool,
) -> (Status, Vec<(Vec<i64>, V)>) {
    let axis = perm.axis(depth);
    let mut removed = Vec::new();
    let mut touched = false;

    if node.in_box(query_plus, query_minus) && !node.values.is_empty() {
        removed.extend(node.values.drain(..).map(|v| (node.tuple.clone(), v)));
        touched = true;
    }

    let descend_lt = node.lt.is_some() && query_minus[axis] < node.tuple[axis];
    let descend_gt = node.gt.is_some() && query_plus[axis] > node.tuple[axis];

    let lt_ref = &mut node.lt;
    let gt_ref = &mut node.gt;

    let (lt_result, gt_result) = pool.join(
        depth,
        || {
            if descend_lt {
                let child = lt_ref.as_deref_mut().unwrap();
                Some(search_and_remove(child, query_plus, query_minus, perm, depth + 1, pool))
            } else {
                None
            }
        },
        || {
            if descend_gt {
                let child = gt_ref.as_deref_mut().unwrap();
                Some(search_and_remove(child, query_plus, query_minus, perm, depth + 1, pool))
            } else {
                None
            }
        },
    );

    if let Some((status, mut sub_removed)) = lt_result {
        removed.append(&mut sub_removed);
        touched = touched || status.found();
        if status == Status::Empty {
            node.lt = None;
        }
    }
    if let Some((status, mut sub_removed)) = gt_result {
        removed.append(&mut sub_removed);
        touched = touched || status.found();
        if status == Status::Empty {
            node.gt = None;
        }
    }

    let status = if node.is_dead() {
        Status::Empty
    } else if touched {
        Status::Alive
    } else {
        Status::Untouched
    };

    (status, removed)
}

#[cfg(test)]
#[path = "range_test.rs"]
mod range_test;
