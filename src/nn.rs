//! Bounded k-nearest-neighbor search with a per-dimension enable mask.
//!
//! Branch-and-bound over the tree: at each node, descend into whichever
//! child is on the query point's side of the splitting axis first (the
//! side more likely to hold close points), then only bother with the far
//! side if the splitting plane itself is closer than the current k-th best
//! distance -- or unconditionally, on any axis the caller disabled, since
//! a disabled axis contributes nothing to distance and so can never be
//! used to prune.
//!
//! Single-threaded: the heap is shared mutable state threaded through the
//! whole recursion, which is not a shape that forks cleanly, and the
//! source material does not parallelize this search either.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::node::Node;
use crate::permutation::Permutation;

pub(crate) struct HeapItem<V> {
    dist: i64,
    tuple: Vec<i64>,
    value: V,
}

impl<V> PartialEq for HeapItem<V> {
    fn eq(&self, other: &Self) -> bool {
        self.dist == other.dist
    }
}
impl<V> Eq for HeapItem<V> {}
impl<V> PartialOrd for HeapItem<V> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl<V> Ord for HeapItem<V> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist.cmp(&other.dist)
    }
}

fn squared_distance(tuple: &[i64], point: &[i64], enabled: &[bool]) -> i128 {
    tuple
        .iter()
        .zip(point.iter())
        .enumerate()
        .filter(|(i, _)| enabled.get(*i).copied().unwrap_or(true))
        .map(|(_, (&t, &p))| {
            let d = t as i128 - p as i128;
            d * d
        })
        .sum()
}

/// Integer-rounded Euclidean distance: squaring is avoided past this point
/// so branch-and-bound cutoffs can compare directly against a per-axis
/// difference instead of squaring the cutoff every time.
fn floor_distance(dist_sq: i128) -> i64 {
    (dist_sq as f64).sqrt().floor() as i64
}

fn admit<V>(heap: &mut BinaryHeap<HeapItem<V>>, k: usize, dist: i64, tuple: &[i64], value: V) {
    if k == 0 {
        return;
    }
    if heap.len() < k {
        heap.push(HeapItem {
            dist,
            tuple: tuple.to_vec(),
            value,
        });
    } else if heap.peek().map_or(false, |top| dist < top.dist) {
        heap.pop();
        heap.push(HeapItem {
            dist,
            tuple: tuple.to_vec(),
            value,
        });
    }
}

/// Walk `node` and its descendants, admitting every value into `heap`
/// (capped at `k` entries, keeping the `k` closest seen so far).
pub(crate) fn walk<V: Clone>(
    node: &Node<V>,
    point: &[i64],
    enabled: &[bool],
    k: usize,
    perm: &Permutation,
    depth: usize,
    heap: &mut BinaryHeap<HeapItem<V>>,
) {
    let axis = perm.axis(depth);
    let dist = floor_distance(squared_distance(&node.tuple, point, enabled));
    for v in &node.values {
        admit(heap, k, dist, &node.tuple, v.clone());
    }

    let diff = point[axis] as i128 - node.tuple[axis] as i128;
    let (near, far) = if diff < 0 {
        (&node.lt, &node.gt)
    } else {
        (&node.gt, &node.lt)
    };

    if let Some(n) = near {
        walk(n, point, enabled, k, perm, depth + 1, heap);
    }

    let axis_enabled = enabled.get(axis).copied().unwrap_or(true);
    let should_try_far = !axis_enabled
        || heap.len() < k
        || heap.peek().map_or(true, |top| diff.abs() <= top.dist as i128);

    if should_try_far {
        if let Some(n) = far {
            walk(n, point, enabled, k, perm, depth + 1, heap);
        }
    }
}

/// Drain `heap` into nearest-first order, pairing each value with the
/// floored Euclidean distance it was admitted at.
pub(crate) fn drain_sorted<V>(heap: BinaryHeap<HeapItem<V>>) -> Vec<(Vec<i64>, V, i64)> {
    heap.into_sorted_vec()
        .into_iter()
        .map(|item| (item.tuple, item.value, item.dist))
        .collect()
}

#[cfg(test)]
#[path = "nn_test.rs"]
mod nn_test;
