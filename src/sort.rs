//! Parallel merge sort of a reference array under SuperKey order.
//!
//! A standard ping-pong merge sort: split at the midpoint, sort each half
//! (forked through the pool while `depth <= max_submit_depth`, inline past
//! it), merge the two sorted halves back. Below `INSERTION_SORT_THRESHOLD`
//! elements, fall through to insertion sort.
//!
//! The source material's `mergeSort` additionally specializes into four
//! leaf/merge variants (ascending/descending x result-in-reference/
//! result-in-scratch) purely to avoid a handful of extra copies per level.
//! That's a constant-factor optimization, not an observable contract, and
//! is dropped here in favor of the textbook two-buffer ping-pong below --
//! same asymptotic complexity, same depth-gated fork/join discipline, same
//! stability guarantee, verifiable by inspection rather than by running a
//! profiler. See DESIGN.md.

use crate::pool::Pool;

/// Sort `reference` in place under SuperKey order with `axis` as the most
/// significant dimension. `scratch` must have the same length as
/// `reference` and its contents are overwritten.
pub(crate) fn merge_sort(
    reference: &mut [usize],
    scratch: &mut [usize],
    tuples: &[Vec<i64>],
    axis: usize,
    pool: &Pool,
) {
    sort_level(reference, scratch, tuples, axis, 0, pool);
}

const INSERTION_SORT_THRESHOLD: usize = 15;

fn sort_level(
    reference: &mut [usize],
    scratch: &mut [usize],
    tuples: &[Vec<i64>],
    axis: usize,
    depth: usize,
    pool: &Pool,
) {
    let n = reference.len();
    if n <= INSERTION_SORT_THRESHOLD {
        insertion_sort(reference, tuples, axis);
        return;
    }

    let mid = n / 2;
    let (ref_lo, ref_hi) = reference.split_at_mut(mid);
    let (scr_lo, scr_hi) = scratch.split_at_mut(mid);

    pool.join(
        depth,
        || sort_level(ref_lo, scr_lo, tuples, axis, depth + 1, pool),
        || sort_level(ref_hi, scr_hi, tuples, axis, depth + 1, pool),
    );

    merge(reference, mid, tuples, axis, scratch);
    reference.copy_from_slice(scratch);
}

fn merge(reference: &[usize], mid: usize, tuples: &[Vec<i64>], axis: usize, out: &mut [usize]) {
    let (left, right) = reference.split_at(mid);
    let (mut i, mut j, mut k) = (0usize, 0usize, 0usize);
    while i < left.len() && j < right.len() {
        if crate::superkey::superkey_compare(&tuples[left[i]], &tuples[right[j]], axis)
            != std::cmp::Ordering::Greater
        {
            out[k] = left[i];
            i += 1;
        } else {
            out[k] = right[j];
            j += 1;
        }
        k += 1;
    }
    if i < left.len() {
        out[k..].copy_from_slice(&left[i..]);
    }
    if j < right.len() {
        out[k..].copy_from_slice(&right[j..]);
    }
}

fn insertion_sort(reference: &mut [usize], tuples: &[Vec<i64>], axis: usize) {
    for i in 1..reference.len() {
        let mut j = i;
        while j > 0
            && crate::superkey::superkey_compare(&tuples[reference[j - 1]], &tuples[reference[j]], axis)
                == std::cmp::Ordering::Greater
        {
            reference.swap(j - 1, j);
            j -= 1;
        }
    }
}

#[cfg(test)]
#[path = "sort_test.rs"]
mod sort_test;
