//! Balanced builder: turns `d` SuperKey-sorted, deduped reference arrays
//! into the static tree, one node per surviving point.
//!
//! Each recursive call owns a matching window of all `d` reference arrays
//! plus one scratch array of the same length. It picks the lower median of
//! `refs[axis]` as the node for this call, partitions the other `d - 1`
//! arrays against that node's tuple (stable, preserving each array's
//! relative order within each side), rotates the arrays one slot so the
//! array that was split becomes the next level's scratch, and recurses into
//! the lt/gt halves -- forked through the pool while shallow enough, inline
//! past `max_submit_depth`.
//!
//! The per-level partition scan here is sequential. The source material
//! partitions each array with two converging cursors driven from both ends
//! at once; that's a constant-factor speedup on a single array, not a
//! change to which side an element ends up on, so it is not reproduced
//! here -- see DESIGN.md. The partition across the `d - 1` non-axis arrays
//! *could* in principle run independently of each other, but each one
//! reads the array the previous rotation step is about to overwrite, so
//! they stay in a single sequential pass; the fork/join parallelism that
//! matters -- the one the source material singles out for its own
//! `maxSubmitDepth` bookkeeping -- is the lt/gt recursion below, which is
//! embarrassingly parallel and is exactly where this builder forks.

use std::cmp::Ordering;

use crate::error::{Error, Result};
use crate::node::Node;
use crate::permutation::Permutation;
use crate::pool::Pool;
use crate::stage::Staging;
use crate::superkey::superkey_compare;

/// Build the subtree over the `len = refs[0].len()` points referenced by
/// `refs[0..dimensions]`, all windows of equal length, at recursion `depth`.
///
/// `scratch` is a same-length work array reused across the call; its
/// incoming contents are irrelevant, only its length matters.
pub(crate) fn build<V: Send>(
    refs: &mut [&mut [usize]],
    scratch: &mut [usize],
    tuples: &[Vec<i64>],
    staging: &Staging<V>,
    perm: &Permutation,
    depth: usize,
    pool: &Pool,
) -> Result<Node<V>> {
    let dims = refs.len();
    let len = refs[0].len();
    for r in refs.iter() {
        if r.len() != len {
            return err_at!(
                GeometryInvariant,
                msg: "reference arrays disagree on range length at depth {}",
                depth
            );
        }
    }
    if scratch.len() != len {
        return err_at!(
            GeometryInvariant,
            msg: "scratch length {} does not match range length {} at depth {}",
            scratch.len(),
            len,
            depth
        );
    }

    match len {
        0 => err_at!(GeometryInvariant, msg: "build called with an empty range"),
        1 => leaf(tuples, staging, refs[0][0]),
        2 => {
            let mut node = leaf(tuples, staging, refs[0][0])?;
            node.gt = Some(Box::new(leaf(tuples, staging, refs[0][1])?));
            Ok(node)
        }
        3 => {
            let mut node = leaf(tuples, staging, refs[0][1])?;
            node.lt = Some(Box::new(leaf(tuples, staging, refs[0][0])?));
            node.gt = Some(Box::new(leaf(tuples, staging, refs[0][2])?));
            Ok(node)
        }
        _ => build_general(refs, scratch, tuples, staging, perm, depth, pool, dims, len),
    }
}

fn leaf<V>(tuples: &[Vec<i64>], staging: &Staging<V>, idx: usize) -> Result<Node<V>> {
    Ok(Node::leaf(tuples[idx].clone(), staging.take_values(idx)?))
}

#[allow(clippy::too_many_arguments)]
fn build_general<V: Send>(
    refs: &mut [&mut [usize]],
    scratch: &mut [usize],
    tuples: &[Vec<i64>],
    staging: &Staging<V>,
    perm: &Permutation,
    depth: usize,
    pool: &Pool,
    dims: usize,
    len: usize,
) -> Result<Node<V>> {
    let axis = perm.axis(depth);
    let m = (len - 1) / 2;
    let node_idx = refs[0][m];
    let node_tuple = tuples[node_idx].clone();

    // Save axis-0's order before it gets overwritten by the rotation below;
    // it becomes the new scratch array for the next level.
    scratch.copy_from_slice(refs[0]);

    // Partition arrays 1..dims against the median, writing array i's split
    // into array i-1 (the array that array i will replace via rotation).
    // Processed in ascending i so that each array is read as a source
    // before it is later overwritten as a destination.
    for i in 1..dims {
        let (left, right) = refs.split_at_mut(i);
        let dst = &mut left[i - 1];
        let src = &right[0];
        partition_against_median(src, dst, tuples, axis, node_idx, &node_tuple, m)?;
    }
    // Complete the rotation: the saved axis-0 order becomes the last array.
    refs[dims - 1].copy_from_slice(scratch);

    let (lt_scratch, gt_scratch) = scratch.split_at_mut(m);
    // lt_scratch/gt_scratch are about to be overwritten as the next level's
    // scratch buffers; their current contents (remnants of the copy above)
    // don't matter, only their lengths do.

    let mut lt_refs: Vec<&mut [usize]> = Vec::with_capacity(dims);
    let mut gt_refs: Vec<&mut [usize]> = Vec::with_capacity(dims);
    for r in refs.iter_mut() {
        let (lo, hi) = r.split_at_mut(m);
        lt_refs.push(lo);
        gt_refs.push(&mut hi[1..]);
    }

    let mut lt_refs = lt_refs;
    let mut gt_refs = gt_refs;

    let (lt_result, gt_result) = pool.join(
        depth,
        || -> Result<Option<Box<Node<V>>>> {
            if m == 0 {
                return Ok(None);
            }
            let node = build(&mut lt_refs, lt_scratch, tuples, staging, perm, depth + 1, pool)?;
            Ok(Some(Box::new(node)))
        },
        || -> Result<Option<Box<Node<V>>>> {
            let gt_len = len - m - 1;
            if gt_len == 0 {
                return Ok(None);
            }
            let node = build(&mut gt_refs, gt_scratch, tuples, staging, perm, depth + 1, pool)?;
            Ok(Some(Box::new(node)))
        },
    );

    let mut node = leaf(tuples, staging, node_idx)?;
    node.lt = lt_result?;
    node.gt = gt_result?;
    Ok(node)
}

/// Split `src` (excluding `node_idx`) into `dst[0..m]` (less than the
/// median's tuple on `axis`) and `dst[m+1..]` (greater), preserving each
/// side's relative order. `dst[m]` is left untouched; the caller overwrites
/// it with `node_idx` only conceptually -- the node itself is materialized
/// separately, this array slot is never read again before the next
/// rotation overwrites it.
fn partition_against_median(
    src: &[usize],
    dst: &mut [usize],
    tuples: &[Vec<i64>],
    axis: usize,
    node_idx: usize,
    node_tuple: &[i64],
    m: usize,
) -> Result<()> {
    let mut lo = 0usize;
    let mut hi = m + 1;
    for &idx in src {
        if idx == node_idx {
            continue;
        }
        match superkey_compare(&tuples[idx], node_tuple, axis) {
            Ordering::Less => {
                dst[lo] = idx;
                lo += 1;
            }
            Ordering::Greater => {
                dst[hi] = idx;
                hi += 1;
            }
            Ordering::Equal => {
                return Err(Error::GeometryInvariant(format!(
                    "distinct index {} compares equal to median {} on axis {}",
                    idx, node_idx, axis
                )));
            }
        }
    }
    if lo != m || hi != src.len() {
        return Err(Error::GeometryInvariant(format!(
            "partition around median left {} entries below, {} above, expected {} and {}",
            lo,
            hi - (m + 1),
            m,
            src.len() - m - 1
        )));
    }
    Ok(())
}

#[cfg(test)]
#[path = "build_test.rs"]
mod build_test;
