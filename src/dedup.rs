//! Collapse adjacent equal tuples in a SuperKey-sorted reference array.

use std::cmp::Ordering;

use crate::error::Result;
use crate::stage::Staging;
use crate::superkey::superkey_compare;

/// `reference` must already be sorted under SuperKey order with `axis` as
/// the most significant dimension. Walk it once; whenever two adjacent
/// entries carry equal tuples, merge the later value list into the earlier
/// one and drop the later slot. Returns the deduped prefix of `reference`,
/// truncated to the surviving entries (in their original relative order).
///
/// Fails with `SortInvariant` if an adjacent pair is found out of order,
/// which would mean the array was not actually sorted under this axis.
pub(crate) fn dedup<V>(
    reference: &mut Vec<usize>,
    tuples: &[Vec<i64>],
    axis: usize,
    staging: &Staging<V>,
) -> Result<()> {
    if reference.len() < 2 {
        return Ok(());
    }

    let mut write = 0usize;
    for read in 1..reference.len() {
        let prev = reference[write];
        let cur = reference[read];
        match superkey_compare(&tuples[cur], &tuples[prev], axis) {
            Ordering::Less => {
                return err_at!(
                    SortInvariant,
                    msg: "reference array out of order at position {}",
                    read
                );
            }
            Ordering::Equal => {
                staging.merge_values(prev, cur);
            }
            Ordering::Greater => {
                write += 1;
                reference[write] = cur;
            }
        }
    }
    reference.truncate(write + 1);
    Ok(())
}

#[cfg(test)]
#[path = "dedup_test.rs"]
mod dedup_test;
