//! SuperKey total order: the comparator the rest of the tree is built on.

use std::cmp::Ordering;

/// Compare two d-tuples with `axis` as the most significant dimension, tying
/// off across the remaining axes in cyclic order `axis+1, axis+2, ..., axis-1`.
///
/// Uses `i64::cmp` rather than subtraction so the order is well-defined for
/// unrestricted 64-bit inputs (subtraction can overflow near the domain
/// boundary).
pub(crate) fn superkey_compare(a: &[i64], b: &[i64], axis: usize) -> Ordering {
    let dims = a.len();
    debug_assert_eq!(dims, b.len());
    for i in 0..dims {
        let d = (axis + i) % dims;
        let ord = a[d].cmp(&b[d]);
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

#[cfg(test)]
#[path = "superkey_test.rs"]
mod superkey_test;
