//! Precomputed depth -> axis lookup, cycling `0, 1, ..., d-1, 0, 1, ...`.
//!
//! Every recursive descent (build, range search, nearest-neighbor, remove,
//! pick) needs the partition axis for its current depth. Computing it with
//! a modulus at every call is cheap enough that this is a pure fidelity
//! touch rather than a load-bearing optimization, but it keeps the "axis
//! cycles every d levels" invariant in one place instead of scattered
//! `depth % dims` expressions.

pub(crate) struct Permutation {
    table: Vec<usize>,
}

impl Permutation {
    /// `table` has at least `ceil(log2(n.max(1))) + 1` entries, generous
    /// enough that `axis()` below almost never falls back to the modulus
    /// guard for skewed trees.
    pub(crate) fn new(dimensions: usize, n: usize) -> Permutation {
        let bits = (usize::BITS - n.max(1).leading_zeros()) as usize;
        let len = (bits + 2).max(dimensions);
        let table = (0..len).map(|h| h % dimensions).collect();
        Permutation { table }
    }

    #[inline]
    pub(crate) fn axis(&self, depth: usize) -> usize {
        self.table[depth % self.table.len()]
    }
}

#[cfg(test)]
#[path = "permutation_test.rs"]
mod permutation_test;
