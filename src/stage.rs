//! The staging buffer: points accumulated by `add` before `build` runs.

use std::sync::Mutex;

use crate::error::{Error, Result};

/// Points staged via `add`, not yet organized into a tree.
///
/// Tuples are read many times during sort and build (purely as comparison
/// keys) and never mutated, so they need no interior mutability. Value
/// lists, in contrast, are moved out exactly once each -- at the moment the
/// owning index becomes a node -- by whichever recursive build task visits
/// that index first. Two disjoint build tasks never visit the same index
/// (dedup made tuples unique and each surviving index becomes exactly one
/// node), so the `Mutex` here is never contended; it exists only so the
/// value list can be taken through a shared reference from either side of a
/// `rayon::join` fork.
pub(crate) struct Staging<V> {
    capacity: usize,
    dimensions: usize,
    tuples: Vec<Vec<i64>>,
    values: Vec<Mutex<Option<Vec<V>>>>,
}

impl<V> Staging<V> {
    pub(crate) fn new(capacity: usize, dimensions: usize) -> Staging<V> {
        Staging {
            capacity,
            dimensions,
            tuples: Vec::with_capacity(capacity),
            values: Vec::with_capacity(capacity),
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.tuples.len()
    }

    pub(crate) fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub(crate) fn add(&mut self, point: &[i64], value: V) -> Result<usize> {
        if point.len() != self.dimensions {
            return err_at!(
                DimensionMismatch,
                msg: "point has {} axes, tree has {}",
                point.len(),
                self.dimensions
            );
        }
        if self.tuples.len() >= self.capacity {
            return err_at!(
                CapacityExceeded,
                msg: "staging buffer at capacity {}",
                self.capacity
            );
        }
        self.tuples.push(point.to_vec());
        self.values.push(Mutex::new(Some(vec![value])));
        Ok(self.tuples.len())
    }

    pub(crate) fn tuples(&self) -> &[Vec<i64>] {
        &self.tuples
    }

    /// Merge `from`'s value list into `into`'s, used by dedup to collapse
    /// adjacent equal tuples. Single-threaded: called only from the
    /// sequential dedup pass.
    pub(crate) fn merge_values(&self, into: usize, from: usize) {
        let mut drained = self.values[from].lock().expect("staging mutex poisoned");
        let mut taken = drained.take().unwrap_or_default();
        let mut target = self.values[into].lock().expect("staging mutex poisoned");
        target.get_or_insert_with(Vec::new).append(&mut taken);
    }

    /// Re-stage a point that was previously built into the tree, carrying
    /// its whole value list back in. Used when `add` is called after a
    /// build and the existing tree has to be collapsed back into staging
    /// before the next lazy build. Bypasses the dimension and capacity
    /// checks `add` applies: this point already passed them once.
    pub(crate) fn restage(&mut self, tuple: Vec<i64>, values: Vec<V>) {
        self.tuples.push(tuple);
        self.values.push(Mutex::new(Some(values)));
    }

    /// Clone the value list for `idx` without consuming it. Used by
    /// `try_clone`, which needs a read-only copy of whatever is still
    /// staged.
    pub(crate) fn peek_values(&self, idx: usize) -> Vec<V>
    where
        V: Clone,
    {
        let slot = self.values[idx].lock().expect("staging mutex poisoned");
        slot.as_ref().cloned().unwrap_or_default()
    }

    /// Take the value list for `idx`, consuming it. May be called from
    /// either side of a parallel fork; correctness relies on each surviving
    /// index being taken exactly once across the whole build.
    pub(crate) fn take_values(&self, idx: usize) -> Result<Vec<V>> {
        let mut slot = self.values[idx].lock().expect("staging mutex poisoned");
        slot.take().ok_or_else(|| {
            Error::GeometryInvariant(format!("staged index {} consumed more than once", idx))
        })
    }
}

#[cfg(test)]
#[path = "stage_test.rs"]
mod stage_test;
