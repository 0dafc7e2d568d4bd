//! The public facade: a staging buffer plus a lazily-built tree.

use std::collections::BinaryHeap;
use std::panic::{self, AssertUnwindSafe};

use crate::build;
use crate::config::Config;
use crate::dedup;
use crate::error::{Error, Result};
use crate::mutate::{self, Bias};
use crate::nn;
use crate::node::{Node, Status};
use crate::permutation::Permutation;
use crate::pool::Pool;
use crate::range;
use crate::sort;
use crate::stage::Staging;

/// A balanced, static k-d tree index over `i64` coordinate tuples.
///
/// Points accumulate in a staging buffer via [`Tree::add`]; the tree itself
/// is organized from that buffer lazily, on the first query or explicitly
/// via [`Tree::build`]. Adding a point after a build collapses the
/// existing tree back into staging and re-builds on the next query, so the
/// cost of interleaving `add` and search calls is a full rebuild per
/// resumed `add`, not an incremental update -- this index is built for the
/// bulk-load, query-heavily workloads its bulk constructors and range/kNN
/// searches are optimized for, not for fine-grained mutation.
pub struct Tree<V> {
    config: Config,
    staging: Staging<V>,
    root: Option<Node<V>>,
    len: usize,
    pool: Pool,
}

impl<V: Send> Tree<V> {
    /// A tree over `dimensions`-axis points, staging up to `capacity`
    /// points before a build is required.
    pub fn new(dimensions: usize, capacity: usize) -> Tree<V> {
        Tree::with_config(Config::new(dimensions, capacity))
    }

    pub fn with_config(config: Config) -> Tree<V> {
        let pool = Pool::new(config.num_threads());
        Tree {
            staging: Staging::new(config.capacity(), config.dimensions()),
            root: None,
            len: 0,
            config,
            pool,
        }
    }

    /// Change the thread count used by subsequent builds and queries.
    /// Does not affect a tree that is already built.
    pub fn set_num_threads(&mut self, num_threads: usize) {
        self.config.set_num_threads(num_threads);
        self.pool = Pool::new(num_threads);
    }

    pub fn dimensions(&self) -> usize {
        self.config.dimensions()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Stage a point. If the tree was already built, the existing tree is
    /// collapsed back into staging first, so the next build incorporates
    /// both the old points and this one.
    pub fn add(&mut self, point: &[i64], value: V) -> Result<()> {
        if self.root.is_some() {
            self.collapse();
        }
        self.staging.add(point, value)?;
        self.len += 1;
        Ok(())
    }

    /// Organize every staged point into the tree. A no-op if there is
    /// nothing staged and the tree is already built. Called automatically
    /// by every query method when the tree is not yet built.
    pub fn build(&mut self) -> Result<()> {
        if self.root.is_some() {
            return Ok(());
        }
        if self.staging.len() == 0 {
            return Ok(());
        }
        run_guarded(|| self.build_inner())
    }

    fn build_inner(&mut self) -> Result<()> {
        let dims = self.config.dimensions();
        let tuples = self.staging.tuples().to_vec();
        let n = tuples.len();

        let mut axis_refs: Vec<Vec<usize>> = Vec::with_capacity(dims);
        for axis in 0..dims {
            let mut reference: Vec<usize> = (0..n).collect();
            let mut scratch = reference.clone();
            sort::merge_sort(&mut reference, &mut scratch, &tuples, axis, &self.pool);
            if axis == 0 {
                dedup::dedup(&mut reference, &tuples, axis, &self.staging)?;
            } else {
                let survivors: std::collections::HashSet<usize> =
                    axis_refs[0].iter().copied().collect();
                reference.retain(|idx| survivors.contains(idx));
            }
            axis_refs.push(reference);
        }

        let perm = Permutation::new(dims, axis_refs[0].len());
        let mut scratch = axis_refs[0].clone();
        let mut refs: Vec<&mut [usize]> = axis_refs.iter_mut().map(|v| v.as_mut_slice()).collect();
        let root = build::build(&mut refs, &mut scratch, &tuples, &self.staging, &perm, 0, &self.pool)?;
        self.root = Some(root);
        Ok(())
    }

    fn ensure_built(&mut self) -> Result<()> {
        self.build()
    }

    fn perm(&self) -> Permutation {
        Permutation::new(self.config.dimensions(), self.len.max(1))
    }

    fn collapse(&mut self) {
        if let Some(root) = self.root.take() {
            let mut fresh: Staging<V> =
                Staging::new(self.config.capacity().max(self.len + 1), self.config.dimensions());
            drain_into(root, &mut fresh);
            self.staging = fresh;
        }
    }

    /// Every point within `cutoff` of `point` under the L2 metric, each
    /// paired with the value it carries.
    pub fn search(&mut self, point: &[i64], cutoff: i64) -> Result<Vec<(Vec<i64>, V)>>
    where
        V: Clone,
    {
        self.ensure_built()?;
        let (query_plus, query_minus) = range::hypercube(point, cutoff);
        self.search_box(&query_plus, &query_minus)
    }

    /// Every point in the half-open box `[query_minus, query_plus)`,
    /// each paired with the value it carries. The box is normalized
    /// (per-axis swapped) if given inverted.
    pub fn search_box(&mut self, query_plus: &[i64], query_minus: &[i64]) -> Result<Vec<(Vec<i64>, V)>>
    where
        V: Clone,
    {
        self.ensure_built()?;
        let (query_plus, query_minus) =
            range::normalize_box(query_plus.to_vec(), query_minus.to_vec());
        let perm = self.perm();
        let pool = &self.pool;
        match &self.root {
            None => Ok(Vec::new()),
            Some(root) => {
                run_guarded(|| Ok(range::search(root, &query_plus, &query_minus, &perm, 0, pool)))
            }
        }
    }

    /// Same traversal as [`Tree::search_box`], with the matching tuples and
    /// values returned as two lockstep lists instead of paired tuples.
    pub fn search_box_with_tuples(
        &mut self,
        query_plus: &[i64],
        query_minus: &[i64],
    ) -> Result<(Vec<Vec<i64>>, Vec<V>)>
    where
        V: Clone,
    {
        let hits = self.search_box(query_plus, query_minus)?;
        Ok(hits.into_iter().unzip())
    }

    /// The `k` points nearest to `point`, nearest first, paired with their
    /// value and the floored Euclidean distance. `enabled[i] == false`
    /// excludes axis `i` from both the distance metric and pruning.
    pub fn nearest_neighbor(
        &mut self,
        point: &[i64],
        enabled: &[bool],
        k: usize,
    ) -> Result<Vec<(Vec<i64>, V, i64)>>
    where
        V: Clone,
    {
        self.ensure_built()?;
        let perm = self.perm();
        match &self.root {
            None => Ok(Vec::new()),
            Some(root) => run_guarded(|| {
                let mut heap = BinaryHeap::new();
                nn::walk(root, point, enabled, k, &perm, 0, &mut heap);
                Ok(nn::drain_sorted(heap))
            }),
        }
    }

    /// Remove the first occurrence of `value` from the value list staged
    /// at the exact point `point`. Returns whether a matching value was
    /// found and removed.
    pub fn remove(&mut self, point: &[i64], value: &V) -> Result<bool>
    where
        V: PartialEq,
    {
        self.ensure_built()?;
        let perm = self.perm();
        let mut root = match self.root.take() {
            None => return Ok(false),
            Some(root) => root,
        };
        let (status, removed) = mutate::remove_point(&mut root, point, value, &perm, 0);
        if status != Status::Empty {
            self.root = Some(root);
        }
        if removed {
            self.len -= 1;
        }
        Ok(removed)
    }

    /// Remove every point in the half-open box `[query_minus, query_plus)`,
    /// returning the removed `(tuple, value)` pairs.
    pub fn search_and_remove_box(
        &mut self,
        query_plus: &[i64],
        query_minus: &[i64],
    ) -> Result<Vec<(Vec<i64>, V)>>
    where
        V: Clone,
    {
        self.ensure_built()?;
        let (query_plus, query_minus) =
            range::normalize_box(query_plus.to_vec(), query_minus.to_vec());
        let perm = self.perm();

        let mut root = match self.root.take() {
            None => return Ok(Vec::new()),
            Some(root) => root,
        };
        let pool = &self.pool;
        let result = run_guarded(|| {
            Ok(range::search_and_remove(&mut root, &query_plus, &query_minus, &perm, 0, pool))
        });
        let (status, removed) = match result {
            Ok(pair) => pair,
            Err(err) => {
                self.root = Some(root);
                return Err(err);
            }
        };
        if status != Status::Empty {
            self.root = Some(root);
        }
        self.len -= removed.len();
        Ok(removed)
    }

    /// Every point within `cutoff` of `point`, removed from the tree.
    pub fn search_and_remove(&mut self, point: &[i64], cutoff: i64) -> Result<Vec<(Vec<i64>, V)>>
    where
        V: Clone,
    {
        let (query_plus, query_minus) = range::hypercube(point, cutoff);
        self.search_and_remove_box(&query_plus, &query_minus)
    }

    /// Descend the tree according to `bias`, returning an arbitrary
    /// surviving `(tuple, value)` pair. Used by callers (e.g. a DBSCAN
    /// driver) that want a cheap, skewed-toward-one-side sample rather
    /// than a uniform random pick. When `remove` is true, the picked value
    /// is also removed from the tree, pruning a now-dead node if needed.
    pub fn pick_value(&mut self, bias: Bias, remove: bool) -> Result<Option<(Vec<i64>, V)>>
    where
        V: Clone,
    {
        self.ensure_built()?;
        let mut root = match self.root.take() {
            None => return Ok(None),
            Some(root) => root,
        };
        let (found, status) = mutate::pick_value(&mut root, bias.selector(), remove);
        if status != Status::Empty {
            self.root = Some(root);
        }
        if remove && found.is_some() {
            self.len -= 1;
        }
        Ok(found)
    }
}

impl<V: Clone + Send> Tree<V> {
    /// A deep copy: every staged and built point, independent of `self`.
    pub fn try_clone(&self) -> Result<Tree<V>> {
        let mut fresh: Tree<V> = Tree::new(self.config.dimensions(), self.config.capacity());
        fresh.set_num_threads(self.config.num_threads());

        let mut pairs = Vec::new();
        if let Some(root) = &self.root {
            collect_pairs(root, &mut pairs);
        }
        for idx in 0..self.staging.len() {
            let tuple = self.staging.tuples()[idx].clone();
            for v in self.staging.peek_values(idx) {
                pairs.push((tuple.clone(), v));
            }
        }
        for (tuple, value) in pairs {
            fresh.add(&tuple, value)?;
        }
        Ok(fresh)
    }
}

fn collect_pairs<V: Clone>(node: &Node<V>, out: &mut Vec<(Vec<i64>, V)>) {
    if let Some(lt) = &node.lt {
        collect_pairs(lt, out);
    }
    for v in &node.values {
        out.push((node.tuple.clone(), v.clone()));
    }
    if let Some(gt) = &node.gt {
        collect_pairs(gt, out);
    }
}

fn drain_into<V>(node: Node<V>, staging: &mut Staging<V>) {
    if let Some(lt) = node.lt {
        drain_into(*lt, staging);
    }
    if !node.values.is_empty() {
        staging.restage(node.tuple.clone(), node.values);
    }
    if let Some(gt) = node.gt {
        drain_into(*gt, staging);
    }
}

/// Run `f`, converting a panic inside it (most likely from a forked task)
/// into `Error::TaskFailure` instead of letting it unwind past the public
/// API boundary.
fn run_guarded<F, R>(f: F) -> Result<R>
where
    F: FnOnce() -> Result<R>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(Error::TaskFailure(msg))
        }
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
