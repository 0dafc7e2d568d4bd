//! A balanced, static k-d tree over `i64` coordinate tuples.
//!
//! Points are staged via [`Tree::add`] and organized into the tree in one
//! bulk pass -- sort each axis under a cyclic tie-break order, dedup
//! adjacent equal tuples by merging their value lists, then recursively
//! split on the median of whichever axis is significant at the current
//! depth. There is no incremental insertion: adding a point after a build
//! collapses the tree back into staging and the next query rebuilds it
//! from scratch. That tradeoff is deliberate -- the sort/build pipeline
//! is where the parallelism lives, and a from-scratch bulk build keeps
//! every node's subtree balanced around its true median rather than
//! drifting the way incremental insertion does.
//!
//! Once built, the tree supports orthogonal range search (both a
//! center-and-cutoff hypercube and an explicit box), bounded
//! nearest-neighbor search with a per-axis distance mask, exact-point
//! removal, a destructive range search that removes as it matches, and a
//! biased descent for picking an arbitrary surviving value cheaply -- the
//! operations a spatial clustering pass (range queries to find a point's
//! neighborhood, removal to mark it visited) needs from its point index.
//!
//! `mod error` comes first so the `err_at!` macro it exports is in scope,
//! unqualified, for every module declared after it.

mod error;

mod build;
mod config;
mod dedup;
mod mutate;
mod nn;
mod node;
mod permutation;
mod pool;
mod range;
mod sort;
mod stage;
mod superkey;
mod tree;

pub use crate::config::Config;
pub use crate::error::{Error, Result};
pub use crate::mutate::Bias;
pub use crate::tree::Tree;
