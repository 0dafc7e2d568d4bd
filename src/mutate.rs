//! Exact-point removal and biased arbitrary-value picking.
//!
//! Both operations are single node-to-node descents, not a subtree scan,
//! so neither forks through the pool.

use std::cmp::Ordering;

use crate::node::{Node, Status};
use crate::permutation::Permutation;
use crate::superkey::superkey_compare;

/// Remove the first occurrence of `value` from the value list staged at the
/// node whose tuple equals `point`. Returns `Status` for the caller to prune
/// the link it descended through, and whether a matching value was found.
pub(crate) fn remove_point<V: PartialEq>(
    node: &mut Node<V>,
    point: &[i64],
    value: &V,
    perm: &Permutation,
    depth: usize,
) -> (Status, bool) {
    let axis = perm.axis(depth);
    match superkey_compare(point, &node.tuple, axis) {
        Ordering::Equal => {
            let removed = match node.values.iter().position(|v| v == value) {
                Some(idx) => {
                    node.values.remove(idx);
                    true
                }
                None => false,
            };
            let status = status_for(node, removed);
            (status, removed)
        }
        Ordering::Less => descend(&mut node.lt, |child| remove_point(child, point, value, perm, depth + 1))
            .map_or((Status::Untouched, false), |(child_status, removed)| {
                if child_status == Status::Empty {
                    node.lt = None;
                }
                (status_for(node, child_status.found()), removed)
            }),
        Ordering::Greater => descend(&mut node.gt, |child| remove_point(child, point, value, perm, depth + 1))
            .map_or((Status::Untouched, false), |(child_status, removed)| {
                if child_status == Status::Empty {
                    node.gt = None;
                }
                (status_for(node, child_status.found()), removed)
            }),
    }
}

fn status_for<V>(node: &Node<V>, touched: bool) -> Status {
    if node.is_dead() {
        Status::Empty
    } else if touched {
        Status::Alive
    } else {
        Status::Untouched
    }
}

fn descend<V, F, R>(link: &mut Option<Box<Node<V>>>, f: F) -> Option<R>
where
    F: FnOnce(&mut Node<V>) -> R,
{
    link.as_deref_mut().map(f)
}

/// The four standard selector preparations for a biased descent: always
/// take the lesser child, always the greater, alternate every level, or
/// follow an externally supplied bit pattern (e.g. from an RNG).
#[derive(Debug, Clone, Copy)]
pub enum Bias {
    AlwaysLt,
    AlwaysGt,
    Alternate,
    Selector(u64),
}

impl Bias {
    pub(crate) fn selector(self) -> u64 {
        match self {
            Bias::AlwaysLt => 0,
            Bias::AlwaysGt => u64::MAX,
            Bias::Alternate => 0xAAAA_AAAA_AAAA_AAAA,
            Bias::Selector(bits) => bits,
        }
    }
}

/// Walk from `node` reading one bit of `selector` per level (cycling every
/// 64 levels) to choose lt (0) or gt (1), stopping at whichever node has no
/// child on the chosen side. From that landing node, take the first value
/// found at the node itself or, failing that, the first value found
/// anywhere under it. When `remove` is true the value is popped from its
/// list and the tri-state prune status is propagated back up the path
/// actually touched, so the caller can clear a now-dead child link.
pub(crate) fn pick_value<V: Clone>(
    node: &mut Node<V>,
    selector: u64,
    remove: bool,
) -> (Option<(Vec<i64>, V)>, Status) {
    pick_at(node, selector, 0, remove)
}

fn pick_at<V: Clone>(
    node: &mut Node<V>,
    selector: u64,
    depth: usize,
    remove: bool,
) -> (Option<(Vec<i64>, V)>, Status) {
    let bit = (selector >> (depth % 64)) & 1;
    let chosen_child_present = if bit == 0 { node.lt.is_some() } else { node.gt.is_some() };

    if chosen_child_present {
        let (found, child_status) = if bit == 0 {
            pick_at(node.lt.as_deref_mut().unwrap(), selector, depth + 1, remove)
        } else {
            pick_at(node.gt.as_deref_mut().unwrap(), selector, depth + 1, remove)
        };
        if child_status == Status::Empty {
            if bit == 0 {
                node.lt = None;
            } else {
                node.gt = None;
            }
        }
        let status = status_for(node, child_status.found());
        return (found, status);
    }

    take_first_available(node, remove)
}

fn take_first_available<V: Clone>(node: &mut Node<V>, remove: bool) -> (Option<(Vec<i64>, V)>, Status) {
    if let Some(v) = node.values.first().cloned() {
        if remove {
            node.values.remove(0);
        }
        return (Some((node.tuple.clone(), v)), status_for(node, true));
    }
    if let Some(lt) = node.lt.as_deref_mut() {
        let (found, child_status) = take_first_available(lt, remove);
        if found.is_some() {
            if child_status == Status::Empty {
                node.lt = None;
            }
            return (found, status_for(node, true));
        }
    }
    if let Some(gt) = node.gt.as_deref_mut() {
        let (found, child_status) = take_first_available(gt, remove);
        if found.is_some() {
            if child_status == Status::Empty {
                node.gt = None;
            }
            return (found, status_for(node, true));
        }
    }
    (None, Status::Untouched)
}

#[cfg(test)]
#[path = "mutate_test.rs"]
mod mutate_test;
