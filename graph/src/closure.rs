//! Cycle-safe reachability over a directed adjacency map.
//!
//! Both the class hierarchy and every transitive predicate reduce to the
//! same question: which nodes can be reached from `x` by following one or
//! more edges? [`Closure`] answers it for every node with outgoing edges,
//! using an explicit worklist and visited set so that cyclic input
//! terminates regardless of depth.

use std::collections::{BTreeMap, BTreeSet};

/// Directed graph as node → direct successors.
pub type Adjacency = BTreeMap<String, BTreeSet<String>>;

/// Memoized reachable sets for every node that has at least one successor.
///
/// A node's reachable set contains every node reachable through one or more
/// edges. It contains the node itself only when the node lies on a cycle.
#[derive(Debug, Clone, Default)]
pub struct Closure {
    reachable: BTreeMap<String, BTreeSet<String>>,
}

impl Closure {
    /// Computes reachable sets for every key of `adjacency`.
    ///
    /// Sets that are already complete are reused when a later traversal
    /// reaches their node, so shared ancestry is only walked once.
    #[must_use]
    pub fn new(adjacency: &Adjacency) -> Self {
        let mut reachable: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for start in adjacency.keys() {
            let set = reach(start, adjacency, &reachable);
            reachable.insert(start.clone(), set);
        }
        Self { reachable }
    }

    /// Nodes reachable from `from`, or `None` if `from` has no successors.
    #[must_use]
    pub fn reachable(&self, from: &str) -> Option<&BTreeSet<String>> {
        self.reachable.get(from)
    }

    /// Iterates `(node, reachable set)` in node order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &BTreeSet<String>)> {
        self.reachable.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of nodes with a non-empty reachable set.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reachable.len()
    }

    /// True if no node has successors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reachable.is_empty()
    }
}

/// Depth-first worklist traversal from `start`.
///
/// `done` holds only complete reachable sets, so splicing one in and not
/// expanding its node further never loses a successor, even on cycles.
fn reach(
    start: &str,
    adjacency: &Adjacency,
    done: &BTreeMap<String, BTreeSet<String>>,
) -> BTreeSet<String> {
    let mut visited: BTreeSet<String> = BTreeSet::new();
    let mut stack: Vec<&str> = adjacency
        .get(start)
        .map(|next| next.iter().map(String::as_str).collect())
        .unwrap_or_default();

    while let Some(node) = stack.pop() {
        if !visited.insert(node.to_string()) {
            continue;
        }
        if let Some(known) = done.get(node) {
            visited.extend(known.iter().cloned());
            continue;
        }
        if let Some(next) = adjacency.get(node) {
            stack.extend(
                next.iter()
                    .map(String::as_str)
                    .filter(|n| !visited.contains(*n)),
            );
        }
    }
    visited
}
