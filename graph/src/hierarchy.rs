//! Class ancestry over declared and inferred `rdfs:subClassOf` edges.

use std::collections::BTreeSet;

use tracing::debug;

use crate::closure::{Adjacency, Closure};
use crate::reasoner::SubclassFact;
use crate::vocab::canonicalize;

/// Resolved class hierarchy.
///
/// Built once from the registry's direct subclass map merged with the
/// reasoner's facts; immutable afterwards. Every class's ancestor set is
/// computed up front, so lookups during the instance pass are plain map reads.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    closure: Closure,
}

impl Hierarchy {
    /// Merges `inferred` into `declared` and resolves all ancestor sets.
    ///
    /// Inferred facts are canonicalized on the way in; a fact whose two sides
    /// are the same class adds nothing.
    #[must_use]
    pub fn new(declared: &Adjacency, inferred: &[SubclassFact]) -> Self {
        let mut merged = declared.clone();
        let mut added = 0usize;
        for (sub, sup) in inferred {
            let sub = canonicalize(sub);
            let sup = canonicalize(sup);
            if sub == sup {
                continue;
            }
            if merged
                .entry(sub.into_owned())
                .or_default()
                .insert(sup.into_owned())
            {
                added += 1;
            }
        }
        let closure = Closure::new(&merged);
        debug!(
            classes = closure.len(),
            inferred_edges = added,
            "resolved class hierarchy"
        );
        Self { closure }
    }

    /// All ancestors of `class`, excluding `class` itself even when it sits
    /// on a subclass cycle. Unknown classes have no ancestors.
    pub fn ancestors<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.closure
            .reachable(class)
            .into_iter()
            .flatten()
            .map(String::as_str)
            .filter(move |c| *c != class)
    }

    /// Collected form of [`ancestors`](Self::ancestors).
    #[must_use]
    pub fn ancestor_set(&self, class: &str) -> BTreeSet<String> {
        self.ancestors(class).map(str::to_string).collect()
    }
}
