//! Transitive closure of relations whose predicate is declared
//! `owl:TransitiveProperty`.
//!
//! Relations are collected per predicate while the instance pass runs and
//! closed afterwards. Closures of different predicates never interact.

use std::collections::BTreeMap;

use crate::closure::{Adjacency, Closure};

/// Direct relations of every transitive predicate seen in the instance data.
#[derive(Debug, Clone, Default)]
pub struct TransitiveRelations {
    by_predicate: BTreeMap<String, Adjacency>,
}

impl TransitiveRelations {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `subject --predicate--> object`. Identifiers must already be
    /// canonical.
    pub fn record(&mut self, predicate: &str, subject: &str, object: &str) {
        self.by_predicate
            .entry(predicate.to_string())
            .or_default()
            .entry(subject.to_string())
            .or_default()
            .insert(object.to_string());
    }

    /// True if no relation has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_predicate.is_empty()
    }

    /// Closes every predicate independently.
    #[must_use]
    pub fn close(&self) -> TransitiveClosure {
        TransitiveClosure {
            by_predicate: self
                .by_predicate
                .iter()
                .map(|(p, adj)| (p.clone(), Closure::new(adj)))
                .collect(),
        }
    }
}

/// Reachable sets per transitive predicate.
#[derive(Debug, Clone, Default)]
pub struct TransitiveClosure {
    by_predicate: BTreeMap<String, Closure>,
}

/// One `(predicate, subject, object)` pair implied by a transitive closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImpliedRelation<'a> {
    /// The transitive predicate.
    pub predicate: &'a str,
    /// Subject with at least one direct relation.
    pub subject: &'a str,
    /// An object reachable from the subject.
    pub object: &'a str,
}

impl TransitiveClosure {
    /// Objects reachable from `subject` through `predicate`.
    pub fn reachable<'a>(
        &'a self,
        predicate: &str,
        subject: &str,
    ) -> impl Iterator<Item = &'a str> + 'a {
        self.by_predicate
            .get(predicate)
            .and_then(|c| c.reachable(subject))
            .into_iter()
            .flatten()
            .map(String::as_str)
    }

    /// Every implied relation, ordered by predicate, then subject, then
    /// object. The order is stable across runs for identical input.
    pub fn relations(&self) -> impl Iterator<Item = ImpliedRelation<'_>> {
        self.by_predicate.iter().flat_map(|(predicate, closure)| {
            closure.iter().flat_map(move |(subject, objects)| {
                objects.iter().map(move |object| ImpliedRelation {
                    predicate,
                    subject,
                    object,
                })
            })
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_closes_per_predicate() {
        let mut rel = TransitiveRelations::new();
        rel.record("partOf", "a", "b");
        rel.record("partOf", "b", "c");
        rel.record("near", "c", "d");
        let closure = rel.close();

        assert_eq!(closure.reachable("partOf", "a").collect::<Vec<_>>(), vec!["b", "c"]);
        // "near" never leaks into "partOf" and vice versa.
        assert_eq!(closure.reachable("partOf", "c").count(), 0);
        assert_eq!(closure.reachable("near", "a").count(), 0);
        assert_eq!(closure.reachable("near", "c").collect::<Vec<_>>(), vec!["d"]);
    }

    #[test]
    fn relations_are_ordered_and_complete() {
        let mut rel = TransitiveRelations::new();
        rel.record("p", "b", "c");
        rel.record("p", "a", "b");
        let closure = rel.close();
        let triples: Vec<(&str, &str, &str)> = closure
            .relations()
            .map(|r| (r.predicate, r.subject, r.object))
            .collect();
        assert_eq!(
            triples,
            vec![("p", "a", "b"), ("p", "a", "c"), ("p", "b", "c")]
        );
    }

    #[test]
    fn cyclic_relation_terminates() {
        let mut rel = TransitiveRelations::new();
        rel.record("p", "a", "b");
        rel.record("p", "b", "a");
        let closure = rel.close();
        assert_eq!(closure.reachable("p", "a").collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
