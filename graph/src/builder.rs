//! Single-pass property-graph construction.
//!
//! [`GraphBuilder`] is the only owner of node and edge identity. Statements
//! are fed in source order; the first time an identifier is seen it receives
//! the next node id, and each `(predicate, src, dst)` key receives at most one
//! edge. After the instance pass, [`GraphBuilder::finish`] closes the
//! transitive relations collected along the way and materializes the implied
//! edges under the same dedup rule.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::hierarchy::Hierarchy;
use crate::model::{Edge, EdgeKey, Node, PropertyGraph, URI_KEY};
use crate::registry::Registry;
use crate::report::BuildStats;
use crate::statement::Statement;
use crate::transitive::{TransitiveClosure, TransitiveRelations};
use crate::vocab::{self, display_name, is_local_file};

/// Owned construction context for one run.
#[derive(Debug)]
pub struct GraphBuilder<'a> {
    registry: &'a Registry,
    hierarchy: &'a Hierarchy,
    node_ids: HashMap<String, u64>,
    nodes: Vec<Node>,
    edge_ids: HashMap<EdgeKey, u64>,
    edges: Vec<Edge>,
    transitive: TransitiveRelations,
    stats: BuildStats,
}

impl<'a> GraphBuilder<'a> {
    /// Creates a builder over a finished registry and hierarchy.
    #[must_use]
    pub fn new(registry: &'a Registry, hierarchy: &'a Hierarchy) -> Self {
        Self {
            registry,
            hierarchy,
            node_ids: HashMap::new(),
            nodes: Vec::new(),
            edge_ids: HashMap::new(),
            edges: Vec::new(),
            transitive: TransitiveRelations::new(),
            stats: BuildStats::default(),
        }
    }

    /// Returns the id of `uri`, assigning the next id if it is new.
    /// `uri` must be canonical.
    pub fn intern_node(&mut self, uri: &str) -> u64 {
        if let Some(&id) = self.node_ids.get(uri) {
            return id;
        }
        let id = self.nodes.len() as u64 + 1;
        self.node_ids.insert(uri.to_string(), id);
        self.nodes.push(Node::new(id, uri));
        id
    }

    /// The id already assigned to `uri`, if any.
    #[must_use]
    pub fn node_id(&self, uri: &str) -> Option<u64> {
        self.node_ids.get(uri).copied()
    }

    /// Returns the id of the edge with this key, creating it if it is new.
    /// The flag is true when the edge was created by this call.
    pub fn intern_edge(
        &mut self,
        predicate: &str,
        label: &str,
        src: u64,
        dst: u64,
    ) -> (u64, bool) {
        let key = EdgeKey {
            predicate: predicate.to_string(),
            src,
            dst,
        };
        if let Some(&id) = self.edge_ids.get(&key) {
            return (id, false);
        }
        let id = self.edges.len() as u64 + 1;
        self.edge_ids.insert(key, id);
        self.edges.push(Edge::new(id, predicate, label, src, dst));
        (id, true)
    }

    /// Number of nodes assigned so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges created so far.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Counters so far.
    #[must_use]
    pub fn stats(&self) -> &BuildStats {
        &self.stats
    }

    fn node_mut(&mut self, id: u64) -> &mut Node {
        // Ids are dense and start at 1.
        &mut self.nodes[(id - 1) as usize]
    }

    /// Feeds every statement of `statements` in order.
    pub fn extend<I>(&mut self, statements: I)
    where
        I: IntoIterator<Item = Statement>,
    {
        for st in statements {
            self.add_statement(&st);
        }
    }

    /// Processes one instance statement.
    pub fn add_statement(&mut self, st: &Statement) {
        self.stats.statements += 1;

        let subject = st.subject.canonical_iri();
        let predicate = st.predicate.canonical_iri();
        let object_iri = st.object.canonical_iri();

        if [&subject, &predicate, &object_iri]
            .into_iter()
            .flatten()
            .any(|iri| is_local_file(iri))
        {
            self.stats.provenance_dropped += 1;
            return;
        }
        if st.subject.is_placeholder() || st.object.is_placeholder() {
            self.stats.placeholder_dropped += 1;
            return;
        }
        let (Some(subject), Some(predicate)) = (subject, predicate) else {
            self.stats.skipped += 1;
            return;
        };

        let src = self.intern_node(&subject);
        let registry = self.registry;

        if let Some(label) = registry.object_property(&predicate) {
            let Some(object) = object_iri else {
                trace!(statement = %st, "object property with a literal value");
                self.stats.skipped += 1;
                return;
            };
            let dst = self.intern_node(&object);
            if self.intern_edge(&predicate, label, src, dst).1 {
                self.stats.direct_edges += 1;
            }
            if registry.is_transitive(&predicate) {
                self.transitive.record(&predicate, &subject, &object);
            }
        } else if let Some(name) = registry.datatype_property(&predicate) {
            if name == URI_KEY {
                trace!(statement = %st, "datatype property would shadow the node identifier");
                self.stats.skipped += 1;
                return;
            }
            let value = match &object_iri {
                Some(iri) => iri.to_string(),
                None => st.object.value().to_string(),
            };
            self.node_mut(src).properties.insert(name.to_string(), value);
            self.stats.attributes += 1;
        } else if predicate == vocab::RDF_TYPE {
            let Some(class) = object_iri else {
                self.stats.skipped += 1;
                return;
            };
            let labels = self.class_labels(&class);
            if labels.is_empty() {
                trace!(class = %class, "type statement names no known class");
                return;
            }
            self.node_mut(src).merge_labels(labels);
            self.stats.typed += 1;
        } else {
            trace!(statement = %st, "statement outside the property-graph model");
            self.stats.skipped += 1;
        }
    }

    /// Labels contributed by a type statement naming `class`: the class
    /// itself, then its ancestors, keeping only known classes.
    fn class_labels(&self, class: &str) -> Vec<&'a str> {
        let registry = self.registry;
        std::iter::once(class)
            .chain(self.hierarchy.ancestors(class))
            .filter_map(|c| registry.class_label(c))
            .collect()
    }

    /// Adds one edge per implied relation of `closure`, skipping keys that
    /// already have an edge. Returns the number of edges added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DanglingEndpoint`] if a relation references an
    /// identifier without a node id.
    pub fn materialize(&mut self, closure: &TransitiveClosure) -> Result<u64> {
        let registry = self.registry;
        let mut added = 0;
        for rel in closure.relations() {
            let resolve = |uri: &str| {
                self.node_id(uri).ok_or_else(|| Error::DanglingEndpoint {
                    predicate: rel.predicate.to_string(),
                    uri: uri.to_string(),
                })
            };
            let src = resolve(rel.subject)?;
            let dst = resolve(rel.object)?;
            let label = registry
                .object_property(rel.predicate)
                .unwrap_or_else(|| display_name(rel.predicate));
            if self.intern_edge(rel.predicate, label, src, dst).1 {
                added += 1;
            }
        }
        self.stats.closure_edges += added;
        Ok(added)
    }

    /// Materializes transitive edges and returns the finished graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DanglingEndpoint`] if materialization references an
    /// identifier that never received a node id.
    pub fn finish(mut self) -> Result<(PropertyGraph, BuildStats)> {
        let closure = self.transitive.close();
        let added = self.materialize(&closure)?;
        debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            closure_edges = added,
            "graph construction finished"
        );
        Ok((
            PropertyGraph {
                nodes: self.nodes,
                edges: self.edges,
            },
            self.stats,
        ))
    }
}
