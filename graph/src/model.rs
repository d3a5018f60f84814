//! Property-graph records.
//!
//! Field order of the structs is the field order of the emitted JSON, and
//! property maps are ordered by key, so serializing the same graph twice
//! produces identical bytes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key under which every node and edge stores its source identifier.
pub const URI_KEY: &str = "uri";

/// A property-graph node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Dense id starting at 1, in first-seen order.
    pub id: u64,
    /// Canonical identifier of the source entity.
    pub uri: String,
    /// Attribute bag; always contains [`URI_KEY`].
    pub properties: BTreeMap<String, String>,
    /// Class labels, absent until a type statement contributes one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<String>>,
}

impl Node {
    /// Creates an unlabeled node whose only property is its identifier.
    pub fn new(id: u64, uri: impl Into<String>) -> Self {
        let uri = uri.into();
        let mut properties = BTreeMap::new();
        properties.insert(URI_KEY.to_string(), uri.clone());
        Self {
            id,
            uri,
            properties,
            labels: None,
        }
    }

    /// Adds labels not already present, keeping first-seen order.
    pub fn merge_labels<'a>(&mut self, labels: impl IntoIterator<Item = &'a str>) {
        let mut incoming = labels.into_iter().peekable();
        if incoming.peek().is_none() {
            return;
        }
        let current = self.labels.get_or_insert_with(Vec::new);
        for label in incoming {
            if !current.iter().any(|l| l == label) {
                current.push(label.to_string());
            }
        }
    }
}

/// A property-graph edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    /// Dense id starting at 1, independent of node ids.
    pub id: u64,
    /// Relationship label: exactly one display name.
    pub label: Vec<String>,
    /// Source node id.
    pub src: u64,
    /// Destination node id.
    pub dst: u64,
    /// Attribute bag; [`URI_KEY`] holds the predicate identifier.
    pub properties: BTreeMap<String, String>,
}

impl Edge {
    /// Creates an edge for `predicate` between two node ids.
    pub fn new(id: u64, predicate: &str, label: &str, src: u64, dst: u64) -> Self {
        let mut properties = BTreeMap::new();
        properties.insert(URI_KEY.to_string(), predicate.to_string());
        Self {
            id,
            label: vec![label.to_string()],
            src,
            dst,
            properties,
        }
    }

    /// The predicate identifier this edge was created from.
    #[must_use]
    pub fn predicate(&self) -> &str {
        self.properties.get(URI_KEY).map(String::as_str).unwrap_or_default()
    }
}

/// Identity of an edge: at most one edge exists per key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    /// Canonical predicate identifier.
    pub predicate: String,
    /// Source node id.
    pub src: u64,
    /// Destination node id.
    pub dst: u64,
}

/// Finished graph, ordered by id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyGraph {
    /// Nodes; `nodes[i].id == i + 1`.
    pub nodes: Vec<Node>,
    /// Edges; `edges[i].id == i + 1`.
    pub edges: Vec<Edge>,
}

impl PropertyGraph {
    /// The node with the given canonical identifier.
    #[must_use]
    pub fn node_by_uri(&self, uri: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.uri == uri)
    }

    /// Edges whose predicate identifier is `predicate`.
    pub fn edges_with_predicate<'a>(&'a self, predicate: &'a str) -> impl Iterator<Item = &'a Edge> + 'a {
        self.edges.iter().filter(move |e| e.predicate() == predicate)
    }
}
