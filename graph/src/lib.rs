//! Property-graph construction from OWL ontologies and RDF instance data.
//!
//! The `rdf2pg-graph` crate turns already-parsed subject–predicate–object
//! statements into a labeled property graph: integer-identified nodes with
//! attribute bags and class labels, and integer-identified edges with a
//! relationship label. Parsing lives in `rdf2pg-source`; this crate performs
//! no I/O apart from writing output chunks.
//!
//! # Entry Point
//!
//! ```
//! use rdf2pg_graph::{convert, NoReasoner, Schema, ConflictPolicy, Statement};
//! use rdf2pg_graph::vocab::{OWL_CLASS, OWL_OBJECT_PROPERTY, RDF_TYPE};
//!
//! let ontology = vec![
//!     Statement::iris("http://ex.org/o#Company", RDF_TYPE, OWL_CLASS),
//!     Statement::iris("http://ex.org/o#owns", RDF_TYPE, OWL_OBJECT_PROPERTY),
//! ];
//! let schema = Schema::build(&ontology, &NoReasoner, ConflictPolicy::Precedence)?;
//! let conversion = convert(
//!     &schema,
//!     vec![Statement::iris("http://ex.org/a", "http://ex.org/o#owns", "http://ex.org/b")],
//! )?;
//! assert_eq!(conversion.graph.nodes.len(), 2);
//! assert_eq!(conversion.graph.edges[0].label, vec!["owns".to_string()]);
//! # Ok::<(), rdf2pg_graph::Error>(())
//! ```
//!
//! # Pipeline
//!
//! ```text
//! ontology ──► Registry ──┐
//!     └──► SubclassReasoner ──► Hierarchy ──┐
//! instances ─────────────────────────────► GraphBuilder ──► TransitiveClosure
//!                                               └──► PropertyGraph ──► chunk
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod builder;
pub mod chunk;
pub mod closure;
pub mod error;
pub mod hierarchy;
pub mod model;
pub mod reasoner;
pub mod registry;
pub mod report;
pub mod statement;
pub mod transitive;
pub mod vocab;

use tracing::info;

pub use builder::GraphBuilder;
pub use error::{Error, Result};
pub use hierarchy::Hierarchy;
pub use model::{Edge, EdgeKey, Node, PropertyGraph};
pub use reasoner::{Chain, EquivalenceReasoner, FactTable, NoReasoner, SubclassFact, SubclassReasoner};
pub use registry::{ConflictPolicy, Conflict, EntityKind, Registry};
pub use report::{BuildStats, Notice, RunReport, Severity};
pub use statement::{Statement, Term};

/// Everything derived from the ontology: the registry and the resolved
/// hierarchy. Built once per run, before any instance statement is read.
#[derive(Debug, Clone)]
pub struct Schema {
    /// Class and property tables.
    pub registry: Registry,
    /// Ancestry over declared and inferred subclass edges.
    pub hierarchy: Hierarchy,
    /// Number of facts contributed by the reasoner.
    pub inferred_facts: usize,
    /// Notices raised while building the schema.
    pub notices: Vec<Notice>,
}

impl Schema {
    /// Builds the registry, asks `reasoner` for additional subclass facts,
    /// and resolves the hierarchy over the union of both.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryConflict`] in strict mode, or
    /// [`Error::Reasoner`] if the reasoner fails.
    pub fn build(
        ontology: &[Statement],
        reasoner: &dyn SubclassReasoner,
        policy: ConflictPolicy,
    ) -> Result<Self> {
        let registry = Registry::from_statements(ontology, policy)?;
        let facts = reasoner.infer_subclass_facts(ontology)?;
        let hierarchy = Hierarchy::new(registry.sub_class_of(), &facts);

        let mut notices = Vec::new();
        if !registry.conflicts().is_empty() {
            notices.push(Notice::warn_with_details(
                "registry",
                format!(
                    "{} identifier(s) declared as more than one kind",
                    registry.conflicts().len()
                ),
                registry.conflicts().iter().map(ToString::to_string).collect(),
            ));
        }
        if !facts.is_empty() {
            notices.push(Notice::info(
                "reasoner",
                format!("{} inferred subclass fact(s) from {}", facts.len(), reasoner.name()),
            ));
        }

        info!(
            statements = ontology.len(),
            classes = registry.class_labels().len(),
            object_properties = registry.object_properties().len(),
            datatype_properties = registry.datatype_properties().len(),
            transitive_properties = registry.transitive_properties().len(),
            inferred_facts = facts.len(),
            "schema ready"
        );

        Ok(Self {
            registry,
            hierarchy,
            inferred_facts: facts.len(),
            notices,
        })
    }

    /// Starts an instance pass over this schema.
    #[must_use]
    pub fn graph_builder(&self) -> GraphBuilder<'_> {
        GraphBuilder::new(&self.registry, &self.hierarchy)
    }
}

/// Result of [`convert`].
#[derive(Debug, Clone)]
pub struct Conversion {
    /// The finished graph.
    pub graph: PropertyGraph,
    /// Notices and counters of the run.
    pub report: RunReport,
}

/// Runs the instance pass over in-memory statements and materializes
/// transitive edges.
///
/// # Errors
///
/// Returns [`Error::DanglingEndpoint`] if transitive materialization cannot
/// resolve an endpoint.
pub fn convert<I>(schema: &Schema, instances: I) -> Result<Conversion>
where
    I: IntoIterator<Item = Statement>,
{
    let mut builder = schema.graph_builder();
    builder.extend(instances);
    let (graph, stats) = builder.finish()?;
    info!(nodes = graph.nodes.len(), edges = graph.edges.len(), %stats, "graph built");

    let mut report = RunReport::new();
    report.extend(schema.notices.iter().cloned());
    report.stats = stats;
    Ok(Conversion { graph, report })
}
