//! End-to-end conversion: ontology, reasoner, instance pass, chunked output.

use std::path::PathBuf;

use anyhow::{Context, Result};
use rdf2pg_graph::chunk::{recreate_dir, write_chunks, EDGES_PREFIX, NODES_PREFIX};
use rdf2pg_graph::{Chain, EquivalenceReasoner, Notice, RunReport, Schema};
use rdf2pg_source::{discover_instances, for_each_statement, load_fact_table, parse_file, Syntax};
use tracing::info;

use crate::config::ConvertConfig;

/// What a run produced.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Notices and builder counters.
    pub report: RunReport,
    /// Instance files read, in order.
    pub instance_files: Vec<PathBuf>,
    /// Number of nodes written.
    pub nodes: usize,
    /// Number of edges written.
    pub edges: usize,
    /// Node chunk files, in chunk order.
    pub node_files: Vec<PathBuf>,
    /// Edge chunk files, in chunk order.
    pub edge_files: Vec<PathBuf>,
}

/// Builds the reasoner chain selected by `config`.
///
/// # Errors
///
/// Returns an error if the fact table cannot be loaded.
pub fn reasoner(config: &ConvertConfig) -> Result<Chain> {
    let mut chain = Chain::new();
    if let Some(path) = &config.inferred {
        let table = load_fact_table(path)
            .with_context(|| format!("failed to load inferred facts {}", path.display()))?;
        info!(path = %path.display(), facts = table.len(), "loaded inferred subclass facts");
        chain = chain.with(table);
    }
    if config.equivalence {
        chain = chain.with(EquivalenceReasoner);
    }
    Ok(chain)
}

/// Runs one conversion.
///
/// Nothing is written until the whole graph has been built; the output
/// directory is then recreated and filled with `nodes_<i>.json` and
/// `edges_<i>.json`.
///
/// # Errors
///
/// Returns an error if any input cannot be read or parsed, the reasoner
/// fails, the registry is inconsistent in strict mode, an edge endpoint is
/// dangling, or the output cannot be written.
pub fn run(config: &ConvertConfig) -> Result<RunSummary> {
    let ontology = parse_file(&config.ontology)
        .with_context(|| format!("failed to load ontology {}", config.ontology.display()))?;
    info!(path = %config.ontology.display(), statements = ontology.len(), "loaded ontology");

    let chain = reasoner(config)?;
    let schema = Schema::build(&ontology, &chain, config.conflict_policy)
        .context("failed to build the schema")?;
    drop(ontology);

    let instance_files = discover_instances(&config.instances)
        .context("failed to collect instance files")?;
    let mut report = RunReport::new();
    report.extend(schema.notices.iter().cloned());
    if instance_files.is_empty() {
        report.push(Notice::warn("instances", "no instance files found"));
    }

    let mut builder = schema.graph_builder();
    for path in &instance_files {
        let count = for_each_statement(path, Syntax::NTriples, |st| builder.add_statement(&st))
            .with_context(|| format!("failed to read instances {}", path.display()))?;
        info!(path = %path.display(), statements = count, nodes = builder.node_count(), "read instance file");
    }
    let (graph, stats) = builder.finish().context("failed to build the graph")?;
    report.stats = stats;
    info!(nodes = graph.nodes.len(), edges = graph.edges.len(), %stats, "graph built");

    recreate_dir(&config.out)
        .with_context(|| format!("failed to prepare {}", config.out.display()))?;
    let node_files = write_chunks(&config.out, NODES_PREFIX, &graph.nodes, config.chunk_size)
        .with_context(|| format!("failed to write nodes to {}", config.out.display()))?;
    let edge_files = write_chunks(&config.out, EDGES_PREFIX, &graph.edges, config.chunk_size)
        .with_context(|| format!("failed to write edges to {}", config.out.display()))?;
    info!(
        out = %config.out.display(),
        node_files = node_files.len(),
        edge_files = edge_files.len(),
        "output written"
    );

    Ok(RunSummary {
        report,
        instance_files,
        nodes: graph.nodes.len(),
        edges: graph.edges.len(),
        node_files,
        edge_files,
    })
}
