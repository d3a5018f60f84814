//! `rdf2pg` — Converts an OWL ontology and RDF instance data into a labeled
//! property graph.
//!
//! **Outputs:**
//! - `<out>/nodes_<i>.json` — node records, `--chunk-size` per file
//! - `<out>/edges_<i>.json` — edge records, `--chunk-size` per file
//!
//! **Usage:**
//! ```text
//! rdf2pg -o <ontology> -n <instances>... -j <out> [-c <chunk-size>]
//!        [--inferred <facts>] [--equivalence] [--strict-registry] [--config <file>]
//! ```
//!
//! Log verbosity follows `RUST_LOG` (default `rdf2pg=info`).

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use rdf2pg_clients::{run, Settings};
use tracing_subscriber::EnvFilter;

/// Convert RDF knowledge graphs into labeled property graphs.
#[derive(Parser)]
#[command(
    name = "rdf2pg",
    version,
    about = "Convert an OWL ontology and N-Triples instance data into property graph JSON chunks"
)]
struct Args {
    /// Ontology file (RDF/XML, Turtle or N-Triples).
    #[arg(short = 'o', long)]
    ontology: Option<PathBuf>,

    /// Instance N-Triples file or directory; may be repeated.
    #[arg(short = 'n', long, num_args = 1..)]
    instances: Vec<PathBuf>,

    /// Output directory (recreated on every successful run).
    #[arg(short = 'j', long)]
    out: Option<PathBuf>,

    /// Records per output file (default: 10000).
    #[arg(short = 'c', long)]
    chunk_size: Option<usize>,

    /// Precomputed subclass facts: TSV `sub<TAB>super` or N-Triples.
    #[arg(long)]
    inferred: Option<PathBuf>,

    /// Derive subclass facts from owl:equivalentClass.
    #[arg(long)]
    equivalence: bool,

    /// Fail when an identifier is declared as more than one kind.
    #[arg(long)]
    strict_registry: bool,

    /// TOML file with default values for the options above.
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    fn settings(self) -> Settings {
        Settings {
            ontology: self.ontology,
            instances: self.instances,
            out: self.out,
            chunk_size: self.chunk_size,
            inferred: self.inferred,
            equivalence: self.equivalence.then_some(true),
            strict_registry: self.strict_registry.then_some(true),
        }
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rdf2pg=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let file = match &args.config {
        Some(path) => Settings::load(path)?,
        None => Settings::default(),
    };
    let config = args
        .settings()
        .merge(file)
        .into_config()
        .context("incomplete configuration")?;

    let summary = run(&config)?;

    println!("rdf2pg Conversion Report");
    println!("========================");
    println!();
    for notice in &summary.report.notices {
        println!("[{}] {} — {}", notice.severity.as_str(), notice.stage, notice.message);
        for detail in &notice.details {
            println!("       {}", detail);
        }
    }
    if !summary.report.notices.is_empty() {
        println!();
    }

    let stats = &summary.report.stats;
    println!("  Instance files: {}", summary.instance_files.len());
    println!("  Statements: {}", stats.statements);
    println!(
        "  Dropped: {} provenance, {} placeholder, {} outside the model",
        stats.provenance_dropped, stats.placeholder_dropped, stats.skipped
    );
    println!("  Nodes: {} ({} files)", summary.nodes, summary.node_files.len());
    println!(
        "  Edges: {} ({} direct, {} transitive; {} files)",
        summary.edges,
        stats.direct_edges,
        stats.closure_edges,
        summary.edge_files.len()
    );
    println!("  Output: {}", config.out.display());
    println!();
    println!(
        "Summary: {} warnings, {} nodes, {} edges",
        summary.report.warning_count(),
        summary.nodes,
        summary.edges
    );

    Ok(())
}
