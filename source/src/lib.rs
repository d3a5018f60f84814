//! Statement sources for rdf2pg.
//!
//! Reads ontologies (RDF/XML, Turtle or N-Triples) and instance data
//! (N-Triples) through the sophia parsers and hands out
//! [`rdf2pg_graph::Statement`] values. Instance files are streamed, so a run
//! never holds more than one parsed instance statement at a time.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod discover;
pub mod parse;

pub use discover::{discover_instances, INSTANCE_EXTENSION};
pub use parse::{
    for_each_statement, for_each_statement_in, load_fact_table, parse_file, parse_str, Syntax,
};
