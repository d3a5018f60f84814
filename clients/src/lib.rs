//! Pipeline and configuration behind the `rdf2pg` binary.
//!
//! [`config`] layers a TOML file under command-line flags into a
//! [`config::ConvertConfig`]; [`pipeline::run`] performs the conversion and
//! returns a [`pipeline::RunSummary`] for printing.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

pub mod config;
pub mod pipeline;

pub use config::{ConvertConfig, Settings};
pub use pipeline::{run, RunSummary};
