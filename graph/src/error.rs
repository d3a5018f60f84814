//! Error type shared by the graph engine and the statement sources.

use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used throughout the workspace's library crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Fatal conditions raised while building or emitting a property graph.
///
/// Recoverable oddities (unknown classes, cyclic hierarchies, statements
/// outside the recognised vocabulary) are never errors; they are skipped and
/// at most counted or logged.
#[derive(Debug, Error)]
pub enum Error {
    /// An identifier was declared as more than one kind of entity and the
    /// registry was built in strict mode.
    #[error("<{iri}> is declared as {kinds}")]
    RegistryConflict {
        /// The conflicting identifier.
        iri: String,
        /// The declared kinds, comma separated.
        kinds: String,
    },

    /// A transitive edge references an identifier that never received a node
    /// id during the instance pass.
    #[error("transitive edge <{predicate}> references <{uri}>, which has no node id")]
    DanglingEndpoint {
        /// The transitive predicate being materialized.
        predicate: String,
        /// The endpoint that could not be resolved.
        uri: String,
    },

    /// The reasoning collaborator could not produce subclass facts.
    #[error("reasoner failed: {0}")]
    Reasoner(String),

    /// A chunk size of zero was requested.
    #[error("chunk size must be at least 1")]
    InvalidChunkSize,

    /// A statement source could not be parsed.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// File being parsed.
        path: PathBuf,
        /// Parser diagnostic.
        message: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A record could not be serialized.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wraps an I/O error with the path it concerns.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}
