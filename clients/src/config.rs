//! Run configuration: an optional TOML file overlaid by command-line flags.
//!
//! ```toml
//! ontology = "ontology/company.owl"
//! instances = ["data/"]
//! out = "graph"
//! chunk_size = 5000
//! inferred = "ontology/inferred.tsv"
//! equivalence = true
//! strict_registry = false
//! ```
//!
//! Relative paths in a file are resolved against the file's directory.
//! Every key is optional in the file; [`Settings::into_config`] reports the
//! ones that are still missing once the command line has been applied.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use rdf2pg_graph::chunk::DEFAULT_CHUNK_SIZE;
use rdf2pg_graph::ConflictPolicy;
use serde::Deserialize;

/// Partially specified settings from one layer (file or command line).
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Ontology file.
    pub ontology: Option<PathBuf>,
    /// Instance files or directories.
    #[serde(default)]
    pub instances: Vec<PathBuf>,
    /// Output directory.
    pub out: Option<PathBuf>,
    /// Records per output file.
    pub chunk_size: Option<usize>,
    /// Precomputed subclass facts (TSV or N-Triples).
    pub inferred: Option<PathBuf>,
    /// Derive subclass facts from `owl:equivalentClass`.
    pub equivalence: Option<bool>,
    /// Fail on identifiers declared as more than one kind.
    pub strict_registry: Option<bool>,
}

impl Settings {
    /// Reads a TOML settings file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is not valid TOML with
    /// known keys.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("invalid config {}", path.display()))?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(settings.relative_to(base))
    }

    /// Parses TOML settings text.
    ///
    /// # Errors
    ///
    /// Returns an error for malformed TOML or unknown keys.
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).context("failed to parse TOML settings")
    }

    /// Fills every unset value of `self` from `fallback`. Instance lists are
    /// not concatenated: a non-empty list replaces the fallback's.
    #[must_use]
    pub fn merge(self, fallback: Settings) -> Settings {
        Settings {
            ontology: self.ontology.or(fallback.ontology),
            instances: if self.instances.is_empty() {
                fallback.instances
            } else {
                self.instances
            },
            out: self.out.or(fallback.out),
            chunk_size: self.chunk_size.or(fallback.chunk_size),
            inferred: self.inferred.or(fallback.inferred),
            equivalence: self.equivalence.or(fallback.equivalence),
            strict_registry: self.strict_registry.or(fallback.strict_registry),
        }
    }

    /// Validates the settings and applies defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the ontology, instances, or output directory are
    /// missing, or if the chunk size is zero.
    pub fn into_config(self) -> Result<ConvertConfig> {
        let Some(ontology) = self.ontology else {
            bail!("no ontology file given (--ontology or `ontology` in the config file)");
        };
        if self.instances.is_empty() {
            bail!("no instance inputs given (--instances or `instances` in the config file)");
        }
        let Some(out) = self.out else {
            bail!("no output directory given (--out or `out` in the config file)");
        };
        let chunk_size = self.chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE);
        if chunk_size == 0 {
            bail!("chunk size must be at least 1");
        }
        Ok(ConvertConfig {
            ontology,
            instances: self.instances,
            out,
            chunk_size,
            inferred: self.inferred,
            equivalence: self.equivalence.unwrap_or(false),
            conflict_policy: if self.strict_registry.unwrap_or(false) {
                ConflictPolicy::Strict
            } else {
                ConflictPolicy::Precedence
            },
        })
    }

    fn relative_to(self, base: &Path) -> Settings {
        let resolve = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        Settings {
            ontology: self.ontology.map(resolve),
            instances: self.instances.into_iter().map(resolve).collect(),
            out: self.out.map(resolve),
            inferred: self.inferred.map(resolve),
            ..self
        }
    }
}

/// Fully resolved configuration of one conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Ontology file.
    pub ontology: PathBuf,
    /// Instance files or directories, in reading order.
    pub instances: Vec<PathBuf>,
    /// Output directory, recreated on success.
    pub out: PathBuf,
    /// Records per output file.
    pub chunk_size: usize,
    /// Precomputed subclass facts.
    pub inferred: Option<PathBuf>,
    /// Whether `owl:equivalentClass` contributes subclass facts.
    pub equivalence: bool,
    /// How conflicting registrations are handled.
    pub conflict_policy: ConflictPolicy,
}
