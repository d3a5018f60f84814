//! The reasoning collaborator: anything that can contribute subclass facts
//! the ontology does not state explicitly.
//!
//! The hierarchy never calls a reasoner itself. The caller asks a
//! [`SubclassReasoner`] for facts once, before the hierarchy is resolved, and
//! any failure aborts the run.

use tracing::debug;

use crate::error::{Error, Result};
use crate::statement::Statement;
use crate::vocab::{self, canonicalize};

/// `(subclass, superclass)` pair.
pub type SubclassFact = (String, String);

/// A source of inferred `rdfs:subClassOf` facts.
pub trait SubclassReasoner {
    /// Short name used in logs and reports.
    fn name(&self) -> &str;

    /// Returns hierarchy facts implied by `ontology`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reasoner`] if the facts cannot be produced. Callers
    /// treat this as fatal.
    fn infer_subclass_facts(&self, ontology: &[Statement]) -> Result<Vec<SubclassFact>>;
}

/// A reasoner that infers nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReasoner;

impl SubclassReasoner for NoReasoner {
    fn name(&self) -> &str {
        "none"
    }

    fn infer_subclass_facts(&self, _ontology: &[Statement]) -> Result<Vec<SubclassFact>> {
        Ok(Vec::new())
    }
}

/// Precomputed facts, typically exported once from a description-logic
/// reasoner and replayed on every run.
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    facts: Vec<SubclassFact>,
}

impl FactTable {
    /// Wraps an in-memory list of facts.
    #[must_use]
    pub fn new(facts: Vec<SubclassFact>) -> Self {
        Self { facts }
    }

    /// Parses `subclass<TAB>superclass` lines. Blank lines and lines starting
    /// with `#` are skipped; identifiers may be wrapped in angle brackets.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Reasoner`] naming the first line that does not hold
    /// exactly two identifiers.
    pub fn parse_tsv(text: &str) -> Result<Self> {
        let mut facts = Vec::new();
        for (i, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let cols: Vec<&str> = line.split('\t').map(str::trim).collect();
            match cols.as_slice() {
                [sub, sup] if !sub.is_empty() && !sup.is_empty() => {
                    facts.push((strip_brackets(sub), strip_brackets(sup)));
                }
                _ => {
                    return Err(Error::Reasoner(format!(
                        "fact table line {}: expected `subclass<TAB>superclass`, got {:?}",
                        i + 1,
                        line
                    )))
                }
            }
        }
        Ok(Self { facts })
    }

    /// Collects the `rdfs:subClassOf` statements between named classes.
    #[must_use]
    pub fn from_statements(statements: &[Statement]) -> Self {
        let facts = statements
            .iter()
            .filter_map(|st| {
                let p = st.predicate.canonical_iri()?;
                if p != vocab::RDFS_SUBCLASS_OF {
                    return None;
                }
                let s = st.subject.canonical_iri()?;
                let o = st.object.canonical_iri()?;
                Some((s.into_owned(), o.into_owned()))
            })
            .collect();
        Self { facts }
    }

    /// Number of facts in the table.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// True if the table holds no facts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

fn strip_brackets(s: &str) -> String {
    s.strip_prefix('<')
        .and_then(|s| s.strip_suffix('>'))
        .unwrap_or(s)
        .to_string()
}

impl SubclassReasoner for FactTable {
    fn name(&self) -> &str {
        "fact-table"
    }

    fn infer_subclass_facts(&self, _ontology: &[Statement]) -> Result<Vec<SubclassFact>> {
        Ok(self
            .facts
            .iter()
            .map(|(sub, sup)| (canonicalize(sub).into_owned(), canonicalize(sup).into_owned()))
            .collect())
    }
}

/// Derives subclass facts from `owl:equivalentClass` between named classes:
/// each side is a subclass of the other (OWL 2 RL rule cax-eqc).
#[derive(Debug, Clone, Copy, Default)]
pub struct EquivalenceReasoner;

impl SubclassReasoner for EquivalenceReasoner {
    fn name(&self) -> &str {
        "equivalent-class"
    }

    fn infer_subclass_facts(&self, ontology: &[Statement]) -> Result<Vec<SubclassFact>> {
        let mut facts = Vec::new();
        for st in ontology {
            let Some(p) = st.predicate.canonical_iri() else {
                continue;
            };
            if p != vocab::OWL_EQUIVALENT_CLASS {
                continue;
            }
            let (Some(a), Some(b)) = (st.subject.canonical_iri(), st.object.canonical_iri())
            else {
                continue;
            };
            if a == b {
                continue;
            }
            facts.push((a.to_string(), b.to_string()));
            facts.push((b.into_owned(), a.into_owned()));
        }
        Ok(facts)
    }
}

/// Runs several reasoners in order and concatenates their facts. The first
/// failure is returned as is.
#[derive(Default)]
pub struct Chain {
    reasoners: Vec<Box<dyn SubclassReasoner>>,
}

impl Chain {
    /// Creates an empty chain, which behaves like [`NoReasoner`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a reasoner.
    #[must_use]
    pub fn with(mut self, reasoner: impl SubclassReasoner + 'static) -> Self {
        self.reasoners.push(Box::new(reasoner));
        self
    }

    /// Number of reasoners in the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.reasoners.len()
    }

    /// True if the chain is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reasoners.is_empty()
    }
}

impl SubclassReasoner for Chain {
    fn name(&self) -> &str {
        "chain"
    }

    fn infer_subclass_facts(&self, ontology: &[Statement]) -> Result<Vec<SubclassFact>> {
        let mut facts = Vec::new();
        for reasoner in &self.reasoners {
            let found = reasoner.infer_subclass_facts(ontology)?;
            debug!(reasoner = reasoner.name(), facts = found.len(), "reasoner finished");
            facts.extend(found);
        }
        Ok(facts)
    }
}
