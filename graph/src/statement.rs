//! Parsed subject–predicate–object statements as consumed by the engine.
//!
//! Terms keep the spelling the parser produced; canonicalization happens on
//! entry to the registry and the graph builder through
//! [`Term::canonical_iri`].

use std::borrow::Cow;
use std::fmt;

use crate::vocab;

/// One position of a statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A named identifier.
    Iri(String),
    /// A structural placeholder (blank node). Never an addressable entity.
    Blank(String),
    /// A literal value, reduced to its lexical form.
    Literal(String),
}

impl Term {
    /// Creates a named identifier term.
    pub fn iri(iri: impl Into<String>) -> Self {
        Term::Iri(iri.into())
    }

    /// Creates a structural placeholder term.
    pub fn blank(id: impl Into<String>) -> Self {
        Term::Blank(id.into())
    }

    /// Creates a literal term from its lexical form.
    pub fn literal(value: impl Into<String>) -> Self {
        Term::Literal(value.into())
    }

    /// The canonical spelling of this term if it is a named identifier.
    #[must_use]
    pub fn canonical_iri(&self) -> Option<Cow<'_, str>> {
        match self {
            Term::Iri(iri) => Some(vocab::canonicalize(iri)),
            _ => None,
        }
    }

    /// The placeholder id if this term is a blank node.
    #[must_use]
    pub fn as_blank(&self) -> Option<&str> {
        match self {
            Term::Blank(id) => Some(id),
            _ => None,
        }
    }

    /// True for blank nodes.
    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        matches!(self, Term::Blank(_))
    }

    /// The raw text of the term: identifier, placeholder id, or lexical form.
    #[must_use]
    pub fn value(&self) -> &str {
        match self {
            Term::Iri(v) | Term::Blank(v) | Term::Literal(v) => v,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Iri(iri) => write!(f, "<{iri}>"),
            Term::Blank(id) => write!(f, "_:{id}"),
            Term::Literal(value) => write!(f, "{value:?}"),
        }
    }
}

/// A single subject–predicate–object fact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Statement {
    /// Subject term.
    pub subject: Term,
    /// Predicate term.
    pub predicate: Term,
    /// Object term.
    pub object: Term,
}

impl Statement {
    /// Assembles a statement from its three terms.
    pub fn new(subject: Term, predicate: Term, object: Term) -> Self {
        Self {
            subject,
            predicate,
            object,
        }
    }

    /// Shorthand for a statement whose three positions are all identifiers.
    pub fn iris(subject: &str, predicate: &str, object: &str) -> Self {
        Self::new(Term::iri(subject), Term::iri(predicate), Term::iri(object))
    }

    /// Shorthand for an identifier–identifier–literal statement.
    pub fn literal(subject: &str, predicate: &str, value: &str) -> Self {
        Self::new(Term::iri(subject), Term::iri(predicate), Term::literal(value))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
