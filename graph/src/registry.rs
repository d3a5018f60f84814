//! Typed registry of the ontology's classes and properties.
//!
//! The registry is built in two passes over the ontology statements. The
//! first pass classifies declarations, records direct `rdfs:subClassOf`
//! edges and indexes RDF collection cells. The second pass expands
//! `owl:intersectionOf` collections once every class is known, so the result
//! does not depend on statement order.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::fmt;

use tracing::{debug, trace, warn};

use crate::closure::Adjacency;
use crate::error::{Error, Result};
use crate::statement::{Statement, Term};
use crate::vocab::{self, display_name};

/// Kind of entity an identifier can be declared as.
///
/// Variant order is precedence order: when one identifier is declared as
/// several kinds, the first kind in this list is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EntityKind {
    /// `owl:Class`.
    Class,
    /// `owl:ObjectProperty` or `owl:TransitiveProperty`.
    ObjectProperty,
    /// `owl:DatatypeProperty`.
    DatatypeProperty,
}

impl EntityKind {
    /// Returns the OWL local name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            EntityKind::Class => "Class",
            EntityKind::ObjectProperty => "ObjectProperty",
            EntityKind::DatatypeProperty => "DatatypeProperty",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How to treat an identifier declared as more than one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// Keep the highest-precedence kind and report the conflict.
    #[default]
    Precedence,
    /// Fail the build.
    Strict,
}

/// An identifier that was declared as more than one kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// The identifier.
    pub iri: String,
    /// Every kind it was declared as, in precedence order.
    pub declared: Vec<EntityKind>,
    /// The kind that was kept.
    pub kept: EntityKind,
}

impl Conflict {
    fn kinds(&self) -> String {
        self.declared
            .iter()
            .map(|k| k.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<{}> declared as {}; kept {}",
            self.iri,
            self.kinds(),
            self.kept
        )
    }
}

/// Lookup tables derived from the ontology. Immutable once built.
///
/// Every table is keyed by canonical identifier and maps to the display
/// name (fragment after the final `#`).
#[derive(Debug, Clone, Default)]
pub struct Registry {
    class_labels: BTreeMap<String, String>,
    datatype_properties: BTreeMap<String, String>,
    object_properties: BTreeMap<String, String>,
    transitive_properties: BTreeMap<String, String>,
    sub_class_of: Adjacency,
    conflicts: Vec<Conflict>,
}

impl Registry {
    /// Builds the registry from ontology statements.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryConflict`] for the first conflicting
    /// identifier when `policy` is [`ConflictPolicy::Strict`].
    pub fn from_statements(statements: &[Statement], policy: ConflictPolicy) -> Result<Self> {
        let scan = Scan::run(statements);
        let mut registry = Registry {
            sub_class_of: scan.sub_class_of.clone(),
            ..Registry::default()
        };

        for (iri, kinds) in &scan.declarations {
            let Some(&kept) = kinds.iter().next() else {
                continue;
            };
            if kinds.len() > 1 {
                let conflict = Conflict {
                    iri: iri.clone(),
                    declared: kinds.iter().copied().collect(),
                    kept,
                };
                if policy == ConflictPolicy::Strict {
                    return Err(Error::RegistryConflict {
                        iri: conflict.iri.clone(),
                        kinds: conflict.kinds(),
                    });
                }
                warn!(%conflict, "identifier declared as several kinds");
                registry.conflicts.push(conflict);
            }
            let name = display_name(iri).to_string();
            match kept {
                EntityKind::Class => {
                    registry.class_labels.insert(iri.clone(), name);
                }
                EntityKind::DatatypeProperty => {
                    registry.datatype_properties.insert(iri.clone(), name);
                }
                EntityKind::ObjectProperty => {
                    if scan.transitive.contains(iri) {
                        registry.transitive_properties.insert(iri.clone(), name.clone());
                    }
                    registry.object_properties.insert(iri.clone(), name);
                }
            }
        }

        scan.expand_intersections(&mut registry);

        debug!(
            classes = registry.class_labels.len(),
            datatype_properties = registry.datatype_properties.len(),
            object_properties = registry.object_properties.len(),
            transitive_properties = registry.transitive_properties.len(),
            subclass_edges = registry.sub_class_of.values().map(BTreeSet::len).sum::<usize>(),
            "built ontology registry"
        );
        Ok(registry)
    }

    /// Display name of a known class.
    #[must_use]
    pub fn class_label(&self, iri: &str) -> Option<&str> {
        self.class_labels.get(iri).map(String::as_str)
    }

    /// Display name of a known datatype property.
    #[must_use]
    pub fn datatype_property(&self, iri: &str) -> Option<&str> {
        self.datatype_properties.get(iri).map(String::as_str)
    }

    /// Display name of a known object property. Transitive properties are
    /// object properties too.
    #[must_use]
    pub fn object_property(&self, iri: &str) -> Option<&str> {
        self.object_properties.get(iri).map(String::as_str)
    }

    /// True if `iri` was declared `owl:TransitiveProperty`.
    #[must_use]
    pub fn is_transitive(&self, iri: &str) -> bool {
        self.transitive_properties.contains_key(iri)
    }

    /// Class → display name.
    #[must_use]
    pub fn class_labels(&self) -> &BTreeMap<String, String> {
        &self.class_labels
    }

    /// Datatype property → display name.
    #[must_use]
    pub fn datatype_properties(&self) -> &BTreeMap<String, String> {
        &self.datatype_properties
    }

    /// Object property → display name.
    #[must_use]
    pub fn object_properties(&self) -> &BTreeMap<String, String> {
        &self.object_properties
    }

    /// Transitive property → display name.
    #[must_use]
    pub fn transitive_properties(&self) -> &BTreeMap<String, String> {
        &self.transitive_properties
    }

    /// Class → directly declared superclasses, including intersection
    /// members.
    #[must_use]
    pub fn sub_class_of(&self) -> &Adjacency {
        &self.sub_class_of
    }

    /// Identifiers that were declared as more than one kind.
    #[must_use]
    pub fn conflicts(&self) -> &[Conflict] {
        &self.conflicts
    }
}

/// Facts gathered by the first pass.
#[derive(Default)]
struct Scan {
    declarations: BTreeMap<String, BTreeSet<EntityKind>>,
    transitive: HashSet<String>,
    sub_class_of: Adjacency,
    /// Collection cell → `rdf:first` value.
    first: HashMap<String, Term>,
    /// Collection cell → `rdf:rest` value.
    rest: HashMap<String, Term>,
    /// `(owner, head cell)` for every `owl:intersectionOf`. The owner is a
    /// named class or an anonymous class expression.
    intersections: Vec<(Term, String)>,
    /// Anonymous class expression → named classes equivalent to it.
    equivalent_to: HashMap<String, Vec<String>>,
}

impl Scan {
    fn run(statements: &[Statement]) -> Self {
        let mut scan = Scan::default();
        for st in statements {
            scan.visit(st);
        }
        scan
    }

    fn visit(&mut self, st: &Statement) {
        let Some(pred) = st.predicate.canonical_iri() else {
            return;
        };
        match pred.as_ref() {
            vocab::RDF_FIRST => {
                if let Some(cell) = st.subject.as_blank() {
                    self.first.insert(cell.to_string(), canonical_term(&st.object));
                }
            }
            vocab::RDF_REST => {
                if let Some(cell) = st.subject.as_blank() {
                    self.rest.insert(cell.to_string(), canonical_term(&st.object));
                }
            }
            vocab::OWL_INTERSECTION_OF => {
                if let Some(head) = st.object.as_blank() {
                    self.intersections
                        .push((canonical_term(&st.subject), head.to_string()));
                }
            }
            vocab::OWL_EQUIVALENT_CLASS => {
                if let (Some(class), Some(expr)) =
                    (st.subject.canonical_iri(), st.object.as_blank())
                {
                    self.equivalent_to
                        .entry(expr.to_string())
                        .or_default()
                        .push(class.into_owned());
                }
            }
            vocab::RDF_TYPE => {
                let (Some(subject), Some(object)) =
                    (st.subject.canonical_iri(), st.object.canonical_iri())
                else {
                    return;
                };
                let kind = match object.as_ref() {
                    vocab::OWL_CLASS => EntityKind::Class,
                    vocab::OWL_DATATYPE_PROPERTY => EntityKind::DatatypeProperty,
                    vocab::OWL_OBJECT_PROPERTY => EntityKind::ObjectProperty,
                    vocab::OWL_TRANSITIVE_PROPERTY => {
                        self.transitive.insert(subject.to_string());
                        EntityKind::ObjectProperty
                    }
                    _ => {
                        trace!(statement = %st, "ignored ontology type statement");
                        return;
                    }
                };
                self.declarations
                    .entry(subject.into_owned())
                    .or_default()
                    .insert(kind);
            }
            vocab::RDFS_SUBCLASS_OF => {
                // Restrictions and other anonymous superclasses are skipped.
                if let (Some(sub), Some(sup)) =
                    (st.subject.canonical_iri(), st.object.canonical_iri())
                {
                    self.sub_class_of
                        .entry(sub.into_owned())
                        .or_default()
                        .insert(sup.into_owned());
                }
            }
            _ => trace!(statement = %st, "ignored ontology statement"),
        }
    }

    /// Second pass: every known class that is a member of an intersection
    /// becomes a direct superclass of the intersection's owner.
    fn expand_intersections(&self, registry: &mut Registry) {
        for (owner, head) in &self.intersections {
            let owners: Vec<String> = match owner {
                Term::Iri(iri) => vec![iri.clone()],
                Term::Blank(expr) => self.equivalent_to.get(expr).cloned().unwrap_or_default(),
                Term::Literal(_) => Vec::new(),
            };
            if owners.is_empty() {
                continue;
            }
            let members: Vec<String> = self
                .collection(head)
                .into_iter()
                .filter(|m| registry.class_labels.contains_key(m))
                .collect();
            for owner in &owners {
                for member in members.iter().filter(|m| *m != owner) {
                    registry
                        .sub_class_of
                        .entry(owner.clone())
                        .or_default()
                        .insert(member.clone());
                }
            }
        }
    }

    /// Named members of the RDF collection starting at `head`. A cell that
    /// loops back on the chain ends the walk.
    fn collection(&self, head: &str) -> Vec<String> {
        let mut members = Vec::new();
        let mut seen: HashSet<&str> = HashSet::new();
        let mut cell = head;
        while seen.insert(cell) {
            if let Some(Term::Iri(member)) = self.first.get(cell) {
                members.push(member.clone());
            }
            match self.rest.get(cell) {
                Some(Term::Blank(next)) => cell = next.as_str(),
                _ => break,
            }
        }
        members
    }
}

fn canonical_term(term: &Term) -> Term {
    match term.canonical_iri() {
        Some(iri) => Term::Iri(iri.into_owned()),
        None => term.clone(),
    }
}
