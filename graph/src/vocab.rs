//! RDF, RDFS and OWL identifiers recognised by the engine, plus identifier
//! canonicalization.
//!
//! All constants are written in their canonical (`http://`) form, so they can
//! be compared directly against the output of [`canonicalize`].

use std::borrow::Cow;

/// `rdf:type`, the instance-of predicate.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdf:first`, head of an RDF collection cell.
pub const RDF_FIRST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#first";
/// `rdf:rest`, tail of an RDF collection cell.
pub const RDF_REST: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#rest";
/// `rdf:nil`, the empty collection.
pub const RDF_NIL: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#nil";
/// `rdfs:subClassOf`.
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
/// `owl:Class`.
pub const OWL_CLASS: &str = "http://www.w3.org/2002/07/owl#Class";
/// `owl:DatatypeProperty`.
pub const OWL_DATATYPE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#DatatypeProperty";
/// `owl:ObjectProperty`.
pub const OWL_OBJECT_PROPERTY: &str = "http://www.w3.org/2002/07/owl#ObjectProperty";
/// `owl:TransitiveProperty`.
pub const OWL_TRANSITIVE_PROPERTY: &str = "http://www.w3.org/2002/07/owl#TransitiveProperty";
/// `owl:intersectionOf`.
pub const OWL_INTERSECTION_OF: &str = "http://www.w3.org/2002/07/owl#intersectionOf";
/// `owl:equivalentClass`.
pub const OWL_EQUIVALENT_CLASS: &str = "http://www.w3.org/2002/07/owl#equivalentClass";

const SECURE_SCHEME: &str = "https://";
const PLAIN_SCHEME: &str = "http://";
const LOCAL_FILE_SCHEME: &str = "file://";

/// Rewrites a leading `https://` scheme to `http://`.
///
/// Every identifier must pass through this function before it is used as a
/// map key or compared, otherwise the two spellings of one entity end up as
/// two nodes.
///
/// ```
/// use rdf2pg_graph::vocab::canonicalize;
///
/// assert_eq!(canonicalize("https://ex.org/a"), "http://ex.org/a");
/// assert_eq!(canonicalize("urn:x"), "urn:x");
/// ```
#[must_use]
pub fn canonicalize(iri: &str) -> Cow<'_, str> {
    match iri.strip_prefix(SECURE_SCHEME) {
        Some(rest) => Cow::Owned(format!("{PLAIN_SCHEME}{rest}")),
        None => Cow::Borrowed(iri),
    }
}

/// Short display name of an identifier: the fragment after its final `#`, or
/// the whole identifier when it has no fragment.
#[must_use]
pub fn display_name(iri: &str) -> &str {
    iri.rsplit('#').next().unwrap_or(iri)
}

/// True if the identifier points into the local filesystem. Such identifiers
/// are provenance artifacts of the export, not graph data.
#[must_use]
pub fn is_local_file(iri: &str) -> bool {
    iri.contains(LOCAL_FILE_SCHEME)
}
