//! sophia-backed parsing into [`Statement`]s.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use rdf2pg_graph::{Error, FactTable, Result, Statement, Term};
use sophia_api::source::TripleSource;
use sophia_api::term::{Term as RdfTerm, TermKind};
use sophia_api::triple::Triple;
use tracing::debug;

/// Concrete syntax of an RDF document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    /// RDF/XML, the usual serialization of `.owl` files.
    RdfXml,
    /// Turtle.
    Turtle,
    /// N-Triples.
    NTriples,
}

impl Syntax {
    /// Guesses the syntax from a file extension. Unknown extensions are read
    /// as RDF/XML, the serialization OWL tools emit by default.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);
        match ext.as_deref() {
            Some("nt") => Syntax::NTriples,
            Some("ttl") => Syntax::Turtle,
            _ => Syntax::RdfXml,
        }
    }

    /// Short name used in logs.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Syntax::RdfXml => "rdf/xml",
            Syntax::Turtle => "turtle",
            Syntax::NTriples => "n-triples",
        }
    }
}

/// Parses `reader` and calls `f` for every statement, in document order.
/// `origin` only labels errors. Returns the number of statements produced.
///
/// # Errors
///
/// Returns [`Error::Parse`] if the document is not valid `syntax`.
pub fn for_each_statement_in<R, F>(reader: R, syntax: Syntax, origin: &Path, f: F) -> Result<usize>
where
    R: BufRead,
    F: FnMut(Statement),
{
    match syntax {
        Syntax::NTriples => drain(sophia_turtle::parser::nt::parse_bufread(reader), origin, f),
        Syntax::Turtle => drain(sophia_turtle::parser::turtle::parse_bufread(reader), origin, f),
        Syntax::RdfXml => drain(sophia_xml::parser::parse_bufread(reader), origin, f),
    }
}

/// Streams the statements of the file at `path` into `f`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened, or [`Error::Parse`] if
/// it is not valid `syntax`.
pub fn for_each_statement<F>(path: &Path, syntax: Syntax, f: F) -> Result<usize>
where
    F: FnMut(Statement),
{
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let count = for_each_statement_in(BufReader::new(file), syntax, path, f)?;
    debug!(path = %path.display(), syntax = syntax.as_str(), statements = count, "parsed file");
    Ok(count)
}

/// Reads the whole file at `path` into memory, guessing the syntax from its
/// extension.
///
/// # Errors
///
/// Returns [`Error::Io`] or [`Error::Parse`].
pub fn parse_file(path: &Path) -> Result<Vec<Statement>> {
    let mut out = Vec::new();
    for_each_statement(path, Syntax::from_path(path), |st| out.push(st))?;
    Ok(out)
}

/// Parses an in-memory document.
///
/// # Errors
///
/// Returns [`Error::Parse`] if `text` is not valid `syntax`.
pub fn parse_str(text: &str, syntax: Syntax) -> Result<Vec<Statement>> {
    let mut out = Vec::new();
    for_each_statement_in(text.as_bytes(), syntax, Path::new("<memory>"), |st| {
        out.push(st)
    })?;
    Ok(out)
}

/// Loads precomputed subclass facts.
///
/// `.nt` and `.ttl` files contribute their `rdfs:subClassOf` statements;
/// any other file is read as `subclass<TAB>superclass` lines.
///
/// # Errors
///
/// Returns [`Error::Reasoner`] if the file cannot be read or parsed, since a
/// missing fact table is a reasoner failure.
pub fn load_fact_table(path: &Path) -> Result<FactTable> {
    let failed = |e: Error| Error::Reasoner(format!("cannot load {}: {e}", path.display()));
    match Syntax::from_path(path) {
        syntax @ (Syntax::NTriples | Syntax::Turtle) => {
            let mut statements = Vec::new();
            for_each_statement(path, syntax, |st| statements.push(st)).map_err(failed)?;
            Ok(FactTable::from_statements(&statements))
        }
        Syntax::RdfXml => {
            let text = std::fs::read_to_string(path)
                .map_err(|e| failed(Error::io(path, e)))?;
            FactTable::parse_tsv(&text).map_err(failed)
        }
    }
}

fn drain<S, F>(mut source: S, origin: &Path, mut f: F) -> Result<usize>
where
    S: TripleSource,
    F: FnMut(Statement),
{
    let mut count = 0usize;
    source
        .for_each_triple(|t| {
            if let Some(st) = statement(&t) {
                count += 1;
                f(st);
            }
        })
        .map_err(|e| Error::Parse {
            path: origin.to_path_buf(),
            message: e.to_string(),
        })?;
    Ok(count)
}

fn statement<T: Triple>(t: &T) -> Option<Statement> {
    Some(Statement::new(term(t.s())?, term(t.p())?, term(t.o())?))
}

/// Converts a sophia term. Quoted triples and variables have no
/// property-graph counterpart and drop the statement.
fn term<T: RdfTerm>(t: T) -> Option<Term> {
    match t.kind() {
        TermKind::Iri => t.iri().map(|iri| Term::iri(iri.as_str())),
        TermKind::BlankNode => t.bnode_id().map(|id| Term::blank(id.as_str())),
        TermKind::Literal => t.lexical_form().map(|lex| Term::literal(&*lex)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_from_extension() {
        assert_eq!(Syntax::from_path(Path::new("data/part-1.nt")), Syntax::NTriples);
        assert_eq!(Syntax::from_path(Path::new("onto.TTL")), Syntax::Turtle);
        assert_eq!(Syntax::from_path(Path::new("onto.owl")), Syntax::RdfXml);
        assert_eq!(Syntax::from_path(Path::new("onto")), Syntax::RdfXml);
    }

    #[test]
    fn ntriples_terms_map_to_statement_terms() {
        let doc = concat!(
            "<https://ex.org/alice> <http://ex.org/o#name> \"Al\\u00EDce\"@en .\n",
            "<http://ex.org/alice> <http://ex.org/o#worksAt> _:acme .\n",
            "<http://ex.org/alice> <http://ex.org/o#age> \"42\"^^<http://www.w3.org/2001/XMLSchema#integer> .\n",
        );
        let statements = parse_str(doc, Syntax::NTriples).expect("valid n-triples");
        assert_eq!(statements.len(), 3);
        assert_eq!(statements[0].subject, Term::iri("https://ex.org/alice"));
        assert_eq!(statements[0].object, Term::literal("Alíce"));
        assert!(statements[1].object.is_placeholder());
        assert_eq!(statements[2].object, Term::literal("42"));
    }

    #[test]
    fn invalid_document_is_a_parse_error() {
        let err = parse_str("<http://ex.org/a> <http://ex.org/p> .\n", Syntax::NTriples)
            .expect_err("object missing");
        assert!(matches!(err, Error::Parse { .. }), "{err}");
    }

    #[test]
    fn turtle_collections_become_placeholder_cells() {
        let doc = r#"
            @prefix owl: <http://www.w3.org/2002/07/owl#> .
            @prefix ex: <http://ex.org/o#> .
            ex:Manager owl:intersectionOf ( ex:Employee ex:Leader ) .
        "#;
        let statements = parse_str(doc, Syntax::Turtle).expect("valid turtle");
        // one intersectionOf + two cells with first/rest each
        assert_eq!(statements.len(), 5);
        assert!(statements
            .iter()
            .any(|st| st.predicate == Term::iri(rdf2pg_graph::vocab::RDF_FIRST)
                && st.object == Term::iri("http://ex.org/o#Leader")));
    }

    #[test]
    fn rdf_xml_ontology_parses() {
        let doc = r#"<?xml version="1.0"?>
<rdf:RDF xmlns:rdf="http://www.w3.org/1999/02/22-rdf-syntax-ns#"
         xmlns:rdfs="http://www.w3.org/2000/01/rdf-schema#"
         xmlns:owl="http://www.w3.org/2002/07/owl#">
  <owl:Class rdf:about="http://ex.org/o#Person"/>
  <owl:Class rdf:about="http://ex.org/o#Employee">
    <rdfs:subClassOf rdf:resource="http://ex.org/o#Person"/>
  </owl:Class>
</rdf:RDF>"#;
        let statements = parse_str(doc, Syntax::RdfXml).expect("valid rdf/xml");
        assert!(statements.contains(&Statement::iris(
            "http://ex.org/o#Employee",
            rdf2pg_graph::vocab::RDFS_SUBCLASS_OF,
            "http://ex.org/o#Person"
        )));
        assert!(statements.contains(&Statement::iris(
            "http://ex.org/o#Person",
            rdf2pg_graph::vocab::RDF_TYPE,
            rdf2pg_graph::vocab::OWL_CLASS
        )));
    }

    #[test]
    fn fact_table_from_tsv_and_ntriples() {
        let dir = tempfile::tempdir().expect("tempdir");
        let tsv = dir.path().join("facts.tsv");
        std::fs::write(&tsv, "http://ex.org/o#A\thttp://ex.org/o#B\n").expect("write");
        assert_eq!(load_fact_table(&tsv).expect("table").len(), 1);

        let nt = dir.path().join("facts.nt");
        std::fs::write(
            &nt,
            "<http://ex.org/o#A> <http://www.w3.org/2000/01/rdf-schema#subClassOf> <http://ex.org/o#B> .\n\
             <http://ex.org/o#A> <http://www.w3.org/2000/01/rdf-schema#label> \"A\" .\n",
        )
        .expect("write");
        assert_eq!(load_fact_table(&nt).expect("table").len(), 1);

        let missing = dir.path().join("missing.tsv");
        assert!(matches!(load_fact_table(&missing), Err(Error::Reasoner(_))));
    }
}
