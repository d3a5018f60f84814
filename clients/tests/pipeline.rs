//! End-to-end conversions through the pipeline, reading the emitted JSON back.

use std::fs;
use std::path::{Path, PathBuf};

use rdf2pg_clients::{run, Settings};
use rdf2pg_graph::{ConflictPolicy, Edge, Node};
use serde_json::Value;

fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests").join("fixtures")
}

fn read_chunks<T: serde::de::DeserializeOwned>(files: &[PathBuf]) -> Vec<T> {
    files
        .iter()
        .flat_map(|path| {
            let text = fs::read_to_string(path).expect("chunk readable");
            serde_json::from_str::<Vec<T>>(&text).expect("chunk is a JSON array")
        })
        .collect()
}

#[test]
fn company_fixture_converts_to_chunked_graph() {
    let out = tempfile::tempdir().expect("tempdir");
    let config = Settings {
        ontology: Some(fixtures().join("company.owl")),
        instances: vec![fixtures().join("instances")],
        out: Some(out.path().join("graph")),
        chunk_size: Some(2),
        inferred: Some(fixtures().join("inferred.tsv")),
        ..Settings::default()
    }
    .into_config()
    .expect("complete config");

    let summary = run(&config).expect("conversion succeeds");
    assert_eq!(summary.instance_files.len(), 2);
    assert_eq!((summary.nodes, summary.edges), (5, 4));
    assert_eq!(summary.node_files.len(), 3);
    assert_eq!(summary.edge_files.len(), 2);
    assert_eq!(summary.node_files[2], out.path().join("graph").join("nodes_3.json"));

    let stats = summary.report.stats;
    assert_eq!(stats.statements, 10);
    assert_eq!(stats.provenance_dropped, 1);
    assert_eq!(stats.placeholder_dropped, 1);
    assert_eq!((stats.direct_edges, stats.closure_edges), (3, 1));

    let nodes: Vec<Node> = read_chunks(&summary.node_files);
    let uris: Vec<&str> = nodes.iter().map(|n| n.uri.as_str()).collect();
    assert_eq!(
        uris,
        vec![
            "http://ex.org/alice",
            "http://ex.org/acme",
            "http://ex.org/bob",
            "http://ex.org/sales",
            "http://ex.org/emea",
        ]
    );
    assert_eq!(nodes[0].labels, Some(vec!["Employee".to_string(), "Person".to_string()]));
    assert_eq!(nodes[0].properties.get("name").map(String::as_str), Some("Alice"));
    assert_eq!(
        nodes[2].labels,
        Some(vec!["Manager".to_string(), "Employee".to_string(), "Person".to_string()])
    );
    assert_eq!(nodes[1].labels, None);

    let edges: Vec<Edge> = read_chunks(&summary.edge_files);
    let triples: Vec<(&str, u64, u64)> = edges
        .iter()
        .map(|e| (e.label[0].as_str(), e.src, e.dst))
        .collect();
    assert_eq!(
        triples,
        vec![("worksAt", 1, 2), ("partOf", 4, 5), ("partOf", 5, 2), ("partOf", 4, 2)]
    );
    assert_eq!(edges[3].predicate(), "http://ex.org/o#partOf");
}

#[test]
fn chunk_files_use_the_documented_json_shape() {
    let out = tempfile::tempdir().expect("tempdir");
    let config = Settings {
        ontology: Some(fixtures().join("company.owl")),
        instances: vec![fixtures().join("instances").join("1-people.nt")],
        out: Some(out.path().to_path_buf()),
        ..Settings::default()
    }
    .into_config()
    .expect("complete config");
    let summary = run(&config).expect("conversion succeeds");
    assert_eq!(summary.node_files.len(), 1);

    let text = fs::read_to_string(&summary.node_files[0]).expect("readable");
    assert!(text.contains("\"Bøb\""), "non-ASCII stays unescaped");
    assert!(text.starts_with("[\n    {\n        \"id\": 1,"));

    let nodes: Value = serde_json::from_str(&text).expect("json");
    let bob = &nodes[2];
    assert_eq!(bob["uri"], "http://ex.org/bob");
    assert_eq!(bob["properties"]["uri"], "http://ex.org/bob");
    // Without the fact table, Manager has no known ancestors.
    assert_eq!(bob["labels"], serde_json::json!(["Manager"]));
    assert!(nodes[1].get("labels").is_none());

    let edges: Value =
        serde_json::from_str(&fs::read_to_string(&summary.edge_files[0]).expect("readable"))
            .expect("json");
    assert_eq!(
        edges,
        serde_json::json!([{
            "id": 1,
            "label": ["worksAt"],
            "src": 1,
            "dst": 2,
            "properties": { "uri": "http://ex.org/o#worksAt" }
        }])
    );
}

const TURTLE_ONTOLOGY: &str = r#"
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix ex: <http://ex.org/o#> .

ex:Person a owl:Class .
ex:Leader a owl:Class .
ex:Employee a owl:Class ; rdfs:subClassOf ex:Person .
ex:Staff a owl:Class ; owl:equivalentClass ex:Employee .
ex:Manager a owl:Class ; owl:intersectionOf ( ex:Employee ex:Leader ) .
"#;

#[test]
fn turtle_intersections_and_equivalence_feed_labels() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ontology = dir.path().join("org.ttl");
    fs::write(&ontology, TURTLE_ONTOLOGY).expect("write");
    let instances = dir.path().join("people.nt");
    fs::write(
        &instances,
        "<http://ex.org/carol> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex.org/o#Manager> .\n\
         <http://ex.org/dan> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex.org/o#Staff> .\n",
    )
    .expect("write");
    let config_file = dir.path().join("rdf2pg.toml");
    fs::write(
        &config_file,
        "ontology = \"org.ttl\"\ninstances = [\"people.nt\"]\nout = \"out\"\nequivalence = true\n",
    )
    .expect("write");

    let config = Settings::default()
        .merge(Settings::load(&config_file).expect("config loads"))
        .into_config()
        .expect("complete config");
    assert_eq!(config.out, dir.path().join("out"));
    let summary = run(&config).expect("conversion succeeds");
    assert!(summary
        .report
        .notices
        .iter()
        .any(|n| n.stage == "reasoner"));

    let nodes: Vec<Node> = read_chunks(&summary.node_files);
    let labels = |i: usize| nodes[i].labels.clone().unwrap_or_default();
    assert_eq!(labels(0), vec!["Manager", "Employee", "Leader", "Person", "Staff"]);
    assert_eq!(labels(1), vec!["Staff", "Employee", "Person"]);
}

#[test]
fn strict_registry_failure_leaves_previous_output() {
    let dir = tempfile::tempdir().expect("tempdir");
    let ontology = dir.path().join("clash.nt");
    fs::write(
        &ontology,
        "<http://ex.org/o#knows> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#ObjectProperty> .\n\
         <http://ex.org/o#knows> <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://www.w3.org/2002/07/owl#DatatypeProperty> .\n",
    )
    .expect("write");
    let instances = dir.path().join("i.nt");
    fs::write(&instances, "<http://ex.org/a> <http://ex.org/o#knows> <http://ex.org/b> .\n")
        .expect("write");
    let out = dir.path().join("out");
    fs::create_dir_all(&out).expect("mkdir");
    fs::write(out.join("nodes_1.json"), "[]").expect("write");

    let base = Settings {
        ontology: Some(ontology),
        instances: vec![instances],
        out: Some(out.clone()),
        ..Settings::default()
    };
    let strict = Settings {
        strict_registry: Some(true),
        ..base.clone()
    }
    .into_config()
    .expect("complete config");
    assert_eq!(strict.conflict_policy, ConflictPolicy::Strict);
    let err = run(&strict).expect_err("conflict is fatal");
    assert!(format!("{err:#}").contains("knows"), "{err:#}");
    assert_eq!(fs::read_to_string(out.join("nodes_1.json")).expect("kept"), "[]");

    // The default policy keeps the object-property reading and warns.
    let summary = run(&base.into_config().expect("complete config")).expect("converts");
    assert_eq!(summary.edges, 1);
    assert_eq!(summary.report.warning_count(), 1);
}

#[test]
fn malformed_instances_are_reported_with_the_file_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let bad = dir.path().join("bad.nt");
    fs::write(&bad, "<http://ex.org/a> <http://ex.org/p> .\n").expect("write");
    let config = Settings {
        ontology: Some(fixtures().join("company.owl")),
        instances: vec![bad],
        out: Some(dir.path().join("out")),
        ..Settings::default()
    }
    .into_config()
    .expect("complete config");
    let err = run(&config).expect_err("parse failure");
    assert!(format!("{err:#}").contains("bad.nt"), "{err:#}");
    assert!(!dir.path().join("out").exists());
}
