//! Exercises the target-tree half of ShapeParser: a shape's `sh:targetNode`/
//! `sh:targetClass`/`sh:targetSubjectsOf`/`sh:targetObjectsOf` declarations,
//! compiled to SPARQL and run against a data graph via `GraphPort`.

use std::collections::HashSet;

use oxigraph::model::{NamedNode, Term};
use shacl_algebra::{clean, conforms, lower, parse_shapes, rdf, GraphPort, OxigraphGraphPort};

fn setup_data_graph() -> oxigraph::model::Graph {
    let graph_string = r#"
        @prefix ex: <http://example.org/> .

        ex:Alice a ex:Person .
        ex:Bob a ex:Person .
        ex:Charlie a ex:Person .
        ex:CompanyX a ex:Organization .
        ex:CompanyY a ex:Organization .

        ex:Alice ex:worksAt ex:CompanyX .
        ex:Bob ex:worksAt ex:CompanyY .
        ex:Charlie ex:worksAt ex:CompanyX .

        ex:Alice ex:name "Alice Smith" .
    "#;
    rdf::read_graph_from_string(graph_string, "turtle").expect("failed to read data graph")
}

fn targets_of(shapes_ttl: &str, data_graph: &oxigraph::model::Graph) -> HashSet<Term> {
    let shapes_graph = rdf::read_graph_from_string(shapes_ttl, "turtle").expect("failed to read shapes graph");
    let schema = parse_shapes(&shapes_graph);
    let shape = schema
        .targets
        .keys()
        .next()
        .cloned()
        .expect("shapes graph declared no shape");
    let target_tree = schema.targets.get(&shape).unwrap();
    let query = lower(&clean(target_tree, false)).unwrap();

    let port = OxigraphGraphPort::new(data_graph).unwrap();
    port.query_unary(&query).unwrap()
}

fn term(s: &str) -> Term {
    Term::NamedNode(NamedNode::new(s).unwrap())
}

#[test]
fn target_node_selects_exactly_the_named_node() {
    let data = setup_data_graph();
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:AliceShape a sh:NodeShape ;
            sh:targetNode ex:Alice .
    "#;

    let targets = targets_of(shapes, &data);
    assert_eq!(targets, HashSet::from([term("http://example.org/Alice")]));
}

#[test]
fn target_class_selects_every_instance() {
    let data = setup_data_graph();
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:PersonShape a sh:NodeShape ;
            sh:targetClass ex:Person .
    "#;

    let targets = targets_of(shapes, &data);
    assert_eq!(
        targets,
        HashSet::from([
            term("http://example.org/Alice"),
            term("http://example.org/Bob"),
            term("http://example.org/Charlie"),
        ])
    );
}

#[test]
fn target_class_with_no_instances_is_empty() {
    let data = setup_data_graph();
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:AnimalShape a sh:NodeShape ;
            sh:targetClass ex:Animal .
    "#;

    assert!(targets_of(shapes, &data).is_empty());
}

#[test]
fn target_subjects_of_selects_nodes_with_the_property() {
    let data = setup_data_graph();
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:EmployerShape a sh:NodeShape ;
            sh:targetSubjectsOf ex:worksAt .
    "#;

    let targets = targets_of(shapes, &data);
    assert_eq!(
        targets,
        HashSet::from([
            term("http://example.org/Alice"),
            term("http://example.org/Bob"),
            term("http://example.org/Charlie"),
        ])
    );
}

#[test]
fn target_objects_of_filters_out_literals() {
    let data = setup_data_graph();
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:NameValueShape a sh:NodeShape ;
            sh:targetObjectsOf ex:name .
    "#;

    // ex:name's only object is a string literal, so no named node qualifies.
    assert!(targets_of(shapes, &data).is_empty());
}

#[test]
fn target_objects_of_selects_the_companies() {
    let data = setup_data_graph();
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:EmployerShape a sh:NodeShape ;
            sh:targetObjectsOf ex:worksAt .
    "#;

    let targets = targets_of(shapes, &data);
    assert_eq!(
        targets,
        HashSet::from([term("http://example.org/CompanyX"), term("http://example.org/CompanyY")])
    );
}

#[test]
fn implicit_class_target_applies_when_the_shape_is_also_an_rdfs_class() {
    let data = setup_data_graph();
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

        ex:Person a sh:NodeShape, rdfs:Class .
    "#;

    let targets = targets_of(shapes, &data);
    assert_eq!(
        targets,
        HashSet::from([
            term("http://example.org/Alice"),
            term("http://example.org/Bob"),
            term("http://example.org/Charlie"),
        ])
    );
}

#[test]
fn a_shape_with_no_target_is_excluded_from_conformance_checks() {
    let data = setup_data_graph();
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:UntargetedShape a sh:NodeShape ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ] .
    "#;
    let shapes_graph = rdf::read_graph_from_string(shapes, "turtle").unwrap();
    let schema = parse_shapes(&shapes_graph);

    let port = OxigraphGraphPort::new(&data).unwrap();
    let report = conforms(&port, &schema).unwrap();

    assert!(report.conforming.is_empty());
    assert!(report.violations.is_empty());
}
