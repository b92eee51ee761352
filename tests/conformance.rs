//! End-to-end ConformanceDriver tests: a shapes graph and a data graph go in,
//! `conforms` comes out. Each test checks one SHACL constraint component
//! compiled through the full parse -> expand -> clean -> lower -> execute
//! pipeline, rather than any single module in isolation.

use shacl_algebra::{conforms, parse_shapes, rdf, OxigraphGraphPort};

fn check(shapes_ttl: &str, data_ttl: &str) -> shacl_algebra::ConformanceReport {
    let shapes_graph = rdf::read_graph_from_string(shapes_ttl, "turtle").expect("bad shapes graph");
    let data_graph = rdf::read_graph_from_string(data_ttl, "turtle").expect("bad data graph");
    let schema = parse_shapes(&shapes_graph);
    let port = OxigraphGraphPort::new(&data_graph).unwrap();
    conforms(&port, &schema).unwrap()
}

#[test]
fn min_count_violation_is_reported() {
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:PersonShape a sh:NodeShape ;
            sh:targetClass ex:Person ;
            sh:property [
                sh:path ex:name ;
                sh:minCount 1 ;
            ] .
    "#;
    let data = r#"
        @prefix ex: <http://example.org/> .

        ex:Alice a ex:Person ; ex:name "Alice" .
        ex:Bob a ex:Person .
    "#;

    let report = check(shapes, data);
    assert!(!report.conforms());
    let violated: Vec<_> = report
        .violations
        .iter()
        .flat_map(|v| v.violating.iter())
        .map(|t| t.to_string())
        .collect();
    assert!(violated.iter().any(|v| v.contains("Bob")));
    assert!(!violated.iter().any(|v| v.contains("Alice")));
}

#[test]
fn datatype_constraint_rejects_a_wrongly_typed_literal() {
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

        ex:PersonShape a sh:NodeShape ;
            sh:targetClass ex:Person ;
            sh:property [
                sh:path ex:age ;
                sh:datatype xsd:integer ;
            ] .
    "#;
    let data = r#"
        @prefix ex: <http://example.org/> .
        @prefix xsd: <http://www.w3.org/2001/XMLSchema#> .

        ex:Alice a ex:Person ; ex:age "30"^^xsd:integer .
        ex:Bob a ex:Person ; ex:age "thirty" .
    "#;

    let report = check(shapes, data);
    assert!(!report.conforms());
    assert_eq!(report.violations.len(), 1);
}

#[test]
fn pattern_constraint_on_all_values_conforms_when_every_value_matches() {
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:CodeShape a sh:NodeShape ;
            sh:targetClass ex:Widget ;
            sh:property [
                sh:path ex:code ;
                sh:pattern "^[A-Z]{3}-[0-9]+$" ;
            ] .
    "#;
    let data = r#"
        @prefix ex: <http://example.org/> .

        ex:W1 a ex:Widget ; ex:code "ABC-1" .
        ex:W2 a ex:Widget ; ex:code "XYZ-42" .
    "#;

    let report = check(shapes, data);
    assert!(report.conforms());
    assert_eq!(report.conforming.len(), 1);
}

#[test]
fn closed_shape_rejects_an_undeclared_predicate() {
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:PersonShape a sh:NodeShape ;
            sh:targetClass ex:Person ;
            sh:closed true ;
            sh:property [ sh:path ex:name ] .
    "#;
    let data = r#"
        @prefix ex: <http://example.org/> .

        ex:Alice a ex:Person ; ex:name "Alice" .
        ex:Bob a ex:Person ; ex:name "Bob" ; ex:nickname "Bobby" .
    "#;

    let report = check(shapes, data);
    assert!(!report.conforms());
    assert_eq!(report.violations.len(), 1);
}

#[test]
fn not_shape_excludes_nodes_matching_the_negated_constraint() {
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:NotBannedShape a sh:NodeShape ;
            sh:targetClass ex:Person ;
            sh:property [
                sh:path ex:status ;
                sh:not [ sh:hasValue "banned" ] ;
            ] .
    "#;
    let data = r#"
        @prefix ex: <http://example.org/> .

        ex:Alice a ex:Person ; ex:status "active" .
        ex:Bob a ex:Person ; ex:status "banned" .
    "#;

    let report = check(shapes, data);
    assert!(!report.conforms());
    let violated: Vec<_> = report
        .violations
        .iter()
        .flat_map(|v| v.violating.iter())
        .map(|t| t.to_string())
        .collect();
    assert!(violated.iter().any(|v| v.contains("Bob")));
}

#[test]
fn or_shape_conforms_when_either_branch_is_satisfied() {
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:ContactShape a sh:NodeShape ;
            sh:targetClass ex:Person ;
            sh:or (
                [ sh:property [ sh:path ex:email ; sh:minCount 1 ] ]
                [ sh:property [ sh:path ex:phone ; sh:minCount 1 ] ]
            ) .
    "#;
    let data = r#"
        @prefix ex: <http://example.org/> .

        ex:Alice a ex:Person ; ex:email "alice@example.org" .
        ex:Bob a ex:Person ; ex:phone "555-0100" .
        ex:Charlie a ex:Person .
    "#;

    let report = check(shapes, data);
    assert!(!report.conforms());
    let violated: Vec<_> = report
        .violations
        .iter()
        .flat_map(|v| v.violating.iter())
        .map(|t| t.to_string())
        .collect();
    assert!(violated.iter().any(|v| v.contains("Charlie")));
    assert!(!violated.iter().any(|v| v.contains("Alice")));
    assert!(!violated.iter().any(|v| v.contains("Bob")));
}

#[test]
fn a_shape_with_no_targets_is_vacuously_absent_from_the_report() {
    let shapes = r#"
        @prefix ex: <http://example.org/> .
        @prefix sh: <http://www.w3.org/ns/shacl#> .

        ex:OrphanShape a sh:NodeShape ;
            sh:property [ sh:path ex:name ; sh:minCount 1 ] .
    "#;
    let data = r#"
        @prefix ex: <http://example.org/> .

        ex:Alice a ex:Person .
    "#;

    let report = check(shapes, data);
    assert!(report.conforms());
    assert!(report.conforming.is_empty());
    assert!(report.violations.is_empty());
}
