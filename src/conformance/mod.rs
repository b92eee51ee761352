//! ConformanceDriver: checks every shape's target set against its
//! constraint set and reports which targets conform.
//!
//! Deliberately coarser than a full SHACL `ValidationReport` (no messages,
//! severity levels, or nested constraint detail) — per-shape conforming and
//! violating node sets are the whole of what this driver promises.

use std::collections::HashSet;

#[cfg(not(target_family = "wasm"))]
use rayon::prelude::*;

use oxigraph::model::{NamedOrBlankNode, Term};

use crate::{
    err::ShaclError,
    graph::GraphPort,
    lower::lower,
    rewrite::{clean, expand},
    shape::{Schema, ShapeNode},
};

#[derive(Debug, Clone)]
pub struct ConformingTarget {
    pub shape: NamedOrBlankNode,
    pub targets: HashSet<Term>,
}

#[derive(Debug, Clone)]
pub struct ViolatingTarget {
    pub shape: NamedOrBlankNode,
    pub violating: HashSet<Term>,
}

#[derive(Debug, Clone, Default)]
pub struct ConformanceReport {
    pub conforming: Vec<ConformingTarget>,
    pub violations: Vec<ViolatingTarget>,
}

impl ConformanceReport {
    pub fn conforms(&self) -> bool {
        self.violations.is_empty()
    }
}

enum ShapeOutcome {
    Conforming(ConformingTarget),
    Violating(ViolatingTarget),
}

/// Checks `shape`'s target set against its constraint set: `expand` resolves
/// `HasShape` references, `clean` simplifies the result, and `lower` compiles
/// both trees to SPARQL for `port` to execute.
fn check_shape(
    port: &(impl GraphPort + ?Sized),
    schema: &Schema,
    shape: &NamedOrBlankNode,
) -> Result<ShapeOutcome, ShaclError> {
    let definition = schema.definitions.get(shape).cloned().unwrap_or(ShapeNode::Top);
    let constraint_query = lower(&clean(&expand(&schema.definitions, &definition), false))?;

    let target_tree = schema.targets.get(shape).cloned().unwrap_or(ShapeNode::Bot);
    let target_query = lower(&clean(&target_tree, false))?;

    let target_set = port.query_unary(&target_query)?;
    let constraint_set = port.query_unary(&constraint_query)?;

    if target_set.is_subset(&constraint_set) {
        Ok(ShapeOutcome::Conforming(ConformingTarget {
            shape: shape.clone(),
            targets: target_set,
        }))
    } else {
        let violating = target_set.difference(&constraint_set).cloned().collect();
        Ok(ShapeOutcome::Violating(ViolatingTarget {
            shape: shape.clone(),
            violating,
        }))
    }
}

/// Checks every target-bearing shape in `schema` against `port`.
///
/// Per-shape checks are independent and run in parallel via `rayon` outside
/// wasm; wasm targets fall back to a serial iterator, since rayon's
/// thread-pool is unavailable there.
pub fn conforms<P: GraphPort + Sync>(port: &P, schema: &Schema) -> Result<ConformanceReport, ShaclError> {
    let shapes: Vec<&NamedOrBlankNode> = schema.target_shapes().collect();
    log::debug!("checking conformance for {} target shapes", shapes.len());

    #[cfg(not(target_family = "wasm"))]
    let time = std::time::Instant::now();

    #[cfg(not(target_family = "wasm"))]
    let outcomes: Vec<Result<ShapeOutcome, ShaclError>> = shapes
        .par_iter()
        .map(|shape| check_shape(port, schema, shape))
        .collect();

    #[cfg(target_family = "wasm")]
    let outcomes: Vec<Result<ShapeOutcome, ShaclError>> = shapes
        .iter()
        .map(|shape| check_shape(port, schema, shape))
        .collect();

    let mut report = ConformanceReport::default();
    for outcome in outcomes {
        match outcome? {
            ShapeOutcome::Conforming(c) => report.conforming.push(c),
            ShapeOutcome::Violating(v) => report.violations.push(v),
        }
    }

    #[cfg(not(target_family = "wasm"))]
    log::debug!("finished conformance check at {}", time.elapsed().as_secs_f64());

    log::debug!(
        "conformance check complete: {} conforming, {} violating",
        report.conforming.len(),
        report.violations.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::OxigraphGraphPort;
    use oxigraph::model::{Graph, NamedNode, Triple};

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    #[test]
    fn unconstrained_targets_conform() {
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            iri("http://example.org/alice"),
            iri("http://example.org/knows"),
            iri("http://example.org/bob"),
        ));

        let mut schema = Schema::new();
        let shape_node = NamedOrBlankNode::NamedNode(iri("http://example.org/PersonShape"));
        schema.definitions.insert(shape_node.clone(), ShapeNode::Top);
        schema.targets.insert(shape_node, ShapeNode::Top);

        let port = OxigraphGraphPort::new(&graph).unwrap();
        let report = conforms(&port, &schema).unwrap();

        assert!(report.conforms());
        assert_eq!(report.conforming.len(), 1);
    }

    #[test]
    fn violating_targets_are_the_difference_between_target_and_constraint_sets() {
        let mut graph = Graph::new();
        graph.insert(&Triple::new(
            iri("http://example.org/alice"),
            iri("http://example.org/knows"),
            iri("http://example.org/bob"),
        ));
        let mut schema = Schema::new();
        let shape_node = NamedOrBlankNode::NamedNode(iri("http://example.org/PersonShape"));
        // Constraint: nothing conforms (Bot).
        schema.definitions.insert(shape_node.clone(), ShapeNode::Bot);
        // Target: everything in the universe.
        schema.targets.insert(shape_node.clone(), ShapeNode::Top);

        let port = OxigraphGraphPort::new(&graph).unwrap();
        let report = conforms(&port, &schema).unwrap();

        assert!(!report.conforms());
        assert_eq!(report.violations.len(), 1);
        assert_eq!(report.violations[0].shape, shape_node);
    }
}
