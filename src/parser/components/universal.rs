//! Property-shape-only wrapping: shape-links, logical, tests, `sh:in`, and
//! `sh:closed` apply to every reachable value (`Forall`); `sh:hasValue`
//! applies as an existence check instead (§4.3 "universal").

use oxigraph::model::{Graph, NamedOrBlankNodeRef};

use crate::{path::PathNode, shape::ShapeNode};

use super::{closed, logical, shape_links, tests, value};

pub fn parse(
    graph: &Graph,
    node: NamedOrBlankNodeRef<'_>,
    path: &PathNode,
    property_children: &[NamedOrBlankNodeRef<'_>],
) -> Vec<ShapeNode> {
    let mut out = Vec::new();

    let mut forall_body = Vec::new();
    forall_body.extend(shape_links::parse(graph, node));
    forall_body.extend(logical::parse(graph, node));
    forall_body.extend(tests::parse(graph, node));
    forall_body.extend(value::parse_in(graph, node));
    forall_body.extend(closed::parse(graph, node, property_children));

    if !forall_body.is_empty() {
        out.push(ShapeNode::forall(path.clone(), ShapeNode::and(forall_body)));
    }

    for v in value::parse_has_values(graph, node) {
        out.push(ShapeNode::count_range(
            1,
            None,
            path.clone(),
            ShapeNode::HasValue(v),
        ));
    }

    out
}
