//! `sh:equals` / `sh:disjoint` / `sh:lessThan` / `sh:lessThanOrEquals`.

use oxigraph::model::{Graph, NamedOrBlankNodeRef};

use crate::{err::ShaclError, path::{parse_path, PathNode}, shape::ShapeNode, vocab::sh};

/// `own_path` is `Id` for a node shape (comparing the focus node to itself)
/// or the property shape's own path.
pub fn parse(
    graph: &Graph,
    node: NamedOrBlankNodeRef<'_>,
    own_path: &PathNode,
) -> Result<Vec<ShapeNode>, ShaclError> {
    let mut out = Vec::new();

    for obj in graph.objects_for_subject_predicate(node, sh::EQUALS) {
        out.push(ShapeNode::Eq(own_path.clone(), parse_path(graph, obj)?, None));
    }
    for obj in graph.objects_for_subject_predicate(node, sh::DISJOINT) {
        out.push(ShapeNode::Disj(own_path.clone(), parse_path(graph, obj)?, None));
    }
    for obj in graph.objects_for_subject_predicate(node, sh::LESS_THAN) {
        out.push(ShapeNode::LessThan(own_path.clone(), parse_path(graph, obj)?, None));
    }
    for obj in graph.objects_for_subject_predicate(node, sh::LESS_THAN_OR_EQUALS) {
        out.push(ShapeNode::LessThanEq(own_path.clone(), parse_path(graph, obj)?, None));
    }

    Ok(out)
}
