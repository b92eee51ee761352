//! `sh:closed` / `sh:ignoredProperties`.

use oxigraph::model::{Graph, NamedOrBlankNodeRef, TermRef};

use crate::{
    path::PathNode,
    shape::ShapeNode,
    utils::{get_boolean_value, parse_rdf_list, term_to_named_or_blank},
    vocab::sh,
};

/// `property_children` are the `sh:property` objects of `node`; only those
/// with a direct (non-list) IRI path contribute to the closed set.
pub fn parse(
    graph: &Graph,
    node: NamedOrBlankNodeRef<'_>,
    property_children: &[NamedOrBlankNodeRef<'_>],
) -> Vec<ShapeNode> {
    if get_boolean_value(graph, node, sh::CLOSED) != Some(true) {
        return Vec::new();
    }

    let mut paths = Vec::new();

    if let Some(list_term) = graph.object_for_subject_predicate(node, sh::IGNORED_PROPERTIES) {
        if let Some(list_node) = term_to_named_or_blank(list_term) {
            for item in parse_rdf_list(graph, list_node) {
                if let TermRef::NamedNode(iri) = item {
                    paths.push(PathNode::Prop(iri.into_owned()));
                }
            }
        }
    }

    for &child in property_children {
        if let Some(TermRef::NamedNode(iri)) = graph.object_for_subject_predicate(child, sh::PATH) {
            paths.push(PathNode::Prop(iri.into_owned()));
        }
    }

    vec![ShapeNode::Closed(paths, None)]
}
