//! Builds a shape's target tree (§4.3's "Target tree").

use oxigraph::model::{
    vocab::{rdf, rdfs},
    Graph, NamedOrBlankNodeRef, Term, TermRef,
};

use crate::{path::PathNode, shape::ShapeNode, vocab::sh};

use super::class_membership;

/// Builds the target `ShapeNode` for shape `node`: `Bot` if no target
/// triples exist for it, otherwise the disjunction of every applicable
/// target kind.
pub fn parse_target_tree(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> ShapeNode {
    let mut disjuncts = Vec::new();

    for obj in graph.objects_for_subject_predicate(node, sh::TARGET_NODE) {
        disjuncts.push(ShapeNode::HasValue(obj.into_owned()));
    }

    for obj in graph.objects_for_subject_predicate(node, sh::TARGET_CLASS) {
        disjuncts.push(class_membership(obj.into_owned()));
    }

    let is_rdfs_class = graph
        .objects_for_subject_predicate(node, rdf::TYPE)
        .any(|t| matches!(t, TermRef::NamedNode(nn) if nn == rdfs::CLASS));
    if is_rdfs_class {
        disjuncts.push(class_membership(Term::from(node.into_owned())));
    }

    for obj in graph.objects_for_subject_predicate(node, sh::TARGET_SUBJECTS_OF) {
        if let TermRef::NamedNode(prop) = obj {
            disjuncts.push(ShapeNode::count_range(
                1,
                None,
                PathNode::Prop(prop.into_owned()),
                ShapeNode::Top,
            ));
        }
    }

    for obj in graph.objects_for_subject_predicate(node, sh::TARGET_OBJECTS_OF) {
        if let TermRef::NamedNode(prop) = obj {
            disjuncts.push(ShapeNode::count_range(
                1,
                None,
                PathNode::inv(PathNode::Prop(prop.into_owned())),
                ShapeNode::Top,
            ));
        }
    }

    if disjuncts.is_empty() {
        ShapeNode::Bot
    } else {
        ShapeNode::or(disjuncts)
    }
}
