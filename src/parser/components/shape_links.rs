//! `sh:node` / `sh:property` → `HasShape` references.

use oxigraph::model::{Graph, NamedOrBlankNodeRef};

use crate::{
    shape::{Provenance, ShapeNode},
    utils::term_to_named_or_blank,
    vocab::sh,
};

pub fn parse(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Vec<ShapeNode> {
    let mut links = Vec::new();

    for obj in graph.objects_for_subject_predicate(node, sh::NODE) {
        if let Some(s) = term_to_named_or_blank(obj) {
            links.push(ShapeNode::HasShape(
                s.into_owned(),
                Some(Provenance::Single(sh::NODE_CONSTRAINT_COMPONENT.into_owned().into())),
            ));
        }
    }

    for obj in graph.objects_for_subject_predicate(node, sh::PROPERTY) {
        if let Some(s) = term_to_named_or_blank(obj) {
            links.push(ShapeNode::HasShape(
                s.into_owned(),
                Some(Provenance::Single(sh::PROPERTY_CONSTRAINT_COMPONENT.into_owned().into())),
            ));
        }
    }

    links
}
