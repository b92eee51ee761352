//! `sh:not` / `sh:and` / `sh:or` / `sh:xone`.

use oxigraph::model::{Graph, NamedOrBlankNodeRef};

use crate::{
    shape::ShapeNode,
    utils::{parse_rdf_list, term_to_named_or_blank},
    vocab::sh,
};

fn parse_member_list(graph: &Graph, node: NamedOrBlankNodeRef<'_>, predicate: oxigraph::model::NamedNodeRef<'_>) -> Option<Vec<ShapeNode>> {
    let list_term = graph.object_for_subject_predicate(node, predicate)?;
    let list_node = term_to_named_or_blank(list_term)?;
    Some(
        parse_rdf_list(graph, list_node)
            .into_iter()
            .filter_map(term_to_named_or_blank)
            .map(|m| ShapeNode::HasShape(m.into_owned(), None))
            .collect(),
    )
}

pub fn parse(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Vec<ShapeNode> {
    let mut out = Vec::new();

    for obj in graph.objects_for_subject_predicate(node, sh::NOT) {
        if let Some(s) = term_to_named_or_blank(obj) {
            out.push(ShapeNode::not(ShapeNode::HasShape(s.into_owned(), None)));
        }
    }

    if let Some(members) = parse_member_list(graph, node, sh::AND) {
        out.push(ShapeNode::and(members));
    }

    if let Some(members) = parse_member_list(graph, node, sh::OR) {
        out.push(ShapeNode::or(members));
    }

    if let Some(members) = parse_member_list(graph, node, sh::XONE) {
        let disjuncts = (0..members.len())
            .map(|i| {
                let mut conjuncts = vec![members[i].clone()];
                for (j, other) in members.iter().enumerate() {
                    if i != j {
                        conjuncts.push(ShapeNode::not(other.clone()));
                    }
                }
                ShapeNode::and(conjuncts)
            })
            .collect();
        out.push(ShapeNode::or(disjuncts).with_provenance(crate::shape::Provenance::Single(
            sh::XONE_CONSTRAINT_COMPONENT.into_owned().into(),
        )));
    }

    out
}
