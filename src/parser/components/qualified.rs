//! `sh:qualifiedValueShape` + `sh:qualifiedMinCount`/`sh:qualifiedMaxCount`/
//! `sh:qualifiedValueShapesDisjoint`.

use oxigraph::model::{Graph, NamedOrBlankNodeRef, TermRef};

use crate::{
    path::PathNode,
    shape::ShapeNode,
    utils::{get_all_u64_values, get_boolean_value, term_to_named_or_blank},
    vocab::sh,
};

/// `siblings` are the other `sh:property` children of `node`'s parent node
/// shape(s), used only when `sh:qualifiedValueShapesDisjoint true`.
pub fn parse(
    graph: &Graph,
    node: NamedOrBlankNodeRef<'_>,
    path: &PathNode,
    siblings: &[NamedOrBlankNodeRef<'_>],
) -> Vec<ShapeNode> {
    let mut out = Vec::new();

    for q_term in graph.objects_for_subject_predicate(node, sh::QUALIFIED_VALUE_SHAPE) {
        let Some(q) = term_to_named_or_blank(q_term) else {
            continue;
        };

        let min = get_all_u64_values(graph, node, sh::QUALIFIED_MIN_COUNT).into_iter().max();
        let max = get_all_u64_values(graph, node, sh::QUALIFIED_MAX_COUNT).into_iter().min();
        if min.is_none() && max.is_none() {
            continue;
        }

        let mut body = ShapeNode::HasShape(q.into_owned(), None);

        if get_boolean_value(graph, node, sh::QUALIFIED_VALUE_SHAPES_DISJOINT) == Some(true) {
            for &sibling in siblings {
                if sibling == node {
                    continue;
                }
                let sibling_q = graph
                    .object_for_subject_predicate(sibling, sh::QUALIFIED_VALUE_SHAPE)
                    .and_then(|t| match t {
                        TermRef::NamedNode(nn) => Some(NamedOrBlankNodeRef::from(nn)),
                        TermRef::BlankNode(bn) => Some(NamedOrBlankNodeRef::from(bn)),
                        TermRef::Literal(_) => None,
                    });
                if let Some(sibling_q) = sibling_q {
                    if sibling_q != q {
                        body = ShapeNode::and(vec![
                            body,
                            ShapeNode::not(ShapeNode::HasShape(sibling_q.into_owned(), None)),
                        ]);
                    }
                }
            }
        }

        out.push(ShapeNode::count_range(
            min.unwrap_or(0),
            max,
            path.clone(),
            body,
        ));
    }

    out
}
