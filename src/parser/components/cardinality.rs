//! `sh:minCount` / `sh:maxCount`.

use oxigraph::model::{Graph, NamedOrBlankNodeRef};

use crate::{path::PathNode, shape::ShapeNode, utils::get_all_u64_values, vocab::sh};

pub fn parse(graph: &Graph, node: NamedOrBlankNodeRef<'_>, path: &PathNode) -> Vec<ShapeNode> {
    let min = get_all_u64_values(graph, node, sh::MIN_COUNT).into_iter().max();
    let max = get_all_u64_values(graph, node, sh::MAX_COUNT).into_iter().min();

    if min.is_none() && max.is_none() {
        return Vec::new();
    }

    vec![ShapeNode::count_range(
        min.unwrap_or(0),
        max,
        path.clone(),
        ShapeNode::Top,
    )]
}
