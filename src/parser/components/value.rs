//! `sh:hasValue` / `sh:in`.
//!
//! Split into two entry points because the two constraints behave
//! differently on property shapes: `sh:in` means "every value is among the
//! list" (folded into the property shape's `Forall`), while `sh:hasValue`
//! means "this value occurs among the values" (an existence check, kept out
//! of the `Forall`). Node shapes use both as plain, unwrapped constraints.

use oxigraph::model::{Graph, NamedOrBlankNodeRef, Term};

use crate::{shape::ShapeNode, utils::{parse_rdf_list, term_to_named_or_blank}, vocab::sh};

/// The raw values of every `sh:hasValue` triple on `node`.
pub fn parse_has_values(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Vec<Term> {
    graph
        .objects_for_subject_predicate(node, sh::HAS_VALUE)
        .map(|t| t.into_owned())
        .collect()
}

/// `Or([HasValue(v1), HasValue(v2), ...])` for `sh:in (v1 v2 ...)`, if present.
pub fn parse_in(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Option<ShapeNode> {
    let list_term = graph.object_for_subject_predicate(node, sh::IN)?;
    let list_node = term_to_named_or_blank(list_term)?;
    let members = parse_rdf_list(graph, list_node)
        .into_iter()
        .map(|t| ShapeNode::HasValue(t.into_owned()))
        .collect();
    Some(ShapeNode::or(members))
}

/// Node-shape usage: both constraints apply directly to the focus node, with
/// no path to wrap through.
pub fn parse_for_node_shape(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Vec<ShapeNode> {
    let mut out: Vec<ShapeNode> = parse_has_values(graph, node)
        .into_iter()
        .map(ShapeNode::HasValue)
        .collect();
    out.extend(parse_in(graph, node));
    out
}
