//! `sh:languageIn` / `sh:uniqueLang`.

use oxigraph::model::{Graph, NamedOrBlankNodeRef, TermRef};

use crate::{
    path::PathNode,
    shape::{ShapeNode, TestKind},
    utils::{get_boolean_value, parse_rdf_list, term_to_named_or_blank},
    vocab::sh,
};

pub fn parse(graph: &Graph, node: NamedOrBlankNodeRef<'_>, path: &PathNode) -> Vec<ShapeNode> {
    let mut out = Vec::new();

    if let Some(list_term) = graph.object_for_subject_predicate(node, sh::LANGUAGE_IN) {
        if let Some(list_node) = term_to_named_or_blank(list_term) {
            let tags = parse_rdf_list(graph, list_node)
                .into_iter()
                .filter_map(|t| match t {
                    TermRef::Literal(lit) => Some(lit.value().to_string()),
                    _ => None,
                })
                .collect();
            out.push(ShapeNode::forall(
                path.clone(),
                ShapeNode::Test(TestKind::LanguageIn(tags), None),
            ));
        }
    }

    if get_boolean_value(graph, node, sh::UNIQUE_LANG) == Some(true) {
        out.push(ShapeNode::UniqueLang(path.clone(), None));
    }

    out
}
