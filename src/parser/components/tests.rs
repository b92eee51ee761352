//! `sh:class`, `sh:datatype`, `sh:nodeKind`, numeric/length ranges, `sh:pattern`.

use oxigraph::model::{Graph, NamedOrBlankNodeRef, TermRef};

use crate::{
    shape::{ShapeNode, TestKind},
    utils::{compare_literals, escape_backslash, get_all_u64_values, get_string_value, term_to_named_or_blank},
    vocab::sh,
};

use super::super::class_membership;

pub fn parse(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Vec<ShapeNode> {
    let mut out = Vec::new();

    for obj in graph.objects_for_subject_predicate(node, sh::CLASS) {
        out.push(class_membership(obj.into_owned()));
    }

    for obj in graph.objects_for_subject_predicate(node, sh::DATATYPE) {
        if let Some(dt) = term_to_named_or_blank(obj) {
            out.push(ShapeNode::Test(TestKind::Datatype(dt.into_owned()), None));
        }
    }

    for obj in graph.objects_for_subject_predicate(node, sh::NODE_KIND) {
        if let Some(nk) = term_to_named_or_blank(obj) {
            out.push(ShapeNode::Test(TestKind::NodeKind(nk.into_owned()), None));
        }
    }

    if let Some(range) = parse_numeric_range(graph, node) {
        out.push(ShapeNode::Test(TestKind::NumericRange(range), None));
    }

    if let Some(range) = parse_length_range(graph, node) {
        out.push(ShapeNode::Test(TestKind::LengthRange(range), None));
    }

    if let Some(pattern) = get_string_value(graph, node, sh::PATTERN) {
        let flags = get_string_value(graph, node, sh::FLAGS).unwrap_or_default();
        out.push(ShapeNode::Test(
            TestKind::Pattern(escape_backslash(&pattern), flags),
            None,
        ));
    }

    out
}

/// Picks the tightest of several literal values reached via `predicate`,
/// tightest meaning largest when `want_max` is true, smallest otherwise.
fn tightest_literal<'a>(
    graph: &'a Graph,
    node: NamedOrBlankNodeRef<'a>,
    predicate: oxigraph::model::NamedNodeRef<'_>,
    want_max: bool,
) -> Option<oxigraph::model::Literal> {
    graph
        .objects_for_subject_predicate(node, predicate)
        .filter_map(|t| match t {
            TermRef::Literal(lit) => Some(lit),
            _ => None,
        })
        .reduce(|a, b| {
            let tighter = if want_max { compare_literals(a, b).is_ge() } else { compare_literals(a, b).is_le() };
            if tighter {
                a
            } else {
                b
            }
        })
        .map(|lit| lit.into_owned())
}

fn parse_numeric_range(
    graph: &Graph,
    node: NamedOrBlankNodeRef<'_>,
) -> Option<Vec<(oxigraph::model::NamedOrBlankNode, oxigraph::model::Term)>> {
    let min_inclusive = tightest_literal(graph, node, sh::MIN_INCLUSIVE, true);
    let min_exclusive = tightest_literal(graph, node, sh::MIN_EXCLUSIVE, true);
    let max_inclusive = tightest_literal(graph, node, sh::MAX_INCLUSIVE, false);
    let max_exclusive = tightest_literal(graph, node, sh::MAX_EXCLUSIVE, false);

    let mut out = Vec::new();

    match (min_inclusive, min_exclusive) {
        (Some(inc), Some(exc)) => {
            if compare_literals(exc.as_ref(), inc.as_ref()).is_ge() {
                out.push((sh::MIN_EXCLUSIVE.into_owned().into(), exc.into()));
            } else {
                out.push((sh::MIN_INCLUSIVE.into_owned().into(), inc.into()));
            }
        }
        (Some(inc), None) => out.push((sh::MIN_INCLUSIVE.into_owned().into(), inc.into())),
        (None, Some(exc)) => out.push((sh::MIN_EXCLUSIVE.into_owned().into(), exc.into())),
        (None, None) => {}
    }

    match (max_inclusive, max_exclusive) {
        (Some(inc), Some(exc)) => {
            if compare_literals(exc.as_ref(), inc.as_ref()).is_lt() {
                out.push((sh::MAX_EXCLUSIVE.into_owned().into(), exc.into()));
            } else {
                out.push((sh::MAX_INCLUSIVE.into_owned().into(), inc.into()));
            }
        }
        (Some(inc), None) => out.push((sh::MAX_INCLUSIVE.into_owned().into(), inc.into())),
        (None, Some(exc)) => out.push((sh::MAX_EXCLUSIVE.into_owned().into(), exc.into())),
        (None, None) => {}
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}

fn parse_length_range(
    graph: &Graph,
    node: NamedOrBlankNodeRef<'_>,
) -> Option<Vec<(oxigraph::model::NamedOrBlankNode, oxigraph::model::Term)>> {
    let mut out = Vec::new();

    let min_lengths = get_all_u64_values(graph, node, sh::MIN_LENGTH);
    if let Some(min) = min_lengths.into_iter().max() {
        out.push((
            sh::MIN_LENGTH.into_owned().into(),
            oxigraph::model::Literal::from(min as usize).into(),
        ));
    }

    let max_lengths = get_all_u64_values(graph, node, sh::MAX_LENGTH);
    if let Some(max) = max_lengths.into_iter().min() {
        out.push((
            sh::MAX_LENGTH.into_owned().into(),
            oxigraph::model::Literal::from(max as usize).into(),
        ));
    }

    if out.is_empty() {
        None
    } else {
        Some(out)
    }
}
