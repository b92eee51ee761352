//! Small RDF helpers shared by `path`, `parser`, and `lower`.

use std::cmp::Ordering;

use oxigraph::model::{vocab::rdf, Graph, LiteralRef, NamedNodeRef, NamedOrBlankNodeRef, TermRef};

/// Walks an RDF list (`rdf:first`/`rdf:rest`/`rdf:nil`) starting at
/// `list_node`, returning its members in order.
pub fn parse_rdf_list<'a>(graph: &'a Graph, list_node: NamedOrBlankNodeRef<'a>) -> Vec<TermRef<'a>> {
    let mut result = Vec::new();
    let mut current = list_node;

    loop {
        if let NamedOrBlankNodeRef::NamedNode(nn) = current {
            if nn == rdf::NIL {
                break;
            }
        }

        if let Some(first) = graph.object_for_subject_predicate(current, rdf::FIRST) {
            result.push(first);
        }

        match graph.object_for_subject_predicate(current, rdf::REST) {
            Some(TermRef::NamedNode(nn)) => current = NamedOrBlankNodeRef::NamedNode(nn),
            Some(TermRef::BlankNode(bn)) => current = NamedOrBlankNodeRef::BlankNode(bn),
            _ => break,
        }
    }

    result
}

/// Orders two literals the way `sh:lessThan`/numeric-range comparisons need:
/// numeric literals compare numerically, everything else falls back to
/// lexical string comparison of the literal's value.
pub fn compare_literals(a: LiteralRef<'_>, b: LiteralRef<'_>) -> Ordering {
    if let (Ok(x), Ok(y)) = (a.value().parse::<f64>(), b.value().parse::<f64>()) {
        return x.partial_cmp(&y).unwrap_or(Ordering::Equal);
    }
    a.value().cmp(b.value())
}

/// Doubles backslashes in a `sh:pattern` string: RDF parsers collapse `\\`
/// to `\`, so the pattern must be re-escaped before it reaches a regex
/// engine that expects the original SHACL-author-facing escaping.
pub fn escape_backslash(pattern: &str) -> String {
    pattern.replace('\\', "\\\\")
}

/// Converts a `TermRef` to `NamedOrBlankNodeRef`, filtering out literals.
pub fn term_to_named_or_blank(term: TermRef<'_>) -> Option<NamedOrBlankNodeRef<'_>> {
    match term {
        TermRef::NamedNode(nn) => Some(nn.into()),
        TermRef::BlankNode(bn) => Some(bn.into()),
        TermRef::Literal(_) => None,
    }
}

/// Reads a single string-valued (literal or IRI) object of `predicate`.
pub fn get_string_value(
    graph: &Graph,
    subject: NamedOrBlankNodeRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Option<String> {
    graph
        .object_for_subject_predicate(subject, predicate)
        .and_then(|term| match term {
            TermRef::Literal(lit) => Some(lit.value().to_string()),
            TermRef::NamedNode(nn) => Some(nn.as_str().to_string()),
            TermRef::BlankNode(_) => None,
        })
}

/// Reads a single boolean-literal-valued object of `predicate`.
pub fn get_boolean_value(
    graph: &Graph,
    subject: NamedOrBlankNodeRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Option<bool> {
    graph
        .object_for_subject_predicate(subject, predicate)
        .and_then(|term| match term {
            TermRef::Literal(lit) => lit.value().parse::<bool>().ok(),
            _ => None,
        })
}

/// Reads every non-negative-integer-literal-valued object of `predicate`.
pub fn get_all_u64_values(
    graph: &Graph,
    subject: NamedOrBlankNodeRef<'_>,
    predicate: NamedNodeRef<'_>,
) -> Vec<u64> {
    graph
        .objects_for_subject_predicate(subject, predicate)
        .filter_map(|term| match term {
            TermRef::Literal(lit) => lit.value().parse::<u64>().ok(),
            _ => None,
        })
        .collect()
}
