//! QueryLowering: compiles an expanded, cleaned `ShapeNode` into a unary
//! SPARQL `SELECT ?v WHERE { ... }` query whose solutions are exactly the
//! nodes satisfying it.
//!
//! Compositional throughout: each constructor lowers its own children by
//! calling [`lower`] again and splicing the resulting query text in as a
//! sub-select, never re-walking the tree outside its own recursion. Calling
//! [`lower`] on a tree that still contains `HasShape` returns
//! `ShaclError::Lowering` — resolve references with `rewrite::expand` first.

use oxigraph::model::{NamedOrBlankNode, Term};

use crate::{
    err::ShaclError,
    path::{to_sparql_path, PathNode},
    shape::{ShapeNode, TestKind},
    vocab::sh,
};

fn select(body: &str) -> String {
    format!("SELECT ?v WHERE {{ {} }}", body)
}

/// Every term in the universe: either the subject or the object of some
/// triple. Base case for `Top` and the generic form of negation.
fn universe_body() -> &'static str {
    "{ ?v ?_a ?_b } UNION { ?_c ?_d ?v }"
}

fn universe() -> String {
    select(universe_body())
}

fn sparql_string_literal(s: &str) -> String {
    format!("\"{}\"", s.replace('\\', "\\\\").replace('"', "\\\""))
}

enum Bound {
    MinIncl,
    MinExcl,
    MaxIncl,
    MaxExcl,
}

fn classify_bound(predicate: &NamedOrBlankNode) -> Bound {
    let NamedOrBlankNode::NamedNode(nn) = predicate else {
        return Bound::MinIncl;
    };
    let iri = nn.as_str();
    if iri == sh::MIN_EXCLUSIVE.as_str() {
        Bound::MinExcl
    } else if iri == sh::MAX_INCLUSIVE.as_str() || iri == sh::MAX_LENGTH.as_str() {
        Bound::MaxIncl
    } else if iri == sh::MAX_EXCLUSIVE.as_str() {
        Bound::MaxExcl
    } else {
        Bound::MinIncl
    }
}

fn comparator(bound: &Bound, negate: bool) -> &'static str {
    match (bound, negate) {
        (Bound::MinIncl, false) => ">=",
        (Bound::MinIncl, true) => "<",
        (Bound::MinExcl, false) => ">",
        (Bound::MinExcl, true) => "<=",
        (Bound::MaxIncl, false) => "<=",
        (Bound::MaxIncl, true) => ">",
        (Bound::MaxExcl, false) => "<",
        (Bound::MaxExcl, true) => ">=",
    }
}

fn render_range_filter(bounds: &[(NamedOrBlankNode, Term)], lhs: &str, negate: bool) -> String {
    let parts: Vec<String> = bounds
        .iter()
        .map(|(predicate, value)| {
            let bound = classify_bound(predicate);
            format!("{} {} {}", lhs, comparator(&bound, negate), value)
        })
        .collect();
    parts.join(if negate { " || " } else { " && " })
}

fn node_kind_expr(kind: &NamedOrBlankNode) -> String {
    let NamedOrBlankNode::NamedNode(nn) = kind else {
        return "false".to_string();
    };
    let iri = nn.as_str();
    if iri == sh::IRI.as_str() {
        "isIRI(?v)".to_string()
    } else if iri == sh::BLANK_NODE.as_str() {
        "isBlank(?v)".to_string()
    } else if iri == sh::LITERAL.as_str() {
        "isLiteral(?v)".to_string()
    } else if iri == sh::BLANK_NODE_OR_IRI.as_str() {
        "(isBlank(?v) || isIRI(?v))".to_string()
    } else if iri == sh::BLANK_NODE_OR_LITERAL.as_str() {
        "(isBlank(?v) || isLiteral(?v))".to_string()
    } else if iri == sh::IRI_OR_LITERAL.as_str() {
        "(isIRI(?v) || isLiteral(?v))".to_string()
    } else {
        "false".to_string()
    }
}

/// Renders a test's filter condition. `negate` pushes negation in place
/// (De Morgan for the range/language forms, a leading `!` for the others)
/// rather than wrapping the whole expression, so callers building a tight
/// `Not(Test(t))` query don't need a second negation layer.
fn render_filter(kind: &TestKind, negate: bool) -> String {
    match kind {
        TestKind::Datatype(d) => {
            let expr = format!("datatype(?v) = {}", d);
            if negate {
                format!("!({})", expr)
            } else {
                expr
            }
        }
        TestKind::NodeKind(k) => {
            let expr = node_kind_expr(k);
            if negate {
                format!("!({})", expr)
            } else {
                expr
            }
        }
        TestKind::Pattern(pattern, flags) => {
            let literal = sparql_string_literal(pattern);
            let expr = if flags.is_empty() {
                format!("regex(str(?v), {})", literal)
            } else {
                format!("regex(str(?v), {}, {})", literal, sparql_string_literal(flags))
            };
            if negate {
                format!("!({})", expr)
            } else {
                expr
            }
        }
        TestKind::LanguageIn(tags) => {
            let list = tags
                .iter()
                .map(|t| sparql_string_literal(t))
                .collect::<Vec<_>>()
                .join(", ");
            if negate {
                format!("lang(?v) NOT IN ({})", list)
            } else {
                format!("lang(?v) IN ({})", list)
            }
        }
        TestKind::NumericRange(bounds) => render_range_filter(bounds, "?v", negate),
        TestKind::LengthRange(bounds) => render_range_filter(bounds, "strlen(?v)", negate),
    }
}

/// The "shares a value" pattern behind `Disj` and its tight negated form.
fn shares_value_body(p1: &PathNode, p2: &PathNode) -> String {
    match (p1, p2) {
        (PathNode::Id, _) => format!("?v {} ?v", to_sparql_path(p2)),
        (_, PathNode::Id) => format!("?v {} ?v", to_sparql_path(p1)),
        _ => format!(
            "?v {} ?o . ?v {} ?o",
            to_sparql_path(p1),
            to_sparql_path(p2)
        ),
    }
}

/// The asymmetric-difference pattern behind `Eq` and its tight negated form:
/// a value reachable via one path but not the other.
fn asymmetric_diff_body(p1: &PathNode, p2: &PathNode) -> String {
    match (p1, p2) {
        (PathNode::Id, _) => format!(
            "{{ FILTER NOT EXISTS {{ ?v {path2} ?v }} }} UNION {{ ?v {path2} ?o . FILTER(?o != ?v) }}",
            path2 = to_sparql_path(p2)
        ),
        (_, PathNode::Id) => asymmetric_diff_body(p2, p1),
        _ => format!(
            "{{ ?v {path1} ?o . FILTER NOT EXISTS {{ ?v {path2} ?o }} }} UNION {{ ?v {path2} ?o . FILTER NOT EXISTS {{ ?v {path1} ?o }} }}",
            path1 = to_sparql_path(p1),
            path2 = to_sparql_path(p2)
        ),
    }
}

fn lower_eq(p1: &PathNode, p2: &PathNode) -> String {
    select(&format!(
        "{} MINUS {{ {} }}",
        universe_body(),
        asymmetric_diff_body(p1, p2)
    ))
}

fn lower_disj(p1: &PathNode, p2: &PathNode) -> String {
    select(&format!(
        "{} MINUS {{ {} }}",
        universe_body(),
        shares_value_body(p1, p2)
    ))
}

/// The per-edge pattern shared by `CountRange`'s `n == 0` case and its
/// general grouped form: `?v path ?o`, with `?o` constrained by `body`.
fn per_edge_body(path: &PathNode, body: &ShapeNode) -> Result<String, ShaclError> {
    let edge = format!("?v {} ?o", to_sparql_path(path));
    Ok(match body {
        ShapeNode::Top => edge,
        ShapeNode::Test(t, _) => format!("{} . FILTER({})", edge, render_filter(t, false)),
        _ => format!(
            "{} . {{ SELECT (?v AS ?o) WHERE {{ {} }} }}",
            edge,
            lower(body)?
        ),
    })
}

fn having_clause(n: u64, m: Option<u64>) -> String {
    if n == 1 && m.is_none() {
        return String::new();
    }
    match m {
        Some(max) if max == n => format!("HAVING (COUNT(?o) = {})", n),
        Some(max) => format!("HAVING (COUNT(?o) >= {} && COUNT(?o) <= {})", n, max),
        None => format!("HAVING (COUNT(?o) >= {})", n),
    }
}

fn lower_count_range(n: u64, m: Option<u64>, path: &PathNode, body: &ShapeNode) -> Result<String, ShaclError> {
    if n == 1 && m.is_none() {
        if let ShapeNode::HasValue(v) = body {
            return Ok(select(&format!("?v {} {}", to_sparql_path(path), v)));
        }
    }

    let edge_body = per_edge_body(path, body)?;

    if n == 0 {
        return Ok(match m {
            None => select(&edge_body),
            Some(max) => select(&format!(
                "{} MINUS {{ SELECT ?v WHERE {{ {} }} GROUP BY ?v HAVING (COUNT(?o) > {}) }}",
                universe_body(),
                edge_body,
                max
            )),
        });
    }

    let having = having_clause(n, m);
    Ok(if having.is_empty() {
        select(&edge_body)
    } else {
        select(&format!(
            "{{ SELECT ?v WHERE {{ {} }} GROUP BY ?v {} }}",
            edge_body, having
        ))
    })
}

fn lower_forall(path: &PathNode, body: &ShapeNode) -> Result<String, ShaclError> {
    Ok(match body {
        ShapeNode::Test(t, _) => select(&format!(
            "{} MINUS {{ ?v {} ?o . FILTER(!({})) }}",
            universe_body(),
            to_sparql_path(path),
            render_filter(t, false)
        )),
        _ => {
            let negated_body = lower(&ShapeNode::not(body.clone()))?;
            select(&format!(
                "{} MINUS {{ ?v {} ?o . {{ SELECT (?v AS ?o) WHERE {{ {} }} }} }}",
                universe_body(),
                to_sparql_path(path),
                negated_body
            ))
        }
    })
}

fn lower_unique_lang(path: &PathNode) -> String {
    select(&format!(
        "{} MINUS {{ ?v {path} ?o1 . ?v {path} ?o2 . FILTER(?o1 != ?o2 && lang(?o1) = lang(?o2) && lang(?o1) != \"\") }}",
        universe_body(),
        path = to_sparql_path(path)
    ))
}

fn lower_closed(paths: &[PathNode]) -> String {
    let list = paths.iter().map(to_sparql_path).collect::<Vec<_>>().join(", ");
    select(&format!(
        "{} MINUS {{ ?v ?p ?o . FILTER (?p NOT IN ({})) }}",
        universe_body(),
        list
    ))
}

fn lower_not(inner: &ShapeNode) -> Result<String, ShaclError> {
    Ok(match inner {
        ShapeNode::Test(t, _) => select(&format!(
            "{} FILTER({})",
            universe_body(),
            render_filter(t, true)
        )),
        ShapeNode::Eq(p1, p2, _) if *p1 == PathNode::Id => select(&asymmetric_diff_body(p1, p2)),
        ShapeNode::Disj(p1, p2, _) => select(&shares_value_body(p1, p2)),
        _ => select(&format!("{} MINUS {{ {} }}", universe_body(), lower(inner)?)),
    })
}

/// Compiles `node` to a `SELECT ?v WHERE { ... }` query whose solutions are
/// the nodes satisfying it. Returns `ShaclError::Lowering` if `node` still
/// contains `HasShape`; callers must `rewrite::expand` first.
pub fn lower(node: &ShapeNode) -> Result<String, ShaclError> {
    Ok(match node {
        ShapeNode::Top => universe(),
        ShapeNode::Bot => select("FILTER(false)"),
        ShapeNode::HasShape(s, _) => {
            return Err(ShaclError::Lowering(format!(
                "lower called on a tree with an unresolved HasShape({}); expand first",
                s
            )))
        }
        ShapeNode::HasValue(v) => select(&format!("BIND({} AS ?v)", v)),
        ShapeNode::Not(inner, _) => lower_not(inner)?,
        ShapeNode::And(cs, _) => select(
            &cs.iter()
                .map(|c| lower(c).map(|q| format!("{{ {} }}", q)))
                .collect::<Result<Vec<_>, _>>()?
                .join(" . "),
        ),
        ShapeNode::Or(cs, _) => select(
            &cs.iter()
                .map(|c| lower(c).map(|q| format!("{{ {} }}", q)))
                .collect::<Result<Vec<_>, _>>()?
                .join(" UNION "),
        ),
        ShapeNode::Test(t, _) => select(&format!("{} FILTER({})", universe_body(), render_filter(t, false))),
        ShapeNode::Forall(path, body, _) => lower_forall(path, body)?,
        ShapeNode::CountRange(n, m, path, body, _) => lower_count_range(*n, *m, path, body)?,
        ShapeNode::Closed(paths, _) => lower_closed(paths),
        ShapeNode::Eq(p1, p2, _) => lower_eq(p1, p2),
        ShapeNode::Disj(p1, p2, _) => lower_disj(p1, p2),
        ShapeNode::LessThan(p1, p2, _) => select(&format!(
            "?v {} ?e . FILTER NOT EXISTS {{ ?v {} ?f . FILTER(?e >= ?f) }}",
            to_sparql_path(p1),
            to_sparql_path(p2)
        )),
        ShapeNode::LessThanEq(p1, p2, _) => select(&format!(
            "?v {} ?e . FILTER NOT EXISTS {{ ?v {} ?f . FILTER(?e > ?f) }}",
            to_sparql_path(p1),
            to_sparql_path(p2)
        )),
        ShapeNode::UniqueLang(path, _) => lower_unique_lang(path),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxigraph::model::NamedNode;

    fn prop(iri: &str) -> PathNode {
        PathNode::Prop(NamedNode::new(iri).unwrap())
    }

    #[test]
    fn top_lowers_to_the_universe_query() {
        let q = lower(&ShapeNode::Top).unwrap();
        assert!(q.contains("UNION"));
        assert!(q.starts_with("SELECT ?v WHERE"));
    }

    #[test]
    fn and_joins_children_with_dot() {
        let q = lower(&ShapeNode::and(vec![ShapeNode::Top, ShapeNode::Top])).unwrap();
        assert_eq!(q.matches(" . ").count(), 1);
    }

    #[test]
    fn or_unions_children() {
        let q = lower(&ShapeNode::or(vec![ShapeNode::Top, ShapeNode::Top])).unwrap();
        assert!(q.contains(" UNION "));
    }

    #[test]
    fn exact_one_has_value_is_a_direct_existence_check() {
        let v = Term::NamedNode(NamedNode::new("http://example.org/Alice").unwrap());
        let q = lower_count_range(1, None, &prop("http://example.org/knows"), &ShapeNode::HasValue(v)).unwrap();
        assert!(q.contains("?v <http://example.org/knows> <http://example.org/Alice>"));
        assert!(!q.contains("GROUP BY"));
    }

    #[test]
    fn min_count_zero_without_max_is_just_the_edge_pattern() {
        let q = lower_count_range(0, None, &prop("http://example.org/knows"), &ShapeNode::Top).unwrap();
        assert!(!q.contains("MINUS"));
        assert!(q.contains("?v <http://example.org/knows> ?o"));
    }

    #[test]
    fn not_of_disjoint_is_the_tight_shares_a_value_form() {
        let q = lower(&ShapeNode::not(ShapeNode::Disj(
            prop("http://example.org/a"),
            prop("http://example.org/b"),
            None,
        )))
        .unwrap();
        assert!(!q.contains("MINUS"));
        assert!(q.contains("?v <http://example.org/a> ?o . ?v <http://example.org/b> ?o"));
    }

    #[test]
    fn unresolved_has_shape_is_a_lowering_error() {
        let shape_ref = NamedOrBlankNode::NamedNode(NamedNode::new("http://example.org/SomeShape").unwrap());
        let err = lower(&ShapeNode::HasShape(shape_ref, None)).unwrap_err();
        assert!(matches!(err, ShaclError::Lowering(_)));
    }
}
