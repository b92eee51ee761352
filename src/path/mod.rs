//! PathAlgebra: a tree representation of SHACL property paths, parsed from
//! RDF and rendered to SPARQL 1.1 property-path syntax.
//!
//! `PathNode` owns its data rather than borrowing from the source `Graph`,
//! so a `Schema` built by `parser` can outlive the graph it was parsed from
//! and `rewrite`/`lower` can build new trees freely.

use oxigraph::model::{vocab::rdf, Graph, NamedNode, NamedOrBlankNodeRef, TermRef};

use crate::{err::ShaclError, utils::parse_rdf_list, vocab::sh};

/// A SHACL property path, as an algebra tree rather than an RDF-list encoding.
///
/// `Id` is never produced by [`parse_path`]; `parser` introduces it directly
/// when building self-referential `sh:equals`/`sh:disjoint`/`sh:lessThan`
/// constraints on node shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathNode {
    Prop(NamedNode),
    Inv(Box<PathNode>),
    Alt(Vec<PathNode>),
    Comp(Vec<PathNode>),
    Kleene(Box<PathNode>),
    ZeroOrOne(Box<PathNode>),
    Id,
}

impl PathNode {
    pub fn prop(iri: impl Into<NamedNode>) -> Self {
        PathNode::Prop(iri.into())
    }

    pub fn inv(p: PathNode) -> Self {
        PathNode::Inv(Box::new(p))
    }

    pub fn kleene(p: PathNode) -> Self {
        PathNode::Kleene(Box::new(p))
    }

    pub fn zero_or_one(p: PathNode) -> Self {
        PathNode::ZeroOrOne(Box::new(p))
    }

    /// `sh:oneOrMorePath p` has no dedicated constructor; it is `p` followed
    /// by zero-or-more `p`.
    pub fn one_or_more(p: PathNode) -> Self {
        PathNode::Comp(vec![p.clone(), PathNode::kleene(p)])
    }
}

/// Parses a `sh:path` object into a [`PathNode`].
pub fn parse_path(graph: &Graph, path_term: TermRef<'_>) -> Result<PathNode, ShaclError> {
    match path_term {
        TermRef::NamedNode(iri) => Ok(PathNode::Prop(iri.into_owned())),
        TermRef::BlankNode(bn) => {
            let node = NamedOrBlankNodeRef::from(bn);
            if graph
                .object_for_subject_predicate(node, rdf::FIRST)
                .is_some()
            {
                parse_path_sequence(graph, node)
            } else {
                parse_path_element(graph, node)
            }
        }
        TermRef::Literal(_) => Err(ShaclError::Parse(
            "sh:path value must be an IRI or blank node".to_string(),
        )),
    }
}

fn parse_path_sequence(graph: &Graph, list_node: NamedOrBlankNodeRef<'_>) -> Result<PathNode, ShaclError> {
    let items = parse_rdf_list(graph, list_node);
    if items.is_empty() {
        return Err(ShaclError::Parse(
            "sh:path sequence list must not be empty".to_string(),
        ));
    }

    let mut elements = Vec::with_capacity(items.len());
    for item in items {
        elements.push(parse_path_item(graph, item)?);
    }

    // A singleton list parses as its single element, not Comp([x]), so
    // Comp's >= 2 children invariant holds.
    if elements.len() == 1 {
        Ok(elements.into_iter().next().unwrap())
    } else {
        Ok(PathNode::Comp(elements))
    }
}

fn parse_path_item(graph: &Graph, item: TermRef<'_>) -> Result<PathNode, ShaclError> {
    match item {
        TermRef::NamedNode(iri) => Ok(PathNode::Prop(iri.into_owned())),
        TermRef::BlankNode(bn) => parse_path_element(graph, NamedOrBlankNodeRef::from(bn)),
        TermRef::Literal(_) => Err(ShaclError::Parse(
            "invalid path element: literal cannot be a path segment".to_string(),
        )),
    }
}

fn parse_path_element(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Result<PathNode, ShaclError> {
    if let Some(obj) = graph.object_for_subject_predicate(node, sh::INVERSE_PATH) {
        return Ok(PathNode::inv(parse_path_item(graph, obj)?));
    }

    if let Some(obj) = graph.object_for_subject_predicate(node, sh::ALTERNATIVE_PATH) {
        let list_node = term_to_named_or_blank(obj)?;
        let items = parse_rdf_list(graph, list_node);
        if items.len() < 2 {
            return Err(ShaclError::Parse(
                "sh:alternativePath list must have at least two members".to_string(),
            ));
        }
        let mut alternatives = Vec::with_capacity(items.len());
        for item in items {
            alternatives.push(parse_path_item(graph, item)?);
        }
        return Ok(PathNode::Alt(alternatives));
    }

    if let Some(obj) = graph.object_for_subject_predicate(node, sh::ZERO_OR_MORE_PATH) {
        return Ok(PathNode::kleene(parse_path_item(graph, obj)?));
    }

    if let Some(obj) = graph.object_for_subject_predicate(node, sh::ONE_OR_MORE_PATH) {
        return Ok(PathNode::one_or_more(parse_path_item(graph, obj)?));
    }

    if let Some(obj) = graph.object_for_subject_predicate(node, sh::ZERO_OR_ONE_PATH) {
        return Ok(PathNode::zero_or_one(parse_path_item(graph, obj)?));
    }

    Err(ShaclError::Parse(
        "could not parse path element: no recognized path predicate".to_string(),
    ))
}

fn term_to_named_or_blank(term: TermRef<'_>) -> Result<NamedOrBlankNodeRef<'_>, ShaclError> {
    match term {
        TermRef::NamedNode(nn) => Ok(nn.into()),
        TermRef::BlankNode(bn) => Ok(bn.into()),
        TermRef::Literal(_) => Err(ShaclError::Parse(
            "expected an IRI or blank node in path position".to_string(),
        )),
    }
}

/// Renders a [`PathNode`] as SPARQL 1.1 property-path syntax.
///
/// `Id` has no SPARQL path rendering; callers special-case `Eq`/`Disj`/
/// cardinality nodes whose path is `Id` before reaching this function.
pub fn to_sparql_path(node: &PathNode) -> String {
    match node {
        PathNode::Prop(iri) => format!("<{}>", iri.as_str()),
        PathNode::Inv(p) => format!("^({})", to_sparql_path(p)),
        PathNode::Alt(ps) => ps.iter().map(to_sparql_path).collect::<Vec<_>>().join("|"),
        PathNode::Comp(ps) => ps.iter().map(to_sparql_path).collect::<Vec<_>>().join("/"),
        PathNode::Kleene(p) => format!("({})*", to_sparql_path(p)),
        PathNode::ZeroOrOne(p) => format!("({})?", to_sparql_path(p)),
        PathNode::Id => unreachable!("Id path rendered outside of Eq/Disj/cardinality special-casing"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn iri(s: &str) -> NamedNode {
        NamedNode::new(s).unwrap()
    }

    #[test]
    fn renders_simple_prop() {
        let p = PathNode::Prop(iri("http://example.org/knows"));
        assert_eq!(to_sparql_path(&p), "<http://example.org/knows>");
    }

    #[test]
    fn renders_inverse() {
        let p = PathNode::inv(PathNode::Prop(iri("http://example.org/knows")));
        assert_eq!(to_sparql_path(&p), "^(<http://example.org/knows>)");
    }

    #[test]
    fn renders_composition_and_kleene() {
        let p = PathNode::Comp(vec![
            PathNode::Prop(iri("http://example.org/a")),
            PathNode::kleene(PathNode::Prop(iri("http://example.org/b"))),
        ]);
        assert_eq!(
            to_sparql_path(&p),
            "<http://example.org/a>/(<http://example.org/b>)*"
        );
    }

    #[test]
    fn one_or_more_has_no_dedicated_constructor() {
        let inner = PathNode::Prop(iri("http://example.org/a"));
        let p = PathNode::one_or_more(inner);
        match p {
            PathNode::Comp(children) => assert_eq!(children.len(), 2),
            _ => panic!("expected Comp"),
        }
    }
}
