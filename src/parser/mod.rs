//! ShapeParser: turns a SHACL shapes graph into a `Schema`.

pub mod components;
pub mod target;

use std::collections::HashSet;

use oxigraph::model::{
    vocab::{rdf, rdfs},
    Graph, NamedOrBlankNodeRef, Term, TermRef,
};

use crate::{
    err::ShaclError,
    path::{parse_path, PathNode},
    shape::{Schema, ShapeNode},
    utils::{parse_rdf_list, term_to_named_or_blank},
    vocab::sh,
};

use self::components::{cardinality, closed, lang, logical, pair, qualified, shape_links, tests, universal, value};

/// `CountRange(1, None, rdf:type/rdfs:subClassOf*, HasValue(class))`: an
/// instance of `class` reached via the reflexive-transitive subclass
/// closure of `rdf:type`. Shared by `sh:class` and `sh:targetClass`/the
/// implicit class-target rule.
pub(crate) fn class_membership(class: Term) -> ShapeNode {
    let type_path = PathNode::Comp(vec![
        PathNode::Prop(rdf::TYPE.into_owned()),
        PathNode::kleene(PathNode::Prop(rdfs::SUB_CLASS_OF.into_owned())),
    ]);
    ShapeNode::count_range(1, None, type_path, ShapeNode::HasValue(class))
}

/// Parses every shape in `graph` into a `Schema`. A shape whose definition
/// fails to parse is logged and skipped (`expand` treats a missing
/// definition the same as an unresolved reference, so omission is safe).
pub fn parse_shapes(graph: &Graph) -> Schema {
    log::debug!("starting shape parsing");

    #[cfg(not(target_family = "wasm"))]
    let time = std::time::Instant::now();

    let (node_shapes, property_shapes) = find_shapes(graph);
    log::debug!(
        "found {} node shapes, {} property shapes",
        node_shapes.len(),
        property_shapes.len()
    );

    let mut schema = Schema::new();

    for node in &node_shapes {
        match parse_node_shape_body(graph, *node) {
            Ok(def) => {
                schema.definitions.insert(node.into_owned(), def);
            }
            Err(e) => log::warn!("failed to parse node shape {}: {}", node, e),
        }
        schema
            .targets
            .insert(node.into_owned(), target::parse_target_tree(graph, *node));
    }

    for node in &property_shapes {
        match parse_property_shape_body(graph, *node) {
            Ok(def) => {
                schema.definitions.insert(node.into_owned(), def);
            }
            Err(e) => log::warn!("failed to parse property shape {}: {}", node, e),
        }
        schema
            .targets
            .insert(node.into_owned(), target::parse_target_tree(graph, *node));
    }

    #[cfg(not(target_family = "wasm"))]
    log::debug!("finished shape parsing at {}", time.elapsed().as_secs_f64());

    log::debug!("parsed {} shape definitions", schema.definitions.len());
    schema
}

fn has_path(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> bool {
    graph.object_for_subject_predicate(node, sh::PATH).is_some()
}

fn list_members<'a>(graph: &'a Graph, list_object: TermRef<'a>) -> Vec<TermRef<'a>> {
    term_to_named_or_blank(list_object)
        .map(|list_node| parse_rdf_list(graph, list_node))
        .unwrap_or_default()
}

/// Identifies node-shape and property-shape nodes per §4.3's discovery
/// rules. A node satisfying both (malformed input) is treated as a
/// property shape, since `sh:path` is the more specific signal.
fn find_shapes<'a>(
    graph: &'a Graph,
) -> (HashSet<NamedOrBlankNodeRef<'a>>, HashSet<NamedOrBlankNodeRef<'a>>) {
    let mut node_shapes = HashSet::new();
    let mut property_shapes = HashSet::new();

    node_shapes.extend(
        graph
            .subjects_for_predicate_object(rdf::TYPE, sh::NODE_SHAPE)
            .collect::<HashSet<_>>(),
    );
    property_shapes.extend(
        graph
            .subjects_for_predicate_object(rdf::TYPE, sh::PROPERTY_SHAPE)
            .collect::<HashSet<_>>(),
    );

    node_shapes.extend(
        graph
            .triples_for_predicate(sh::NODE)
            .filter_map(|t| term_to_named_or_blank(t.object)),
    );
    node_shapes.extend(
        graph
            .triples_for_predicate(sh::QUALIFIED_VALUE_SHAPE)
            .filter_map(|t| term_to_named_or_blank(t.object)),
    );
    node_shapes.extend(
        graph
            .triples_for_predicate(sh::NOT)
            .filter_map(|t| term_to_named_or_blank(t.object)),
    );

    property_shapes.extend(
        graph
            .triples_for_predicate(sh::PROPERTY)
            .filter_map(|t| term_to_named_or_blank(t.object)),
    );
    property_shapes.extend(
        graph
            .triples_for_predicate(sh::PATH)
            .map(|t| t.subject),
    );

    for predicate in [sh::AND, sh::OR, sh::XONE] {
        for triple in graph.triples_for_predicate(predicate) {
            for member in list_members(graph, triple.object) {
                let Some(member) = term_to_named_or_blank(member) else {
                    continue;
                };
                if has_path(graph, member) {
                    property_shapes.insert(member);
                } else {
                    node_shapes.insert(member);
                }
            }
        }
    }

    for shape in &property_shapes {
        node_shapes.remove(shape);
    }

    (node_shapes, property_shapes)
}

fn own_property_children<'a>(graph: &'a Graph, node: NamedOrBlankNodeRef<'a>) -> Vec<NamedOrBlankNodeRef<'a>> {
    graph
        .objects_for_subject_predicate(node, sh::PROPERTY)
        .filter_map(term_to_named_or_blank)
        .collect()
}

/// Other `sh:property` children of any parent(s) that declare `node` via
/// `sh:property`, used by `sh:qualifiedValueShapesDisjoint`.
fn sibling_property_shapes<'a>(graph: &'a Graph, node: NamedOrBlankNodeRef<'a>) -> Vec<NamedOrBlankNodeRef<'a>> {
    let mut siblings = HashSet::new();
    for parent in graph.subjects_for_predicate_object(sh::PROPERTY, node) {
        for sibling in own_property_children(graph, parent) {
            if sibling != node {
                siblings.insert(sibling);
            }
        }
    }
    siblings.into_iter().collect()
}

/// `And(shape_links ++ logical ++ tests ++ value_in ++ closed ++
/// pair(Id, node))`, or `Top` if empty.
fn parse_node_shape_body(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Result<ShapeNode, ShaclError> {
    let property_children = own_property_children(graph, node);

    let mut conjuncts = Vec::new();
    conjuncts.extend(shape_links::parse(graph, node));
    conjuncts.extend(logical::parse(graph, node));
    conjuncts.extend(tests::parse(graph, node));
    conjuncts.extend(value::parse_for_node_shape(graph, node));
    conjuncts.extend(closed::parse(graph, node, &property_children));
    conjuncts.extend(pair::parse(graph, node, &PathNode::Id)?);

    Ok(if conjuncts.is_empty() {
        ShapeNode::Top
    } else {
        ShapeNode::and(conjuncts)
    })
}

/// `And(cardinality(path) ++ pair(path) ++ qualified(path) ++
/// universal(path) ++ lang(path))`, or `Top` if empty.
fn parse_property_shape_body(graph: &Graph, node: NamedOrBlankNodeRef<'_>) -> Result<ShapeNode, ShaclError> {
    let path_term = graph
        .object_for_subject_predicate(node, sh::PATH)
        .ok_or_else(|| ShaclError::Parse(format!("property shape {} is missing sh:path", node)))?;
    let path = parse_path(graph, path_term)?;

    let property_children = own_property_children(graph, node);
    let siblings = sibling_property_shapes(graph, node);

    let mut conjuncts = Vec::new();
    conjuncts.extend(cardinality::parse(graph, node, &path));
    conjuncts.extend(pair::parse(graph, node, &path)?);
    conjuncts.extend(qualified::parse(graph, node, &path, &siblings));
    conjuncts.extend(universal::parse(graph, node, &path, &property_children));
    conjuncts.extend(lang::parse(graph, node, &path));

    Ok(if conjuncts.is_empty() {
        ShapeNode::Top
    } else {
        ShapeNode::and(conjuncts)
    })
}
