//! ShapeAlgebra: the shape-constraint tree and the `Schema` a shapes graph
//! parses into.

use std::collections::HashMap;

use oxigraph::model::{NamedOrBlankNode, Term};

use crate::path::PathNode;

/// The provenance tag spec calls "constraintComponent": the `sh:*ConstraintComponent`
/// IRI (or pair of IRIs, for constraints assembled from two SHACL parameters
/// such as combined min/max-count) that produced a `ShapeNode`. Carried only
/// for `TreeRewriter::clean`'s full mode; `expand`/`lower`/`nnf` ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    Single(NamedOrBlankNode),
    Pair(NamedOrBlankNode, NamedOrBlankNode),
}

/// A `sh:datatype`/`sh:nodeKind`/`sh:pattern`/... leaf-level test, applied to
/// a single focus node rather than to a path's reachable set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TestKind {
    Datatype(NamedOrBlankNode),
    NodeKind(NamedOrBlankNode),
    Pattern(String, String),
    LanguageIn(Vec<String>),
    /// `(bound predicate IRI, bound value)` pairs, consolidated so at most
    /// one min-bound and one max-bound pair remain.
    NumericRange(Vec<(NamedOrBlankNode, Term)>),
    LengthRange(Vec<(NamedOrBlankNode, Term)>),
}

/// The shape-constraint algebra. Every SHACL core constraint component
/// lowers to one of these constructors (possibly wrapped in `And`/`Forall`)
/// during parsing; see `parser` for the mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeNode {
    /// Always satisfied.
    Top,
    /// Never satisfied.
    Bot,
    HasValue(Term),
    /// A reference to another shape's definition, resolved by
    /// `TreeRewriter::expand`. Never present in a tree passed to `lower`.
    HasShape(NamedOrBlankNode, Option<Provenance>),
    Not(Box<ShapeNode>, Option<Provenance>),
    And(Vec<ShapeNode>, Option<Provenance>),
    Or(Vec<ShapeNode>, Option<Provenance>),
    Test(TestKind, Option<Provenance>),
    Forall(PathNode, Box<ShapeNode>, Option<Provenance>),
    CountRange(u64, Option<u64>, PathNode, Box<ShapeNode>, Option<Provenance>),
    /// Children are always `PathNode::Prop`.
    Closed(Vec<PathNode>, Option<Provenance>),
    Eq(PathNode, PathNode, Option<Provenance>),
    Disj(PathNode, PathNode, Option<Provenance>),
    LessThan(PathNode, PathNode, Option<Provenance>),
    LessThanEq(PathNode, PathNode, Option<Provenance>),
    UniqueLang(PathNode, Option<Provenance>),
}

impl ShapeNode {
    pub fn not(inner: ShapeNode) -> Self {
        ShapeNode::Not(Box::new(inner), None)
    }

    pub fn and(children: Vec<ShapeNode>) -> Self {
        ShapeNode::And(children, None)
    }

    pub fn or(children: Vec<ShapeNode>) -> Self {
        ShapeNode::Or(children, None)
    }

    pub fn forall(path: PathNode, body: ShapeNode) -> Self {
        ShapeNode::Forall(path, Box::new(body), None)
    }

    pub fn count_range(min: u64, max: Option<u64>, path: PathNode, body: ShapeNode) -> Self {
        ShapeNode::CountRange(min, max, path, Box::new(body), None)
    }

    /// Returns the node's provenance tag, if any.
    pub fn provenance(&self) -> Option<&Provenance> {
        match self {
            ShapeNode::Top | ShapeNode::Bot | ShapeNode::HasValue(_) => None,
            ShapeNode::HasShape(_, p) => p.as_ref(),
            ShapeNode::Not(_, p)
            | ShapeNode::And(_, p)
            | ShapeNode::Or(_, p)
            | ShapeNode::Test(_, p)
            | ShapeNode::Forall(_, _, p)
            | ShapeNode::CountRange(_, _, _, _, p)
            | ShapeNode::Closed(_, p)
            | ShapeNode::Eq(_, _, p)
            | ShapeNode::Disj(_, _, p)
            | ShapeNode::LessThan(_, _, p)
            | ShapeNode::LessThanEq(_, _, p)
            | ShapeNode::UniqueLang(_, p) => p.as_ref(),
        }
    }

    pub fn with_provenance(self, provenance: Provenance) -> Self {
        match self {
            ShapeNode::Top => ShapeNode::Top,
            ShapeNode::Bot => ShapeNode::Bot,
            ShapeNode::HasValue(v) => ShapeNode::HasValue(v),
            ShapeNode::HasShape(s, _) => ShapeNode::HasShape(s, Some(provenance)),
            ShapeNode::Not(c, _) => ShapeNode::Not(c, Some(provenance)),
            ShapeNode::And(cs, _) => ShapeNode::And(cs, Some(provenance)),
            ShapeNode::Or(cs, _) => ShapeNode::Or(cs, Some(provenance)),
            ShapeNode::Test(t, _) => ShapeNode::Test(t, Some(provenance)),
            ShapeNode::Forall(p, b, _) => ShapeNode::Forall(p, b, Some(provenance)),
            ShapeNode::CountRange(n, m, p, b, _) => ShapeNode::CountRange(n, m, p, b, Some(provenance)),
            ShapeNode::Closed(ps, _) => ShapeNode::Closed(ps, Some(provenance)),
            ShapeNode::Eq(a, b, _) => ShapeNode::Eq(a, b, Some(provenance)),
            ShapeNode::Disj(a, b, _) => ShapeNode::Disj(a, b, Some(provenance)),
            ShapeNode::LessThan(a, b, _) => ShapeNode::LessThan(a, b, Some(provenance)),
            ShapeNode::LessThanEq(a, b, _) => ShapeNode::LessThanEq(a, b, Some(provenance)),
            ShapeNode::UniqueLang(p, _) => ShapeNode::UniqueLang(p, Some(provenance)),
        }
    }
}

/// A parsed shapes graph: every shape's own constraint-tree definition, and
/// its separately-tracked target tree.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    pub definitions: HashMap<NamedOrBlankNode, ShapeNode>,
    pub targets: HashMap<NamedOrBlankNode, ShapeNode>,
}

impl Schema {
    pub fn new() -> Self {
        Schema {
            definitions: HashMap::new(),
            targets: HashMap::new(),
        }
    }

    /// Shape names with a non-`Bot` target tree, i.e. shapes that actually
    /// select focus nodes rather than existing purely as sub-shapes.
    pub fn target_shapes(&self) -> impl Iterator<Item = &NamedOrBlankNode> {
        self.targets
            .iter()
            .filter(|(_, target)| !matches!(target, ShapeNode::Bot))
            .map(|(name, _)| name)
    }
}
