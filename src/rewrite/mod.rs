//! TreeRewriter: `expand`, `clean`, `nnf` over `ShapeNode` trees.

use std::collections::{HashMap, HashSet};

use oxigraph::model::NamedOrBlankNode;

use crate::shape::ShapeNode;

/// Replaces every `HasShape(s)` in `node` with the (recursively expanded)
/// definition of `s`, substituting `Top` for a dangling reference. A shape
/// reached a second time while still expanding itself (a cycle) is also
/// replaced by `Top`, rather than recursing forever.
pub fn expand(definitions: &HashMap<NamedOrBlankNode, ShapeNode>, node: &ShapeNode) -> ShapeNode {
    let mut path = HashSet::new();
    expand_inner(definitions, node, &mut path)
}

fn expand_inner(
    definitions: &HashMap<NamedOrBlankNode, ShapeNode>,
    node: &ShapeNode,
    path: &mut HashSet<NamedOrBlankNode>,
) -> ShapeNode {
    match node {
        ShapeNode::Top => ShapeNode::Top,
        ShapeNode::Bot => ShapeNode::Bot,
        ShapeNode::HasValue(v) => ShapeNode::HasValue(v.clone()),
        ShapeNode::HasShape(s, _) => {
            if path.contains(s) {
                return ShapeNode::Top;
            }
            match definitions.get(s) {
                None => ShapeNode::Top,
                Some(def) => {
                    path.insert(s.clone());
                    let expanded = expand_inner(definitions, def, path);
                    path.remove(s);
                    expanded
                }
            }
        }
        ShapeNode::Not(c, p) => ShapeNode::Not(Box::new(expand_inner(definitions, c, path)), p.clone()),
        ShapeNode::And(cs, p) => ShapeNode::And(
            cs.iter().map(|c| expand_inner(definitions, c, path)).collect(),
            p.clone(),
        ),
        ShapeNode::Or(cs, p) => ShapeNode::Or(
            cs.iter().map(|c| expand_inner(definitions, c, path)).collect(),
            p.clone(),
        ),
        ShapeNode::Test(t, p) => ShapeNode::Test(t.clone(), p.clone()),
        ShapeNode::Forall(path_expr, body, p) => ShapeNode::Forall(
            path_expr.clone(),
            Box::new(expand_inner(definitions, body, path)),
            p.clone(),
        ),
        ShapeNode::CountRange(n, m, path_expr, body, p) => ShapeNode::CountRange(
            *n,
            *m,
            path_expr.clone(),
            Box::new(expand_inner(definitions, body, path)),
            p.clone(),
        ),
        ShapeNode::Closed(ps, p) => ShapeNode::Closed(ps.clone(), p.clone()),
        ShapeNode::Eq(a, b, p) => ShapeNode::Eq(a.clone(), b.clone(), p.clone()),
        ShapeNode::Disj(a, b, p) => ShapeNode::Disj(a.clone(), b.clone(), p.clone()),
        ShapeNode::LessThan(a, b, p) => ShapeNode::LessThan(a.clone(), b.clone(), p.clone()),
        ShapeNode::LessThanEq(a, b, p) => ShapeNode::LessThanEq(a.clone(), b.clone(), p.clone()),
        ShapeNode::UniqueLang(path_expr, p) => ShapeNode::UniqueLang(path_expr.clone(), p.clone()),
    }
}

/// Bottom-up simplification. In `full` mode a node carrying a provenance tag
/// is returned with its (already-cleaned) children but otherwise
/// unsimplified, so constraint-level provenance survives into lowering.
/// Idempotent: `clean(&clean(n, full), full) == clean(n, full)`.
pub fn clean(node: &ShapeNode, full: bool) -> ShapeNode {
    let rebuilt = match node {
        ShapeNode::Top
        | ShapeNode::Bot
        | ShapeNode::HasValue(_)
        | ShapeNode::HasShape(_, _)
        | ShapeNode::Test(_, _)
        | ShapeNode::Closed(_, _)
        | ShapeNode::Eq(_, _, _)
        | ShapeNode::Disj(_, _, _)
        | ShapeNode::LessThan(_, _, _)
        | ShapeNode::LessThanEq(_, _, _)
        | ShapeNode::UniqueLang(_, _) => node.clone(),
        ShapeNode::Not(c, p) => ShapeNode::Not(Box::new(clean(c, full)), p.clone()),
        ShapeNode::And(cs, p) => {
            ShapeNode::And(cs.iter().map(|c| clean(c, full)).collect(), p.clone())
        }
        ShapeNode::Or(cs, p) => ShapeNode::Or(cs.iter().map(|c| clean(c, full)).collect(), p.clone()),
        ShapeNode::Forall(path, body, p) => {
            ShapeNode::Forall(path.clone(), Box::new(clean(body, full)), p.clone())
        }
        ShapeNode::CountRange(n, m, path, body, p) => {
            ShapeNode::CountRange(*n, *m, path.clone(), Box::new(clean(body, full)), p.clone())
        }
    };

    if full && rebuilt.provenance().is_some() {
        return rebuilt;
    }

    simplify(rebuilt)
}

fn simplify(node: ShapeNode) -> ShapeNode {
    match node {
        ShapeNode::Not(c, p) => match *c {
            ShapeNode::Top => ShapeNode::Bot,
            ShapeNode::Bot => ShapeNode::Top,
            other => ShapeNode::Not(Box::new(other), p),
        },
        ShapeNode::And(cs, p) => {
            if cs.iter().any(|c| matches!(c, ShapeNode::Bot)) {
                return ShapeNode::Bot;
            }
            let mut remaining: Vec<_> = cs.into_iter().filter(|c| !matches!(c, ShapeNode::Top)).collect();
            match remaining.len() {
                0 => ShapeNode::Top,
                1 => remaining.pop().unwrap(),
                _ => ShapeNode::And(remaining, p),
            }
        }
        ShapeNode::Or(cs, p) => {
            if cs.iter().any(|c| matches!(c, ShapeNode::Top)) {
                return ShapeNode::Top;
            }
            let mut remaining: Vec<_> = cs.into_iter().filter(|c| !matches!(c, ShapeNode::Bot)).collect();
            match remaining.len() {
                0 => ShapeNode::Bot,
                1 => remaining.pop().unwrap(),
                _ => ShapeNode::Or(remaining, p),
            }
        }
        ShapeNode::Forall(path, body, p) => match *body {
            ShapeNode::Top => ShapeNode::Top,
            ShapeNode::Bot => ShapeNode::count_range(0, Some(0), path, ShapeNode::Top),
            other => ShapeNode::Forall(path, Box::new(other), p),
        },
        ShapeNode::CountRange(n, m, path, body, p) => match *body {
            ShapeNode::Bot => {
                if n == 0 {
                    ShapeNode::Top
                } else {
                    ShapeNode::Bot
                }
            }
            other => ShapeNode::CountRange(n, m, path, Box::new(other), p),
        },
        other => other,
    }
}

/// Pushes `Not` down to the leaves of an already-*expanded* tree (no
/// `HasShape` may remain). Idempotent.
pub fn nnf(node: &ShapeNode) -> ShapeNode {
    match node {
        ShapeNode::Top => ShapeNode::Top,
        ShapeNode::Bot => ShapeNode::Bot,
        ShapeNode::HasValue(v) => ShapeNode::HasValue(v.clone()),
        ShapeNode::HasShape(_, _) => {
            unreachable!("nnf requires an expanded tree: HasShape must be resolved first")
        }
        ShapeNode::Not(inner, _) => push_not(inner),
        ShapeNode::And(cs, p) => ShapeNode::And(cs.iter().map(nnf).collect(), p.clone()),
        ShapeNode::Or(cs, p) => ShapeNode::Or(cs.iter().map(nnf).collect(), p.clone()),
        ShapeNode::Test(t, p) => ShapeNode::Test(t.clone(), p.clone()),
        ShapeNode::Forall(path, body, p) => ShapeNode::Forall(path.clone(), Box::new(nnf(body)), p.clone()),
        ShapeNode::CountRange(n, m, path, body, p) => {
            ShapeNode::CountRange(*n, *m, path.clone(), Box::new(nnf(body)), p.clone())
        }
        ShapeNode::Closed(ps, p) => ShapeNode::Closed(ps.clone(), p.clone()),
        ShapeNode::Eq(a, b, p) => ShapeNode::Eq(a.clone(), b.clone(), p.clone()),
        ShapeNode::Disj(a, b, p) => ShapeNode::Disj(a.clone(), b.clone(), p.clone()),
        ShapeNode::LessThan(a, b, p) => ShapeNode::LessThan(a.clone(), b.clone(), p.clone()),
        ShapeNode::LessThanEq(a, b, p) => ShapeNode::LessThanEq(a.clone(), b.clone(), p.clone()),
        ShapeNode::UniqueLang(path, p) => ShapeNode::UniqueLang(path.clone(), p.clone()),
    }
}

/// Computes `nnf(Not(inner))` without allocating the intermediate `Not` node.
fn push_not(inner: &ShapeNode) -> ShapeNode {
    match inner {
        ShapeNode::And(cs, _) => ShapeNode::or(cs.iter().map(push_not).collect()),
        ShapeNode::Or(cs, _) => ShapeNode::and(cs.iter().map(push_not).collect()),
        ShapeNode::Not(c, _) => nnf(c),
        ShapeNode::CountRange(n, m, path, body, _) => {
            let mut disjuncts = Vec::new();
            if let Some(max) = m {
                disjuncts.push(ShapeNode::count_range(max + 1, None, path.clone(), push_not(body)));
            }
            if *n != 0 {
                disjuncts.push(ShapeNode::count_range(0, Some(n - 1), path.clone(), push_not(body)));
            }
            ShapeNode::or(disjuncts)
        }
        ShapeNode::Forall(path, body, _) => {
            ShapeNode::count_range(1, None, path.clone(), push_not(body))
        }
        ShapeNode::HasShape(_, _) => {
            unreachable!("nnf requires an expanded tree: HasShape must be resolved first")
        }
        leaf => ShapeNode::not(leaf.clone()),
    }
}
