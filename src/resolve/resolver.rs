//! # Dependency resolver: ordered traversals over the needs graph.
//!
//! The graph is never materialized; it is traversed on demand from spec to
//! needs (or, with edges reversed, from spec to the tracked specs that need
//! it). One depth-first walk with three marks per node backs every
//! operation.
//!
//! ## Architecture
//! ```text
//! dependencies(S)             dependents(S, universe)
//!      │                            │
//!      └──► Walker::visit(S)        └──► Walker::visit(S)
//!              children = direct_needs      children = direct_needed_by
//!              │                            │
//!              └──► post-order append ──► ordered Vec<ServiceSpec>
//! ```
//!
//! ## Rules
//! - Marks: unseen (absent), `Visiting` (on the current path), `Visited`.
//!   Meeting a `Visiting` node aborts the whole traversal with
//!   `CyclicDependency`.
//! - Post-order append means `dependencies` lists children before parents
//!   and ends with the root itself; `dependents` lists the deepest
//!   dependents first and ends with the root itself.
//! - Children are traversed in `needs` order (universe order for reversed
//!   edges); outputs are stable with respect to those orders.
//! - Needs entries are re-normalized before comparison; a missing `needs`
//!   is an empty list.

use std::collections::HashMap;

use crate::error::ResolveError;
use crate::spec::{normalize, ServiceSpec};

/// Traversal mark; unseen nodes are simply absent from the map.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Visited,
}

/// Depth-first walker shared by both traversal directions.
struct Walker<F> {
    children: F,
    marks: HashMap<ServiceSpec, Mark>,
    out: Vec<ServiceSpec>,
}

impl<F> Walker<F>
where
    F: FnMut(&ServiceSpec) -> Result<Vec<ServiceSpec>, ResolveError>,
{
    fn new(children: F) -> Self {
        Self {
            children,
            marks: HashMap::new(),
            out: Vec::new(),
        }
    }

    fn visit(&mut self, spec: &ServiceSpec) -> Result<(), ResolveError> {
        match self.marks.get(spec) {
            Some(Mark::Visited) => return Ok(()),
            Some(Mark::Visiting) => {
                return Err(ResolveError::CyclicDependency {
                    id: spec.id().to_string(),
                })
            }
            None => {}
        }
        self.marks.insert(spec.clone(), Mark::Visiting);
        for child in (self.children)(spec)? {
            self.visit(&child)?;
        }
        self.marks.insert(spec.clone(), Mark::Visited);
        self.out.push(spec.clone());
        Ok(())
    }
}

/// Canonical direct needs of a single spec.
///
/// Prefers the argument-aware `needs_with` form whenever the spec carries
/// start-arguments; every entry is re-normalized.
pub fn direct_needs(spec: &ServiceSpec) -> Result<Vec<ServiceSpec>, ResolveError> {
    let raw = if spec.args().is_empty() {
        spec.target().needs()
    } else {
        match spec.target().needs_with(spec.args()) {
            Some(needs) => needs,
            None => spec.target().needs(),
        }
    };
    raw.into_iter().map(normalize).collect()
}

/// Specs in `universe` whose direct needs contain `spec`.
pub fn direct_needed_by(
    spec: &ServiceSpec,
    universe: &[ServiceSpec],
) -> Result<Vec<ServiceSpec>, ResolveError> {
    let mut out = Vec::new();
    for candidate in universe {
        if direct_needs(candidate)?.contains(spec) {
            out.push(candidate.clone());
        }
    }
    Ok(out)
}

/// All transitive needs of `spec`, including `spec` itself, in start order.
///
/// For every pair "a before b" in the result, b has no path to a; starting
/// the list front-to-back therefore satisfies every edge.
pub fn dependencies(spec: &ServiceSpec) -> Result<Vec<ServiceSpec>, ResolveError> {
    let mut walker = Walker::new(|s: &ServiceSpec| direct_needs(s));
    walker.visit(spec)?;
    Ok(walker.out)
}

/// All specs in `universe` transitively needing `spec`, including `spec`
/// itself, deepest dependents first.
///
/// The universe is the set of currently-tracked specs; reversing the edges
/// over it yields the order in which dependents must come down.
pub fn dependents(
    spec: &ServiceSpec,
    universe: &[ServiceSpec],
) -> Result<Vec<ServiceSpec>, ResolveError> {
    let mut walker = Walker::new(|s: &ServiceSpec| direct_needed_by(s, universe));
    walker.visit(spec)?;
    Ok(walker.out)
}
