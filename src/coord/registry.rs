//! # Registry: spec ↔ instance bookkeeping.
//!
//! Pure in-memory structure owned and mutated exclusively by the
//! coordinator task.
//!
//! ## Rules
//! - `specs` (spec → handle + token) and `refs` (token → spec) always have
//!   the same cardinality, and a spec's token always maps back to it.
//! - A spec is present iff its instance is believed alive at the most
//!   recent observation; entries are removed only when termination events
//!   are processed.
//! - `specs()` iterates in insertion order, so resolver universes (and the
//!   traversals over them) stay deterministic.

use std::collections::HashMap;

use crate::spec::ServiceSpec;
use crate::supervise::{InstanceHandle, WatchToken};

/// What the registry tracks per running spec.
struct Instance {
    handle: InstanceHandle,
    token: WatchToken,
}

/// Mapping of running specs to live instances, with the token inverse.
pub(crate) struct Registry {
    specs: HashMap<ServiceSpec, Instance>,
    refs: HashMap<WatchToken, ServiceSpec>,
    order: Vec<ServiceSpec>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            specs: HashMap::new(),
            refs: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Records a running instance and its watch token.
    pub fn insert(&mut self, spec: ServiceSpec, handle: InstanceHandle, token: WatchToken) {
        if let Some(prev) = self.specs.insert(spec.clone(), Instance { handle, token }) {
            self.refs.remove(&prev.token);
        } else {
            self.order.push(spec.clone());
        }
        self.refs.insert(token, spec);
    }

    /// Removes by spec; returns the instance handle if it was running.
    ///
    /// The event pipeline removes by token; this is the symmetric form.
    #[allow(dead_code)]
    pub fn remove_by_spec(&mut self, spec: &ServiceSpec) -> Option<InstanceHandle> {
        let instance = self.specs.remove(spec)?;
        self.refs.remove(&instance.token);
        self.order.retain(|s| s != spec);
        Some(instance.handle)
    }

    /// Removes by watch token; returns the spec if the token was known.
    pub fn remove_by_token(&mut self, token: &WatchToken) -> Option<ServiceSpec> {
        let spec = self.refs.remove(token)?;
        self.specs.remove(&spec);
        self.order.retain(|s| s != &spec);
        Some(spec)
    }

    /// Non-destructive token lookup.
    pub fn spec_of(&self, token: &WatchToken) -> Option<&ServiceSpec> {
        self.refs.get(token)
    }

    /// Handle of a running spec.
    pub fn handle_of(&self, spec: &ServiceSpec) -> Option<&InstanceHandle> {
        self.specs.get(spec).map(|i| &i.handle)
    }

    /// True if the spec is currently tracked as running.
    pub fn contains(&self, spec: &ServiceSpec) -> bool {
        self.specs.contains_key(spec)
    }

    /// Currently tracked specs, in start order.
    pub fn specs(&self) -> Vec<ServiceSpec> {
        self.order.clone()
    }
}
