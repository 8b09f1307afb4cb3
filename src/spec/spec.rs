//! # Normalized service specs.
//!
//! [`ServiceSpec`] is the key the whole coordinator runs on: an id, a start
//! descriptor (target service plus bound arguments), and a restart policy.
//!
//! ## Rules
//! - Equality and hashing are content-based over `(id, args, restart)`;
//!   the service vtable never participates, so two specs denoting the same
//!   service with the same arguments compare equal regardless of how they
//!   were built.
//! - Construction fills defaults (no args, [`RestartPolicy::Transient`]) so
//!   inputs that would start the same way normalize to equal values.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::policies::RestartPolicy;

use super::arg::Arg;
use super::service::ServiceRef;

/// Start descriptor: the target service and the arguments bound to it.
#[derive(Clone)]
pub struct StartSpec {
    target: ServiceRef,
    args: Vec<Arg>,
}

impl StartSpec {
    /// Returns the target service.
    pub fn target(&self) -> &ServiceRef {
        &self.target
    }

    /// Returns the bound start-arguments.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }
}

impl fmt::Debug for StartSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StartSpec")
            .field("target", &self.target.id())
            .field("args", &self.args)
            .finish()
    }
}

/// # Normalized, hashable description of one service instance.
///
/// Built from any of the accepted input shapes (see
/// [`SpecInput`](super::SpecInput)) and used as the registry key, the
/// resolver node, and the input to a supervisor spawn.
///
/// ## Example
/// ```
/// use std::sync::Arc;
/// use depvisor::{Service, ServiceRef, ServiceSpec};
///
/// struct Cache;
/// impl Service for Cache {
///     fn id(&self) -> &str { "cache" }
/// }
///
/// let a = ServiceSpec::new(Arc::new(Cache) as ServiceRef);
/// let b = ServiceSpec::new(Arc::new(Cache) as ServiceRef);
/// assert_eq!(a, b);
/// ```
#[derive(Clone)]
pub struct ServiceSpec {
    id: String,
    start: StartSpec,
    restart: RestartPolicy,
}

impl ServiceSpec {
    /// Creates a spec for `target` with defaults: the target's own id, no
    /// arguments, [`RestartPolicy::Transient`].
    pub fn new(target: ServiceRef) -> Self {
        let id = target.id().to_string();
        Self {
            id,
            start: StartSpec {
                target,
                args: Vec::new(),
            },
            restart: RestartPolicy::default(),
        }
    }

    /// Overrides the spec id.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Replaces the bound start-arguments.
    pub fn with_args(mut self, args: Vec<Arg>) -> Self {
        self.start.args = args;
        self
    }

    /// Appends one start-argument.
    pub fn with_arg(mut self, arg: impl Into<Arg>) -> Self {
        self.start.args.push(arg.into());
        self
    }

    /// Overrides the restart policy.
    pub fn with_restart(mut self, restart: RestartPolicy) -> Self {
        self.restart = restart;
        self
    }

    /// Returns the spec id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the start descriptor.
    pub fn start(&self) -> &StartSpec {
        &self.start
    }

    /// Returns the target service.
    pub fn target(&self) -> &ServiceRef {
        self.start.target()
    }

    /// Returns the bound start-arguments.
    pub fn args(&self) -> &[Arg] {
        self.start.args()
    }

    /// Returns the restart policy.
    pub fn restart(&self) -> RestartPolicy {
        self.restart
    }
}

impl PartialEq for ServiceSpec {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.start.args == other.start.args
            && self.restart == other.restart
    }
}

impl Eq for ServiceSpec {}

impl Hash for ServiceSpec {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
        self.start.args.hash(state);
        self.restart.hash(state);
    }
}

impl fmt::Debug for ServiceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceSpec")
            .field("id", &self.id)
            .field("args", &self.start.args)
            .field("restart", &self.restart)
            .finish()
    }
}
