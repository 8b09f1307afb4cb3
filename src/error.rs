//! # Error types used by the coordinator and its collaborators.
//!
//! This module defines three error enums:
//!
//! - [`ResolveError`] errors raised by spec normalization and dependency resolution.
//! - [`CoordError`] errors returned by coordinator requests.
//! - [`SuperviseError`] errors reported by the external supervisor, surfaced verbatim.
//!
//! All types provide an `as_label` helper returning a short stable label for logs/metrics.

use thiserror::Error;

/// # Errors reported by the external supervisor.
///
/// The coordinator never retries these; they become the reply of the
/// request that triggered the delegation.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SuperviseError {
    /// The instance handle no longer identifies a live worker.
    #[error("instance not found")]
    NotFound,

    /// The supervisor failed to spawn or terminate a worker.
    #[error("supervisor failure: {reason}")]
    Failed {
        /// Supervisor-provided failure description.
        reason: String,
    },
}

impl SuperviseError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SuperviseError::NotFound => "supervise_not_found",
            SuperviseError::Failed { .. } => "supervise_failed",
        }
    }
}

/// # Errors produced by spec normalization and the dependency resolver.
///
/// `CyclicDependency` is the only error a well-formed graph can produce;
/// `BadSpec` means an input did not normalize into a usable service spec.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// The transitive needs graph reachable from the traversal root contains a cycle.
    #[error("cyclic dependency through service '{id}'")]
    CyclicDependency {
        /// Id of the service re-entered while still being visited.
        id: String,
    },

    /// The input could not be normalized into a service spec.
    #[error("bad service spec: {reason}")]
    BadSpec {
        /// What was wrong with the input.
        reason: String,
    },
}

impl ResolveError {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            ResolveError::CyclicDependency { .. } => "cyclic_dependency",
            ResolveError::BadSpec { .. } => "bad_spec",
        }
    }
}

/// # Errors returned by coordinator requests.
///
/// Every public coordinator operation replies with a tagged result; none panic.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    /// The needs graph of the requested spec contains a cycle.
    #[error("cyclic dependency through service '{id}'")]
    CyclicDependency {
        /// Id of the service re-entered while still being visited.
        id: String,
    },

    /// `stop` was requested for a spec that is not currently running.
    #[error("service '{id}' is not running")]
    NotFound {
        /// Id of the spec that was not found.
        id: String,
    },

    /// `stop` was refused because a running spec lists this one in its needs.
    #[doc(alias = "cannot_stop")]
    #[error("service '{id}' is still needed by a running dependent")]
    Needed {
        /// Id of the spec that is still needed.
        id: String,
    },

    /// Coordinator construction without a configured supervisor.
    #[error("no supervisor configured")]
    NoSupervisor,

    /// The input could not be normalized into a service spec.
    #[error("bad service spec: {reason}")]
    BadSpec {
        /// What was wrong with the input.
        reason: String,
    },

    /// The external supervisor reported an error; surfaced verbatim.
    #[error(transparent)]
    Supervisor(#[from] SuperviseError),

    /// The coordinator task is gone and can no longer take requests.
    #[error("coordinator is closed")]
    Closed,
}

impl CoordError {
    /// Returns a short stable label.
    pub fn as_label(&self) -> &'static str {
        match self {
            CoordError::CyclicDependency { .. } => "cyclic_dependency",
            CoordError::NotFound { .. } => "not_found",
            CoordError::Needed { .. } => "needed",
            CoordError::NoSupervisor => "no_supervisor",
            CoordError::BadSpec { .. } => "bad_spec",
            CoordError::Supervisor(e) => e.as_label(),
            CoordError::Closed => "coordinator_closed",
        }
    }
}

impl From<ResolveError> for CoordError {
    fn from(e: ResolveError) -> Self {
        match e {
            ResolveError::CyclicDependency { id } => CoordError::CyclicDependency { id },
            ResolveError::BadSpec { reason } => CoordError::BadSpec { reason },
        }
    }
}
