//! # The external supervisor contract.
//!
//! [`Supervise`] is the seam between the coordinator core and whatever
//! actually runs workers: an OS-process launcher, a container runtime, a
//! pool of tokio tasks. The core delegates spawn/terminate, installs a
//! termination watch per instance, and optionally probes liveness.
//!
//! ## Rules
//! - `spawn` errors halt the start sequence that issued them; already-started
//!   prerequisites stay up.
//! - `terminate` carries the cause so cascade stops can propagate the
//!   original exit reason; graceful stops pass [`ExitReason::Shutdown`].
//! - `watch` is one-shot: the returned channel resolves exactly once, with
//!   the reason the instance exited with.
//! - `probe` is optional; the default reports [`Liveness::Alive`], which
//!   degrades "present in the registry" to "running".

use async_trait::async_trait;
use tokio::sync::oneshot;

use crate::error::SuperviseError;
use crate::spec::ServiceSpec;

use super::instance::{ExitReason, InstanceHandle, Liveness, WatchToken};

/// Outcome of a successful spawn delegation.
#[derive(Debug)]
pub enum Spawn {
    /// A worker was started; the handle identifies it while alive.
    Started(InstanceHandle),
    /// The supervisor declined without error; nothing is recorded.
    Ignored,
}

/// A one-shot termination subscription.
///
/// The coordinator relays the resolved reason into its own inbox; callers
/// of [`Supervise::watch`] own both halves until then.
#[derive(Debug)]
pub struct Watch {
    /// Identifies this subscription in the termination event.
    pub token: WatchToken,
    /// Resolves once, with the instance's exit reason.
    pub exit: oneshot::Receiver<ExitReason>,
}

/// External supervisor delegated to for worker lifecycles.
#[async_trait]
pub trait Supervise: Send + Sync + 'static {
    /// Starts a worker for `spec`.
    ///
    /// Returns [`Spawn::Ignored`] to decline without error; the coordinator
    /// proceeds to the next spec and records nothing.
    async fn spawn(&self, spec: &ServiceSpec) -> Result<Spawn, SuperviseError>;

    /// Requests termination of the instance behind `handle`.
    ///
    /// `cause` is the reason the worker should exit with; it is what the
    /// instance's watch will eventually deliver. Returns
    /// [`SuperviseError::NotFound`] when the instance is already gone.
    async fn terminate(
        &self,
        handle: &InstanceHandle,
        cause: ExitReason,
    ) -> Result<(), SuperviseError>;

    /// Subscribes to a one-shot termination notification for `handle`.
    async fn watch(&self, handle: &InstanceHandle) -> Watch;

    /// Synchronous liveness probe for `handle`.
    ///
    /// Supervisors without a cheap probe keep the default and rely
    /// exclusively on termination events.
    async fn probe(&self, handle: &InstanceHandle) -> Liveness {
        let _ = handle;
        Liveness::Alive
    }
}
