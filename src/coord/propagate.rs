//! # Failure-propagation planning.
//!
//! Pure decision step run for every termination event: given the config,
//! the terminated spec, its exit reason, and the tracked universe, decide
//! which dependents to cascade-stop and whether to restart the spec.
//!
//! ## Rules
//! - The cascade is computed over the universe *before* the terminated
//!   spec is removed, deepest dependents first, the spec itself excluded.
//! - A restart needs all three: the `restart_dependents` option, an
//!   abnormal exit reason, and a restart policy that permits it.
//! - Cascading is reason-independent; it fires on any termination.

use crate::config::Config;
use crate::error::ResolveError;
use crate::resolve;
use crate::spec::ServiceSpec;
use crate::supervise::ExitReason;

/// What a termination event requires of the coordinator.
pub(crate) struct Propagation {
    /// Dependents to terminate, deepest first.
    pub cascade: Vec<ServiceSpec>,
    /// Whether the terminated spec should be started again.
    pub restart: bool,
}

/// Plans the propagation for one termination.
///
/// A cycle in the dependent computation is surfaced so the caller can log
/// it and abort the cascade for this spec only; the restart decision is
/// available separately through [`should_restart`].
pub(crate) fn plan(
    spec: &ServiceSpec,
    reason: &ExitReason,
    cfg: &Config,
    universe: &[ServiceSpec],
) -> Result<Propagation, ResolveError> {
    let cascade = if cfg.stop_dependents {
        let mut order = resolve::dependents(spec, universe)?;
        order.retain(|s| s != spec);
        order
    } else {
        Vec::new()
    };
    Ok(Propagation {
        cascade,
        restart: should_restart(spec, reason, cfg),
    })
}

/// The restart gate alone: option enabled, abnormal exit, policy permits.
pub(crate) fn should_restart(spec: &ServiceSpec, reason: &ExitReason, cfg: &Config) -> bool {
    cfg.restart_dependents && spec.restart().restarts_after(reason)
}
