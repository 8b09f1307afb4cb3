//! # Per-spec restart policies.
//!
//! [`RestartPolicy`] determines whether a spec is eligible for an automatic
//! restart after its instance terminates.
//!
//! - [`RestartPolicy::Transient`] restart only after an abnormal termination (default).
//! - [`RestartPolicy::Temporary`] never restart, whatever the exit reason.
//!
//! The policy is one gate of the restart decision; the coordinator also
//! requires its `restart_dependents` option to be enabled.

use crate::supervise::ExitReason;

/// Policy controlling whether a terminated spec may be started again automatically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RestartPolicy {
    /// Restart only after an abnormal termination (default).
    Transient,
    /// Never restart automatically.
    Temporary,
}

impl Default for RestartPolicy {
    /// Returns [`RestartPolicy::Transient`].
    fn default() -> Self {
        RestartPolicy::Transient
    }
}

impl RestartPolicy {
    /// Whether this policy permits a restart after an exit with `reason`.
    ///
    /// ```
    /// use depvisor::{ExitReason, RestartPolicy};
    ///
    /// assert!(RestartPolicy::Transient.restarts_after(&ExitReason::Other("boom".into())));
    /// assert!(!RestartPolicy::Transient.restarts_after(&ExitReason::Normal));
    /// assert!(!RestartPolicy::Temporary.restarts_after(&ExitReason::Other("boom".into())));
    /// ```
    pub fn restarts_after(&self, reason: &ExitReason) -> bool {
        matches!(self, RestartPolicy::Transient) && reason.is_abnormal()
    }
}
