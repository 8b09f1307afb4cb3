//! # Instance identity: handles, watch tokens, exit reasons.
//!
//! The coordinator never owns a worker; it holds an [`InstanceHandle`]
//! issued by the external supervisor and a [`WatchToken`] identifying the
//! one-shot termination subscription installed for that instance.
//!
//! ## Rules
//! - A handle identifies a worker uniquely while it is alive.
//! - A token maps 1:1 to a spec until the termination event is processed.
//! - [`ExitReason::Normal`] and [`ExitReason::Shutdown`] are graceful; everything else is abnormal.

use std::fmt;

/// Opaque reference to a running worker instance.
///
/// Owned by the external supervisor; the coordinator only terminates or
/// observes through it and must not assume anything about the raw value
/// beyond uniqueness while the worker is alive.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct InstanceHandle(u64);

impl InstanceHandle {
    /// Wraps a supervisor-allocated instance id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw instance id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// One-shot termination-subscription identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct WatchToken(u64);

impl WatchToken {
    /// Wraps a supervisor-allocated watch id.
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw watch id.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Why a worker instance terminated.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ExitReason {
    /// The worker finished on its own, successfully.
    Normal,
    /// The worker was asked to stop and complied.
    Shutdown,
    /// Anything else: crash, kill, supervisor-specific failure.
    Other(String),
}

impl ExitReason {
    /// True for every reason other than `Normal` and `Shutdown`.
    pub fn is_abnormal(&self) -> bool {
        matches!(self, ExitReason::Other(_))
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::Normal => f.write_str("normal"),
            ExitReason::Shutdown => f.write_str("shutdown"),
            ExitReason::Other(reason) => f.write_str(reason),
        }
    }
}

/// Termination notification delivered into the coordinator's inbox.
#[derive(Debug)]
pub struct Termination {
    /// Token of the watch installed for the terminated instance.
    pub token: WatchToken,
    /// The reason the instance exited with.
    pub reason: ExitReason,
}

/// Result of probing an instance handle for liveness.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Liveness {
    /// The worker is alive in some active state.
    Alive,
    /// The worker has been told to stop and is winding down.
    WindingDown,
    /// The worker is gone; the next termination event reconciles the registry.
    Gone,
}
