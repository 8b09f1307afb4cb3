//! # Lifecycle events emitted by the coordinator.
//!
//! [`EventKind`] classifies what happened; [`Event`] carries the metadata:
//! a monotonic sequence number, a wall-clock timestamp, and optional
//! service id / exit reason / error text.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically, so events can be ordered even when observed through
//! async channels.
//!
//! ## Event flow examples
//!
//! ### Start of a spec with one need
//! ```text
//! start(api)
//!   → ServiceStarting(db)  → ServiceStarted(db)
//!   → ServiceStarting(api) → ServiceStarted(api)
//! ```
//!
//! ### Abnormal exit with cascade + restart enabled
//! ```text
//! [db dies]
//!   → CascadeStopping(api)        (original reason as cause)
//!   → ServiceExited(db)
//!   → RestartRequested(db)
//!   → ServiceStarting(db) → ServiceStarted(db)
//! [api's own termination event follows the same pipeline]
//! ```

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of coordinator events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Start path ===
    /// A spawn is about to be delegated for a spec.
    ServiceStarting,
    /// The spawn succeeded; the instance is registered and watched.
    ServiceStarted,
    /// The supervisor declined the spawn without error; nothing recorded.
    SpawnIgnored,
    /// The supervisor failed the spawn; the start sequence halts.
    StartFailed,

    // === Stop path ===
    /// A graceful terminate was delegated by `stop`.
    ServiceStopping,
    /// A terminate was delegated by failure propagation.
    CascadeStopping,
    /// A termination event was processed and the registry entry removed.
    ServiceExited,

    // === Restart path ===
    /// An abnormal exit qualified for an automatic restart.
    RestartRequested,
    /// The automatic restart returned an error.
    RestartFailed,

    // === Propagation faults ===
    /// Dependent computation failed during propagation; cascade aborted
    /// for that spec only.
    CascadeAborted,
}

/// Coordinator event with optional metadata.
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp (may go backwards, use for logging only).
    pub at: SystemTime,
    /// The kind of event.
    pub kind: EventKind,
    /// Id of the service spec, if applicable.
    pub service: Option<String>,
    /// Exit reason, if the event relates to a termination.
    pub reason: Option<String>,
    /// Error message, if the event represents a failure.
    pub error: Option<String>,
}

impl Event {
    /// Creates a new event of the given kind with the next sequence number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            service: None,
            reason: None,
            error: None,
        }
    }

    /// Attaches a service id.
    pub fn with_service(mut self, id: impl Into<String>) -> Self {
        self.service = Some(id.into());
        self
    }

    /// Attaches an exit reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches an error message.
    pub fn with_error(mut self, msg: impl Into<String>) -> Self {
        self.error = Some(msg.into());
        self
    }
}
