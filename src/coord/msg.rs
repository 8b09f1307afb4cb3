//! # Coordinator inbox messages.
//!
//! Requests and termination events share one bounded channel, so arrival
//! order is processing order and the reply to request *i* is sent before
//! request *i+1* begins.

use tokio::sync::oneshot;

use crate::error::CoordError;
use crate::spec::SpecInput;
use crate::supervise::{InstanceHandle, Termination};

/// Externally observable state of one spec.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServiceStatus {
    /// Not tracked: never started, or its termination event was processed.
    Stopped,
    /// Tracked and alive.
    Running,
    /// Tracked, but the instance is winding down.
    Exiting,
}

/// One message drained by the coordinator loop.
pub(crate) enum Msg {
    /// A caller request carrying its reply channel.
    Request(Request),
    /// A relayed one-shot termination notification.
    Exited(Termination),
}

/// Caller requests, one variant per public operation.
pub(crate) enum Request {
    Start {
        input: SpecInput,
        reply: oneshot::Sender<Result<Option<InstanceHandle>, CoordError>>,
    },
    Stop {
        input: SpecInput,
        reply: oneshot::Sender<Result<(), CoordError>>,
    },
    CanStop {
        input: SpecInput,
        reply: oneshot::Sender<Result<bool, CoordError>>,
    },
    Lookup {
        input: SpecInput,
        reply: oneshot::Sender<Result<Option<InstanceHandle>, CoordError>>,
    },
    Status {
        input: SpecInput,
        reply: oneshot::Sender<Result<ServiceStatus, CoordError>>,
    },
}
