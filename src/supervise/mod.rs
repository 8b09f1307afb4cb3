//! External supervisor abstraction.
//!
//! The coordinator core never runs workers itself; it delegates to an
//! implementation of [`Supervise`] and tracks what came back:
//!
//! - [`Supervise`] - spawn/terminate/watch/probe contract
//! - [`Spawn`], [`Watch`] - delegation outcomes
//! - [`InstanceHandle`], [`WatchToken`] - opaque identities
//! - [`ExitReason`], [`Termination`], [`Liveness`] - what the supervisor reports back

mod contract;
mod instance;

pub use contract::{Spawn, Supervise, Watch};
pub use instance::{ExitReason, InstanceHandle, Liveness, Termination, WatchToken};
