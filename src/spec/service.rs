//! # Service abstraction.
//!
//! [`Service`] is the unit the coordinator reasons about: something with a
//! stable id that can declare what must be running before it starts.
//!
//! - **[`Service`]** — trait naming a service and declaring its needs
//! - **[`ServiceRef`]** — shared handle (`Arc<dyn Service>`) bound into specs
//!
//! ## Rules
//! - `needs` entries are re-normalized by the resolver, so implementations
//!   may return bare refs, `(ref, arg)` pairs, or full specs.
//! - A service whose needs depend on its start-arguments overrides
//!   [`Service::needs_with`]; the resolver prefers it whenever the spec
//!   carries arguments and falls back to [`Service::needs`] otherwise.
//! - Declaring no needs at all is the common case and the default.

use std::sync::Arc;

use super::arg::Arg;
use super::input::SpecInput;

/// Shared handle to a service object.
pub type ServiceRef = Arc<dyn Service>;

/// A named service with declared dependencies.
///
/// Implementations carry no lifecycle of their own; starting and stopping
/// happens through the external supervisor. The trait only answers "who am
/// I" and "what do I need".
pub trait Service: Send + Sync + 'static {
    /// Returns the stable service id used as the spec's identity.
    fn id(&self) -> &str;

    /// Needs of this service when started without arguments.
    ///
    /// The default is no needs.
    fn needs(&self) -> Vec<SpecInput> {
        Vec::new()
    }

    /// Needs of this service given its start-arguments.
    ///
    /// Returning `Some` marks this as the argument-aware form, preferred by
    /// the resolver whenever the spec carries arguments. The default
    /// (`None`) falls back to [`Service::needs`].
    fn needs_with(&self, args: &[Arg]) -> Option<Vec<SpecInput>> {
        let _ = args;
        None
    }
}
