//! Service specs and normalization.
//!
//! This module provides the value the whole crate keys on:
//! - [`Service`] - trait naming a service and declaring its needs
//! - [`ServiceRef`] - shared reference to a service (`Arc<dyn Service>`)
//! - [`Arg`] - opaque, content-comparable start-argument
//! - [`ServiceSpec`], [`StartSpec`] - normalized spec: id + start descriptor + restart policy
//! - [`SpecInput`], [`normalize`] - the three accepted input shapes and their canonicalization

mod arg;
mod input;
mod service;
#[allow(clippy::module_inception)]
mod spec;

pub use arg::Arg;
pub use input::{normalize, SpecInput};
pub use service::{Service, ServiceRef};
pub use spec::{ServiceSpec, StartSpec};
