//! Coordinator events: data model and broadcast bus.
//!
//! - [`EventKind`], [`Event`] - event classification and payload metadata
//! - [`Bus`] - thin wrapper over `tokio::sync::broadcast`
//!
//! The coordinator core is the only publisher; subscribers attached at
//! construction consume through [`crate::subscribers::SubscriberSet`].

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
