//! Event subscribers and fan-out.
//!
//! - [`Subscribe`] - trait for event handlers attached at coordinator construction
//! - [`SubscriberSet`] - per-subscriber bounded queues with panic isolation
//! - [`LogWriter`] - stdout subscriber behind the `logging` feature

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscriber;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscriber::Subscribe;
