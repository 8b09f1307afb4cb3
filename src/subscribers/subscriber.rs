//! # Event subscriber trait.
//!
//! [`Subscribe`] is the extension point for plugging event handlers into a
//! coordinator instance. Each subscriber gets a dedicated worker task, a
//! bounded queue, and panic isolation.
//!
//! ## Rules
//! - Slow subscribers only affect themselves (queue overflow drops events
//!   for that subscriber only).
//! - Panics are caught; they do not crash the coordinator or other
//!   subscribers.
//! - Subscribers never block publishers.

use async_trait::async_trait;

use crate::events::Event;

/// Event subscriber for coordinator observability.
///
/// Receives events through a dedicated worker with a bounded queue; see
/// [`SubscriberSet`](super::SubscriberSet) for the fan-out mechanics.
#[async_trait]
pub trait Subscribe: Send + Sync + 'static {
    /// Processes a single event.
    ///
    /// Called from the subscriber's worker task, sequentially, in queue
    /// order. Handle errors internally; do not panic.
    async fn on_event(&self, event: &Event);

    /// Returns the subscriber name for drop/panic reporting.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this subscriber.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
