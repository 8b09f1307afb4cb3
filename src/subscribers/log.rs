//! # Simple logging subscriber for debugging and demos.
//!
//! [`LogWriter`] prints events to stdout in a human-readable format.
//!
//! ## Output format
//! ```text
//! [starting] service=db
//! [started] service=db
//! [stopping] service=db
//! [cascade-stopping] service=api reason=connection refused
//! [exited] service=db reason=shutdown
//! [restart-requested] service=db reason=connection refused
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};

use super::Subscribe;

/// Simple stdout logging subscriber.
///
/// Enabled via the `logging` feature. Intended for development and demos;
/// implement a custom [`Subscribe`] for structured logging or metrics.
pub struct LogWriter;

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let service = e.service.as_deref().unwrap_or("?");
        match e.kind {
            EventKind::ServiceStarting => println!("[starting] service={service}"),
            EventKind::ServiceStarted => println!("[started] service={service}"),
            EventKind::SpawnIgnored => println!("[spawn-ignored] service={service}"),
            EventKind::StartFailed => {
                println!("[start-failed] service={service} err={:?}", e.error)
            }
            EventKind::ServiceStopping => println!("[stopping] service={service}"),
            EventKind::CascadeStopping => {
                println!("[cascade-stopping] service={service} reason={:?}", e.reason)
            }
            EventKind::ServiceExited => {
                println!("[exited] service={service} reason={:?}", e.reason)
            }
            EventKind::RestartRequested => {
                println!("[restart-requested] service={service} reason={:?}", e.reason)
            }
            EventKind::RestartFailed => {
                println!("[restart-failed] service={service} err={:?}", e.error)
            }
            EventKind::CascadeAborted => {
                println!("[cascade-aborted] service={service} err={:?}", e.error)
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
