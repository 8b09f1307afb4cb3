//! # depvisor
//!
//! **Depvisor** is a service-dependency coordinator.
//!
//! Given a service spec, it guarantees that everything the service needs is
//! running first, starts the service itself, tracks each running instance,
//! refuses to stop anything a running dependent still needs, and can
//! propagate failures along the dependency graph.
//!
//! ## Features
//!
//! | Area              | Description                                                            | Key types / traits                        |
//! |-------------------|------------------------------------------------------------------------|-------------------------------------------|
//! | **Specs**         | Declare services and their needs; normalize any input shape into a key. | [`Service`], [`ServiceSpec`], [`SpecInput`] |
//! | **Resolution**    | Ordered dependency/dependent traversals with cycle detection.          | [`resolve`]                               |
//! | **Coordination**  | Serialized start/stop/status/lookup over a tracked registry.           | [`Coordinator`], [`ServiceStatus`]        |
//! | **Supervision**   | Contract for the component that actually runs workers.                 | [`Supervise`], [`Spawn`], [`Watch`]       |
//! | **Propagation**   | Cascade-stop and restart dependents on termination.                    | [`Config`], [`RestartPolicy`]             |
//! | **Errors**        | Typed errors for every public operation.                               | [`CoordError`], [`ResolveError`]          |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] subscriber _(demo/reference only)_.
//! - `events`: re-exports [`Event`](events::Event) and [`EventKind`](events::EventKind) at the crate root.
//!
//! ```no_run
//! use std::sync::atomic::{AtomicU64, Ordering};
//! use std::sync::{Arc, Mutex};
//!
//! use async_trait::async_trait;
//! use tokio::sync::oneshot;
//!
//! use depvisor::{
//!     Config, Coordinator, ExitReason, InstanceHandle, Service, ServiceRef, ServiceSpec,
//!     ServiceStatus, Spawn, SpecInput, Supervise, SuperviseError, Watch, WatchToken,
//! };
//!
//! struct Cache;
//! impl Service for Cache {
//!     fn id(&self) -> &str { "cache" }
//! }
//!
//! struct Api;
//! impl Service for Api {
//!     fn id(&self) -> &str { "api" }
//!     fn needs(&self) -> Vec<SpecInput> {
//!         vec![SpecInput::from(Arc::new(Cache) as ServiceRef)]
//!     }
//! }
//!
//! // Toy supervisor: hands out handles and keeps the watches pending.
//! #[derive(Default)]
//! struct DevSupervisor {
//!     seq: AtomicU64,
//!     exits: Mutex<Vec<oneshot::Sender<ExitReason>>>,
//! }
//!
//! #[async_trait]
//! impl Supervise for DevSupervisor {
//!     async fn spawn(&self, _spec: &ServiceSpec) -> Result<Spawn, SuperviseError> {
//!         let raw = self.seq.fetch_add(1, Ordering::Relaxed);
//!         Ok(Spawn::Started(InstanceHandle::new(raw)))
//!     }
//!
//!     async fn terminate(
//!         &self,
//!         _handle: &InstanceHandle,
//!         _cause: ExitReason,
//!     ) -> Result<(), SuperviseError> {
//!         Ok(())
//!     }
//!
//!     async fn watch(&self, handle: &InstanceHandle) -> Watch {
//!         let (tx, rx) = oneshot::channel();
//!         self.exits.lock().unwrap().push(tx);
//!         Watch { token: WatchToken::new(handle.raw()), exit: rx }
//!     }
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut cfg = Config::default();
//!     cfg.supervisor = Some(Arc::new(DevSupervisor::default()));
//!
//!     let coord = Coordinator::spawn(cfg, Vec::new())?;
//!
//!     // Starts cache first, then api.
//!     coord.start(Arc::new(Api)).await?;
//!     assert_eq!(coord.status(Arc::new(Cache)).await?, ServiceStatus::Running);
//!
//!     // Refused: api still needs the cache.
//!     assert!(coord.stop(Arc::new(Cache)).await.is_err());
//!
//!     coord.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ---

mod config;
mod coord;
mod error;
pub mod events;
mod policies;
pub mod resolve;
pub mod spec;
pub mod subscribers;
pub mod supervise;

// ---- Public re-exports ----

pub use config::Config;
pub use coord::{Coordinator, ServiceStatus};
pub use error::{CoordError, ResolveError, SuperviseError};
pub use policies::RestartPolicy;
pub use spec::{normalize, Arg, Service, ServiceRef, ServiceSpec, SpecInput, StartSpec};
pub use subscribers::{Subscribe, SubscriberSet};
pub use supervise::{
    ExitReason, InstanceHandle, Liveness, Spawn, Supervise, Termination, Watch, WatchToken,
};

// Optional: expose event types at the root.
// Enable with: `--features events`
#[cfg(feature = "events")]
pub use events::{Event, EventKind};

// Optional: expose a simple built-in logging subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
