//! # Coordinator: the public handle.
//!
//! [`Coordinator::spawn`] wires the pieces together — inbox, event bus,
//! subscriber fan-out, core loop — and returns a cheap-to-clone handle.
//! Every public operation is a request submitted to the loop and awaited
//! through a per-request reply channel.

use std::sync::Arc;

use tokio::sync::{broadcast, mpsc, oneshot};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::CoordError;
use crate::events::Bus;
use crate::spec::SpecInput;
use crate::subscribers::{Subscribe, SubscriberSet};
use crate::supervise::InstanceHandle;

use super::core::Core;
use super::msg::{Msg, Request, ServiceStatus};

/// Handle to a running coordinator instance.
///
/// Clones share the same underlying loop. Dropping every handle does not
/// stop the loop (watch forwarders keep the inbox open); call
/// [`Coordinator::shutdown`] for that.
#[derive(Clone)]
pub struct Coordinator {
    tx: mpsc::Sender<Msg>,
    token: CancellationToken,
    name: Option<String>,
}

impl Coordinator {
    /// Spawns a coordinator loop for `cfg` with the given subscribers.
    ///
    /// Must be called within a tokio runtime. Fails with
    /// [`CoordError::NoSupervisor`] when `cfg.supervisor` is unset.
    pub fn spawn(
        cfg: Config,
        subscribers: Vec<Arc<dyn Subscribe>>,
    ) -> Result<Self, CoordError> {
        let supervisor = cfg.supervisor.clone().ok_or(CoordError::NoSupervisor)?;
        let bus = Bus::new(cfg.bus_capacity);
        let (tx, rx) = mpsc::channel(cfg.mailbox_capacity.max(1));
        let token = CancellationToken::new();

        if !subscribers.is_empty() {
            Self::fan_out(&bus, subscribers, token.clone());
        }

        let name = cfg.name.clone();
        let core = Core::new(cfg, supervisor, bus, tx.clone(), rx, token.clone());
        tokio::spawn(core.run());

        Ok(Self { tx, token, name })
    }

    /// Starts the spec after everything it needs.
    ///
    /// Returns the handle of the last-started spec, or `None` when the
    /// spec and all of its needs were already running.
    pub async fn start(
        &self,
        input: impl Into<SpecInput>,
    ) -> Result<Option<InstanceHandle>, CoordError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Start {
            input: input.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| CoordError::Closed)?
    }

    /// Stops the spec unless a running dependent still needs it.
    ///
    /// The registry entry is removed when the termination event is
    /// processed, not when this call returns.
    pub async fn stop(&self, input: impl Into<SpecInput>) -> Result<(), CoordError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Stop {
            input: input.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| CoordError::Closed)?
    }

    /// True iff the spec is running and no running dependent needs it.
    pub async fn can_stop(&self, input: impl Into<SpecInput>) -> Result<bool, CoordError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::CanStop {
            input: input.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| CoordError::Closed)?
    }

    /// Returns the instance handle of a running spec.
    pub async fn lookup(
        &self,
        input: impl Into<SpecInput>,
    ) -> Result<Option<InstanceHandle>, CoordError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Lookup {
            input: input.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| CoordError::Closed)?
    }

    /// Returns the spec's externally observable state.
    pub async fn status(
        &self,
        input: impl Into<SpecInput>,
    ) -> Result<ServiceStatus, CoordError> {
        let (reply, rx) = oneshot::channel();
        self.submit(Request::Status {
            input: input.into(),
            reply,
        })
        .await?;
        rx.await.map_err(|_| CoordError::Closed)?
    }

    /// Stops the coordinator loop.
    ///
    /// In-flight requests get [`CoordError::Closed`]; tracked workers are
    /// left to the external supervisor.
    pub fn shutdown(&self) {
        self.token.cancel();
    }

    /// Returns the configured instance name, if any.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    async fn submit(&self, req: Request) -> Result<(), CoordError> {
        self.tx
            .send(Msg::Request(req))
            .await
            .map_err(|_| CoordError::Closed)
    }

    /// Bridges the bus into the subscriber set until shutdown.
    fn fan_out(bus: &Bus, subscribers: Vec<Arc<dyn Subscribe>>, token: CancellationToken) {
        let set = SubscriberSet::new(subscribers);
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    ev = rx.recv() => match ev {
                        Ok(ev) => set.emit_arc(Arc::new(ev)),
                        Err(broadcast::error::RecvError::Closed) => break,
                        Err(broadcast::error::RecvError::Lagged(_)) => continue,
                    }
                }
            }
        });
    }
}
