//! # Coordinator core: the single-task state machine.
//!
//! One logical task owns the registry and drains one inbox of caller
//! requests and termination events. Everything externally visible is
//! serialized here; the only suspension points are the supervisor's
//! spawn/terminate/probe calls and the inbox itself.
//!
//! ## Architecture
//! ```text
//! Coordinator handle ──► Msg::Request ──┐
//!                                       ├──► Core::run() ──► registry
//! watch forwarders  ──► Msg::Exited  ───┘         │
//!                                                 ├──► resolve (needs / dependents)
//!                                                 ├──► supervisor (spawn / terminate / probe)
//!                                                 └──► bus (lifecycle events)
//! ```
//!
//! ## Rules
//! - Requests are processed in arrival order; the reply to request *i* is
//!   sent before request *i+1* begins.
//! - A termination event's synchronous portion (cascade terminates and
//!   registry removal) completes before the next message is consumed.
//! - Within one start, each spawn's success is observed before the next
//!   spawn is issued.
//! - No rollback: prerequisites started before a spawn failure stay up;
//!   they are legitimately needed and other callers may depend on them.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::error::CoordError;
use crate::events::{Bus, Event, EventKind};
use crate::resolve;
use crate::spec::{normalize, ServiceSpec, SpecInput};
use crate::supervise::{
    ExitReason, InstanceHandle, Liveness, Spawn, Supervise, Termination, Watch,
};

use super::msg::{Msg, Request, ServiceStatus};
use super::propagate;
use super::registry::Registry;

/// The coordinator's private state, owned by its loop task.
pub(crate) struct Core {
    cfg: Config,
    supervisor: Arc<dyn Supervise>,
    registry: Registry,
    bus: Bus,
    /// Sender half of the own inbox, cloned into watch forwarders.
    tx: mpsc::Sender<Msg>,
    rx: mpsc::Receiver<Msg>,
    token: CancellationToken,
}

impl Core {
    pub fn new(
        cfg: Config,
        supervisor: Arc<dyn Supervise>,
        bus: Bus,
        tx: mpsc::Sender<Msg>,
        rx: mpsc::Receiver<Msg>,
        token: CancellationToken,
    ) -> Self {
        Self {
            cfg,
            supervisor,
            registry: Registry::new(),
            bus,
            tx,
            rx,
            token,
        }
    }

    /// Runs until the token is cancelled.
    ///
    /// The loop never ends on an empty inbox: the core holds a sender
    /// clone for watch forwarders, so `recv` cannot observe a closed
    /// channel while the core is alive.
    pub async fn run(mut self) {
        loop {
            tokio::select! {
                _ = self.token.cancelled() => break,
                msg = self.rx.recv() => match msg {
                    Some(Msg::Request(req)) => self.on_request(req).await,
                    Some(Msg::Exited(term)) => self.on_exited(term).await,
                    None => break,
                },
            }
        }
    }

    async fn on_request(&mut self, req: Request) {
        match req {
            Request::Start { input, reply } => {
                let _ = reply.send(self.start(input).await);
            }
            Request::Stop { input, reply } => {
                let _ = reply.send(self.stop(input).await);
            }
            Request::CanStop { input, reply } => {
                let _ = reply.send(self.can_stop(input));
            }
            Request::Lookup { input, reply } => {
                let _ = reply.send(self.lookup(input));
            }
            Request::Status { input, reply } => {
                let _ = reply.send(self.status(input).await);
            }
        }
    }

    // ---------------------------
    // Requests
    // ---------------------------

    async fn start(&mut self, input: SpecInput) -> Result<Option<InstanceHandle>, CoordError> {
        let spec = normalize(input)?;
        self.start_spec(spec).await
    }

    /// Starts `spec` after everything it needs, skipping running specs.
    ///
    /// Returns the handle of the last-started spec, or `None` when every
    /// dependency was already running and no spawn was issued.
    async fn start_spec(
        &mut self,
        spec: ServiceSpec,
    ) -> Result<Option<InstanceHandle>, CoordError> {
        let order = resolve::dependencies(&spec)?;
        let mut last = None;

        for dep in order {
            if self.registry.contains(&dep) {
                continue;
            }
            self.publish(Event::now(EventKind::ServiceStarting).with_service(dep.id()));

            match self.supervisor.spawn(&dep).await {
                Ok(Spawn::Started(handle)) => {
                    let watch = self.supervisor.watch(&handle).await;
                    self.registry.insert(dep.clone(), handle.clone(), watch.token);
                    self.forward_exit(watch);
                    self.publish(Event::now(EventKind::ServiceStarted).with_service(dep.id()));
                    last = Some(handle);
                }
                Ok(Spawn::Ignored) => {
                    self.publish(Event::now(EventKind::SpawnIgnored).with_service(dep.id()));
                }
                Err(e) => {
                    self.publish(
                        Event::now(EventKind::StartFailed)
                            .with_service(dep.id())
                            .with_error(e.to_string()),
                    );
                    return Err(CoordError::Supervisor(e));
                }
            }
        }
        Ok(last)
    }

    async fn stop(&mut self, input: SpecInput) -> Result<(), CoordError> {
        let spec = normalize(input)?;
        if !self.registry.contains(&spec) {
            return Err(CoordError::NotFound {
                id: spec.id().to_string(),
            });
        }
        if self.needed_by_running(&spec)? {
            return Err(CoordError::Needed {
                id: spec.id().to_string(),
            });
        }
        let Some(handle) = self.registry.handle_of(&spec) else {
            return Err(CoordError::NotFound {
                id: spec.id().to_string(),
            });
        };
        // Registry entry stays until the termination event is processed.
        self.supervisor
            .terminate(handle, ExitReason::Shutdown)
            .await?;
        self.publish(Event::now(EventKind::ServiceStopping).with_service(spec.id()));
        Ok(())
    }

    fn can_stop(&mut self, input: SpecInput) -> Result<bool, CoordError> {
        let spec = normalize(input)?;
        Ok(self.registry.contains(&spec) && !self.needed_by_running(&spec)?)
    }

    fn lookup(&mut self, input: SpecInput) -> Result<Option<InstanceHandle>, CoordError> {
        let spec = normalize(input)?;
        Ok(self.registry.handle_of(&spec).cloned())
    }

    async fn status(&mut self, input: SpecInput) -> Result<ServiceStatus, CoordError> {
        let spec = normalize(input)?;
        let Some(handle) = self.registry.handle_of(&spec) else {
            return Ok(ServiceStatus::Stopped);
        };
        Ok(match self.supervisor.probe(handle).await {
            Liveness::Alive => ServiceStatus::Running,
            Liveness::WindingDown => ServiceStatus::Exiting,
            // Not yet reconciled; the pending termination event will be.
            Liveness::Gone => ServiceStatus::Stopped,
        })
    }

    /// True when another running spec lists `spec` in its direct needs.
    fn needed_by_running(&self, spec: &ServiceSpec) -> Result<bool, CoordError> {
        let universe = self.registry.specs();
        let blockers = resolve::direct_needed_by(spec, &universe)?;
        Ok(blockers.iter().any(|b| b != spec))
    }

    // ---------------------------
    // Termination events
    // ---------------------------

    async fn on_exited(&mut self, term: Termination) {
        let Some(spec) = self.registry.spec_of(&term.token).cloned() else {
            // Unknown token: the entry was already replaced or removed.
            return;
        };

        // Dependents are computed while the spec is still registered.
        let universe = self.registry.specs();
        let (cascade, restart) = match propagate::plan(&spec, &term.reason, &self.cfg, &universe) {
            Ok(p) => (p.cascade, p.restart),
            Err(e) => {
                self.publish(
                    Event::now(EventKind::CascadeAborted)
                        .with_service(spec.id())
                        .with_error(e.to_string()),
                );
                (
                    Vec::new(),
                    propagate::should_restart(&spec, &term.reason, &self.cfg),
                )
            }
        };

        for dep in &cascade {
            if let Some(handle) = self.registry.handle_of(dep) {
                self.publish(
                    Event::now(EventKind::CascadeStopping)
                        .with_service(dep.id())
                        .with_reason(term.reason.to_string()),
                );
                // Already-gone handles are fine; their own termination
                // events reconcile the registry.
                let _ = self
                    .supervisor
                    .terminate(handle, term.reason.clone())
                    .await;
            }
        }

        self.registry.remove_by_token(&term.token);
        self.publish(
            Event::now(EventKind::ServiceExited)
                .with_service(spec.id())
                .with_reason(term.reason.to_string()),
        );

        if restart {
            self.publish(
                Event::now(EventKind::RestartRequested)
                    .with_service(spec.id())
                    .with_reason(term.reason.to_string()),
            );
            if let Err(e) = self.start_spec(spec.clone()).await {
                self.publish(
                    Event::now(EventKind::RestartFailed)
                        .with_service(spec.id())
                        .with_error(e.to_string()),
                );
            }
        }
    }

    /// Relays a one-shot watch into the inbox as `Msg::Exited`.
    fn forward_exit(&self, watch: Watch) {
        let tx = self.tx.clone();
        let Watch { token, exit } = watch;
        tokio::spawn(async move {
            let reason = match exit.await {
                Ok(reason) => reason,
                // Sender dropped without a report: the watch is lost, not
                // the worker's own exit.
                Err(_) => ExitReason::Other("watch_lost".to_string()),
            };
            let _ = tx.send(Msg::Exited(Termination { token, reason })).await;
        });
    }

    fn publish(&self, ev: Event) {
        self.bus.publish(ev);
    }
}
