//! Start a small service tree, poke at it, bring it down.
//!
//! The supervisor here runs every service as a tokio task that ticks until
//! cancelled; the coordinator only sees the `Supervise` contract.
//!
//! Run with: `cargo run --example start_stop --features logging`

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;

use depvisor::{
    Config, Coordinator, ExitReason, InstanceHandle, LogWriter, Service, ServiceRef, ServiceSpec,
    Spawn, SpecInput, Subscribe, Supervise, SuperviseError, Watch, WatchToken,
};

struct WorkerSlot {
    cancel: CancellationToken,
    exit: Option<oneshot::Sender<ExitReason>>,
}

/// Runs each service as a ticking tokio task.
#[derive(Default)]
struct TaskSupervisor {
    seq: AtomicU64,
    workers: Mutex<HashMap<u64, WorkerSlot>>,
}

#[async_trait]
impl Supervise for TaskSupervisor {
    async fn spawn(&self, spec: &ServiceSpec) -> Result<Spawn, SuperviseError> {
        let raw = self.seq.fetch_add(1, Ordering::Relaxed);
        let cancel = CancellationToken::new();
        let id = spec.id().to_string();
        let child = cancel.clone();

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = child.cancelled() => break,
                    _ = sleep(Duration::from_millis(400)) => {
                        println!("      ({id} is ticking)");
                    }
                }
            }
        });

        self.workers
            .lock()
            .unwrap()
            .insert(raw, WorkerSlot { cancel, exit: None });
        Ok(Spawn::Started(InstanceHandle::new(raw)))
    }

    async fn terminate(
        &self,
        handle: &InstanceHandle,
        cause: ExitReason,
    ) -> Result<(), SuperviseError> {
        let Some(mut slot) = self.workers.lock().unwrap().remove(&handle.raw()) else {
            return Err(SuperviseError::NotFound);
        };
        slot.cancel.cancel();
        if let Some(tx) = slot.exit.take() {
            let _ = tx.send(cause);
        }
        Ok(())
    }

    async fn watch(&self, handle: &InstanceHandle) -> Watch {
        let (tx, rx) = oneshot::channel();
        if let Some(slot) = self.workers.lock().unwrap().get_mut(&handle.raw()) {
            slot.exit = Some(tx);
        }
        Watch {
            token: WatchToken::new(handle.raw()),
            exit: rx,
        }
    }
}

struct Store;

impl Service for Store {
    fn id(&self) -> &str {
        "store"
    }
}

struct Journal;

impl Service for Journal {
    fn id(&self) -> &str {
        "journal"
    }
}

struct Api;

impl Service for Api {
    fn id(&self) -> &str {
        "api"
    }

    fn needs(&self) -> Vec<SpecInput> {
        vec![
            SpecInput::from(Arc::new(Store) as ServiceRef),
            SpecInput::from(Arc::new(Journal) as ServiceRef),
        ]
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = Config::default();
    cfg.supervisor = Some(Arc::new(TaskSupervisor::default()));

    let coord = Coordinator::spawn(cfg, vec![Arc::new(LogWriter) as Arc<dyn Subscribe>])?;

    println!("--- starting api (store and journal come up first)");
    coord.start(Arc::new(Api)).await?;
    sleep(Duration::from_millis(900)).await;

    for id in ["store", "journal", "api"] {
        let status = match id {
            "store" => coord.status(Arc::new(Store)).await?,
            "journal" => coord.status(Arc::new(Journal)).await?,
            _ => coord.status(Arc::new(Api)).await?,
        };
        println!("--- {id}: {status:?}");
    }

    println!("--- trying to stop the store while api still needs it");
    if let Err(e) = coord.stop(Arc::new(Store)).await {
        println!("--- refused: {e}");
    }

    println!("--- stopping api, then the leaves");
    coord.stop(Arc::new(Api)).await?;
    sleep(Duration::from_millis(100)).await;
    coord.stop(Arc::new(Store)).await?;
    coord.stop(Arc::new(Journal)).await?;
    sleep(Duration::from_millis(100)).await;

    coord.shutdown();
    Ok(())
}
