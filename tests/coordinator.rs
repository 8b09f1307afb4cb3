//! End-to-end coordinator tests against a scripted in-memory supervisor.
//!
//! The mock records spawn/terminate order, delivers exit reasons through
//! the watch channels, and lets tests kill instances externally.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::oneshot;
use tokio::time::sleep;

use depvisor::{
    normalize, Config, CoordError, Coordinator, ExitReason, InstanceHandle, Liveness,
    RestartPolicy, Service, ServiceRef, ServiceSpec, ServiceStatus, Spawn, SpecInput, Supervise,
    SuperviseError, Watch, WatchToken,
};

// ---------------------------
// Mock supervisor
// ---------------------------

struct Worker {
    id: String,
    exit: Option<oneshot::Sender<ExitReason>>,
}

#[derive(Default)]
struct MockState {
    workers: HashMap<u64, Worker>,
    spawned: Vec<String>,
    terminated: Vec<(String, ExitReason)>,
    refuse: Vec<String>,
    ignore: Vec<String>,
}

#[derive(Default)]
struct MockSupervisor {
    seq: AtomicU64,
    state: Mutex<MockState>,
}

impl MockSupervisor {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn refuse(&self, id: &str) {
        self.state.lock().unwrap().refuse.push(id.to_string());
    }

    fn ignore(&self, id: &str) {
        self.state.lock().unwrap().ignore.push(id.to_string());
    }

    fn spawned(&self) -> Vec<String> {
        self.state.lock().unwrap().spawned.clone()
    }

    fn spawn_count(&self, id: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .spawned
            .iter()
            .filter(|s| s.as_str() == id)
            .count()
    }

    fn terminated(&self) -> Vec<(String, ExitReason)> {
        self.state.lock().unwrap().terminated.clone()
    }

    fn terminated_ids(&self) -> Vec<String> {
        self.terminated().into_iter().map(|(id, _)| id).collect()
    }

    fn alive_count(&self) -> usize {
        self.state.lock().unwrap().workers.len()
    }

    /// Kills a live instance from outside the coordinator, as a crashing
    /// worker would.
    fn kill(&self, id: &str, reason: ExitReason) {
        let mut st = self.state.lock().unwrap();
        let raw = st
            .workers
            .iter()
            .find(|(_, w)| w.id == id)
            .map(|(raw, _)| *raw);
        let raw = raw.unwrap_or_else(|| panic!("no live instance for '{id}'"));
        let mut worker = st.workers.remove(&raw).unwrap();
        if let Some(tx) = worker.exit.take() {
            let _ = tx.send(reason);
        }
    }
}

#[async_trait]
impl Supervise for MockSupervisor {
    async fn spawn(&self, spec: &ServiceSpec) -> Result<Spawn, SuperviseError> {
        let mut st = self.state.lock().unwrap();
        if st.refuse.iter().any(|r| r == spec.id()) {
            return Err(SuperviseError::Failed {
                reason: format!("refused '{}'", spec.id()),
            });
        }
        if st.ignore.iter().any(|r| r == spec.id()) {
            return Ok(Spawn::Ignored);
        }
        let raw = self.seq.fetch_add(1, Ordering::Relaxed);
        st.workers.insert(
            raw,
            Worker {
                id: spec.id().to_string(),
                exit: None,
            },
        );
        st.spawned.push(spec.id().to_string());
        Ok(Spawn::Started(InstanceHandle::new(raw)))
    }

    async fn terminate(
        &self,
        handle: &InstanceHandle,
        cause: ExitReason,
    ) -> Result<(), SuperviseError> {
        let mut st = self.state.lock().unwrap();
        let Some(mut worker) = st.workers.remove(&handle.raw()) else {
            return Err(SuperviseError::NotFound);
        };
        st.terminated.push((worker.id.clone(), cause.clone()));
        if let Some(tx) = worker.exit.take() {
            let _ = tx.send(cause);
        }
        Ok(())
    }

    async fn watch(&self, handle: &InstanceHandle) -> Watch {
        let (tx, rx) = oneshot::channel();
        let mut st = self.state.lock().unwrap();
        if let Some(worker) = st.workers.get_mut(&handle.raw()) {
            worker.exit = Some(tx);
        }
        Watch {
            token: WatchToken::new(handle.raw()),
            exit: rx,
        }
    }

    async fn probe(&self, handle: &InstanceHandle) -> Liveness {
        if self
            .state
            .lock()
            .unwrap()
            .workers
            .contains_key(&handle.raw())
        {
            Liveness::Alive
        } else {
            Liveness::Gone
        }
    }
}

// ---------------------------
// Test services
// ---------------------------

type Edges = Arc<HashMap<&'static str, Vec<&'static str>>>;

/// Service resolving its needs from a shared edge table.
struct GraphService {
    id: String,
    edges: Edges,
}

impl Service for GraphService {
    fn id(&self) -> &str {
        &self.id
    }

    fn needs(&self) -> Vec<SpecInput> {
        self.edges
            .get(self.id.as_str())
            .into_iter()
            .flatten()
            .map(|child| {
                SpecInput::from(Arc::new(GraphService {
                    id: child.to_string(),
                    edges: Arc::clone(&self.edges),
                }) as ServiceRef)
            })
            .collect()
    }
}

/// loop → {sequence, log}, both leaves.
fn loop_edges() -> Edges {
    let mut m = HashMap::new();
    m.insert("loop", vec!["sequence", "log"]);
    m.insert("sequence", vec![]);
    m.insert("log", vec![]);
    Arc::new(m)
}

fn spec(edges: &Edges, id: &str) -> ServiceSpec {
    normalize(Arc::new(GraphService {
        id: id.to_string(),
        edges: Arc::clone(edges),
    }) as ServiceRef)
    .unwrap()
}

fn coordinator(
    mock: &Arc<MockSupervisor>,
    stop_dependents: bool,
    restart_dependents: bool,
) -> Coordinator {
    let mut cfg = Config::default();
    cfg.supervisor = Some(Arc::clone(mock) as Arc<dyn Supervise>);
    cfg.stop_dependents = stop_dependents;
    cfg.restart_dependents = restart_dependents;
    Coordinator::spawn(cfg, Vec::new()).unwrap()
}

async fn wait_status(coord: &Coordinator, spec: &ServiceSpec, want: ServiceStatus) {
    for _ in 0..400 {
        if coord.status(spec).await.unwrap() == want {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("service '{}' never reached {:?}", spec.id(), want);
}

/// Waits until the registry entry is gone, not just until the probe says so.
async fn wait_untracked(coord: &Coordinator, spec: &ServiceSpec) {
    for _ in 0..400 {
        if coord.lookup(spec).await.unwrap().is_none() {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!("service '{}' never left the registry", spec.id());
}

async fn wait_spawns(mock: &MockSupervisor, id: &str, at_least: usize) {
    for _ in 0..400 {
        if mock.spawn_count(id) >= at_least {
            return;
        }
        sleep(Duration::from_millis(5)).await;
    }
    panic!(
        "'{id}' was spawned {} times, expected at least {at_least}",
        mock.spawn_count(id)
    );
}

// ---------------------------
// Start / stop
// ---------------------------

#[tokio::test]
async fn start_spawns_needs_first_then_the_target() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, false);

    let last = coord.start(spec(&edges, "loop")).await.unwrap();
    assert!(last.is_some());
    assert_eq!(mock.spawned(), ["sequence", "log", "loop"]);

    for id in ["sequence", "log", "loop"] {
        assert_eq!(
            coord.status(spec(&edges, id)).await.unwrap(),
            ServiceStatus::Running
        );
    }
}

#[tokio::test]
async fn stop_is_refused_while_a_dependent_is_running() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, false);
    coord.start(spec(&edges, "loop")).await.unwrap();

    assert!(matches!(
        coord.stop(spec(&edges, "log")).await,
        Err(CoordError::Needed { .. })
    ));
    assert!(!coord.can_stop(spec(&edges, "log")).await.unwrap());
    assert!(coord.can_stop(spec(&edges, "loop")).await.unwrap());

    coord.stop(spec(&edges, "loop")).await.unwrap();
    wait_untracked(&coord, &spec(&edges, "loop")).await;

    // Needs outlive their dependent; no terminate was issued for them.
    assert_eq!(
        coord.status(spec(&edges, "sequence")).await.unwrap(),
        ServiceStatus::Running
    );
    assert_eq!(
        coord.status(spec(&edges, "log")).await.unwrap(),
        ServiceStatus::Running
    );
    assert_eq!(mock.terminated_ids(), ["loop"]);

    // With loop gone, the leaves become stoppable.
    assert!(coord.can_stop(spec(&edges, "log")).await.unwrap());
}

#[tokio::test]
async fn start_is_idempotent_for_running_specs() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, false);

    coord.start(spec(&edges, "loop")).await.unwrap();
    let again = coord.start(spec(&edges, "loop")).await.unwrap();

    assert!(again.is_none());
    assert_eq!(mock.spawned().len(), 3);
}

#[tokio::test]
async fn starting_a_dependent_reuses_running_needs() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, false);

    coord.start(spec(&edges, "log")).await.unwrap();
    coord.start(spec(&edges, "loop")).await.unwrap();

    assert_eq!(mock.spawned(), ["log", "sequence", "loop"]);
}

#[tokio::test]
async fn spawn_failure_halts_the_sequence_without_rollback() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    mock.refuse("log");
    let coord = coordinator(&mock, false, false);

    let err = coord.start(spec(&edges, "loop")).await.unwrap_err();
    assert!(matches!(
        err,
        CoordError::Supervisor(SuperviseError::Failed { .. })
    ));

    assert_eq!(mock.spawned(), ["sequence"]);
    assert_eq!(
        coord.status(spec(&edges, "sequence")).await.unwrap(),
        ServiceStatus::Running
    );
    assert_eq!(
        coord.status(spec(&edges, "loop")).await.unwrap(),
        ServiceStatus::Stopped
    );
}

#[tokio::test]
async fn ignored_spawns_are_skipped_and_not_recorded() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    mock.ignore("log");
    let coord = coordinator(&mock, false, false);

    let last = coord.start(spec(&edges, "loop")).await.unwrap();
    assert!(last.is_some());
    assert_eq!(mock.spawned(), ["sequence", "loop"]);
    assert_eq!(coord.lookup(spec(&edges, "log")).await.unwrap(), None);
}

#[tokio::test]
async fn stopping_everything_drains_the_registry_exactly_once() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, false);
    coord.start(spec(&edges, "loop")).await.unwrap();

    let ids = ["loop", "sequence", "log"];
    loop {
        let mut progressed = false;
        let mut remaining = 0;
        for id in ids {
            let s = spec(&edges, id);
            if coord.lookup(&s).await.unwrap().is_none() {
                continue;
            }
            remaining += 1;
            if coord.can_stop(&s).await.unwrap() {
                coord.stop(&s).await.unwrap();
                wait_untracked(&coord, &s).await;
                progressed = true;
            }
        }
        if remaining == 0 {
            break;
        }
        assert!(progressed, "live specs left but none stoppable");
    }

    assert_eq!(mock.alive_count(), 0);
    let mut terminated = mock.terminated_ids();
    terminated.sort();
    assert_eq!(terminated, ["log", "loop", "sequence"]);
}

#[tokio::test]
async fn stop_of_an_unknown_spec_is_not_found() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, false);

    assert!(matches!(
        coord.stop(spec(&edges, "loop")).await,
        Err(CoordError::NotFound { .. })
    ));
}

#[tokio::test]
async fn cyclic_graphs_fail_the_start() {
    let mut m = HashMap::new();
    m.insert("f", vec!["g"]);
    m.insert("g", vec!["f"]);
    let edges: Edges = Arc::new(m);

    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, false);

    assert!(matches!(
        coord.start(spec(&edges, "f")).await,
        Err(CoordError::CyclicDependency { .. })
    ));
    assert!(mock.spawned().is_empty());
}

#[tokio::test]
async fn construction_without_a_supervisor_fails() {
    let res = Coordinator::spawn(Config::default(), Vec::new());
    assert!(matches!(res, Err(CoordError::NoSupervisor)));
}

// ---------------------------
// Failure propagation
// ---------------------------

#[tokio::test]
async fn cascade_stops_dependents_with_the_original_reason() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, true, false);
    coord.start(spec(&edges, "loop")).await.unwrap();

    mock.kill("log", ExitReason::Other("killed".to_string()));

    wait_untracked(&coord, &spec(&edges, "log")).await;
    wait_untracked(&coord, &spec(&edges, "loop")).await;
    assert_eq!(
        coord.status(spec(&edges, "sequence")).await.unwrap(),
        ServiceStatus::Running
    );

    // The dependent was brought down with the dead spec's own reason.
    assert_eq!(
        mock.terminated(),
        [("loop".to_string(), ExitReason::Other("killed".to_string()))]
    );
}

#[tokio::test]
async fn abnormal_exits_restart_the_whole_chain() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, true, true);
    coord.start(spec(&edges, "loop")).await.unwrap();

    mock.kill("log", ExitReason::Other("killed".to_string()));

    wait_spawns(&mock, "log", 2).await;
    wait_spawns(&mock, "loop", 2).await;
    for id in ["sequence", "log", "loop"] {
        wait_status(&coord, &spec(&edges, id), ServiceStatus::Running).await;
    }

    // The untouched leaf was never respawned.
    assert_eq!(mock.spawn_count("sequence"), 1);
}

#[tokio::test]
async fn normal_exits_do_not_restart_anything() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, true);
    coord.start(spec(&edges, "loop")).await.unwrap();

    mock.kill("sequence", ExitReason::Normal);
    wait_untracked(&coord, &spec(&edges, "sequence")).await;
    sleep(Duration::from_millis(50)).await;

    assert_eq!(mock.spawn_count("sequence"), 1);
    assert_eq!(
        coord.status(spec(&edges, "loop")).await.unwrap(),
        ServiceStatus::Running
    );
    assert_eq!(
        coord.status(spec(&edges, "log")).await.unwrap(),
        ServiceStatus::Running
    );
}

#[tokio::test]
async fn temporary_specs_are_never_restarted() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, true);

    let tmp = ServiceSpec::new(Arc::new(GraphService {
        id: "tmp".to_string(),
        edges: Arc::clone(&edges),
    }) as ServiceRef)
    .with_restart(RestartPolicy::Temporary);

    coord.start(tmp.clone()).await.unwrap();
    mock.kill("tmp", ExitReason::Other("boom".to_string()));
    wait_untracked(&coord, &tmp).await;
    sleep(Duration::from_millis(50)).await;

    assert_eq!(mock.spawn_count("tmp"), 1);
}

#[tokio::test]
async fn graceful_stops_do_not_trigger_restarts() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, true);
    coord.start(spec(&edges, "loop")).await.unwrap();

    coord.stop(spec(&edges, "loop")).await.unwrap();
    wait_untracked(&coord, &spec(&edges, "loop")).await;
    sleep(Duration::from_millis(50)).await;

    assert_eq!(mock.spawn_count("loop"), 1);
    assert_eq!(
        mock.terminated(),
        [("loop".to_string(), ExitReason::Shutdown)]
    );
}

// ---------------------------
// Handle misc
// ---------------------------

#[tokio::test]
async fn shutdown_closes_the_loop() {
    let edges = loop_edges();
    let mock = MockSupervisor::new();
    let coord = coordinator(&mock, false, false);

    coord.shutdown();
    sleep(Duration::from_millis(20)).await;

    assert!(matches!(
        coord.start(spec(&edges, "loop")).await,
        Err(CoordError::Closed)
    ));
}

#[tokio::test]
async fn the_instance_name_is_exposed() {
    let mock = MockSupervisor::new();
    let mut cfg = Config::default();
    cfg.supervisor = Some(Arc::clone(&mock) as Arc<dyn Supervise>);
    cfg.name = Some("primary".to_string());

    let coord = Coordinator::spawn(cfg, Vec::new()).unwrap();
    assert_eq!(coord.name(), Some("primary"));
}
