//! # Coordinator configuration.
//!
//! [`Config`] defines a coordinator instance's behavior: the external
//! supervisor to delegate to, the failure-propagation options, and the
//! channel capacities.
//!
//! # Example
//! ```
//! use depvisor::Config;
//!
//! let mut cfg = Config::default();
//! cfg.stop_dependents = true;
//! cfg.restart_dependents = true;
//! cfg.name = Some("primary".into());
//!
//! assert!(cfg.supervisor.is_none()); // must be set before spawn
//! ```

use std::fmt;
use std::sync::Arc;

use crate::supervise::Supervise;

/// Configuration for one coordinator instance.
#[derive(Clone)]
pub struct Config {
    /// External supervisor delegated to for spawns and terminations.
    ///
    /// Required; construction fails with `NoSupervisor` when absent.
    pub supervisor: Option<Arc<dyn Supervise>>,
    /// On any termination, proactively terminate all currently-running
    /// transitive dependents of the terminated spec.
    pub stop_dependents: bool,
    /// On an abnormal termination, re-start the terminated spec (its needs
    /// still stopped are re-established by the resolver).
    pub restart_dependents: bool,
    /// Optional logical name for multi-instance deployments.
    pub name: Option<String>,
    /// Capacity of the request/termination inbox.
    pub mailbox_capacity: usize,
    /// Capacity of the event bus channel.
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `supervisor = None` (must be set)
    /// - `stop_dependents = false`
    /// - `restart_dependents = false`
    /// - `name = None`
    /// - `mailbox_capacity = 64`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            supervisor: None,
            stop_dependents: false,
            restart_dependents: false,
            name: None,
            mailbox_capacity: 64,
            bus_capacity: 1024,
        }
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supervisor", &self.supervisor.is_some())
            .field("stop_dependents", &self.stop_dependents)
            .field("restart_dependents", &self.restart_dependents)
            .field("name", &self.name)
            .field("mailbox_capacity", &self.mailbox_capacity)
            .field("bus_capacity", &self.bus_capacity)
            .finish()
    }
}
