//! Coordinator: serialized lifecycle orchestration.
//!
//! The only public API re-exported from here is [`Coordinator`] (plus the
//! [`ServiceStatus`] it reports). Everything else is an internal building
//! block the handle wires together.
//!
//! ## Files & responsibilities
//! - **handle.rs**: public facade; spawns the loop, wires the subscriber
//!   fan-out, submits requests through per-request reply channels.
//! - **core.rs**: the single-task state machine; sole owner and mutator of
//!   the registry; start/stop/can_stop/lookup/status handlers plus
//!   termination-event handling.
//! - **registry.rs**: spec ↔ instance maps with the token inverse index.
//! - **propagate.rs**: pure per-termination planning (cascade + restart).
//! - **msg.rs**: inbox message and request/reply types.
//!
//! ## Wiring (module-level flow)
//! ```text
//! caller ──► Coordinator::start(spec)
//!              └─ Msg::Request ──► Core::run()
//!                                    ├─ normalize(spec)
//!                                    ├─ resolve::dependencies(spec)
//!                                    ├─ per missing dep: supervisor.spawn
//!                                    │    ├─ registry.insert + watch
//!                                    │    └─ forwarder: watch.exit ──► Msg::Exited
//!                                    └─ reply(last handle)
//!
//! supervisor ──► watch fires ──► Msg::Exited ──► Core::on_exited()
//!                                  ├─ propagate::plan (before removal)
//!                                  ├─ cascade terminates (deepest first,
//!                                  │   original reason as cause)
//!                                  ├─ registry.remove_by_token
//!                                  └─ optional restart via the start path
//! ```

mod core;
mod handle;
mod msg;
mod propagate;
mod registry;

pub use handle::Coordinator;
pub use msg::ServiceStatus;
