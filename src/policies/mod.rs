//! Per-spec execution policies.
//!
//! - [`RestartPolicy`] - whether a terminated spec may be restarted automatically

mod restart;

pub use restart::RestartPolicy;
