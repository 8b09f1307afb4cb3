//! # Spec normalization.
//!
//! [`SpecInput`] enumerates the three shapes a caller may hand the
//! coordinator; [`normalize`] canonicalizes any of them into a
//! [`ServiceSpec`] with defaults filled in.
//!
//! ## Rules
//! - A bare ref, a `(ref, arg)` pair and a pre-built spec that would start
//!   the same way all normalize to equal values.
//! - A structural spec with a blank id is rejected with `BadSpec`; the
//!   typed input shapes cannot otherwise be malformed.

use std::sync::Arc;

use crate::error::ResolveError;

use super::arg::Arg;
use super::service::{Service, ServiceRef};
use super::spec::ServiceSpec;

/// A service reference in one of the accepted input shapes.
#[derive(Clone)]
pub enum SpecInput {
    /// A bare service reference; starts with no arguments.
    Service(ServiceRef),
    /// A service reference with a single bound argument.
    WithArg(ServiceRef, Arg),
    /// A pre-built structural spec, passed through after validation.
    Spec(ServiceSpec),
}

impl std::fmt::Debug for SpecInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpecInput::Service(service) => {
                f.debug_tuple("Service").field(&service.id()).finish()
            }
            SpecInput::WithArg(service, arg) => f
                .debug_tuple("WithArg")
                .field(&service.id())
                .field(arg)
                .finish(),
            SpecInput::Spec(spec) => f.debug_tuple("Spec").field(spec).finish(),
        }
    }
}

impl From<ServiceRef> for SpecInput {
    fn from(service: ServiceRef) -> Self {
        SpecInput::Service(service)
    }
}

impl<S: Service> From<Arc<S>> for SpecInput {
    fn from(service: Arc<S>) -> Self {
        SpecInput::Service(service)
    }
}

impl From<(ServiceRef, Arg)> for SpecInput {
    fn from((service, arg): (ServiceRef, Arg)) -> Self {
        SpecInput::WithArg(service, arg)
    }
}

impl From<ServiceSpec> for SpecInput {
    fn from(spec: ServiceSpec) -> Self {
        SpecInput::Spec(spec)
    }
}

impl From<&ServiceSpec> for SpecInput {
    fn from(spec: &ServiceSpec) -> Self {
        SpecInput::Spec(spec.clone())
    }
}

/// Canonicalizes `input` into a [`ServiceSpec`].
///
/// Missing fields are filled with defaults so that two inputs denoting the
/// same service with the same arguments normalize to equal specs.
pub fn normalize(input: impl Into<SpecInput>) -> Result<ServiceSpec, ResolveError> {
    let spec = match input.into() {
        SpecInput::Service(service) => ServiceSpec::new(service),
        SpecInput::WithArg(service, arg) => ServiceSpec::new(service).with_arg(arg),
        SpecInput::Spec(spec) => spec,
    };
    if spec.id().trim().is_empty() {
        return Err(ResolveError::BadSpec {
            reason: "spec id is empty".to_string(),
        });
    }
    Ok(spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policies::RestartPolicy;
    use std::collections::HashSet;

    struct Probe;

    impl Service for Probe {
        fn id(&self) -> &str {
            "probe"
        }
    }

    fn probe() -> ServiceRef {
        Arc::new(Probe)
    }

    #[test]
    fn shapes_denoting_the_same_start_normalize_equal() {
        let bare = normalize(probe()).unwrap();
        let structural = normalize(ServiceSpec::new(probe())).unwrap();
        assert_eq!(bare, structural);

        let with_arg = normalize((probe(), Arg::Int(7))).unwrap();
        let structural_arg = normalize(ServiceSpec::new(probe()).with_arg(Arg::Int(7))).unwrap();
        assert_eq!(with_arg, structural_arg);
        assert_ne!(bare, with_arg);
    }

    #[test]
    fn defaults_are_filled() {
        let spec = normalize(probe()).unwrap();
        assert_eq!(spec.id(), "probe");
        assert!(spec.args().is_empty());
        assert_eq!(spec.restart(), RestartPolicy::Transient);
    }

    #[test]
    fn restart_policy_participates_in_identity() {
        let transient = normalize(probe()).unwrap();
        let temporary =
            normalize(ServiceSpec::new(probe()).with_restart(RestartPolicy::Temporary)).unwrap();
        assert_ne!(transient, temporary);
    }

    #[test]
    fn blank_id_is_rejected() {
        let input = ServiceSpec::new(probe()).with_id("  ");
        assert!(matches!(
            normalize(input),
            Err(ResolveError::BadSpec { .. })
        ));
    }

    #[test]
    fn specs_hash_by_content() {
        let mut set = HashSet::new();
        set.insert(normalize(probe()).unwrap());
        set.insert(normalize(ServiceSpec::new(probe())).unwrap());
        assert_eq!(set.len(), 1);

        set.insert(normalize((probe(), Arg::Text("a".into()))).unwrap());
        assert_eq!(set.len(), 2);
    }
}
