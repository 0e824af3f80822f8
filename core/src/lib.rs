//! Sluice core - a use-case pipeline engine.
//!
//! A sluice is a channel whose flow is controlled by gates. Here the channel
//! carries one business request toward its interactor, and each gate is a
//! cross-cutting concern - authentication, authorisation, input validation,
//! business rules - that may stop the flow and present a failure instead.
//!
//! The moving parts:
//!
//! * **Ports** ([`port`]): the typed request ([`InputPort`]) and the
//!   capability ports an output channel implements to opt into gates.
//! * **Strategies** ([`strategy`]): the pluggable logic gates invoke -
//!   validators, enforcers, verifiers, and the interactor itself.
//! * **Registry** ([`registry`]): pre-bound adapters keyed by capability and
//!   concrete port pair; the only lookup the chain performs at run time.
//! * **Chain** ([`invocation`], [`gates`], [`interactor`], [`sluice`]): the
//!   composed stages and the continuation that threads one invocation
//!   through them.
//!
//! Gates degrade to no-ops when nothing is bound for an invocation's port
//! pair. That keeps partially wired environments runnable, and it is
//! fail-open: an unregistered gate does not block anything. See the
//! [`registry`] docs before relying on it.

pub mod error;
pub mod gates;
pub mod interactor;
pub mod invocation;
pub mod port;
pub mod registry;
pub mod sluice;
pub mod strategy;

mod binding;

pub use error::{PipelineError, PipelineResult};
pub use gates::{AuthenticationGate, AuthorisationGate, BusinessRuleGate, ValidationGate};
pub use interactor::InteractorStage;
pub use invocation::{Invocation, Next, PortTypes, Stage};
pub use port::{
    AuthenticationOutputPort, AuthorisationOutputPort, AuthorisationResult,
    BusinessRuleOutputPort, InputPort, ValidationOutputPort, ValidationResult,
};
pub use registry::{ServiceHandle, ServiceKey, ServiceRegistry, ServiceResolver, UseCaseBinder};
pub use sluice::{Sluice, SluiceBuilder};
pub use strategy::{
    AuthenticationVerifier, AuthorisationEnforcer, BusinessRuleValidator, Interactor, Validator,
};

// Re-exported so downstream crates need no direct tokio-util dependency.
pub use tokio_util::sync::CancellationToken;

pub mod prelude {
    pub use crate::error::{PipelineError, PipelineResult};
    pub use crate::invocation::{Invocation, Next, Stage};
    pub use crate::port::{
        AuthenticationOutputPort, AuthorisationOutputPort, AuthorisationResult,
        BusinessRuleOutputPort, InputPort, ValidationOutputPort, ValidationResult,
    };
    pub use crate::registry::{ServiceRegistry, ServiceResolver};
    pub use crate::sluice::Sluice;
    pub use crate::strategy::{
        AuthenticationVerifier, AuthorisationEnforcer, BusinessRuleValidator, Interactor,
        Validator,
    };
    pub use tokio_util::sync::CancellationToken;
}
