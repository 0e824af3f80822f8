//! Sluice facade crate.
//!
//! Re-exports the pipeline engine with a single entry point; depend on this
//! crate unless you need `sluice-core` directly.

pub use sluice_core::error;
pub use sluice_core::gates;
pub use sluice_core::interactor;
pub use sluice_core::invocation;
pub use sluice_core::port;
pub use sluice_core::registry;
pub use sluice_core::strategy;

pub use sluice_core::{
    AuthenticationGate, AuthenticationOutputPort, AuthenticationVerifier, AuthorisationEnforcer,
    AuthorisationGate, AuthorisationOutputPort, AuthorisationResult, BusinessRuleGate,
    BusinessRuleOutputPort, BusinessRuleValidator, CancellationToken, InputPort, Interactor,
    InteractorStage, Invocation, Next, PipelineError, PipelineResult, PortTypes, ServiceHandle,
    ServiceKey, ServiceRegistry, ServiceResolver, Sluice, SluiceBuilder, Stage, UseCaseBinder,
    ValidationGate, ValidationOutputPort, ValidationResult, Validator,
};

pub mod prelude {
    pub use sluice_core::prelude::*;
}
