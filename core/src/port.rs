//! Ports - the contracts between a use case and its caller.
//!
//! An input port is the typed request; an output port is whatever channel the
//! caller supplies to receive results. Output ports opt into cross-cutting
//! concerns by implementing *capability ports*: narrow traits, one per
//! concern, that the matching gate looks for at invocation time. A port that
//! implements none of them flows straight through to the interactor.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

/// Marker for use-case request types.
///
/// A request declares, through its `InputPort` impls, which output-port
/// shapes it may be paired with. The usual form is one generic impl bounded
/// by the use case's own output contract:
///
/// ```rust,ignore
/// struct CreateProduct { name: String }
///
/// impl<O: CreateProductOutputPort> InputPort<O> for CreateProduct {}
/// ```
pub trait InputPort<O: ?Sized>: Send + Sync + 'static {}

/// Outcome of input or business-rule validation.
pub trait ValidationResult: Send + 'static {
    fn is_valid(&self) -> bool;
}

/// Outcome of an authorisation check.
pub trait AuthorisationResult: Send + 'static {
    fn is_authorised(&self) -> bool;
}

/// Capability port for use cases whose input must be validated.
#[async_trait]
pub trait ValidationOutputPort<R: ValidationResult>: Send + Sync {
    /// Presents a validation failure. Called at most once per invocation,
    /// in place of the interactor.
    async fn present_validation_failure(
        &self,
        result: R,
        token: &CancellationToken,
    ) -> anyhow::Result<()>;
}

/// Capability port for use cases guarded by business rules.
#[async_trait]
pub trait BusinessRuleOutputPort<R: ValidationResult>: Send + Sync {
    async fn present_business_rule_failure(
        &self,
        result: R,
        token: &CancellationToken,
    ) -> anyhow::Result<()>;
}

/// Capability port for use cases that require authorisation.
#[async_trait]
pub trait AuthorisationOutputPort<R: AuthorisationResult>: Send + Sync {
    async fn present_unauthorised(
        &self,
        result: R,
        token: &CancellationToken,
    ) -> anyhow::Result<()>;
}

/// Capability port for use cases that require an authenticated caller.
///
/// Authentication carries no result payload; the caller either is or is not
/// known.
#[async_trait]
pub trait AuthenticationOutputPort: Send + Sync {
    async fn present_unauthenticated(&self, token: &CancellationToken) -> anyhow::Result<()>;
}
