//! Strategies - the pluggable logic a pipeline resolves per use case.
//!
//! Strategies are external collaborators: the engine never implements one,
//! it only resolves and invokes them. Each strategy receives the request and
//! the invocation's cancellation token and is expected to observe the token
//! during any long-running work.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::port::{AuthorisationResult, ValidationResult};

/// Validates the shape of a request (required fields, ranges, formats).
#[async_trait]
pub trait Validator<I, R>: Send + Sync
where
    R: ValidationResult,
{
    async fn validate(&self, input: &I, token: &CancellationToken) -> anyhow::Result<R>;
}

/// Validates a request against domain rules that need more context than the
/// request itself (uniqueness, stock levels, state machines).
#[async_trait]
pub trait BusinessRuleValidator<I, R>: Send + Sync
where
    R: ValidationResult,
{
    async fn validate(&self, input: &I, token: &CancellationToken) -> anyhow::Result<R>;
}

/// Decides whether the caller may run a use case at all.
#[async_trait]
pub trait AuthorisationEnforcer<I, R>: Send + Sync
where
    R: AuthorisationResult,
{
    async fn check_authorisation(
        &self,
        input: &I,
        token: &CancellationToken,
    ) -> anyhow::Result<R>;
}

/// Establishes whether the request comes from a known caller.
#[async_trait]
pub trait AuthenticationVerifier<I>: Send + Sync {
    /// Returns `true` when the caller is authenticated.
    async fn authenticate(&self, input: &I, token: &CancellationToken) -> anyhow::Result<bool>;
}

/// The use case's own logic. Runs only when every gate ahead of it chose to
/// continue, and presents its result through the output port directly.
#[async_trait]
pub trait Interactor<I, O>: Send + Sync {
    async fn handle(&self, input: &I, output: &O, token: &CancellationToken)
        -> anyhow::Result<()>;
}
