//! Gate stages - one policy variant per cross-cutting concern.
//!
//! All four gates follow the same sequence: synthesize the service key from
//! their capability and the invocation's port pair, resolve it, and either
//! pass through (nothing bound - the gate is inert for this use case) or let
//! the pre-bound adapter run its strategy and decide. A failing strategy
//! presents through the capability port and stops the chain; the interactor
//! and every later gate never run.
//!
//! Gates hold no state: the type parameter pins the result type the gate
//! serves, which is what distinguishes two validation gates in one process.

use std::marker::PhantomData;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::binding::{GateBinding, Verdict};
use crate::error::PipelineResult;
use crate::invocation::{Invocation, Next, Stage};
use crate::port::{
    AuthenticationOutputPort, AuthorisationOutputPort, AuthorisationResult,
    BusinessRuleOutputPort, ValidationOutputPort, ValidationResult,
};
use crate::registry::{ServiceKey, ServiceResolver};

async fn run_gate(
    gate: &'static str,
    key: ServiceKey,
    invocation: &Invocation<'_>,
    resolver: &dyn ServiceResolver,
    next: Next<'_>,
    token: &CancellationToken,
) -> PipelineResult<()> {
    let Some(handle) = resolver.resolve(&key) else {
        tracing::trace!(gate, %key, "no binding for this port pair, gate inert");
        return next.proceed(token).await;
    };
    let Ok(binding) = handle.downcast::<GateBinding>() else {
        tracing::warn!(gate, %key, "resolved service is not a gate binding, treating as absent");
        return next.proceed(token).await;
    };
    match binding.evaluate(invocation, token).await? {
        Verdict::Pass => next.proceed(token).await,
        Verdict::Intercept => {
            tracing::debug!(gate, %key, "gate intercepted the invocation");
            Ok(())
        }
    }
}

/// Stops unauthenticated callers before anything else runs.
#[derive(Debug, Default)]
pub struct AuthenticationGate {
    _private: (),
}

impl AuthenticationGate {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Stage for AuthenticationGate {
    async fn handle(
        &self,
        invocation: &Invocation<'_>,
        resolver: &dyn ServiceResolver,
        next: Next<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()> {
        let key = ServiceKey::capability::<dyn AuthenticationOutputPort>(invocation.ports());
        run_gate("authentication", key, invocation, resolver, next, token).await
    }
}

/// Runs the authorisation enforcer bound to the invocation's port pair and
/// presents `R` on refusal.
#[derive(Debug)]
pub struct AuthorisationGate<R> {
    _result: PhantomData<fn() -> R>,
}

impl<R> AuthorisationGate<R> {
    pub fn new() -> Self {
        Self {
            _result: PhantomData,
        }
    }
}

impl<R> Default for AuthorisationGate<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: AuthorisationResult> Stage for AuthorisationGate<R> {
    async fn handle(
        &self,
        invocation: &Invocation<'_>,
        resolver: &dyn ServiceResolver,
        next: Next<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()> {
        let key = ServiceKey::capability::<dyn AuthorisationOutputPort<R>>(invocation.ports());
        run_gate("authorisation", key, invocation, resolver, next, token).await
    }
}

/// Runs the input-port validator bound to the invocation's port pair and
/// presents `R` when the input is malformed.
#[derive(Debug)]
pub struct ValidationGate<R> {
    _result: PhantomData<fn() -> R>,
}

impl<R> ValidationGate<R> {
    pub fn new() -> Self {
        Self {
            _result: PhantomData,
        }
    }
}

impl<R> Default for ValidationGate<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: ValidationResult> Stage for ValidationGate<R> {
    async fn handle(
        &self,
        invocation: &Invocation<'_>,
        resolver: &dyn ServiceResolver,
        next: Next<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()> {
        let key = ServiceKey::capability::<dyn ValidationOutputPort<R>>(invocation.ports());
        run_gate("validation", key, invocation, resolver, next, token).await
    }
}

/// Runs the business-rule validator bound to the invocation's port pair.
#[derive(Debug)]
pub struct BusinessRuleGate<R> {
    _result: PhantomData<fn() -> R>,
}

impl<R> BusinessRuleGate<R> {
    pub fn new() -> Self {
        Self {
            _result: PhantomData,
        }
    }
}

impl<R> Default for BusinessRuleGate<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: ValidationResult> Stage for BusinessRuleGate<R> {
    async fn handle(
        &self,
        invocation: &Invocation<'_>,
        resolver: &dyn ServiceResolver,
        next: Next<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()> {
        let key = ServiceKey::capability::<dyn BusinessRuleOutputPort<R>>(invocation.ports());
        run_gate("business_rules", key, invocation, resolver, next, token).await
    }
}
