//! Pre-bound gate and interactor adapters.
//!
//! Registration is the one moment where the concrete request, output-port,
//! and result types are all in scope, so that is where the typed work gets
//! captured: each adapter closes over its strategy, knows how to recover the
//! concrete ports from an erased invocation, and carries the whole
//! check-then-present sequence of its gate. At run time a gate resolves the
//! adapter by key and calls it; dispatch is one map lookup per gate.

use std::marker::PhantomData;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{PipelineError, PipelineResult};
use crate::invocation::Invocation;
use crate::port::{
    AuthenticationOutputPort, AuthorisationOutputPort, AuthorisationResult,
    BusinessRuleOutputPort, ValidationOutputPort, ValidationResult,
};
use crate::strategy::{
    AuthenticationVerifier, AuthorisationEnforcer, BusinessRuleValidator, Interactor, Validator,
};

/// What a gate's strategy decided for this invocation.
pub(crate) enum Verdict {
    /// The check passed; the chain continues.
    Pass,
    /// The failure was presented; the chain stops here.
    Intercept,
}

#[async_trait]
pub(crate) trait GateCheck: Send + Sync {
    async fn evaluate(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<Verdict>;
}

/// The erased value a gate resolves from the registry.
pub(crate) struct GateBinding(Arc<dyn GateCheck>);

impl GateBinding {
    pub(crate) fn validation<I, O, R, V>(validator: V) -> Self
    where
        I: Send + Sync + 'static,
        O: ValidationOutputPort<R> + Send + Sync + 'static,
        R: ValidationResult,
        V: Validator<I, R> + 'static,
    {
        let binding: ValidationBinding<I, O, R, _> = ValidationBinding {
            validator,
            _ports: PhantomData,
        };
        Self(Arc::new(binding))
    }

    pub(crate) fn business_rules<I, O, R, V>(validator: V) -> Self
    where
        I: Send + Sync + 'static,
        O: BusinessRuleOutputPort<R> + Send + Sync + 'static,
        R: ValidationResult,
        V: BusinessRuleValidator<I, R> + 'static,
    {
        let binding: BusinessRuleBinding<I, O, R, _> = BusinessRuleBinding {
            validator,
            _ports: PhantomData,
        };
        Self(Arc::new(binding))
    }

    pub(crate) fn authorisation<I, O, R, E>(enforcer: E) -> Self
    where
        I: Send + Sync + 'static,
        O: AuthorisationOutputPort<R> + Send + Sync + 'static,
        R: AuthorisationResult,
        E: AuthorisationEnforcer<I, R> + 'static,
    {
        let binding: AuthorisationBinding<I, O, R, _> = AuthorisationBinding {
            enforcer,
            _ports: PhantomData,
        };
        Self(Arc::new(binding))
    }

    pub(crate) fn authentication<I, O, V>(verifier: V) -> Self
    where
        I: Send + Sync + 'static,
        O: AuthenticationOutputPort + Send + Sync + 'static,
        V: AuthenticationVerifier<I> + 'static,
    {
        let binding: AuthenticationBinding<I, O, _> = AuthenticationBinding {
            verifier,
            _ports: PhantomData,
        };
        Self(Arc::new(binding))
    }

    pub(crate) async fn evaluate(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<Verdict> {
        self.0.evaluate(invocation, token).await
    }
}

/// The erased value the interactor stage resolves from the registry.
pub(crate) struct InteractorBinding(Arc<dyn InteractorCall>);

#[async_trait]
pub(crate) trait InteractorCall: Send + Sync {
    async fn invoke(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()>;
}

impl InteractorBinding {
    pub(crate) fn new<I, O, T>(interactor: T) -> Self
    where
        I: Send + Sync + 'static,
        O: Send + Sync + 'static,
        T: Interactor<I, O> + 'static,
    {
        let binding: BoundInteractor<I, O, _> = BoundInteractor {
            interactor,
            _ports: PhantomData,
        };
        Self(Arc::new(binding))
    }

    pub(crate) async fn invoke(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()> {
        self.0.invoke(invocation, token).await
    }
}

// A cancelled token observed after a strategy call fails the chain instead of
// presenting, so cancellation always surfaces as a fault.
fn bail_if_cancelled(token: &CancellationToken) -> PipelineResult<()> {
    if token.is_cancelled() {
        Err(PipelineError::Cancelled)
    } else {
        Ok(())
    }
}

struct ValidationBinding<I, O, R, V> {
    validator: V,
    _ports: PhantomData<fn() -> (I, O, R)>,
}

#[async_trait]
impl<I, O, R, V> GateCheck for ValidationBinding<I, O, R, V>
where
    I: Send + Sync + 'static,
    O: ValidationOutputPort<R> + Send + Sync + 'static,
    R: ValidationResult,
    V: Validator<I, R>,
{
    async fn evaluate(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<Verdict> {
        let input = invocation.input::<I>()?;
        let result = self.validator.validate(input, token).await?;
        bail_if_cancelled(token)?;
        if result.is_valid() {
            return Ok(Verdict::Pass);
        }
        let output = invocation.output::<O>()?;
        output.present_validation_failure(result, token).await?;
        Ok(Verdict::Intercept)
    }
}

struct BusinessRuleBinding<I, O, R, V> {
    validator: V,
    _ports: PhantomData<fn() -> (I, O, R)>,
}

#[async_trait]
impl<I, O, R, V> GateCheck for BusinessRuleBinding<I, O, R, V>
where
    I: Send + Sync + 'static,
    O: BusinessRuleOutputPort<R> + Send + Sync + 'static,
    R: ValidationResult,
    V: BusinessRuleValidator<I, R>,
{
    async fn evaluate(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<Verdict> {
        let input = invocation.input::<I>()?;
        let result = self.validator.validate(input, token).await?;
        bail_if_cancelled(token)?;
        if result.is_valid() {
            return Ok(Verdict::Pass);
        }
        let output = invocation.output::<O>()?;
        output.present_business_rule_failure(result, token).await?;
        Ok(Verdict::Intercept)
    }
}

struct AuthorisationBinding<I, O, R, E> {
    enforcer: E,
    _ports: PhantomData<fn() -> (I, O, R)>,
}

#[async_trait]
impl<I, O, R, E> GateCheck for AuthorisationBinding<I, O, R, E>
where
    I: Send + Sync + 'static,
    O: AuthorisationOutputPort<R> + Send + Sync + 'static,
    R: AuthorisationResult,
    E: AuthorisationEnforcer<I, R>,
{
    async fn evaluate(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<Verdict> {
        let input = invocation.input::<I>()?;
        let result = self.enforcer.check_authorisation(input, token).await?;
        bail_if_cancelled(token)?;
        if result.is_authorised() {
            return Ok(Verdict::Pass);
        }
        let output = invocation.output::<O>()?;
        output.present_unauthorised(result, token).await?;
        Ok(Verdict::Intercept)
    }
}

struct AuthenticationBinding<I, O, V> {
    verifier: V,
    _ports: PhantomData<fn() -> (I, O)>,
}

#[async_trait]
impl<I, O, V> GateCheck for AuthenticationBinding<I, O, V>
where
    I: Send + Sync + 'static,
    O: AuthenticationOutputPort + Send + Sync + 'static,
    V: AuthenticationVerifier<I>,
{
    async fn evaluate(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<Verdict> {
        let input = invocation.input::<I>()?;
        let authenticated = self.verifier.authenticate(input, token).await?;
        bail_if_cancelled(token)?;
        if authenticated {
            return Ok(Verdict::Pass);
        }
        let output = invocation.output::<O>()?;
        output.present_unauthenticated(token).await?;
        Ok(Verdict::Intercept)
    }
}

struct BoundInteractor<I, O, T> {
    interactor: T,
    _ports: PhantomData<fn() -> (I, O)>,
}

#[async_trait]
impl<I, O, T> InteractorCall for BoundInteractor<I, O, T>
where
    I: Send + Sync + 'static,
    O: Send + Sync + 'static,
    T: Interactor<I, O>,
{
    async fn invoke(
        &self,
        invocation: &Invocation<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()> {
        let input = invocation.input::<I>()?;
        let output = invocation.output::<O>()?;
        self.interactor.handle(input, output, token).await?;
        Ok(())
    }
}
