//! The sluice itself: an ordered stage chain plus the resolver that feeds it.
//!
//! Composition happens once; the built pipeline is cheap to clone and safe
//! to drive from many concurrent invocations. Chain order is the sole
//! determinant of gate precedence - the builder adds no ordering of its own.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use crate::error::PipelineResult;
use crate::gates::{AuthenticationGate, AuthorisationGate, BusinessRuleGate, ValidationGate};
use crate::interactor::InteractorStage;
use crate::invocation::{Invocation, Next, Stage};
use crate::port::{AuthorisationResult, InputPort, ValidationResult};
use crate::registry::ServiceResolver;

/// A composed use-case pipeline.
///
/// Drives one `(input, output, token)` triple through the stage chain.
/// Stages run strictly in composition order, each one choosing whether the
/// rest of the chain runs; the pipeline itself adds no failure modes beyond
/// what stages and strategies produce.
#[derive(Clone)]
pub struct Sluice {
    stages: Arc<[Arc<dyn Stage>]>,
    resolver: Arc<dyn ServiceResolver>,
}

impl Sluice {
    pub fn builder() -> SluiceBuilder {
        SluiceBuilder { stages: Vec::new() }
    }

    /// Runs one use-case invocation to completion.
    ///
    /// Completes with `Ok(())` both when the interactor presented a result
    /// and when a gate intercepted the chain; the distinction reaches the
    /// caller through the output port, not the return value. Errors are
    /// cancellation or faults raised inside a strategy, presenter, or
    /// interactor, propagated unchanged.
    pub async fn invoke<I, O>(
        &self,
        input: &I,
        output: &O,
        token: &CancellationToken,
    ) -> PipelineResult<()>
    where
        I: InputPort<O>,
        O: Send + Sync + 'static,
    {
        let invocation = Invocation::new(input, output);
        let ports = invocation.ports();
        let span = tracing::debug_span!(
            "use_case",
            input_port = ports.input_name(),
            output_port = ports.output_name(),
        );
        let next = Next {
            stages: &self.stages,
            invocation: &invocation,
            resolver: self.resolver.as_ref(),
        };
        next.proceed(token).instrument(span).await
    }
}

impl std::fmt::Debug for Sluice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sluice")
            .field("stages", &self.stages.len())
            .finish()
    }
}

/// Orders the stage chain.
///
/// The conventional full chain reads front to back:
///
/// ```rust,ignore
/// let pipeline = Sluice::builder()
///     .authentication()
///     .authorisation::<AccessDecision>()
///     .validation::<FieldViolations>()
///     .business_rules::<FieldViolations>()
///     .interactor()
///     .build(services);
/// ```
///
/// Any subset in any order is valid, and [`stage`](Self::stage) interposes
/// caller-defined stages with the same short-circuit power the gates have.
pub struct SluiceBuilder {
    stages: Vec<Arc<dyn Stage>>,
}

impl SluiceBuilder {
    /// Appends a caller-supplied stage.
    pub fn stage(mut self, stage: impl Stage + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    /// Appends the authentication gate.
    pub fn authentication(self) -> Self {
        self.stage(AuthenticationGate::new())
    }

    /// Appends the authorisation gate for result type `R`.
    pub fn authorisation<R: AuthorisationResult>(self) -> Self {
        self.stage(AuthorisationGate::<R>::new())
    }

    /// Appends the input-validation gate for result type `R`.
    pub fn validation<R: ValidationResult>(self) -> Self {
        self.stage(ValidationGate::<R>::new())
    }

    /// Appends the business-rule gate for result type `R`.
    pub fn business_rules<R: ValidationResult>(self) -> Self {
        self.stage(BusinessRuleGate::<R>::new())
    }

    /// Appends the terminal interactor stage.
    pub fn interactor(self) -> Self {
        self.stage(InteractorStage::new())
    }

    /// Fixes the chain and attaches the resolver the stages will consult.
    pub fn build(self, resolver: Arc<dyn ServiceResolver>) -> Sluice {
        Sluice {
            stages: self.stages.into(),
            resolver,
        }
    }
}
