//! Invocation plumbing - the erased request/output pair and the stage chain.
//!
//! Ports are only known as concrete types at the `invoke` call site, so the
//! chain carries them type-erased and every typed piece of work lives in a
//! binding that was pre-bound to the concrete pair when it was registered.
//! A stage sees the erased pair plus the rest of the chain as a single
//! continuation; calling `Next::proceed` is the only way to keep the
//! invocation moving.

use std::any::{Any, TypeId, type_name};
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::{PipelineError, PipelineResult};
use crate::registry::ServiceResolver;

/// The statically-declared types of an invocation's port pair.
///
/// Captured once at the `invoke` call site; gates combine it with their own
/// capability type to synthesize the service key for this invocation.
#[derive(Clone, Copy, Debug)]
pub struct PortTypes {
    input: TypeId,
    output: TypeId,
    input_name: &'static str,
    output_name: &'static str,
}

impl PortTypes {
    pub fn of<I: 'static, O: 'static>() -> Self {
        Self {
            input: TypeId::of::<I>(),
            output: TypeId::of::<O>(),
            input_name: type_name::<I>(),
            output_name: type_name::<O>(),
        }
    }

    pub fn input_id(&self) -> TypeId {
        self.input
    }

    pub fn output_id(&self) -> TypeId {
        self.output
    }

    pub fn input_name(&self) -> &'static str {
        self.input_name
    }

    pub fn output_name(&self) -> &'static str {
        self.output_name
    }
}

/// One use-case invocation: a borrowed, type-erased (input, output) pair.
///
/// The pair lives for exactly one run through the chain and is never mutated;
/// the output port is invoked by at most one gate (the first to intercept) or
/// by the interactor.
pub struct Invocation<'a> {
    input: &'a (dyn Any + Send + Sync),
    output: &'a (dyn Any + Send + Sync),
    ports: PortTypes,
}

impl<'a> Invocation<'a> {
    pub fn new<I, O>(input: &'a I, output: &'a O) -> Self
    where
        I: Send + Sync + 'static,
        O: Send + Sync + 'static,
    {
        Self {
            input,
            output,
            ports: PortTypes::of::<I, O>(),
        }
    }

    pub fn ports(&self) -> PortTypes {
        self.ports
    }

    /// Recovers the concrete request. Fails only when a binding was resolved
    /// for a different port pair, which a well-formed resolver cannot do.
    pub fn input<I: 'static>(&self) -> PipelineResult<&'a I> {
        self.input
            .downcast_ref::<I>()
            .ok_or(PipelineError::PortMismatch {
                expected: type_name::<I>(),
                found: self.ports.input_name,
            })
    }

    /// Recovers the concrete output port.
    pub fn output<O: 'static>(&self) -> PipelineResult<&'a O> {
        self.output
            .downcast_ref::<O>()
            .ok_or(PipelineError::PortMismatch {
                expected: type_name::<O>(),
                found: self.ports.output_name,
            })
    }
}

/// One element of the pipeline.
///
/// A stage decides, per invocation, whether to do work, and whether the rest
/// of the chain runs at all: calling `next.proceed(token)` continues,
/// returning without it short-circuits. Stages are composed once and shared
/// across invocations, so they hold no per-request state.
#[async_trait]
pub trait Stage: Send + Sync {
    async fn handle(
        &self,
        invocation: &Invocation<'_>,
        resolver: &dyn ServiceResolver,
        next: Next<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()>;
}

/// The rest of the chain, as a single continuation.
///
/// The terminal continuation (an empty tail) is a no-op that completes with
/// `Ok(())`.
pub struct Next<'a> {
    pub(crate) stages: &'a [Arc<dyn Stage>],
    pub(crate) invocation: &'a Invocation<'a>,
    pub(crate) resolver: &'a dyn ServiceResolver,
}

impl Next<'_> {
    /// Runs the remaining stages front to back.
    ///
    /// Fails with [`PipelineError::Cancelled`] when the token has already
    /// fired, so a cancelled invocation never starts another stage or
    /// strategy.
    pub async fn proceed(self, token: &CancellationToken) -> PipelineResult<()> {
        if token.is_cancelled() {
            return Err(PipelineError::Cancelled);
        }
        let Some((stage, rest)) = self.stages.split_first() else {
            return Ok(());
        };
        let next = Next {
            stages: rest,
            invocation: self.invocation,
            resolver: self.resolver,
        };
        stage
            .handle(self.invocation, self.resolver, next, token)
            .await
    }
}
