//! The terminal stage: hand the invocation to the use case's own handler.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::binding::InteractorBinding;
use crate::error::PipelineResult;
use crate::invocation::{Invocation, Next, Stage};
use crate::registry::{ServiceKey, ServiceResolver};

/// Resolves and invokes the interactor bound to the invocation's port pair.
///
/// Terminal: it never calls the continuation, so stages composed after it
/// are unreachable. A pair with no registered interactor completes silently,
/// the same degrade-to-noop policy the gates apply to missing strategies.
#[derive(Debug, Default)]
pub struct InteractorStage {
    _private: (),
}

impl InteractorStage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Stage for InteractorStage {
    async fn handle(
        &self,
        invocation: &Invocation<'_>,
        resolver: &dyn ServiceResolver,
        _next: Next<'_>,
        token: &CancellationToken,
    ) -> PipelineResult<()> {
        let key = ServiceKey::interactor(invocation.ports());
        let Some(handle) = resolver.resolve(&key) else {
            tracing::trace!(%key, "no interactor bound for this port pair");
            return Ok(());
        };
        let Ok(binding) = handle.downcast::<InteractorBinding>() else {
            tracing::warn!(%key, "resolved service is not an interactor binding, skipping");
            return Ok(());
        };
        binding.invoke(invocation, token).await
    }
}
