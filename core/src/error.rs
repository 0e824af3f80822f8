use thiserror::Error;

/// Result alias used across the pipeline engine.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Faults a pipeline invocation can surface to its caller.
///
/// Gate interceptions are not errors: a presented validation or
/// authorisation failure completes the invocation with `Ok(())`. Errors are
/// reserved for cancellation and for faults raised by strategies, presenters,
/// or interactors, which propagate unchanged.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The cancellation token fired at a suspension point.
    #[error("use case invocation was cancelled")]
    Cancelled,

    /// A resolver returned a binding whose captured port types disagree with
    /// the invocation. Only reachable through a misbehaving custom resolver.
    #[error("port type mismatch: binding expected `{expected}`, invocation carries `{found}`")]
    PortMismatch {
        expected: &'static str,
        found: &'static str,
    },

    /// A strategy, presenter, or interactor failed.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
