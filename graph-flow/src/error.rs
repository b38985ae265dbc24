use thiserror::Error;

/// Errors raised while executing a task graph
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Task execution failed: {0}")]
    TaskExecutionFailed(String),

    #[error("Context error: {0}")]
    ContextError(String),

    #[error("Graph has no start task: {0}")]
    MissingStartTask(String),

    /// Carries a caller-defined error through the graph untouched so it can be
    /// recovered with `downcast` once execution returns.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
