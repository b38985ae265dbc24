pub mod build_prompts;
pub mod chat_step;
pub mod extract_text;
pub mod present_results;
pub mod session_keys;

pub use build_prompts::BuildPromptsTask;
pub use chat_step::{ChatStep, ChatStepTask};
pub use extract_text::ExtractTextTask;
pub use present_results::PresentResultsTask;

use crate::error::AppealError;
use crate::models::PipelineStage;
use graph_flow::{Context, GraphError};

/// Wrap a domain error so the pipeline can recover it after the graph returns
pub(crate) fn task_failure(err: AppealError) -> GraphError {
    GraphError::Other(anyhow::Error::new(err))
}

pub(crate) async fn enter_stage(context: &Context, stage: PipelineStage) {
    context.set(session_keys::STAGE, stage).await;
}

pub(crate) async fn require<T: serde::de::DeserializeOwned>(
    context: &Context,
    key: &str,
) -> graph_flow::Result<T> {
    context
        .get(key)
        .await
        .ok_or_else(|| GraphError::ContextError(format!("{key} not found in context")))
}
