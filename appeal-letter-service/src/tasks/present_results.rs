use async_trait::async_trait;
use graph_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::{enter_stage, require, session_keys};
use crate::models::{GeneratedOutputs, PipelineStage};

/// Collects the generated texts into the run's final outputs
pub struct PresentResultsTask;

#[async_trait]
impl Task for PresentResultsTask {
    fn id(&self) -> &str {
        "present_results"
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        enter_stage(&context, PipelineStage::Presenting).await;

        let outputs = GeneratedOutputs {
            appeal_letter: require(&context, session_keys::APPEAL_LETTER).await?,
            medical_summary: require(&context, session_keys::MEDICAL_SUMMARY).await?,
            rebuttal_suggestions: context.get(session_keys::REBUTTAL_SUGGESTIONS).await,
        };

        info!(
            task_id = %self.id(),
            has_rebuttal = outputs.rebuttal_suggestions.is_some(),
            "Outputs ready"
        );

        let appeal_letter = outputs.appeal_letter.clone();
        context.set(session_keys::GENERATED_OUTPUTS, outputs).await;
        enter_stage(&context, PipelineStage::Idle).await;

        Ok(TaskResult::new_with_status(
            Some(appeal_letter),
            NextAction::End,
            Some("Appeal letter ready for download".to_string()),
        ))
    }
}
