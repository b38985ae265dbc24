use async_trait::async_trait;
use chrono::NaiveDate;
use graph_flow::{Context, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::{enter_stage, require, session_keys};
use crate::models::{
    ExtractedDocuments, GenerationVariant, PatientInfo, PipelineStage, PromptSet,
};

/// Pulls patient details out of the medical records and prepares every prompt
pub struct BuildPromptsTask {
    today: NaiveDate,
}

impl BuildPromptsTask {
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }
}

#[async_trait]
impl Task for BuildPromptsTask {
    fn id(&self) -> &str {
        "build_prompts"
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        enter_stage(&context, PipelineStage::PromptBuilding).await;

        let docs: ExtractedDocuments = require(&context, session_keys::EXTRACTED_DOCUMENTS).await?;
        let variant: GenerationVariant = context
            .get(session_keys::VARIANT)
            .await
            .unwrap_or_default();

        let patient = PatientInfo::from_medical_text(&docs.medical_text);
        let prompts = PromptSet::build(&docs, &patient, self.today, variant);

        info!(
            task_id = %self.id(),
            ?variant,
            appeal_prompt_chars = prompts.appeal.len(),
            "Prompts built"
        );

        context.set(session_keys::PATIENT_INFO, patient).await;
        context.set(session_keys::PROMPT_SET, prompts).await;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::ContinueAndExecute,
            Some("Prompts prepared".to_string()),
        ))
    }
}
