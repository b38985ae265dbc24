use async_trait::async_trait;
use graph_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use std::sync::Arc;
use tracing::info;

use super::{enter_stage, require, session_keys, task_failure};
use crate::agent::{ChatModel, converse};
use crate::models::{PipelineStage, PromptSet};

/// One call to the chat model
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatStep {
    AppealLetter,
    MedicalSummary,
    RebuttalSuggestions,
}

impl ChatStep {
    pub fn task_id(self) -> &'static str {
        match self {
            ChatStep::AppealLetter => "appeal_letter",
            ChatStep::MedicalSummary => "medical_summary",
            ChatStep::RebuttalSuggestions => "rebuttal_suggestions",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ChatStep::AppealLetter => "appeal letter",
            ChatStep::MedicalSummary => "medical records summary",
            ChatStep::RebuttalSuggestions => "rebuttal suggestions",
        }
    }

    fn output_key(self) -> &'static str {
        match self {
            ChatStep::AppealLetter => session_keys::APPEAL_LETTER,
            ChatStep::MedicalSummary => session_keys::MEDICAL_SUMMARY,
            ChatStep::RebuttalSuggestions => session_keys::REBUTTAL_SUGGESTIONS,
        }
    }

    fn prompt(self, prompts: &PromptSet) -> Option<&str> {
        match self {
            ChatStep::AppealLetter => Some(&prompts.appeal),
            ChatStep::MedicalSummary => Some(&prompts.summary),
            ChatStep::RebuttalSuggestions => prompts.rebuttal.as_deref(),
        }
    }
}

/// Sends one prepared prompt through the run's shared conversation
pub struct ChatStepTask {
    step: ChatStep,
    model: Arc<dyn ChatModel>,
}

impl ChatStepTask {
    pub fn new(step: ChatStep, model: Arc<dyn ChatModel>) -> Self {
        Self { step, model }
    }
}

#[async_trait]
impl Task for ChatStepTask {
    fn id(&self) -> &str {
        self.step.task_id()
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        enter_stage(&context, PipelineStage::AgentInvoking).await;

        let prompts: PromptSet = require(&context, session_keys::PROMPT_SET).await?;
        let prompt = self.step.prompt(&prompts).ok_or_else(|| {
            GraphError::ContextError(format!("no prompt prepared for {}", self.step.label()))
        })?;

        info!(task_id = %self.id(), "Generating {}", self.step.label());
        let reply = converse(self.model.as_ref(), &context, self.step.label(), prompt)
            .await
            .map_err(task_failure)?;

        context.set(self.step.output_key(), reply).await;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::ContinueAndExecute,
            Some(format!("Generated {}", self.step.label())),
        ))
    }
}
