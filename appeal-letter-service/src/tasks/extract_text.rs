use async_trait::async_trait;
use graph_flow::{Context, GraphError, NextAction, Result, Task, TaskResult};
use tracing::info;

use super::{enter_stage, session_keys, task_failure};
use crate::error::AppealError;
use crate::extraction::extract_document;
use crate::models::{CompleteDocuments, ExtractedDocuments, PipelineStage};

/// Turns the three uploaded PDFs into flat text
pub struct ExtractTextTask {
    documents: CompleteDocuments,
}

impl ExtractTextTask {
    pub fn new(documents: CompleteDocuments) -> Self {
        Self { documents }
    }
}

fn extract_all(documents: &CompleteDocuments) -> std::result::Result<ExtractedDocuments, AppealError> {
    Ok(ExtractedDocuments {
        eob_text: extract_document(&documents.eob)?,
        medical_text: extract_document(&documents.medical_records)?,
        denial_text: extract_document(&documents.denial_letter)?,
    })
}

#[async_trait]
impl Task for ExtractTextTask {
    fn id(&self) -> &str {
        "extract_text"
    }

    async fn run(&self, context: Context) -> Result<TaskResult> {
        enter_stage(&context, PipelineStage::Extracting).await;
        info!(task_id = %self.id(), "Extracting text from uploaded documents");

        let documents = self.documents.clone();
        let extracted = tokio::task::spawn_blocking(move || extract_all(&documents))
            .await
            .map_err(|e| GraphError::TaskExecutionFailed(format!("extraction worker failed: {e}")))?
            .map_err(task_failure)?;

        info!(
            eob_chars = extracted.eob_text.len(),
            medical_chars = extracted.medical_text.len(),
            denial_chars = extracted.denial_text.len(),
            "Document text extracted"
        );
        context.set(session_keys::EXTRACTED_DOCUMENTS, extracted).await;

        Ok(TaskResult::new_with_status(
            None,
            NextAction::ContinueAndExecute,
            Some("Text extracted from all documents".to_string()),
        ))
    }
}
