use chrono::{Local, NaiveDate};
use std::sync::Arc;
use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use crate::agent::AgentProvider;
use crate::error::AppealError;
use crate::extraction::extract_document;
use crate::models::{
    DocumentPreview, DocumentSet, DownloadArtifact, GeneratedOutputs, GenerationReport,
    GenerationRequest, GenerationVariant, PatientInfo, PipelineStage,
};
use crate::tasks::session_keys;
use crate::workflow::{build_appeal_workflow, create_appeal_session};

/// Runs "Generate Appeal Letter" end to end.
///
/// Holds no per-run state: every call builds its own chat model, graph and
/// session, so concurrent calls never share a transcript.
pub struct AppealPipeline {
    provider: Arc<dyn AgentProvider>,
    default_variant: GenerationVariant,
    today: Option<NaiveDate>,
}

impl AppealPipeline {
    pub fn new(provider: Arc<dyn AgentProvider>, default_variant: GenerationVariant) -> Self {
        Self {
            provider,
            default_variant,
            today: None,
        }
    }

    /// Pin the letter date instead of reading the local clock
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn default_variant(&self) -> GenerationVariant {
        self.default_variant
    }

    fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// Extract every uploaded document for display. A document that fails to
    /// parse gets an error entry; the others are unaffected.
    pub fn preview(&self, documents: &DocumentSet) -> Vec<DocumentPreview> {
        documents
            .present()
            .map(|document| match extract_document(document) {
                Ok(text) => DocumentPreview {
                    document: document.kind,
                    file_name: document.file_name.clone(),
                    text: Some(text),
                    error: None,
                },
                Err(e) => {
                    warn!(document = %document.kind, error = %e, "preview extraction failed");
                    DocumentPreview {
                        document: document.kind,
                        file_name: document.file_name.clone(),
                        text: None,
                        error: Some(e.to_string()),
                    }
                }
            })
            .collect()
    }

    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationReport, AppealError> {
        let session_id = Uuid::new_v4().to_string();
        let span = info_span!("appeal_generation", session_id = %session_id);

        self.run(session_id, request)
            .instrument(span)
            .await
            .inspect_err(|e| {
                error!(stage = %e.stage(), error = %e, "appeal generation failed");
            })
    }

    async fn run(
        &self,
        session_id: String,
        request: GenerationRequest,
    ) -> Result<GenerationReport, AppealError> {
        info!(stage = %PipelineStage::DocumentsPending, "checking inputs");

        let credential = request
            .credential
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(AppealError::missing_credential)?;

        let missing = request.documents.missing();
        if !missing.is_empty() {
            return Err(AppealError::missing_documents(missing));
        }
        let documents = request
            .documents
            .into_complete()
            .ok_or_else(|| AppealError::missing_documents(Vec::new()))?;

        let model = self.provider.connect(&credential)?;

        let variant = request.variant.unwrap_or(self.default_variant);
        let graph = build_appeal_workflow(documents, model, self.today());
        let mut session = create_appeal_session(session_id.clone(), &graph, variant).await?;

        let result = graph.execute_session(&mut session).await?;
        info!(status = ?result.status, "workflow finished");

        let outputs: GeneratedOutputs = session
            .context
            .get(session_keys::GENERATED_OUTPUTS)
            .await
            .ok_or_else(|| AppealError::Workflow("workflow ended without outputs".to_string()))?;
        let patient_info: PatientInfo = session
            .context
            .get(session_keys::PATIENT_INFO)
            .await
            .ok_or_else(|| AppealError::Workflow("patient info missing".to_string()))?;

        let download = DownloadArtifact::appeal_letter(outputs.appeal_letter.clone());

        Ok(GenerationReport {
            session_id,
            variant,
            patient_info,
            outputs,
            download,
        })
    }
}
