use crate::models::{DocumentKind, PipelineStage};
use thiserror::Error;

/// Input the caller failed to provide
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MissingInput {
    Credential,
    Documents(Vec<DocumentKind>),
}

impl std::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MissingInput::Credential => f.write_str("Please provide your API key"),
            MissingInput::Documents(kinds) => {
                let names: Vec<&str> = kinds.iter().map(|kind| kind.label()).collect();
                write!(f, "Please upload all required documents (missing: {})", names.join(", "))
            }
        }
    }
}

#[derive(Error, Debug)]
pub enum AppealError {
    #[error("{0}")]
    MissingInput(MissingInput),

    #[error("Could not read text from the {document}: {reason}")]
    DocumentParse {
        document: DocumentKind,
        reason: String,
    },

    #[error("Failed to initialize the AI agent: {0}")]
    AgentInit(String),

    #[error("Error generating {step}: {reason}")]
    AgentInvocation { step: String, reason: String },

    #[error("Workflow error: {0}")]
    Workflow(String),
}

impl AppealError {
    /// Stage the run was in when it failed
    pub fn stage(&self) -> PipelineStage {
        match self {
            AppealError::MissingInput(_) => PipelineStage::DocumentsPending,
            AppealError::DocumentParse { .. } => PipelineStage::Extracting,
            AppealError::AgentInit(_) | AppealError::AgentInvocation { .. } => {
                PipelineStage::AgentInvoking
            }
            AppealError::Workflow(_) => PipelineStage::Error,
        }
    }

    pub fn missing_credential() -> Self {
        AppealError::MissingInput(MissingInput::Credential)
    }

    pub fn missing_documents(kinds: Vec<DocumentKind>) -> Self {
        AppealError::MissingInput(MissingInput::Documents(kinds))
    }
}

impl From<graph_flow::GraphError> for AppealError {
    fn from(err: graph_flow::GraphError) -> Self {
        match err {
            graph_flow::GraphError::Other(inner) => match inner.downcast::<AppealError>() {
                Ok(appeal_error) => appeal_error,
                Err(other) => AppealError::Workflow(other.to_string()),
            },
            other => AppealError::Workflow(other.to_string()),
        }
    }
}
