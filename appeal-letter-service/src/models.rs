use serde::{Deserialize, Serialize};
use std::fmt;

pub const APPEAL_LETTER_FILE_NAME: &str = "appeal_letter.txt";
pub const APPEAL_LETTER_MIME_TYPE: &str = "text/plain";

/// The three documents an appeal is built from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Eob,
    MedicalRecords,
    DenialLetter,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Eob,
        DocumentKind::MedicalRecords,
        DocumentKind::DenialLetter,
    ];

    /// Multipart form field carrying this document
    pub fn field_name(self) -> &'static str {
        match self {
            DocumentKind::Eob => "eob",
            DocumentKind::MedicalRecords => "medical_records",
            DocumentKind::DenialLetter => "denial_letter",
        }
    }

    pub fn from_field_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.field_name() == name)
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Eob => "Explanation of Benefits (EOB)",
            DocumentKind::MedicalRecords => "Medical Records",
            DocumentKind::DenialLetter => "Denial Letter",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A PDF payload as received from the caller
#[derive(Debug, Clone)]
pub struct UploadedDocument {
    pub kind: DocumentKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedDocument {
    pub fn new(kind: DocumentKind, file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            kind,
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Upload slots for one request; any of them may still be empty
#[derive(Debug, Clone, Default)]
pub struct DocumentSet {
    pub eob: Option<UploadedDocument>,
    pub medical_records: Option<UploadedDocument>,
    pub denial_letter: Option<UploadedDocument>,
}

impl DocumentSet {
    /// Place a document in the slot matching its kind, replacing any earlier one
    pub fn insert(&mut self, document: UploadedDocument) {
        let slot = match document.kind {
            DocumentKind::Eob => &mut self.eob,
            DocumentKind::MedicalRecords => &mut self.medical_records,
            DocumentKind::DenialLetter => &mut self.denial_letter,
        };
        *slot = Some(document);
    }

    pub fn get(&self, kind: DocumentKind) -> Option<&UploadedDocument> {
        match kind {
            DocumentKind::Eob => self.eob.as_ref(),
            DocumentKind::MedicalRecords => self.medical_records.as_ref(),
            DocumentKind::DenialLetter => self.denial_letter.as_ref(),
        }
    }

    /// Absent slots, in upload order
    pub fn missing(&self) -> Vec<DocumentKind> {
        DocumentKind::ALL
            .into_iter()
            .filter(|kind| self.get(*kind).is_none())
            .collect()
    }

    pub fn present(&self) -> impl Iterator<Item = &UploadedDocument> {
        [&self.eob, &self.medical_records, &self.denial_letter]
            .into_iter()
            .flatten()
    }

    pub fn into_complete(self) -> Option<CompleteDocuments> {
        Some(CompleteDocuments {
            eob: self.eob?,
            medical_records: self.medical_records?,
            denial_letter: self.denial_letter?,
        })
    }
}

/// All three documents, guaranteed present
#[derive(Debug, Clone)]
pub struct CompleteDocuments {
    pub eob: UploadedDocument,
    pub medical_records: UploadedDocument,
    pub denial_letter: UploadedDocument,
}

/// Flat text of each document, page boundaries dropped
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedDocuments {
    pub eob_text: String,
    pub medical_text: String,
    pub denial_text: String,
}

/// Contact details recovered from the medical records.
/// Fields that could not be found hold their bracketed placeholder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatientInfo {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptSet {
    pub appeal: String,
    pub summary: String,
    pub rebuttal: Option<String>,
}

/// Which outputs a run produces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationVariant {
    /// Appeal letter, records summary and rebuttal suggestions
    #[default]
    Full,
    /// Appeal letter and records summary only
    AppealAndSummary,
}

impl GenerationVariant {
    pub fn includes_rebuttal(self) -> bool {
        matches!(self, GenerationVariant::Full)
    }

    pub fn agent_calls(self) -> usize {
        if self.includes_rebuttal() { 3 } else { 2 }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "full" => Some(GenerationVariant::Full),
            "appeal_and_summary" | "appeal-and-summary" => Some(GenerationVariant::AppealAndSummary),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedOutputs {
    pub appeal_letter: String,
    pub medical_summary: String,
    pub rebuttal_suggestions: Option<String>,
}

/// The appeal letter packaged as a plain-text download
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub content: String,
}

impl DownloadArtifact {
    pub fn appeal_letter(content: impl Into<String>) -> Self {
        Self {
            file_name: APPEAL_LETTER_FILE_NAME.to_string(),
            mime_type: APPEAL_LETTER_MIME_TYPE.to_string(),
            content: content.into(),
        }
    }
}

/// Where a generation run is. Every run starts at `Idle` and returns there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStage {
    Idle,
    DocumentsPending,
    Extracting,
    PromptBuilding,
    AgentInvoking,
    Presenting,
    Error,
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PipelineStage::Idle => "idle",
            PipelineStage::DocumentsPending => "documents_pending",
            PipelineStage::Extracting => "extracting",
            PipelineStage::PromptBuilding => "prompt_building",
            PipelineStage::AgentInvoking => "agent_invoking",
            PipelineStage::Presenting => "presenting",
            PipelineStage::Error => "error",
        };
        f.write_str(name)
    }
}

/// Text of one uploaded document, or why it could not be read
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPreview {
    pub document: DocumentKind,
    pub file_name: String,
    pub text: Option<String>,
    pub error: Option<String>,
}

/// Everything one generation run needs from the caller
#[derive(Debug, Clone, Default)]
pub struct GenerationRequest {
    pub credential: Option<String>,
    pub documents: DocumentSet,
    pub variant: Option<GenerationVariant>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub session_id: String,
    pub variant: GenerationVariant,
    pub patient_info: PatientInfo,
    pub outputs: GeneratedOutputs,
    pub download: DownloadArtifact,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadInfo {
    pub file_name: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub session_id: String,
    pub status: String,
    pub variant: GenerationVariant,
    pub patient_info: PatientInfo,
    pub appeal_letter: String,
    pub medical_summary: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rebuttal_suggestions: Option<String>,
    pub download: DownloadInfo,
}

impl From<GenerationReport> for GenerateResponse {
    fn from(report: GenerationReport) -> Self {
        Self {
            session_id: report.session_id,
            status: "completed".to_string(),
            variant: report.variant,
            patient_info: report.patient_info,
            appeal_letter: report.outputs.appeal_letter,
            medical_summary: report.outputs.medical_summary,
            rebuttal_suggestions: report.outputs.rebuttal_suggestions,
            download: DownloadInfo {
                file_name: report.download.file_name,
                mime_type: report.download.mime_type,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewResponse {
    pub documents: Vec<DocumentPreview>,
}
