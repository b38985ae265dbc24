//! Context keys shared by the appeal workflow tasks

pub const VARIANT: &str = "variant";
pub const STAGE: &str = "stage";
pub const EXTRACTED_DOCUMENTS: &str = "extracted_documents";
pub const PATIENT_INFO: &str = "patient_info";
pub const PROMPT_SET: &str = "prompt_set";
pub const APPEAL_LETTER: &str = "appeal_letter";
pub const MEDICAL_SUMMARY: &str = "medical_summary";
pub const REBUTTAL_SUGGESTIONS: &str = "rebuttal_suggestions";
pub const GENERATED_OUTPUTS: &str = "generated_outputs";
