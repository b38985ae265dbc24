use chrono::NaiveDate;

use crate::models::{ExtractedDocuments, GenerationVariant, PatientInfo, PromptSet};

/// Date as it appears at the top of the letter, e.g. "October 19, 2026"
pub fn format_letter_date(date: NaiveDate) -> String {
    date.format("%B %d, %Y").to_string()
}

pub fn appeal_prompt(docs: &ExtractedDocuments, patient: &PatientInfo, date: NaiveDate) -> String {
    format!(
        "Generate a professional appeal letter based on these inputs:

1. Explanation of Benefits (EOB):
{eob}

2. Medical Records:
{medical}

3. Denial Letter:
{denial}

Write the letter on behalf of the patient, dated {date}, with this sender block:
{name}
{address}
Phone: {phone}
Email: {email}

The appeal letter should:
- Use a polite and professional tone.
- Clearly state the reason for the appeal.
- Explain the medical necessity of the procedures.
- Suggest why the denial reason should be reconsidered.",
        eob = docs.eob_text,
        medical = docs.medical_text,
        denial = docs.denial_text,
        date = format_letter_date(date),
        name = patient.name,
        address = patient.address,
        phone = patient.phone,
        email = patient.email,
    )
}

pub fn summary_prompt(docs: &ExtractedDocuments) -> String {
    format!(
        "Summarize the key details from the following medical records:
{}",
        docs.medical_text
    )
}

pub fn rebuttal_prompt(docs: &ExtractedDocuments) -> String {
    format!(
        "The following denial reason was provided:
{}

Suggest improvements to the rebuttal to strengthen the appeal argument.",
        docs.denial_text
    )
}

impl PromptSet {
    /// Source texts go in verbatim; nothing is truncated
    pub fn build(
        docs: &ExtractedDocuments,
        patient: &PatientInfo,
        date: NaiveDate,
        variant: GenerationVariant,
    ) -> Self {
        Self {
            appeal: appeal_prompt(docs, patient, date),
            summary: summary_prompt(docs),
            rebuttal: variant.includes_rebuttal().then(|| rebuttal_prompt(docs)),
        }
    }
}
