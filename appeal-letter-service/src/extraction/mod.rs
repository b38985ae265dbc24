pub mod patient_fields;
pub mod pdf_text;

pub use patient_fields::{PatientFields, match_field};
pub use pdf_text::{PdfTextError, extract_document, extract_pages, extract_text};
