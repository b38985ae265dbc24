use tracing::{debug, warn};

use crate::error::AppealError;
use crate::models::UploadedDocument;

#[derive(Debug, thiserror::Error)]
pub enum PdfTextError {
    #[error("failed to parse PDF: {0}")]
    Parse(String),
}

/// Text of every page, in page order. Line breaks inside a page are kept,
/// so line-anchored patterns stop at the end of their line.
pub fn extract_pages(bytes: &[u8]) -> Result<Vec<String>, PdfTextError> {
    pdf_extract::extract_text_from_mem_by_pages(bytes).map_err(|e| PdfTextError::Parse(e.to_string()))
}

/// Whole-document text: page texts joined with no separator
pub fn extract_text(bytes: &[u8]) -> Result<String, PdfTextError> {
    Ok(extract_pages(bytes)?.concat())
}

/// Extract an uploaded document, tagging failures with the document they came from
pub fn extract_document(document: &UploadedDocument) -> Result<String, AppealError> {
    match extract_text(&document.bytes) {
        Ok(text) => {
            debug!(
                document = %document.kind,
                file_name = %document.file_name,
                chars = text.len(),
                "extracted document text"
            );
            if text.trim().is_empty() {
                warn!(document = %document.kind, "document contains no extractable text");
            }
            Ok(text)
        }
        Err(e) => Err(AppealError::DocumentParse {
            document: document.kind,
            reason: e.to_string(),
        }),
    }
}
