//! PDF text extraction.
//!
//! The upload pipeline hands over raw bytes; this module returns the plain
//! UTF-8 text of all pages concatenated. Parsing is delegated to
//! `pdf-extract`; anything it rejects surfaces as [`ExtractError::Pdf`].

use std::path::Path;

/// Extraction error. The pipeline reports it verbatim at the HTTP boundary.
#[derive(Debug)]
pub enum ExtractError {
    Pdf(String),
    Io(String),
}

impl std::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExtractError::Pdf(e) => write!(f, "PDF extraction failed: {}", e),
            ExtractError::Io(e) => write!(f, "failed to read PDF file: {}", e),
        }
    }
}

impl std::error::Error for ExtractError {}

/// Extracts the text of all pages from in-memory PDF bytes.
pub fn extract_pdf(bytes: &[u8]) -> Result<String, ExtractError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractError::Pdf(e.to_string()))
}

/// Reads a PDF file from disk and extracts its text.
pub fn extract_pdf_file(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path).map_err(|e| ExtractError::Io(e.to_string()))?;
    extract_pdf(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_pdf_returns_error() {
        let err = extract_pdf(b"not a pdf").unwrap_err();
        assert!(matches!(err, ExtractError::Pdf(_)));
    }

    #[test]
    fn missing_file_returns_io_error() {
        let err = extract_pdf_file(Path::new("/nonexistent/input.pdf")).unwrap_err();
        assert!(matches!(err, ExtractError::Io(_)));
    }

    #[test]
    fn error_message_names_the_cause() {
        let err = extract_pdf(b"").unwrap_err();
        assert!(err.to_string().contains("PDF extraction failed"));
    }
}
