//! PDF text extraction using lopdf and pdf-extract.

use lopdf::Document;
use tracing::{debug, trace, warn};

use super::Result;
use crate::error::DocumentError;

/// Trait for PDF text extraction implementations.
pub trait PdfProcessor {
    /// Load a PDF from bytes.
    fn load(&mut self, data: &[u8]) -> Result<()>;

    /// Get the number of pages in the PDF.
    fn page_count(&self) -> u32;

    /// Extract text from a specific page (1-indexed).
    fn extract_page_text(&self, page: u32) -> Result<String>;

    /// Extract text from the entire PDF.
    fn extract_text(&self) -> Result<String>;
}

/// PDF text extractor.
///
/// Pages are read one by one with lopdf and joined in page order. When that
/// yields no text at all the whole document is handed to pdf-extract instead.
pub struct PdfTextExtractor {
    document: Option<Document>,
    raw_data: Vec<u8>,
}

impl PdfTextExtractor {
    /// Create a new PDF extractor.
    pub fn new() -> Self {
        Self {
            document: None,
            raw_data: Vec::new(),
        }
    }

    fn document(&self) -> Result<&Document> {
        self.document
            .as_ref()
            .ok_or_else(|| DocumentError::Parse("No document loaded".to_string()))
    }

    fn extract_whole_document(&self) -> Result<String> {
        let data = &self.raw_data;

        // pdf-extract panics on some malformed inputs
        match std::panic::catch_unwind(|| pdf_extract::extract_text_from_mem(data)) {
            Ok(result) => result.map_err(|e| DocumentError::TextExtraction(e.to_string())),
            Err(_) => Err(DocumentError::TextExtraction(
                "whole-document extraction aborted".to_string(),
            )),
        }
    }
}

impl Default for PdfTextExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfProcessor for PdfTextExtractor {
    fn load(&mut self, data: &[u8]) -> Result<()> {
        let mut doc = Document::load_mem(data).map_err(|e| DocumentError::Parse(e.to_string()))?;

        // Handle PDFs with empty password encryption
        if doc.is_encrypted() {
            if doc.decrypt("").is_err() {
                return Err(DocumentError::Encrypted);
            }
            debug!("Decrypted PDF with empty password");

            // pdf-extract needs the decrypted bytes for the fallback path
            let mut decrypted_data = Vec::new();
            doc.save_to(&mut decrypted_data)
                .map_err(|e| DocumentError::Parse(format!("Failed to save decrypted PDF: {}", e)))?;
            self.raw_data = decrypted_data;
        } else {
            self.raw_data = data.to_vec();
        }

        let page_count = doc.get_pages().len();
        if page_count == 0 {
            return Err(DocumentError::NoPages);
        }

        debug!("Loaded PDF with {} pages", page_count);
        self.document = Some(doc);
        Ok(())
    }

    fn page_count(&self) -> u32 {
        self.document
            .as_ref()
            .map(|doc| doc.get_pages().len() as u32)
            .unwrap_or(0)
    }

    fn extract_page_text(&self, page: u32) -> Result<String> {
        let doc = self.document()?;
        doc.extract_text(&[page])
            .map_err(|e| DocumentError::TextExtraction(format!("page {}: {}", page, e)))
    }

    fn extract_text(&self) -> Result<String> {
        let page_count = self.page_count();
        if page_count == 0 {
            return Err(DocumentError::NoPages);
        }

        let mut text = String::new();
        for page in 1..=page_count {
            match self.extract_page_text(page) {
                Ok(page_text) => {
                    trace!("Page {}: {} chars", page, page_text.len());
                    text.push_str(&page_text);
                }
                Err(e) => warn!("Skipping page {}: {}", page, e),
            }
        }

        if text.trim().is_empty() {
            debug!("Per-page extraction found no text, trying whole-document extraction");
            return self.extract_whole_document();
        }

        Ok(text)
    }
}
