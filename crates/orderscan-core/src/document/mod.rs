//! Uploaded document handling and text extraction.

mod pdf;
mod tabular;

pub use pdf::{PdfProcessor, PdfTextExtractor};
pub use tabular::{csv_to_text, render_grid, xlsx_to_text};

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::DocumentError;

/// Result type for document operations.
pub type Result<T> = std::result::Result<T, DocumentError>;

/// Supported document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentKind {
    /// PDF document, text extracted per page.
    Pdf,
    /// Comma-separated values.
    Csv,
    /// Excel workbook, first worksheet.
    Xlsx,
}

impl DocumentKind {
    /// Detect the kind from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "csv" => Some(Self::Csv),
            "xlsx" => Some(Self::Xlsx),
            _ => None,
        }
    }

    /// Detect the kind from a MIME type.
    ///
    /// Anything that is neither PDF nor CSV is treated as a workbook.
    pub fn from_mime(mime: &str) -> Self {
        let essence = mime.split(';').next().unwrap_or("").trim();
        match essence {
            "application/pdf" => Self::Pdf,
            "text/csv" => Self::Csv,
            _ => Self::Xlsx,
        }
    }

    /// Label used inside the extraction prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Csv => "CSV",
            Self::Xlsx => "XLSX",
        }
    }

    /// MIME type of this kind.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Csv => "text/csv",
            Self::Xlsx => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// File details shown before analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentInfo {
    /// File name.
    pub name: String,
    /// MIME type.
    pub mime_type: String,
    /// Size in bytes.
    pub size: usize,
}

/// An uploaded order document.
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// File name.
    pub name: String,
    /// Detected kind.
    pub kind: DocumentKind,
    /// Raw file contents.
    pub data: Vec<u8>,
}

impl SourceDocument {
    /// Create a document from in-memory bytes.
    pub fn new(name: impl Into<String>, kind: DocumentKind, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            kind,
            data,
        }
    }

    /// Read a document from disk, detecting its kind from the extension.
    pub fn from_path(path: &Path) -> crate::Result<Self> {
        let kind = DocumentKind::from_path(path).ok_or_else(|| {
            DocumentError::Unsupported(
                path.extension()
                    .and_then(|e| e.to_str())
                    .unwrap_or("<none>")
                    .to_string(),
            )
        })?;
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        debug!("Read {} ({} bytes) as {}", name, data.len(), kind);
        Ok(Self::new(name, kind, data))
    }

    /// Size in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// File details.
    pub fn info(&self) -> DocumentInfo {
        DocumentInfo {
            name: self.name.clone(),
            mime_type: self.kind.mime_type().to_string(),
            size: self.size(),
        }
    }
}

/// Extract the text fed to the prompt.
pub fn extract_text(document: &SourceDocument) -> Result<String> {
    info!("Extracting text from {} ({})", document.name, document.kind);

    let text = match document.kind {
        DocumentKind::Pdf => {
            let mut extractor = PdfTextExtractor::new();
            extractor.load(&document.data)?;
            extractor.extract_text()?
        }
        DocumentKind::Csv => csv_to_text(&document.data)?,
        DocumentKind::Xlsx => xlsx_to_text(&document.data)?,
    };

    if text.trim().is_empty() {
        return Err(DocumentError::Empty(document.name.clone()));
    }

    debug!("Extracted {} chars from {}", text.chars().count(), document.name);
    Ok(text)
}
