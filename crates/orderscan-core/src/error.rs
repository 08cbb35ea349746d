//! Error types for the orderscan-core library.

use thiserror::Error;

/// Main error type for the orderscan library.
#[derive(Error, Debug)]
pub enum OrderError {
    /// Document text extraction error.
    #[error("document error: {0}")]
    Document(#[from] DocumentError),

    /// LLM API error.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// Markdown table parsing error.
    #[error("table error: {0}")]
    Table(#[from] TableError),

    /// Export error.
    #[error("export error: {0}")]
    Export(#[from] ExportError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error (missing credential, invalid settings).
    #[error("configuration error: {0}")]
    Config(String),
}

/// Errors related to reading uploaded documents.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// Failed to open/parse the PDF file.
    #[error("failed to parse PDF: {0}")]
    Parse(String),

    /// Failed to extract text from PDF.
    #[error("failed to extract text: {0}")]
    TextExtraction(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// The PDF is empty or has no pages.
    #[error("PDF has no pages")]
    NoPages,

    /// Failed to read a CSV file.
    #[error("failed to read CSV: {0}")]
    Csv(String),

    /// Failed to read a spreadsheet.
    #[error("failed to read spreadsheet: {0}")]
    Spreadsheet(String),

    /// File type is not one of PDF, CSV or XLSX.
    #[error("unsupported file type: {0}")]
    Unsupported(String),

    /// No text could be extracted.
    #[error("no text could be extracted from {0}")]
    Empty(String),
}

/// Errors related to the completion API.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Connection failed, timeout, TLS error.
    #[error("network error: {0}")]
    Network(String),

    /// Non-success HTTP status.
    #[error("API call failed ({status}): {body}")]
    Api { status: u16, body: String },

    /// Response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Parse(String),

    /// Response contained no completion.
    #[error("API returned no completion")]
    EmptyResponse,
}

/// Errors related to parsing the model's Markdown table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// No line contains both the separator and the anchor phrase.
    #[error("no table header containing '{0}' found")]
    HeaderNotFound(String),

    /// Every candidate data row was rejected.
    #[error("no valid data rows found")]
    NoValidRows,
}

/// Errors related to writing or reading exported tables.
#[derive(Error, Debug)]
pub enum ExportError {
    /// CSV encoding/decoding failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON encoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// File write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Export file has no header row.
    #[error("export has no header row")]
    MissingHeader,
}

/// Result type for the orderscan library.
pub type Result<T> = std::result::Result<T, OrderError>;
