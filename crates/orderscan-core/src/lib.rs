//! Core library for order document analysis.
//!
//! This crate provides:
//! - Text extraction from PDF, CSV and XLSX order documents
//! - The fixed extraction prompt and a chat completion client
//! - An anchor-based parser for the Markdown table the model returns
//! - CSV (UTF-8 with BOM) and JSON export of the parsed table

pub mod analysis;
pub mod document;
pub mod error;
pub mod export;
pub mod llm;
pub mod models;
pub mod table;

pub use analysis::{AnalysisReport, OrderAnalyzer, Session};
pub use document::{DocumentInfo, DocumentKind, SourceDocument};
pub use error::{DocumentError, ExportError, LlmError, OrderError, Result, TableError};
pub use llm::{ChatClient, CompletionBackend};
pub use models::config::AppConfig;
pub use models::order::{ANCHOR_PHRASE, ORDER_COLUMNS, OrderLine, OrderTable};
pub use table::{MarkdownTableParser, TableParser};
