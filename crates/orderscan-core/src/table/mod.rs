//! Markdown table extraction from model responses.

mod parser;
mod patterns;

pub use parser::MarkdownTableParser;

use crate::error::TableError;
use crate::models::order::OrderTable;

/// Result type for table parsing.
pub type Result<T> = std::result::Result<T, TableError>;

/// Trait for turning free-form model output into a structured table.
pub trait TableParser {
    /// Parse a table out of the given text.
    fn parse(&self, text: &str) -> Result<OrderTable>;
}
