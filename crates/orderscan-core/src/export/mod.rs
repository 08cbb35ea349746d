//! Export of parsed order tables.

pub mod csv;
pub mod json;

pub use self::csv::{read_csv, to_csv_bytes, write_csv};
pub use self::json::to_json;

use crate::error::ExportError;

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// UTF-8 byte-order mark written ahead of CSV exports.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";
